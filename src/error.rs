/// The error type boxed around any failure raised while a request is being served.
///
/// Handler and middleware errors of any type end up as a `RouteError`; the underlying
/// value can be recovered with [`downcast_ref`](https://doc.rust-lang.org/std/error/trait.Error.html#method.downcast_ref).
pub type RouteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the router itself.
///
/// Registration-time problems (a broken route table) are reported through [`Error::RouteConflict`] and
/// should never be retried; the route table has to be fixed instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The route could not be inserted into its method tree.
    #[error(transparent)]
    RouteConflict(#[from] RouteConflict),

    /// A route name was registered twice in a [`RouteManager`](./struct.RouteManager.html).
    #[error("route name `{0}` is already registered")]
    DuplicateRouteName(String),

    /// No path template is registered for the route name.
    #[error("could not find any path for route name: {0}")]
    UnknownRouteName(String),

    /// A `:param` segment had no value, or more than one, while building an url.
    #[error("param `{param}` missing in provided data or has multiple values for path: {path}")]
    MissingParam { path: String, param: String },

    /// The request path could not be percent decoded into UTF-8.
    #[error("couldn't percent decode request path {path:?}: {source}")]
    InvalidRequestPath {
        path: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// A conflict detected while registering a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteConflict {
    /// The exact same path already has a handler for this method.
    #[error("duplicate route: '{path}' has already a handler")]
    DuplicateRoute { path: String },

    /// A `:` segment without a name, e.g. `/users/:/following`.
    #[error("param name can not be empty in route: {path}")]
    EmptyParamName { path: String },

    /// Two differently named params compete for the same tree position.
    #[error("param `:{conflicting}` conflicts with existing `:{existing}` at the same position in route: {path}")]
    ParamNameConflict {
        path: String,
        existing: String,
        conflicting: String,
    },
}

impl RouteConflict {
    /// The route path whose registration failed.
    pub fn path(&self) -> &str {
        match self {
            RouteConflict::DuplicateRoute { path }
            | RouteConflict::EmptyParamName { path }
            | RouteConflict::ParamNameConflict { path, .. } => path,
        }
    }
}
