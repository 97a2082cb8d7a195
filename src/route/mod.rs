use crate::types::Params;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;

pub use self::tree::{RouteMatch, RouteTree};

mod tree;

pub(crate) type Handler<B, E> = Box<dyn Fn(Request<B>, Params) -> HandlerReturn<E> + Send + Sync + 'static>;
pub(crate) type HandlerReturn<E> = Box<dyn Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static>;

/// Represents a single registered route: a handler attached to a trie node.
///
/// It shouldn't be created directly, use the [RouterBuilder](./struct.RouterBuilder.html) methods to register a route.
///
/// The `path` is the canonical route template, i.e. the registered path with its `:name` markers intact and
/// without the trailing slash, e.g. `/users/:id`. It identifies the route in statistics and dumps.
pub struct Route<B, E> {
    pub(crate) path: String,
    pub(crate) handler: Handler<B, E>,
}

impl<B, E> Route<B, E> {
    /// The canonical route template.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }
}

impl<B, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> Route<B, E> {
    pub(crate) fn boxed_handler<H, R>(handler: H) -> Handler<B, E>
    where
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        Box::new(move |req: Request<B>, params: Params| Box::new(handler(req, params)))
    }

    pub(crate) async fn process(&self, req: Request<B>, params: Params) -> crate::Result<Response<Full<Bytes>>> {
        Pin::from((self.handler)(req, params)).await.map_err(Into::into)
    }
}

impl<B, E> Debug for Route<B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ path: {:?} }}", self.path)
    }
}
