use crate::middleware::Middleware;
use crate::router::{GroupBuilder, Router};
use crate::timer::Timer;
use crate::types::Params;
use crate::Error;
use http_body_util::Full;
use hyper::body::Bytes;
use http::{Method, Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

/// Builder for the [Router](./struct.Router.html) type.
///
/// This `RouterBuilder<B, E>` type accepts two type parameters: `B` and `E`.
///
/// * The `B` represents the request body type.
/// * The `E` represents the error type of the route handlers.
///
/// Routes are inserted into their trie as they are added. The first failure is kept and returned by
/// [`build`](#method.build); every call after it is skipped.
///
/// # Examples
///
/// ```
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Response};
/// use routetrie::{Router, RouterBuilder};
/// use std::convert::Infallible;
///
/// async fn home_handler(_: hyper::Request<Full<Bytes>>, _: routetrie::Params) -> Result<Response<Full<Bytes>>, Infallible> {
///     Ok(Response::new(Full::new(Bytes::from("home"))))
/// }
///
/// # fn run() -> Router<Full<Bytes>, Infallible> {
/// // Use Router::builder() method to create a new RouterBuilder instance.
/// // We will use this builder to build a Router instance.
/// let builder: RouterBuilder<Full<Bytes>, Infallible> = Router::builder();
///
/// // Specify the route paths and their handlers, then build the router.
/// let router = builder.get("/", home_handler).build().unwrap();
/// # router
/// # }
/// # run();
/// ```
pub struct RouterBuilder<B, E> {
    inner: Result<Router<B, E>, Error>,
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> RouterBuilder<B, E> {
    /// Creates a new `RouterBuilder` instance with default options.
    pub fn new() -> RouterBuilder<B, E> {
        RouterBuilder::default()
    }

    /// Creates a new [Router](./struct.Router.html) instance from the added configuration.
    pub fn build(self) -> Result<Router<B, E>, Error> {
        self.inner
    }

    fn and_then<F>(self, func: F) -> Self
    where
        F: FnOnce(Router<B, E>) -> Result<Router<B, E>, Error>,
    {
        RouterBuilder {
            inner: self.inner.and_then(func),
        }
    }

    /// Adds a new route with `GET` method and the handler at the specified path.
    ///
    /// # Examples
    ///
    /// ```
    /// use http_body_util::Full;
    /// use hyper::{body::Bytes, Response};
    /// use routetrie::Router;
    /// use std::convert::Infallible;
    ///
    /// # fn run() -> Router<Full<Bytes>, Infallible> {
    /// let router = Router::builder()
    ///     .get("/", |_req, _params| async move { Ok(Response::new(Full::new(Bytes::from("Hello world!")))) })
    ///     .build()
    ///     .unwrap();
    /// # router
    /// # }
    /// # run();
    /// ```
    pub fn get<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::GET, path, handler)
    }

    /// Adds a new route with `HEAD` method and the handler at the specified path.
    pub fn head<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::HEAD, path, handler)
    }

    /// Adds a new route with `POST` method and the handler at the specified path.
    pub fn post<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::POST, path, handler)
    }

    /// Adds a new route with `PUT` method and the handler at the specified path.
    pub fn put<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::PUT, path, handler)
    }

    /// Adds a new route with `DELETE` method and the handler at the specified path.
    pub fn delete<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::DELETE, path, handler)
    }

    /// Adds a new route with `PATCH` method and the handler at the specified path.
    pub fn patch<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::PATCH, path, handler)
    }

    /// Adds a new route with `OPTIONS` method and the handler at the specified path.
    ///
    /// A registered `OPTIONS` route takes precedence over the automatic `Allow` answer.
    pub fn options<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::OPTIONS, path, handler)
    }

    /// Adds a new route with the specified method and the handler at the specified path. Any method is accepted,
    /// extension methods included; they are matched case-sensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use http_body_util::Full;
    /// use hyper::{body::Bytes, Method, Response};
    /// use routetrie::Router;
    /// use std::convert::Infallible;
    ///
    /// # fn run() -> Router<Full<Bytes>, Infallible> {
    /// let router = Router::builder()
    ///     .add(Method::TRACE, "/", |_req, _params| async move {
    ///         Ok(Response::new(Full::new(Bytes::from("Hello world!"))))
    ///     })
    ///     .build()
    ///     .unwrap();
    /// # router
    /// # }
    /// # run();
    /// ```
    pub fn add<P, H, R>(self, method: Method, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.and_then(move |mut router| {
            router.add_route(method, path.as_ref(), handler)?;
            Ok(router)
        })
    }

    /// Registers a batch of routes under a common path prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use http_body_util::Full;
    /// use hyper::{body::Bytes, Response};
    /// use routetrie::Router;
    /// use std::convert::Infallible;
    ///
    /// # fn run() -> Router<Full<Bytes>, Infallible> {
    /// let router = Router::builder()
    ///     .group("/hello", |g| {
    ///         g.get("/kitty", |_req, _params| async move { Ok(Response::new(Full::new(Bytes::from("Mau")))) })
    ///             .get("/duck", |_req, _params| async move { Ok(Response::new(Full::new(Bytes::from("Crispy")))) })
    ///     })
    ///     .build()
    ///     .unwrap();
    /// # router
    /// # }
    /// # run();
    /// ```
    pub fn group<P, F>(self, prefix: P, func: F) -> Self
    where
        P: AsRef<str>,
        F: FnOnce(GroupBuilder<B, E>) -> GroupBuilder<B, E>,
    {
        func(GroupBuilder::new(self, prefix.as_ref())).into_builder()
    }

    /// Adds a single middleware. A pre middleware is added by [`Middleware::pre`](./enum.Middleware.html#method.pre)
    /// and a post middleware by [`Middleware::post`](./enum.Middleware.html#method.post).
    ///
    /// Middlewares of the same kind run in the order they are added.
    pub fn middleware(self, m: Middleware<B, E>) -> Self {
        self.and_then(move |mut router| {
            router.add_middleware(m);
            Ok(router)
        })
    }

    /// Adds a batch of middlewares, keeping their order.
    pub fn middlewares<I>(self, ms: I) -> Self
    where
        I: IntoIterator<Item = Middleware<B, E>>,
    {
        self.and_then(move |mut router| {
            for m in ms {
                router.add_middleware(m);
            }
            Ok(router)
        })
    }

    /// Replaces the responder used when no method has a route for the request path.
    pub fn not_found<H, R>(self, handler: H) -> Self
    where
        H: Fn(Request<B>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.and_then(move |mut router| {
            router.not_found = Router::boxed_responder(handler);
            Ok(router)
        })
    }

    /// Replaces the responder used when only other methods have a route for the request path.
    pub fn method_not_allowed<H, R>(self, handler: H) -> Self
    where
        H: Fn(Request<B>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.and_then(move |mut router| {
            router.method_not_allowed = Router::boxed_responder(handler);
            Ok(router)
        })
    }

    /// Whether a request is answered by the method-not-allowed responder when another method has a route for
    /// its path. When disabled such requests get the not-found responder. Enabled by default.
    pub fn respond_method_not_allowed(self, enable: bool) -> Self {
        self.and_then(move |mut router| {
            router.respond_method_not_allowed = enable;
            Ok(router)
        })
    }

    /// Records the performance of every matched route into `timer`.
    pub fn timer(self, timer: Arc<Timer>) -> Self {
        self.and_then(move |mut router| {
            router.use_timer(Some(timer));
            Ok(router)
        })
    }
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> Default for RouterBuilder<B, E> {
    fn default() -> RouterBuilder<B, E> {
        RouterBuilder {
            inner: Ok(Router::new()),
        }
    }
}

impl<B, E> Debug for RouterBuilder<B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.inner {
            Ok(ref router) => write!(f, "RouterBuilder {:?}", router),
            Err(ref err) => write!(f, "RouterBuilder {{ error: {} }}", err),
        }
    }
}
