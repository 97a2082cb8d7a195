use crate::router::Router;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

type Handler<B, E> = Box<dyn Fn(Request<B>, Next<B, E>) -> HandlerReturn + Send + Sync + 'static>;

type HandlerReturn = Box<dyn Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static>;

/// The pre middleware type. Refer to [Pre Middleware](./index.html#pre-middleware) for more info.
///
/// A pre middleware runs before the route lookup and only sees the raw request. It receives the rest of the
/// pipeline as a [`Next`] and decides whether to call it; returning a response without calling it ends the
/// request right there.
pub struct PreMiddleware<B, E> {
    pub(crate) handler: Handler<B, E>,
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> PreMiddleware<B, E> {
    /// Creates a pre middleware from an interceptor function.
    ///
    /// # Examples
    ///
    /// ```
    /// use http_body_util::Full;
    /// use hyper::{body::Bytes, Response, StatusCode};
    /// use routetrie::{Middleware, PreMiddleware, Router};
    /// use std::convert::Infallible;
    ///
    /// fn run() -> Router<Full<Bytes>, Infallible> {
    ///     let router = Router::builder()
    ///         .middleware(Middleware::Pre(PreMiddleware::new(|req, next| async move {
    ///             if req.headers().contains_key("x-blocked") {
    ///                 let mut res = Response::new(Full::new(Bytes::from("Blocked")));
    ///                 *res.status_mut() = StatusCode::FORBIDDEN;
    ///                 return Ok(res);
    ///             }
    ///             next.run(req).await
    ///         })))
    ///         .build()
    ///         .unwrap();
    ///     router
    /// }
    /// ```
    pub fn new<H, R>(handler: H) -> PreMiddleware<B, E>
    where
        H: Fn(Request<B>, Next<B, E>) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static,
    {
        let handler: Handler<B, E> = Box::new(move |req, next| Box::new(handler(req, next)));
        PreMiddleware { handler }
    }

    /// Creates a pre middleware which transforms the request and always continues with the rest of the
    /// pipeline.
    pub fn map<H, R>(handler: H) -> PreMiddleware<B, E>
    where
        H: Fn(Request<B>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Request<B>, E>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        PreMiddleware::new(move |req, next: Next<B, E>| {
            let handler = handler.clone();
            async move {
                let req = handler(req).await.map_err(Into::into)?;
                next.run(req).await
            }
        })
    }

    pub(crate) async fn process(&self, req: Request<B>, next: Next<B, E>) -> crate::Result<Response<Full<Bytes>>> {
        Pin::from((self.handler)(req, next)).await
    }
}

impl<B, E> Debug for PreMiddleware<B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ pre middleware }}")
    }
}

/// The rest of the pipeline as seen from a pre middleware.
///
/// Calling [`run`](#method.run) hands the request to the next pre middleware, or to the route lookup once all of
/// them have run. It consumes the value, so the rest of the pipeline runs at most once per request.
pub struct Next<B, E> {
    pub(crate) router: Arc<Router<B, E>>,
    pub(crate) cursor: usize,
    pub(crate) started: Instant,
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> Next<B, E> {
    pub(crate) fn new(router: Arc<Router<B, E>>) -> Next<B, E> {
        Next {
            router,
            cursor: 0,
            started: Instant::now(),
        }
    }

    /// Continues with the rest of the pipeline.
    pub async fn run(mut self, req: Request<B>) -> crate::Result<Response<Full<Bytes>>> {
        let router = self.router.clone();
        match router.pre_middlewares.get(self.cursor) {
            Some(middleware) => {
                self.cursor += 1;
                middleware.process(req, self).await
            }
            None => self.router.dispatch(req, self.started).await,
        }
    }
}

impl<B, E> Debug for Next<B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ cursor: {:?} }}", self.cursor)
    }
}
