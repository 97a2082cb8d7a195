use crate::route::Route;
use crate::router::Router;
use crate::types::Params;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

type Handler<B, E> = Box<dyn Fn(Request<B>, Params, PostNext<B, E>) -> HandlerReturn + Send + Sync + 'static>;

type HandlerReturn = Box<dyn Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static>;

/// The post middleware type. Refer to [Post Middleware](./index.html#post-middleware) for more info.
///
/// A post middleware runs after a route was found and before its handler executes. Besides the request it
/// receives the [`Params`] of the match, which it may read and write before passing them on through
/// [`PostNext::run`]. Not calling it stops the request before the handler runs.
pub struct PostMiddleware<B, E> {
    pub(crate) handler: Handler<B, E>,
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> PostMiddleware<B, E> {
    /// Creates a post middleware from an interceptor function.
    ///
    /// # Examples
    ///
    /// ```
    /// use http_body_util::Full;
    /// use hyper::body::Bytes;
    /// use routetrie::{Middleware, PostMiddleware, Router};
    /// use std::convert::Infallible;
    ///
    /// fn run() -> Router<Full<Bytes>, Infallible> {
    ///     let router = Router::builder()
    ///         .middleware(Middleware::Post(PostMiddleware::new(|req, mut params, next| async move {
    ///             params.app_set("user", String::from("alice"));
    ///             next.run(req, params).await
    ///         })))
    ///         .build()
    ///         .unwrap();
    ///     router
    /// }
    /// ```
    pub fn new<H, R>(handler: H) -> PostMiddleware<B, E>
    where
        H: Fn(Request<B>, Params, PostNext<B, E>) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static,
    {
        let handler: Handler<B, E> = Box::new(move |req, params, next| Box::new(handler(req, params, next)));
        PostMiddleware { handler }
    }

    pub(crate) async fn process(
        &self,
        req: Request<B>,
        params: Params,
        next: PostNext<B, E>,
    ) -> crate::Result<Response<Full<Bytes>>> {
        Pin::from((self.handler)(req, params, next)).await
    }
}

impl<B, E> Debug for PostMiddleware<B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ post middleware }}")
    }
}

/// The rest of the pipeline as seen from a post middleware: the remaining post middlewares followed by the
/// route handler.
pub struct PostNext<B, E> {
    pub(crate) router: Arc<Router<B, E>>,
    pub(crate) route: Arc<Route<B, E>>,
    pub(crate) cursor: usize,
    pub(crate) handler_started: Option<Arc<OnceLock<Instant>>>,
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> PostNext<B, E> {
    pub(crate) fn new(
        router: Arc<Router<B, E>>,
        route: Arc<Route<B, E>>,
        handler_started: Option<Arc<OnceLock<Instant>>>,
    ) -> PostNext<B, E> {
        PostNext {
            router,
            route,
            cursor: 0,
            handler_started,
        }
    }

    /// The canonical template of the matched route, e.g. `/users/:id`.
    pub fn route_path(&self) -> &str {
        self.route.path()
    }

    /// Continues with the rest of the pipeline.
    pub async fn run(mut self, req: Request<B>, params: Params) -> crate::Result<Response<Full<Bytes>>> {
        let router = self.router.clone();
        match router.post_middlewares.get(self.cursor) {
            Some(middleware) => {
                self.cursor += 1;
                middleware.process(req, params, self).await
            }
            None => {
                if let Some(ref mark) = self.handler_started {
                    let _ = mark.set(Instant::now());
                }
                self.route.process(req, params).await
            }
        }
    }
}

impl<B, E> Debug for PostNext<B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ route: {:?}, cursor: {:?} }}", self.route.path(), self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Empty;
    use hyper::Method;
    use std::convert::Infallible;

    fn describe<B, E>(next: &PostNext<B, E>) -> String {
        format!("{:?}", next)
    }

    #[test]
    fn should_describe_route_and_cursor() {
        let mut router: Router<Empty<Bytes>, Infallible> = Router::new();
        router
            .add_route(Method::GET, "/users/:id", |_, _| async move {
                Ok(Response::new(Full::new(Bytes::new())))
            })
            .unwrap();
        let route = router
            .find(&Method::GET, "/users/7")
            .and_then(|found| found.route.cloned())
            .unwrap();

        let next = PostNext::new(Arc::new(router), route, None);
        assert_eq!(next.route_path(), "/users/:id");
        assert_eq!(describe(&next), r#"{ route: "/users/:id", cursor: 0 }"#);
    }
}
