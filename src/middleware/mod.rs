use crate::types::Params;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::future::Future;

pub use self::post::{PostMiddleware, PostNext};
pub use self::pre::{Next, PreMiddleware};
pub use self::recovery::Recovery;

mod post;
mod pre;
mod recovery;

/// Enum type for all the middleware types. Please refer to the [Middleware](./index.html#middleware) for more info.
///
/// Middlewares of each kind run in the order they were added, whichever builder call added them.
///
/// This `Middleware<B, E>` type accepts two type parameters: `B` and `E`.
///
/// * The `B` represents the request body type.
/// * The `E` represents the error type of the route handlers. It must be convertible into a boxed
///   [std::error::Error](https://doc.rust-lang.org/std/error/trait.Error.html).
#[derive(Debug)]
pub enum Middleware<B, E> {
    /// Variant for the pre middleware. Refer to [Pre Middleware](./index.html#pre-middleware) for more info.
    Pre(PreMiddleware<B, E>),

    /// Variant for the post middleware. Refer to [Post Middleware](./index.html#post-middleware) for more info.
    Post(PostMiddleware<B, E>),
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> Middleware<B, E> {
    /// Creates a pre middleware which runs before the route lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use http_body_util::Full;
    /// use hyper::body::Bytes;
    /// use routetrie::{Middleware, Router};
    /// use std::convert::Infallible;
    ///
    /// fn run() -> Router<Full<Bytes>, Infallible> {
    ///     let router = Router::builder()
    ///         .middleware(Middleware::pre(|req, next| async move {
    ///             /* Do some operations */
    ///             next.run(req).await
    ///         }))
    ///         .build()
    ///         .unwrap();
    ///     router
    /// }
    /// ```
    pub fn pre<H, R>(handler: H) -> Middleware<B, E>
    where
        H: Fn(Request<B>, Next<B, E>) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static,
    {
        Middleware::Pre(PreMiddleware::new(handler))
    }

    /// Creates a pre middleware which transforms the request and always passes it on.
    ///
    /// # Examples
    ///
    /// ```
    /// use http_body_util::Full;
    /// use hyper::body::Bytes;
    /// use routetrie::{Middleware, Router};
    /// use std::convert::Infallible;
    ///
    /// fn run() -> Router<Full<Bytes>, Infallible> {
    ///     let router = Router::builder()
    ///         .middleware(Middleware::pre_map(|req| async move {
    ///             println!("{} {}", req.method(), req.uri().path());
    ///             Ok(req)
    ///         }))
    ///         .build()
    ///         .unwrap();
    ///     router
    /// }
    /// ```
    pub fn pre_map<H, R>(handler: H) -> Middleware<B, E>
    where
        H: Fn(Request<B>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Request<B>, E>> + Send + 'static,
    {
        Middleware::Pre(PreMiddleware::map(handler))
    }

    /// Creates a post middleware which runs after the route lookup and before the route handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use http_body_util::Full;
    /// use hyper::body::Bytes;
    /// use routetrie::{Middleware, Router};
    /// use std::convert::Infallible;
    ///
    /// fn run() -> Router<Full<Bytes>, Infallible> {
    ///     let router = Router::builder()
    ///         .middleware(Middleware::post(|req, mut params, next| async move {
    ///             params.app_set("request_id", 7_u64);
    ///             next.run(req, params).await
    ///         }))
    ///         .build()
    ///         .unwrap();
    ///     router
    /// }
    /// ```
    pub fn post<H, R>(handler: H) -> Middleware<B, E>
    where
        H: Fn(Request<B>, Params, PostNext<B, E>) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<Response<Full<Bytes>>>> + Send + 'static,
    {
        Middleware::Post(PostMiddleware::new(handler))
    }
}
