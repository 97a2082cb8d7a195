//! `routetrie` is a segment-trie HTTP router with middleware support for the Rust HTTP library [hyper](https://hyper.rs/).
//!
//! Its core features:
//!
//! - One routing trie per http method, with static segments and `:name` parameters
//!
//! - Static segments always win over a parameter at the same position, whatever the registration order
//!
//! - Route conflicts are reported when the router is built, never while serving
//!
//! - Automatic `OPTIONS` answers, `405 Method Not Allowed` and `404 Not Found` with overridable responders
//!
//! - Pre and post routing middlewares which may short-circuit the request
//!
//! - Lock-free per-route timing statistics served as JSON
//!
//! ## Basic Example
//!
//! A simple example using `routetrie` with `hyper` would look like the following:
//!
//! ```no_run
//! use http_body_util::Full;
//! use hyper::body::{Bytes, Incoming};
//! use hyper::service::Service;
//! use hyper::{Request, Response};
//! use hyper_util::rt::{TokioExecutor, TokioIo};
//! use hyper_util::server::conn::auto::Builder;
//! use routetrie::{Middleware, Params, Router, RouterService};
//! use std::convert::Infallible;
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! // A handler for "/" page.
//! async fn home_handler(_: Request<Incoming>, _: Params) -> Result<Response<Full<Bytes>>, Infallible> {
//!     Ok(Response::new(Full::new(Bytes::from("Home page"))))
//! }
//!
//! // A handler for "/users/:userId" page.
//! async fn user_handler(_: Request<Incoming>, params: Params) -> Result<Response<Full<Bytes>>, Infallible> {
//!     let user_id = params.get("userId").unwrap_or_default();
//!     Ok(Response::new(Full::new(Bytes::from(format!("Hello {}", user_id)))))
//! }
//!
//! // A middleware which logs an http request.
//! async fn logger(req: Request<Incoming>) -> Result<Request<Incoming>, Infallible> {
//!     println!("{} {}", req.method(), req.uri().path());
//!     Ok(req)
//! }
//!
//! fn router() -> Router<Incoming, Infallible> {
//!     Router::builder()
//!         .middleware(Middleware::pre_map(logger))
//!         .get("/", home_handler)
//!         .get("/users/:userId", user_handler)
//!         .build()
//!         .unwrap()
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let service = Arc::new(RouterService::new(router()));
//!
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
//!     let listener = TcpListener::bind(addr).await?;
//!     println!("App is running on: {}", addr);
//!
//!     loop {
//!         let (stream, _) = listener.accept().await?;
//!         let service = service.clone();
//!
//!         tokio::spawn(async move {
//!             let request_service = match service.call(&stream).await {
//!                 Ok(svc) => svc,
//!                 Err(never) => match never {},
//!             };
//!             let builder = Builder::new(TokioExecutor::new());
//!             if let Err(err) = builder.serve_connection(TokioIo::new(stream), request_service).await {
//!                 eprintln!("Error serving connection: {:?}", err);
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! ## Routing
//!
//! ### Route Handlers
//!
//! A handler receives the request and the [`Params`] of the match, and returns a response:
//!
//! ```
//! use http_body_util::Full;
//! use hyper::{body::Bytes, Request, Response};
//! use routetrie::{Params, Router};
//! use std::convert::Infallible;
//!
//! async fn home_handler(_: Request<Full<Bytes>>, _: Params) -> Result<Response<Full<Bytes>>, Infallible> {
//!     Ok(Response::new(Full::new(Bytes::from("Home page"))))
//! }
//!
//! # fn run() -> Router<Full<Bytes>, Infallible> {
//! let router = Router::builder()
//!     .get("/", home_handler)
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ### Route Paths
//!
//! A path is split on `/` into segments. A segment starting with `:` is a parameter which matches any single
//! segment; every other segment must match exactly. Leading and trailing slashes don't matter, so
//! `/users/` and `/users` are the same route, but doubled slashes do: `/a//b` never matches `/a/b`.
//!
//! Two parameters at the same position must share their name, and a static segment is always preferred over a
//! parameter:
//!
//! ```
//! use http_body_util::Full;
//! use hyper::{body::Bytes, Response};
//! use routetrie::Router;
//! use std::convert::Infallible;
//!
//! # fn run() -> Router<Full<Bytes>, Infallible> {
//! let router = Router::builder()
//!     .get("/users/:id", |_, params| async move {
//!         Ok(Response::new(Full::new(Bytes::from(format!("user {}", params.get("id").unwrap_or_default())))))
//!     })
//!     // "/users/me" is always served here, even though it also matches "/users/:id".
//!     .get("/users/me", |_, _| async move { Ok(Response::new(Full::new(Bytes::from("me")))) })
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! Related routes can be registered under a common prefix with [`RouterBuilder::group`].
//!
//! ### Handle 404 and 405 Pages
//!
//! When no route matches, an `OPTIONS` request gets an `Allow` header listing every method which has a route
//! for the path. Other requests get a `405` when another method has a route for the path and a `404`
//! otherwise. Both responders can be replaced:
//!
//! ```
//! use http_body_util::Full;
//! use hyper::{body::Bytes, Response, StatusCode};
//! use routetrie::Router;
//! use std::convert::Infallible;
//!
//! # fn run() -> Router<Full<Bytes>, Infallible> {
//! let router = Router::builder()
//!     .not_found(|_| async move {
//!         let mut res = Response::new(Full::new(Bytes::from("Page Not Found")));
//!         *res.status_mut() = StatusCode::NOT_FOUND;
//!         Ok(res)
//!     })
//!     .respond_method_not_allowed(false)
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ## Middleware
//!
//! ### Pre Middleware
//!
//! A pre middleware runs before the route lookup. It receives the rest of the pipeline as a [`Next`] and may
//! answer on its own instead of calling it. [`Recovery`] is a ready-made one which turns panics into `500`s.
//!
//! ```
//! use http_body_util::Full;
//! use hyper::{body::Bytes, header, Response, StatusCode};
//! use routetrie::{Middleware, Router};
//! use std::convert::Infallible;
//!
//! # fn run() -> Router<Full<Bytes>, Infallible> {
//! let router = Router::builder()
//!     .middleware(Middleware::pre(|req, next| async move {
//!         if !req.headers().contains_key(header::AUTHORIZATION) {
//!             let mut res = Response::new(Full::new(Bytes::from("Unauthorized")));
//!             *res.status_mut() = StatusCode::UNAUTHORIZED;
//!             return Ok(res);
//!         }
//!         next.run(req).await
//!     }))
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ### Post Middleware
//!
//! A post middleware runs once a route matched, before its handler. It receives the [`Params`] and may store
//! application values in them for the middlewares and the handler after it:
//!
//! ```
//! use http_body_util::Full;
//! use hyper::{body::Bytes, Response};
//! use routetrie::{Middleware, Router};
//! use std::convert::Infallible;
//!
//! # fn run() -> Router<Full<Bytes>, Infallible> {
//! let router = Router::builder()
//!     .middleware(Middleware::post(|req, mut params, next| async move {
//!         params.app_set("user", String::from("alice"));
//!         next.run(req, params).await
//!     }))
//!     .get("/", |_, params| async move {
//!         let user = params.app_get::<String>("user").cloned().unwrap_or_default();
//!         Ok(Response::new(Full::new(Bytes::from(user))))
//!     })
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ## Timing
//!
//! A [`Timer`] attached to the router records how long every matched route takes. Its
//! [`handler`](./struct.Timer.html#method.handler) serves the numbers as JSON, sorted by the `sort` query param.
//!
//! ## Error Handling
//!
//! Errors returned by handlers and middlewares are boxed into a [`RouteError`] and passed up to hyper, which
//! closes the connection. Add [`Recovery`] as the first middleware to answer them with a `500` instead.

pub use self::error::{Error, RouteConflict, RouteError};
pub use self::middleware::{Middleware, Next, PostMiddleware, PostNext, PreMiddleware, Recovery};
pub use self::route::{Route, RouteMatch, RouteTree};
pub use self::route_manager::RouteManager;
pub use self::router::{GroupBuilder, Router, RouterBuilder};
#[doc(hidden)]
pub use self::service::RequestService;
pub use self::service::RequestServiceBuilder;
pub use self::service::RouterService;
pub use self::timer::{Counter, SortKey, Stat, Stats, Timer};
pub use self::types::Params;

mod constants;
mod error;
pub mod ext;
mod helpers;
mod middleware;
pub mod prelude;
mod route;
mod route_manager;
mod router;
mod service;
mod timer;
mod types;

/// A Result type often returned from methods that can have routetrie errors.
pub type Result<T> = std::result::Result<T, RouteError>;
