use crate::router::Router;
use crate::service::request_service::{RequestService, RequestServiceBuilder};
use hyper::service::Service;
use std::convert::Infallible;
use std::future::{ready, Ready};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tracing::warn;

/// A [`Service`](https://docs.rs/hyper/1/hyper/service/trait.Service.html) which creates a [`RequestService`] for
/// every accepted connection.
///
/// This `RouterService<B, E>` type accepts two type parameters: `B` and `E`.
///
/// * The `B` represents the request body type, [`hyper::body::Incoming`](https://docs.rs/hyper/1/hyper/body/struct.Incoming.html)
///   when served by hyper.
/// * The `E` represents any error type which will be used by route handlers. It must be convertible into a boxed
///   [std::error::Error](https://doc.rust-lang.org/std/error/trait.Error.html).
///
/// # Examples
///
/// ```no_run
/// use http_body_util::Full;
/// use hyper::body::{Bytes, Incoming};
/// use hyper::service::Service;
/// use hyper::Response;
/// use hyper_util::rt::{TokioExecutor, TokioIo};
/// use hyper_util::server::conn::auto::Builder;
/// use routetrie::{Router, RouterService};
/// use std::convert::Infallible;
/// use std::net::SocketAddr;
/// use std::sync::Arc;
/// use tokio::net::TcpListener;
///
/// fn router() -> Router<Incoming, Infallible> {
///     Router::builder()
///         .get("/", |_req, _params| async move { Ok(Response::new(Full::new(Bytes::from("Home page")))) })
///         .build()
///         .unwrap()
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     // Create a Service from the router above to handle incoming requests.
///     let service = Arc::new(RouterService::new(router()));
///
///     let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
///     let listener = TcpListener::bind(addr).await?;
///
///     loop {
///         let (stream, _) = listener.accept().await?;
///         let router_service = service.clone();
///
///         tokio::spawn(async move {
///             let request_service = match router_service.call(&stream).await {
///                 Ok(svc) => svc,
///                 Err(never) => match never {},
///             };
///             let builder = Builder::new(TokioExecutor::new());
///             if let Err(err) = builder.serve_connection(TokioIo::new(stream), request_service).await {
///                 eprintln!("Error serving connection: {:?}", err);
///             }
///         });
///     }
/// }
/// ```
#[derive(Debug)]
pub struct RouterService<B, E> {
    builder: RequestServiceBuilder<B, E>,
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> RouterService<B, E> {
    /// Creates a new service with the provided router. The router can't be changed afterwards.
    pub fn new(router: Router<B, E>) -> RouterService<B, E> {
        RouterService {
            builder: RequestServiceBuilder::new(router),
        }
    }
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> Service<&TcpStream>
    for RouterService<B, E>
{
    type Response = RequestService<B, E>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, conn: &TcpStream) -> Self::Future {
        let addr = conn.peer_addr().unwrap_or_else(|err| {
            warn!(error = %err, "couldn't read peer address");
            SocketAddr::from(([0, 0, 0, 0], 0))
        });

        ready(Ok(self.builder.build(addr)))
    }
}
