use crate::router::Router;
use crate::types::RequestMeta;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{service::Service, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tracing::trace;

/// Serves the requests of a single connection with a shared [`Router`](./struct.Router.html).
pub struct RequestService<B, E> {
    pub(crate) router: Arc<Router<B, E>>,
    pub(crate) remote_addr: SocketAddr,
}

impl<B, E> Service<Request<B>> for RequestService<B, E>
where
    B: Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    type Response = Response<Full<Bytes>>;
    type Error = crate::RouteError;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, mut req: Request<B>) -> Self::Future {
        let router = self.router.clone();
        let remote_addr = self.remote_addr;

        let fut = async move {
            req.extensions_mut().insert(RequestMeta::with_remote_addr(remote_addr));
            trace!(%remote_addr, method = %req.method(), uri = %req.uri(), "incoming request");

            router.serve(req).await
        };

        Box::pin(fut)
    }
}

/// Freezes a [`Router`](./struct.Router.html) for serving and creates one [`RequestService`] per connection.
#[derive(Debug)]
pub struct RequestServiceBuilder<B, E> {
    router: Arc<Router<B, E>>,
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> RequestServiceBuilder<B, E> {
    /// Freezes `router`; nothing can be registered on it afterwards.
    pub fn new(router: Router<B, E>) -> Self {
        Self {
            router: Arc::from(router),
        }
    }

    /// Creates the service for a connection from `remote_addr`.
    pub fn build(&self, remote_addr: SocketAddr) -> RequestService<B, E> {
        RequestService {
            router: self.router.clone(),
            remote_addr,
        }
    }
}
