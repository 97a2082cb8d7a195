use crate::constants;
use crate::helpers;
use crate::middleware::{Middleware, Next};
use futures::FutureExt;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::error;

/// Turns panics and errors raised further down the pipeline into `500 Internal Server Error` responses.
///
/// It is an ordinary pre middleware, so it only protects what runs after it: add it first.
///
/// # Examples
///
/// ```
/// use http_body_util::Full;
/// use hyper::body::Bytes;
/// use routetrie::{Recovery, Router};
/// use std::convert::Infallible;
///
/// fn run() -> Router<Full<Bytes>, Infallible> {
///     Router::builder()
///         .middleware(Recovery::new().echo_panic(true).into_middleware())
///         .build()
///         .unwrap()
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recovery {
    echo_panic: bool,
}

impl Recovery {
    /// Creates a recovery which answers with a generic body.
    pub fn new() -> Recovery {
        Recovery::default()
    }

    /// Whether the response body carries the panic message (or error text) instead of a generic one.
    pub fn echo_panic(mut self, echo: bool) -> Recovery {
        self.echo_panic = echo;
        self
    }

    /// Turns the recovery into a pre middleware, ready for [`RouterBuilder::middleware`](./struct.RouterBuilder.html#method.middleware).
    pub fn into_middleware<B, E>(self) -> Middleware<B, E>
    where
        B: Send + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
    {
        Middleware::pre(move |req, next| {
            let recovery = self.clone();
            async move { recovery.guard(req, next).await }
        })
    }

    async fn guard<B, E>(&self, req: Request<B>, next: Next<B, E>) -> crate::Result<Response<Full<Bytes>>>
    where
        B: Send + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
    {
        let method = req.method().clone();
        let uri = req.uri().clone();

        match AssertUnwindSafe(next.run(req)).catch_unwind().await {
            Ok(Ok(res)) => Ok(res),
            Ok(Err(err)) => {
                error!(%method, %uri, error = %err, "request failed");
                Ok(self.failure(err.to_string()))
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!(%method, %uri, panic = %msg, "request panicked");
                Ok(self.failure(format!("PANIC: {}", msg)))
            }
        }
    }

    fn failure(&self, detail: String) -> Response<Full<Bytes>> {
        let body = if self.echo_panic {
            detail
        } else {
            constants::INTERNAL_SERVER_ERROR_BODY.to_owned()
        };
        helpers::text_response(StatusCode::INTERNAL_SERVER_ERROR, body)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "Box<dyn Any>".to_owned()
    }
}
