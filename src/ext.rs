//! Extension traits for the request type.

use crate::types::RequestMeta;
use hyper::Request;
use std::net::SocketAddr;

/// Extra methods on [`hyper::Request`](https://docs.rs/hyper/1/hyper/struct.Request.html).
pub trait RequestExt {
    /// The peer address of the connection the request came from.
    ///
    /// `None` when the request did not go through a [`RequestService`](../struct.RequestService.html), e.g. when
    /// [`Router::serve`](../struct.Router.html#method.serve) is called directly.
    fn remote_addr(&self) -> Option<SocketAddr>;
}

impl<B> RequestExt for Request<B> {
    fn remote_addr(&self) -> Option<SocketAddr> {
        self.extensions().get::<RequestMeta>().map(RequestMeta::remote_addr)
    }
}
