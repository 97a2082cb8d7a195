use std::net::SocketAddr;

/// Connection details stored in the request extensions by the [`RequestService`](../struct.RequestService.html).
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestMeta {
    remote_addr: SocketAddr,
}

impl RequestMeta {
    pub(crate) fn with_remote_addr(remote_addr: SocketAddr) -> RequestMeta {
        RequestMeta { remote_addr }
    }

    pub(crate) fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}
