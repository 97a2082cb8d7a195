use crate::router::RouterBuilder;
use crate::types::Params;
use http_body_util::Full;
use hyper::body::Bytes;
use http::{Method, Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

/// Registers routes under a common path prefix, see [`RouterBuilder::group`](./struct.RouterBuilder.html#method.group).
///
/// The prefix only changes the registered paths: `/api` with `/books/:id` registers `/api/books/:id`.
pub struct GroupBuilder<B, E> {
    builder: RouterBuilder<B, E>,
    prefix: String,
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> GroupBuilder<B, E> {
    pub(crate) fn new(builder: RouterBuilder<B, E>, prefix: &str) -> GroupBuilder<B, E> {
        GroupBuilder {
            builder,
            prefix: prefix.trim_end_matches('/').to_owned(),
        }
    }

    pub(crate) fn into_builder(self) -> RouterBuilder<B, E> {
        self.builder
    }

    fn build_path(&self, path: &str) -> String {
        format!("{}/{}", self.prefix, path.trim_start_matches('/'))
    }

    /// Adds a new route with `GET` method and the handler at the specified path below the group prefix.
    pub fn get<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::GET, path, handler)
    }

    /// Adds a new route with `HEAD` method and the handler at the specified path below the group prefix.
    pub fn head<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::HEAD, path, handler)
    }

    /// Adds a new route with `POST` method and the handler at the specified path below the group prefix.
    pub fn post<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::POST, path, handler)
    }

    /// Adds a new route with `PUT` method and the handler at the specified path below the group prefix.
    pub fn put<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::PUT, path, handler)
    }

    /// Adds a new route with `DELETE` method and the handler at the specified path below the group prefix.
    pub fn delete<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::DELETE, path, handler)
    }

    /// Adds a new route with `PATCH` method and the handler at the specified path below the group prefix.
    pub fn patch<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.add(Method::PATCH, path, handler)
    }

    /// Adds a new route with the specified method and the handler at the specified path below the group prefix.
    pub fn add<P, H, R>(self, method: Method, path: P, handler: H) -> Self
    where
        P: AsRef<str>,
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        let path = self.build_path(path.as_ref());
        GroupBuilder {
            builder: self.builder.add(method, path, handler),
            prefix: self.prefix,
        }
    }

    /// Nests another group below this one.
    pub fn group<P, F>(self, prefix: P, func: F) -> Self
    where
        P: AsRef<str>,
        F: FnOnce(GroupBuilder<B, E>) -> GroupBuilder<B, E>,
    {
        let nested = GroupBuilder {
            prefix: self.build_path(prefix.as_ref()).trim_end_matches('/').to_owned(),
            builder: self.builder,
        };
        GroupBuilder {
            builder: func(nested).builder,
            prefix: self.prefix,
        }
    }
}

impl<B, E> Debug for GroupBuilder<B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ prefix: {:?} }}", self.prefix)
    }
}
