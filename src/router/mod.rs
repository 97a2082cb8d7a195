use crate::constants;
use crate::helpers;
use crate::middleware::{Middleware, Next, PostMiddleware, PostNext, PreMiddleware};
use crate::route::{Handler, Route, RouteMatch, RouteTree};
use crate::timer::Timer;
use crate::types::Params;
use crate::Error;
use http_body_util::Full;
use hyper::body::Bytes;
use http::header::{self, HeaderValue};
use http::{Method, Request, Response, StatusCode};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::{debug, trace};

pub use self::builder::RouterBuilder;
pub use self::group::GroupBuilder;

mod builder;
mod group;

pub(crate) type Responder<B, E> = Box<dyn Fn(Request<B>) -> ResponderReturn<E> + Send + Sync + 'static>;
pub(crate) type ResponderReturn<E> = Box<dyn Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static>;

/// Represents a modular, lightweight router which dispatches a request to one routing trie per http method.
///
/// A `Router` goes through two phases: a setup phase where routes and middlewares are registered, and a serving
/// phase which starts once it is handed to a [`RequestServiceBuilder`](./struct.RequestServiceBuilder.html) or
/// wrapped in an `Arc` for [`serve`](#method.serve). Nothing can be registered while it serves.
///
/// A request flows through:
///
/// 1. the pre middlewares, in the order they were added;
/// 2. the route lookup for its method and path;
/// 3. the post middlewares, in the order they were added, then the route handler.
///
/// When no route matches, an `OPTIONS` request is answered with an `Allow` header listing every method which has
/// a route for the path. Otherwise, if another method has a route for the path, the method-not-allowed
/// responder runs (a plain `405` by default); if none has, the not-found responder runs (a plain `404`).
///
/// This `Router<B, E>` type accepts two type parameters: `B` and `E`.
///
/// * The `B` represents the request body type, e.g. [`hyper::body::Incoming`](https://docs.rs/hyper/1/hyper/body/struct.Incoming.html).
/// * The `E` represents the error type of the route handlers. It must be convertible into a boxed
///   [std::error::Error](https://doc.rust-lang.org/std/error/trait.Error.html).
///
/// # Examples
///
/// ```
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Response};
/// use routetrie::Router;
/// use std::convert::Infallible;
///
/// fn run() -> Router<Full<Bytes>, Infallible> {
///     Router::builder()
///         .get("/users/:id", |_req, params| async move {
///             let id = params.get("id").unwrap_or_default().to_owned();
///             Ok(Response::new(Full::new(Bytes::from(id))))
///         })
///         .build()
///         .unwrap()
/// }
/// # run();
/// ```
pub struct Router<B, E> {
    pub(crate) trees: HashMap<Method, RouteTree<B, E>>,
    pub(crate) pre_middlewares: Vec<PreMiddleware<B, E>>,
    pub(crate) post_middlewares: Vec<PostMiddleware<B, E>>,
    pub(crate) not_found: Responder<B, E>,
    pub(crate) method_not_allowed: Responder<B, E>,
    pub(crate) respond_method_not_allowed: bool,
    pub(crate) timer: Option<Arc<Timer>>,
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> Router<B, E> {
    /// Creates a router without any route, with the default responders.
    pub fn new() -> Router<B, E> {
        Router {
            trees: HashMap::new(),
            pre_middlewares: Vec::new(),
            post_middlewares: Vec::new(),
            not_found: Router::boxed_responder(|_| async {
                Ok(helpers::text_response(StatusCode::NOT_FOUND, constants::NOT_FOUND_BODY))
            }),
            method_not_allowed: Router::boxed_responder(|_| async {
                Ok(helpers::text_response(
                    StatusCode::METHOD_NOT_ALLOWED,
                    constants::METHOD_NOT_ALLOWED_BODY,
                ))
            }),
            respond_method_not_allowed: true,
            timer: None,
        }
    }

    /// Return a [RouterBuilder](./struct.RouterBuilder.html) instance to build a `Router`.
    pub fn builder() -> RouterBuilder<B, E> {
        RouterBuilder::new()
    }

    pub(crate) fn boxed_responder<H, R>(handler: H) -> Responder<B, E>
    where
        H: Fn(Request<B>) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        Box::new(move |req: Request<B>| Box::new(handler(req)))
    }

    /// Registers a handler for `method` and `path`. The method's tree is created on first use.
    ///
    /// Fails with [`Error::RouteConflict`] when the route clashes with an already registered one.
    pub fn add_route<H, R>(&mut self, method: Method, path: &str, handler: H) -> Result<(), Error>
    where
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.insert(method, path, Route::boxed_handler(handler))
    }

    pub(crate) fn insert(&mut self, method: Method, path: &str, handler: Handler<B, E>) -> Result<(), Error> {
        let tree = self.trees.entry(method.clone()).or_default();
        let inserted = tree.insert(path, handler).map(|route| route.path().to_owned());
        if tree.is_empty() {
            self.trees.remove(&method);
        }

        let route = inserted?;
        debug!(%method, path, route = %route, "registered route");
        Ok(())
    }

    /// Appends a middleware to its chain.
    pub fn add_middleware(&mut self, middleware: Middleware<B, E>) {
        match middleware {
            Middleware::Pre(middleware) => self.pre_middlewares.push(middleware),
            Middleware::Post(middleware) => self.post_middlewares.push(middleware),
        }
    }

    /// Starts recording the performance of every matched route. A new [`Timer`] is created when `timer` is
    /// `None`; the one in use is returned so its statistics can be served.
    pub fn use_timer(&mut self, timer: Option<Arc<Timer>>) -> Arc<Timer> {
        let timer = timer.unwrap_or_default();
        self.timer = Some(timer.clone());
        timer
    }

    /// Looks up the route for `method` and `path`. `None` when the method has no route at all.
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, B, E>> {
        self.trees.get(method).map(|tree| tree.find(path))
    }

    /// Every method with a route matching `path`, sorted by name.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .trees
            .iter()
            .filter(|(_, tree)| tree.find(path).is_found())
            .map(|(method, _)| method.clone())
            .collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    /// Processes a request through the whole pipeline.
    ///
    /// Errors returned by route handlers or middlewares are propagated as they are; see
    /// [`Recovery`](./struct.Recovery.html) to turn them into responses instead.
    pub async fn serve(self: Arc<Self>, req: Request<B>) -> crate::Result<Response<Full<Bytes>>> {
        Next::new(self).run(req).await
    }

    pub(crate) async fn dispatch(
        self: Arc<Self>,
        req: Request<B>,
        started: Instant,
    ) -> crate::Result<Response<Full<Bytes>>> {
        let path = helpers::percent_decode_request_path(req.uri().path())?;

        let found = self.trees.get(req.method()).and_then(|tree| {
            let matched = tree.find(&path);
            matched.route.cloned().map(|route| (route, matched.params))
        });

        let (route, params) = match found {
            Some(found) => found,
            None => return self.handle_missing(req, &path).await,
        };
        trace!(method = %req.method(), path = %path, route = route.path(), "route matched");

        let timer = match self.timer {
            Some(ref timer) => timer.clone(),
            None => return PostNext::new(self.clone(), route, None).run(req, params).await,
        };

        let routing_done = Instant::now();
        let handler_started = Arc::new(OnceLock::new());
        let res = PostNext::new(self.clone(), route.clone(), Some(handler_started.clone()))
            .run(req, params)
            .await;
        let finished = Instant::now();
        let handler_start = handler_started.get().copied().unwrap_or(finished);

        timer
            .get(route.path())
            .accumulate(started, routing_done, handler_start, finished);

        res
    }

    async fn handle_missing(&self, req: Request<B>, path: &str) -> crate::Result<Response<Full<Bytes>>> {
        if req.method() == Method::OPTIONS {
            let allowed = self.allowed_methods(path);
            if !allowed.is_empty() {
                let allow = allowed.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
                trace!(path, allow = %allow, "answering options");

                let mut res = Response::new(Full::new(Bytes::new()));
                res.headers_mut().insert(header::ALLOW, HeaderValue::from_str(&allow)?);
                return Ok(res);
            }
        } else if self.respond_method_not_allowed
            && self
                .trees
                .iter()
                .any(|(method, tree)| method != req.method() && tree.find(path).is_found())
        {
            trace!(method = %req.method(), path, "method not allowed");
            return Pin::from((self.method_not_allowed)(req)).await.map_err(Into::into);
        }

        trace!(method = %req.method(), path, "not found");
        Pin::from((self.not_found)(req)).await.map_err(Into::into)
    }

    /// Renders every method tree for debugging. See [`RouteTree::dump`](./struct.RouteTree.html#method.dump).
    pub fn dump(&self) -> String {
        let mut methods: Vec<&Method> = self.trees.keys().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        let mut out = String::new();
        for method in methods {
            out.push_str(method.as_str());
            out.push('\n');
            if let Some(tree) = self.trees.get(method) {
                out.push_str(&tree.dump());
            }
        }
        out
    }
}

impl<B: Send + 'static, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> Default for Router<B, E> {
    fn default() -> Self {
        Router::new()
    }
}

impl<B, E> Debug for Router<B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ methods: {:?}, pre_middlewares: {}, post_middlewares: {}, respond_method_not_allowed: {:?}, timer: {:?} }}",
            self.trees.keys().collect::<Vec<_>>(),
            self.pre_middlewares.len(),
            self.post_middlewares.len(),
            self.respond_method_not_allowed,
            self.timer.is_some()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Empty};
    use std::convert::Infallible;

    fn request(method: Method, uri: &str) -> Request<Empty<Bytes>> {
        Request::builder().method(method).uri(uri).body(Empty::new()).unwrap()
    }

    #[tokio::test]
    async fn should_propagate_handler_errors() {
        let router: Router<Empty<Bytes>, crate::RouteError> = Router::builder()
            .get("/fail", |_, _| async move { Err(crate::RouteError::from("nope")) })
            .build()
            .unwrap();

        let err = Arc::new(router).serve(request(Method::GET, "/fail")).await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[tokio::test]
    async fn should_match_decoded_path() {
        let router: Router<Empty<Bytes>, Infallible> = Router::builder()
            .get("/files/:name", |_, params| async move {
                Ok(Response::new(Full::new(Bytes::from(params.get("name").unwrap_or_default().to_owned()))))
            })
            .build()
            .unwrap();

        let res = Arc::new(router)
            .serve(request(Method::GET, "/files/caf%C3%A9"))
            .await
            .unwrap();
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], "café".as_bytes());
    }

    #[test]
    fn should_accept_routes_after_build() {
        let mut router: Router<Empty<Bytes>, Infallible> = Router::builder().build().unwrap();
        router
            .add_route(Method::GET, "/late", |_, _| async move { Ok(Response::new(Full::new(Bytes::new()))) })
            .unwrap();
        assert!(router.find(&Method::GET, "/late").is_some_and(|m| m.is_found()));
        assert!(router.find(&Method::POST, "/late").is_none());

        let timer = router.use_timer(None);
        assert!(router.timer.as_ref().is_some_and(|t| Arc::ptr_eq(t, &timer)));
    }

    #[test]
    fn should_not_keep_state_of_failed_registration() {
        let mut router: Router<Empty<Bytes>, Infallible> = Router::new();
        let err = router
            .add_route(Method::PUT, "/users/:/avatar", |_, _| async move {
                Ok(Response::new(Full::new(Bytes::new())))
            })
            .unwrap_err();
        assert!(matches!(err, Error::RouteConflict(_)));
        assert!(router.allowed_methods("/users/7/avatar").is_empty());
        assert!(router.dump().is_empty());
    }

    #[test]
    fn should_dump_every_method() {
        let router: Router<Empty<Bytes>, Infallible> = Router::builder()
            .post("/users", |_, _| async move { Ok(Response::new(Full::new(Bytes::new()))) })
            .get("/users/:id", |_, _| async move { Ok(Response::new(Full::new(Bytes::new()))) })
            .build()
            .unwrap();

        let dump = router.dump();
        let get = dump.find("GET").unwrap();
        let post = dump.find("POST").unwrap();
        assert!(get < post);
        assert!(dump.contains("-- :id (</users/:id>)"));
        assert!(dump.contains("-- users (</users>)"));
    }
}
