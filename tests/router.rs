use self::support::{into_text, serve};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header;
use hyper::{Method, Response, StatusCode};
use routetrie::{Error, RouteConflict, Router};
use std::convert::Infallible;

mod support;

fn text(body: &'static str) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(Response::new(Full::new(Bytes::from(body))))
}

#[tokio::test]
async fn can_perform_simple_get_request() {
    const RESPONSE_TEXT: &str = "Hello world";
    let router: Router<Incoming, Infallible> = Router::builder()
        .get("/", |_, _| async move { text(RESPONSE_TEXT) })
        .build()
        .unwrap();
    let serve = serve(router).await;
    let resp = serve.send("GET", "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(into_text(resp.into_body()).await, RESPONSE_TEXT);
    serve.shutdown();
}

#[tokio::test]
async fn can_capture_params() {
    let router: Router<Incoming, Infallible> = Router::builder()
        .get("/users/:user/repos/:repo", |_, params| async move {
            let body = format!(
                "{}/{}",
                params.get("user").unwrap_or_default(),
                params.get("repo").unwrap_or_default()
            );
            Ok(Response::new(Full::new(Bytes::from(body))))
        })
        .build()
        .unwrap();
    let serve = serve(router).await;
    let resp = serve.send("GET", "/users/alice/repos/hello%20world").await;
    assert_eq!(into_text(resp.into_body()).await, "alice/hello world");
    serve.shutdown();
}

#[tokio::test]
async fn should_prefer_static_over_param() {
    let router: Router<Incoming, Infallible> = Router::builder()
        .get("/users/me", |_, _| async move { text("static") })
        .get("/users/:id", |_, _| async move { text("param") })
        .build()
        .unwrap();
    let serve = serve(router).await;
    assert_eq!(into_text(serve.send("GET", "/users/me").await.into_body()).await, "static");
    assert_eq!(into_text(serve.send("GET", "/users/you").await.into_body()).await, "param");
    serve.shutdown();
}

#[tokio::test]
async fn should_ignore_trailing_slash() {
    let router: Router<Incoming, Infallible> = Router::builder()
        .get("/users/", |_, _| async move { text("users") })
        .build()
        .unwrap();
    let serve = serve(router).await;
    assert_eq!(serve.send("GET", "/users").await.status(), StatusCode::OK);
    assert_eq!(serve.send("GET", "/users/").await.status(), StatusCode::OK);
    assert_eq!(serve.send("GET", "/users//").await.status(), StatusCode::OK);
    serve.shutdown();
}

#[tokio::test]
async fn should_answer_options_with_allowed_methods() {
    let router: Router<Incoming, Infallible> = Router::builder()
        .get("/users/:id", |_, _| async move { text("get") })
        .put("/users/:id", |_, _| async move { text("put") })
        .delete("/users/:id", |_, _| async move { text("delete") })
        .post("/users", |_, _| async move { text("post") })
        .build()
        .unwrap();
    let serve = serve(router).await;

    let resp = serve.send("OPTIONS", "/users/42").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let allow = resp.headers().get(header::ALLOW).unwrap().to_str().unwrap().to_owned();
    let mut methods: Vec<&str> = allow.split(", ").collect();
    methods.sort_unstable();
    assert_eq!(methods, vec!["DELETE", "GET", "PUT"]);
    assert_eq!(into_text(resp.into_body()).await, "");

    let resp = serve.send("OPTIONS", "/nothing").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    serve.shutdown();
}

#[tokio::test]
async fn should_prefer_registered_options_route() {
    let router: Router<Incoming, Infallible> = Router::builder()
        .get("/cors", |_, _| async move { text("get") })
        .options("/cors", |_, _| async move {
            let mut res = Response::new(Full::new(Bytes::from("custom")));
            *res.status_mut() = StatusCode::NO_CONTENT;
            Ok(res)
        })
        .build()
        .unwrap();
    let serve = serve(router).await;
    let resp = serve.send("OPTIONS", "/cors").await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(resp.headers().get(header::ALLOW).is_none());
    serve.shutdown();
}

#[tokio::test]
async fn should_tell_405_from_404() {
    let router: Router<Incoming, Infallible> = Router::builder()
        .get("/books", |_, _| async move { text("books") })
        .build()
        .unwrap();
    let serve = serve(router).await;

    let resp = serve.send("POST", "/books").await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(into_text(resp.into_body()).await, "405 method not allowed\n");

    let resp = serve.send("GET", "/authors").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(into_text(resp.into_body()).await, "404 page not found\n");
    serve.shutdown();
}

#[tokio::test]
async fn can_disable_405() {
    let router: Router<Incoming, Infallible> = Router::builder()
        .get("/books", |_, _| async move { text("books") })
        .respond_method_not_allowed(false)
        .build()
        .unwrap();
    let serve = serve(router).await;
    assert_eq!(serve.send("POST", "/books").await.status(), StatusCode::NOT_FOUND);
    serve.shutdown();
}

#[tokio::test]
async fn can_override_responders() {
    let router: Router<Incoming, Infallible> = Router::builder()
        .get("/books", |_, _| async move { text("books") })
        .not_found(|req| async move {
            let mut res = Response::new(Full::new(Bytes::from(format!("no {}", req.uri().path()))));
            *res.status_mut() = StatusCode::NOT_FOUND;
            Ok(res)
        })
        .method_not_allowed(|req| async move {
            let mut res = Response::new(Full::new(Bytes::from(format!("no {}", req.method()))));
            *res.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
            Ok(res)
        })
        .build()
        .unwrap();
    let serve = serve(router).await;
    assert_eq!(into_text(serve.send("GET", "/authors").await.into_body()).await, "no /authors");
    assert_eq!(into_text(serve.send("DELETE", "/books").await.into_body()).await, "no DELETE");
    serve.shutdown();
}

#[tokio::test]
async fn should_not_match_handlerless_prefix() {
    let router: Router<Incoming, Infallible> = Router::builder()
        .get("/a/b/c", |_, _| async move { text("abc") })
        .build()
        .unwrap();
    let serve = serve(router).await;
    assert_eq!(serve.send("GET", "/a/b").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(serve.send("GET", "/a/b/c").await.status(), StatusCode::OK);
    serve.shutdown();
}

#[tokio::test]
async fn can_register_groups() {
    let router: Router<Incoming, Infallible> = Router::builder()
        .group("/api/", |g| {
            g.get("/books", |_, _| async move { text("books") })
                .group("v2", |g| g.get("books/:id", |_, _| async move { text("book v2") }))
        })
        .build()
        .unwrap();
    let serve = serve(router).await;
    assert_eq!(into_text(serve.send("GET", "/api/books").await.into_body()).await, "books");
    assert_eq!(into_text(serve.send("GET", "/api/v2/books/1").await.into_body()).await, "book v2");
    assert_eq!(serve.send("GET", "/books").await.status(), StatusCode::NOT_FOUND);
    serve.shutdown();
}

#[tokio::test]
async fn can_register_extension_methods() {
    let purge = Method::from_bytes(b"PURGE").unwrap();
    let router: Router<Incoming, Infallible> = Router::builder()
        .add(purge, "/cache", |_, _| async move { text("purged") })
        .build()
        .unwrap();
    let serve = serve(router).await;
    assert_eq!(into_text(serve.send("PURGE", "/cache").await.into_body()).await, "purged");
    serve.shutdown();
}

#[test]
fn should_report_conflicts_on_build() {
    let err = Router::<Incoming, Infallible>::builder()
        .get("/users/:id", |_, _| async move { text("a") })
        .get("/users/:name/repos", |_, _| async move { text("b") })
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::RouteConflict(RouteConflict::ParamNameConflict { ref existing, ref conflicting, .. })
            if existing == "id" && conflicting == "name"
    ));

    let err = Router::<Incoming, Infallible>::builder()
        .get("/users/", |_, _| async move { text("a") })
        .get("/users", |_, _| async move { text("b") })
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::RouteConflict(RouteConflict::DuplicateRoute { .. })));

    let err = Router::<Incoming, Infallible>::builder()
        .get("/users/:/repos", |_, _| async move { text("a") })
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::RouteConflict(RouteConflict::EmptyParamName { .. })));
}

#[test]
fn should_allow_same_path_on_other_methods() {
    let router = Router::<Incoming, Infallible>::builder()
        .get("/users/:id", |_, _| async move { text("a") })
        .post("/users/:id", |_, _| async move { text("b") })
        .build()
        .unwrap();
    assert_eq!(router.allowed_methods("/users/7"), vec![Method::GET, Method::POST]);
    assert!(router.dump().contains(":id"));
}
