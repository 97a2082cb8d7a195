use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use routetrie::prelude::*;
use routetrie::{Middleware, Params, Recovery, RouteManager, Router, RouterService, Timer};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

// A handler for "/" page.
async fn home_handler(_: Request<Incoming>, _: Params) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(Response::new(Full::new(Bytes::from("Home page"))))
}

// A handler for "/users/:userId" page.
async fn user_handler(_: Request<Incoming>, params: Params) -> Result<Response<Full<Bytes>>, Infallible> {
    let user_id = params.get("userId").unwrap_or_default();
    let greeting = params.app_get::<String>("greeting").map(String::as_str).unwrap_or("Hello");
    Ok(Response::new(Full::new(Bytes::from(format!("{} {}", greeting, user_id)))))
}

// Logs every request before the route lookup.
async fn logger(req: Request<Incoming>) -> Result<Request<Incoming>, Infallible> {
    info!(
        remote_addr = ?req.remote_addr(),
        method = %req.method(),
        path = req.uri().path(),
        "request"
    );
    Ok(req)
}

fn router(rm: &mut RouteManager, timer: Arc<Timer>) -> Result<Router<Incoming, Infallible>, routetrie::Error> {
    Router::builder()
        .middleware(Recovery::new().into_middleware())
        .middleware(Middleware::pre_map(logger))
        .middleware(Middleware::post(|req, mut params, next| async move {
            params.app_set("greeting", String::from("Hello"));
            next.run(req, params).await
        }))
        .timer(timer.clone())
        .get(rm.add("home", "/")?, home_handler)
        .get(rm.add("user", "/users/:userId")?, user_handler)
        .get(rm.add("stats", "/_stats")?, timer.handler())
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr: SocketAddr = std::env::var("ROUTETRIE_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_owned())
        .parse()?;

    let mut rm = RouteManager::new();
    rm.set_base_url(format!("http://{}", addr));

    let router = router(&mut rm, Arc::new(Timer::new()))?;
    info!(routes = %router.dump(), "routes");

    let service = Arc::new(RouterService::new(router));
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        example = %rm.url_for("user", [("userId", "alice")])?,
        stats = %rm.url_for("stats", [("sort", "max")])?,
        "listening"
    );

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                error!(error = %err, "error accepting connection");
                continue;
            }
        };
        let service = Arc::clone(&service);

        tokio::task::spawn(async move {
            let request_service = match service.call(&stream).await {
                Ok(svc) => svc,
                Err(never) => match never {},
            };
            let builder = Builder::new(TokioExecutor::new());
            if let Err(err) = builder.serve_connection(TokioIo::new(stream), request_service).await {
                error!(error = ?err, "error serving connection");
            }
        });
    }
}
