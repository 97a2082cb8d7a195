use crate::constants;
use crate::helpers;
use crate::types::Params;
use arc_swap::ArcSwap;
use chrono::Utc;
use http_body_util::Full;
use hyper::body::Bytes;
use http::header::{self, HeaderValue};
use http::{Request, Response, StatusCode};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::future::{ready, Ready};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub use self::counter::Counter;
pub use self::stats::{SortKey, Stat, Stats};

mod counter;
mod stats;

/// Keeps track of every route's performance, one [`Counter`] per canonical route template.
///
/// Looking up an existing counter never blocks: the map is read through an atomically swapped snapshot.
/// Only the creation of a new counter takes a lock, and it re-checks the map so two requests racing on
/// the same new route still share one counter.
///
/// # Examples
///
/// ```
/// use http_body_util::Full;
/// use hyper::body::Bytes;
/// use routetrie::{Router, Timer};
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// let timer = Arc::new(Timer::new());
///
/// let router: Router<Full<Bytes>, Infallible> = Router::builder()
///     .timer(timer.clone())
///     .get("/_stats", timer.handler())
///     .build()
///     .unwrap();
/// ```
pub struct Timer {
    since: Instant,
    routes: ArcSwap<HashMap<String, Arc<Counter>>>,
    lock: Mutex<()>,
}

impl Timer {
    /// Creates a timer without any counter. Its uptime starts now.
    pub fn new() -> Timer {
        Timer {
            since: Instant::now(),
            routes: ArcSwap::from_pointee(HashMap::new()),
            lock: Mutex::new(()),
        }
    }

    /// Returns the counter for `route`, creating it on first use.
    pub fn get(&self, route: &str) -> Arc<Counter> {
        if let Some(counter) = self.routes.load().get(route) {
            return counter.clone();
        }

        let _guard = self.lock.lock();
        let routes = self.routes.load_full();
        // Another request may have created it while we waited.
        if let Some(counter) = routes.get(route) {
            return counter.clone();
        }

        let counter = Arc::new(Counter::new());
        let mut next = HashMap::clone(&routes);
        next.insert(route.to_owned(), counter.clone());
        self.routes.store(Arc::new(next));
        debug!(route, "created route counter");

        counter
    }

    /// Time elapsed since the timer was created.
    pub fn uptime(&self) -> Duration {
        self.since.elapsed()
    }

    /// Derives the statistics of every route, sorted descending by `sort_by`.
    pub fn snapshot(&self, sort_by: SortKey) -> Stats {
        let routes = self.routes.load();

        let result = routes
            .iter()
            .map(|(route, counter)| {
                let count = counter.count();
                let avg = |tot: Duration| match count {
                    0 => Duration::ZERO,
                    n => Duration::from_nanos(u64::try_from(tot.as_nanos() / u128::from(n)).unwrap_or(u64::MAX)),
                };
                Stat {
                    route: route.clone(),
                    count,
                    tot: counter.tot(),
                    max: counter.max(),
                    min: counter.min(),
                    avg: avg(counter.tot()),
                    avg_before: avg(counter.before_tot()),
                    avg_after: avg(counter.after_tot()),
                }
            })
            .collect();

        let mut stats = Stats {
            generated: Utc::now(),
            up_time: stats::format_uptime(self.uptime()),
            result,
            sort_by,
        };
        stats.sort();
        stats
    }

    /// Serves the statistics as a JSON document. The optional `sort` query param picks the [`SortKey`]
    /// (`count`, `tot`, `max`, `avg`, `avg_before` or `avg_after`); anything else falls back to `avg`.
    pub fn serve<B>(&self, req: &Request<B>) -> Response<Full<Bytes>> {
        let sort_by = match helpers::query_value(req.uri().query(), "sort") {
            Some(val) => SortKey::parse(&val).unwrap_or_else(|| {
                warn!(sort = %val, "unknown sort key, falling back to avg");
                SortKey::default()
            }),
            None => SortKey::default(),
        };

        match serde_json::to_vec(&self.snapshot(sort_by)) {
            Ok(body) => {
                let mut res = Response::new(Full::new(Bytes::from(body)));
                res.headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static(constants::APPLICATION_JSON));
                res
            }
            Err(err) => helpers::text_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        }
    }

    /// Returns a route handler serving the statistics, see [`serve`](#method.serve).
    pub fn handler<B, E>(
        self: &Arc<Self>,
    ) -> impl Fn(Request<B>, Params) -> Ready<Result<Response<Full<Bytes>>, E>> + Send + Sync + 'static
    where
        B: 'static,
        E: 'static,
    {
        let timer = Arc::clone(self);
        move |req: Request<B>, _: Params| ready(Ok(timer.serve(&req)))
    }
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}

impl Debug for Timer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("routes", &self.routes.load().len())
            .field("uptime", &self.uptime())
            .finish()
    }
}
