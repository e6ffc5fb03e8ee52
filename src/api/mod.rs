//! HTTP surface over the ESG table.
//!
//! Route table:
//! - GET /                            → welcome message
//! - GET /api/esg-data                → every record, in file order
//! - GET /api/esg-data/{division}     → matching records, or a "No data found" message (both 200)
//! - GET /health                      → liveness + table summary
//! - OPTIONS preflight, listed origin → 200, echoing the requested headers
//! - anything else                    → warp's default 404 / 405

pub mod handlers;

use std::{convert::Infallible, sync::Arc};
use warp::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method,
    },
    reject::Rejection,
    reply::{Reply, Response},
    Filter,
};

use crate::data::EsgTable;

// Every method may be requested cross-origin; routes still decide what they serve.
pub const ALLOWED_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "HEAD"];

const ALLOWED_METHODS_VALUE: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS, HEAD";

fn with_table(table: EsgTable) -> impl Filter<Extract = (EsgTable,), Error = Infallible> + Clone {
    warp::any().map(move || table.clone())
}

/// CORS policy for actual requests: listed origins only, with credentials.
/// Preflights from listed origins are answered by [`preflight`] first.
pub fn cors(origins: &[String]) -> warp::cors::Cors {
    warp::cors()
        .allow_origins(origins.iter().map(String::as_str))
        .allow_methods(ALLOWED_METHODS.iter().copied())
        .allow_credentials(true)
        .build()
}

/// Answer a CORS preflight from a listed origin, allowing whatever request
/// headers it asks for. `None` leaves the request to the regular filters,
/// where `warp::cors` rejects unlisted origins and methods.
pub fn preflight_reply(
    method: &Method,
    headers: &HeaderMap,
    origins: &[String],
) -> Option<Response> {
    if *method != Method::OPTIONS {
        return None;
    }
    let origin = headers.get(ORIGIN)?;
    let origin_str = origin.to_str().ok()?;
    if !origins.iter().any(|o| o == origin_str) {
        return None;
    }
    let requested = headers.get(ACCESS_CONTROL_REQUEST_METHOD)?.to_str().ok()?;
    if !ALLOWED_METHODS.contains(&requested) {
        return None;
    }

    let mut resp = warp::reply().into_response();
    let out = resp.headers_mut();
    out.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    out.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    out.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS_VALUE),
    );
    if let Some(asked) = headers.get(ACCESS_CONTROL_REQUEST_HEADERS) {
        out.insert(ACCESS_CONTROL_ALLOW_HEADERS, asked.clone());
    }
    out.insert(VARY, HeaderValue::from_static("origin"));
    Some(resp)
}

fn preflight(
    origins: Arc<[String]>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::method()
        .and(warp::header::headers_cloned())
        .and_then(move |method: Method, headers: HeaderMap| {
            let reply = preflight_reply(&method, &headers, &origins);
            async move { reply.ok_or_else(warp::reject::not_found) }
        })
}

/// All routes, wrapped in CORS and request tracing.
pub fn routes(
    table: EsgTable,
    origins: &[String],
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let welcome = warp::path::end()
        .and(warp::get())
        .and_then(handlers::welcome);

    let list_all = warp::path!("api" / "esg-data")
        .and(warp::get())
        .and(with_table(table.clone()))
        .and_then(handlers::list_all);

    let by_division = warp::path!("api" / "esg-data" / String)
        .and(warp::get())
        .and(with_table(table.clone()))
        .and_then(handlers::list_by_division);

    let health = warp::path!("health")
        .and(warp::get())
        .and(with_table(table))
        .and_then(handlers::health_check);

    let api = welcome
        .or(list_all)
        .or(by_division)
        .or(health)
        .with(cors(origins));

    preflight(origins.into())
        .or(api)
        .with(warp::trace::request())
}
