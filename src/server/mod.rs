// src/server/mod.rs

use std::{convert::Infallible, net::SocketAddr, sync::Arc};
use warp::{reject::Rejection, Filter, Reply};

use crate::leads::LeadService;

pub mod handlers;
pub mod rate_limit;

pub use rate_limit::RateLimiter;

/// Largest download request body accepted.
const MAX_BODY_BYTES: u64 = 100 * 1024;

/// Request headers browsers may send cross-origin.
const ALLOWED_HEADERS: [&str; 8] = [
    "accept",
    "accept-language",
    "authorization",
    "cache-control",
    "content-language",
    "content-type",
    "origin",
    "x-requested-with",
];

fn with_service(
    service: LeadService,
) -> impl Filter<Extract = (LeadService,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

/// Passes while the caller's address is under its request quota.
fn rate_limited(limiter: Arc<RateLimiter>) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::addr::remote()
        .and_then(move |addr: Option<SocketAddr>| {
            let limiter = limiter.clone();
            async move {
                let key = addr
                    .map(|a| a.ip().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                if limiter.allow(&key) {
                    Ok(())
                } else {
                    tracing::warn!(client = %key, "rate limit exceeded");
                    Err(warp::reject::custom(handlers::TooManyRequests))
                }
            }
        })
        .untuple_one()
}

/// Rejects a declared `Content-Length` over the limit. A request without the
/// header still passes; its body is read as-is and may be empty.
fn body_within_limit() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and_then(|len: Option<u64>| async move {
            match len {
                Some(n) if n > MAX_BODY_BYTES => Err(warp::reject::custom(handlers::BodyTooLarge)),
                _ => Ok(()),
            }
        })
        .untuple_one()
}

/// Full route tree: health, filter options, and the rate-limited download.
pub fn routes(
    service: LeadService,
    limiter: Arc<RateLimiter>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health);

    let options = warp::path("filter-options")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_service(service.clone()))
        .and_then(handlers::filter_options);

    let download = warp::path("filter-and-download")
        .and(warp::path::end())
        .and(warp::post())
        .and(rate_limited(limiter))
        .and(body_within_limit())
        .and(warp::body::bytes())
        .and(with_service(service))
        .and_then(handlers::filter_and_download);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(ALLOWED_HEADERS.to_vec());

    health
        .or(options)
        .or(download)
        .with(cors)
        .recover(handlers::handle_rejection)
        .with(warp::trace::request())
}
