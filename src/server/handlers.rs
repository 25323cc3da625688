// src/server/handlers.rs

use std::convert::Infallible;
use tracing::{error, warn};
use warp::{
    http::StatusCode,
    hyper::body::Bytes,
    reject::Rejection,
    reply::{self, Reply, Response},
};

use crate::{
    error::LeadError,
    leads::{FilterCriteria, LeadService},
};

pub const OPTIONS_FAILED: &str = "Error fetching filter options";
pub const DOWNLOAD_FAILED: &str = "Error filtering and downloading leads";
pub const CSV_FILENAME: &str = "filtered_leads.csv";

/// Raised by the rate-limit filter; turned into a 429 by `handle_rejection`.
#[derive(Debug)]
pub struct TooManyRequests;

impl warp::reject::Reject for TooManyRequests {}

/// Declared request body exceeds the accepted size.
#[derive(Debug)]
pub struct BodyTooLarge;

impl warp::reject::Reject for BodyTooLarge {}

fn text(body: impl Into<String>, status: StatusCode) -> Response {
    reply::with_status(body.into(), status).into_response()
}

/// Map a failed operation to its status. Upstream details are logged and
/// replaced by `fallback` so they never reach the client.
fn error_reply(err: LeadError, fallback: &'static str) -> Response {
    match err {
        LeadError::NotFound(msg) => text(msg, StatusCode::NOT_FOUND),
        e @ (LeadError::MissingColumns(_) | LeadError::ColumnOutOfRange(_)) => {
            warn!(error = %e, "sheet layout unusable");
            text(e.to_string(), StatusCode::BAD_REQUEST)
        }
        e @ LeadError::RateLimited => text(e.to_string(), StatusCode::TOO_MANY_REQUESTS),
        LeadError::Upstream(e) => {
            error!(error = ?e, "{}", fallback);
            text(fallback, StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// An empty body means "no criteria"; anything else must be a JSON object.
fn parse_criteria(body: &[u8]) -> serde_json::Result<FilterCriteria> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FilterCriteria::default());
    }
    serde_json::from_slice(body)
}

pub async fn health() -> Result<impl Reply, Rejection> {
    Ok(reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "leadsheet"
    })))
}

pub async fn filter_options(service: LeadService) -> Result<Response, Rejection> {
    Ok(match service.filter_options().await {
        Ok(options) => reply::json(&options).into_response(),
        Err(e) => error_reply(e, OPTIONS_FAILED),
    })
}

pub async fn filter_and_download(body: Bytes, service: LeadService) -> Result<Response, Rejection> {
    let criteria = match parse_criteria(&body) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "malformed download request body");
            return Ok(text("Invalid JSON body", StatusCode::BAD_REQUEST));
        }
    };

    Ok(match service.filter_and_download(criteria).await {
        Ok(csv) => {
            let r = reply::with_header(csv, "Content-Type", "text/csv");
            let r = reply::with_header(
                r,
                "Content-Disposition",
                format!("attachment; filename={}", CSV_FILENAME),
            );
            r.into_response()
        }
        Err(e) => error_reply(e, DOWNLOAD_FAILED),
    })
}

/// Turn filter rejections into plain-text responses.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let resp = if err.is_not_found() {
        text("Not Found", StatusCode::NOT_FOUND)
    } else if err.find::<TooManyRequests>().is_some() {
        error_reply(LeadError::RateLimited, DOWNLOAD_FAILED)
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        text("Method Not Allowed", StatusCode::METHOD_NOT_ALLOWED)
    } else if err.find::<BodyTooLarge>().is_some()
        || err.find::<warp::reject::PayloadTooLarge>().is_some()
    {
        text("Payload Too Large", StatusCode::PAYLOAD_TOO_LARGE)
    } else if let Some(e) = err.find::<warp::reject::InvalidHeader>() {
        text(e.to_string(), StatusCode::BAD_REQUEST)
    } else if let Some(e) = err.find::<warp::cors::CorsForbidden>() {
        text(e.to_string(), StatusCode::FORBIDDEN)
    } else {
        error!(rejection = ?err, "unhandled rejection");
        text("Internal Server Error", StatusCode::INTERNAL_SERVER_ERROR)
    };
    Ok(resp)
}
