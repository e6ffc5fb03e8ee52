use percent_encoding::percent_decode_str;
use serde::Serialize;
use tracing::debug;
use warp::{reject::Rejection, reply::Reply};

use crate::data::{DivisionMatch, EsgTable};

pub const WELCOME_MESSAGE: &str = "Welcome to Tata Quick Insights ESG API!";

/// Informational body used for the welcome page and for division misses.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn no_division(division: &str) -> Self {
        Self {
            message: format!("No data found for division: {}", division),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub rows: usize,
    pub source: String,
    pub loaded_at: String,
}

pub async fn welcome() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&MessageResponse {
        message: WELCOME_MESSAGE.to_string(),
    }))
}

pub async fn list_all(table: EsgTable) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&table.list_all()))
}

pub async fn list_by_division(raw: String, table: EsgTable) -> Result<impl Reply, Rejection> {
    // warp hands over the segment still percent-encoded
    let division = percent_decode_str(&raw).decode_utf8_lossy().into_owned();

    match table.list_by_division(&division) {
        DivisionMatch::Rows(rows) => {
            debug!(division = %division, rows = rows.len(), "division query");
            Ok(warp::reply::json(&rows))
        }
        DivisionMatch::NotFound { division } => {
            debug!(division = %division, "division query matched nothing");
            Ok(warp::reply::json(&MessageResponse::no_division(&division)))
        }
    }
}

pub async fn health_check(table: EsgTable) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&HealthResponse {
        status: "healthy",
        service: "esg-insights",
        rows: table.len(),
        source: table.source().as_str().to_string(),
        loaded_at: table.loaded_at().to_rfc3339(),
    }))
}
