//! Read-only ESG metrics API: a CSV snapshot loaded once at startup and
//! served over HTTP.

pub mod api;
pub mod config;
pub mod data;
