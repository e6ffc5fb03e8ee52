// src/config/mod.rs

use anyhow::{Context, Result};
use std::{
    env,
    net::{IpAddr, SocketAddr},
};
use tracing::warn;
use warp::http::Uri;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Local development front-ends. Deployments should narrow this via `CORS_ORIGINS`.
pub const DEV_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

/// Listener and middleware settings. The data file location is fixed and
/// intentionally not part of this; `LOG_LEVEL` is read by the binary before
/// anything else so config warnings are not lost.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: DEV_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl ServiceConfig {
    /// Read `HOST`, `PORT` and `CORS_ORIGINS` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            cfg.host = host.trim().to_string();
        }

        if let Some(raw) = lookup("PORT") {
            match raw.trim().parse::<u16>() {
                Ok(port) => cfg.port = port,
                Err(e) => warn!(port = %raw, error = %e, "invalid PORT, using {}", DEFAULT_PORT),
            }
        }

        if let Some(raw) = lookup("CORS_ORIGINS") {
            let origins = parse_origins(&raw);
            if origins.is_empty() {
                warn!(value = %raw, "CORS_ORIGINS has no usable origins, keeping defaults");
            } else {
                cfg.cors_origins = origins;
            }
        }

        cfg
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid HOST {:?}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Split a comma-separated origin list, dropping anything that is not
/// `scheme://host[:port]`.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| {
            if is_valid_origin(o) {
                Some(o.trim_end_matches('/').to_string())
            } else {
                warn!(origin = %o, "skipping invalid CORS origin");
                None
            }
        })
        .collect()
}

fn is_valid_origin(origin: &str) -> bool {
    let trimmed = origin.trim_end_matches('/');
    match trimmed.parse::<Uri>() {
        Ok(uri) => {
            matches!(uri.scheme_str(), Some("http") | Some("https"))
                && uri.authority().is_some()
                && uri
                    .path_and_query()
                    .map_or(true, |pq| matches!(pq.as_str(), "" | "/"))
        }
        Err(_) => false,
    }
}
