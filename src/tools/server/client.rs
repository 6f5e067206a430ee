use crate::error::{Result, ScaffoldError};
use reqwest::{redirect, Client};
use std::time::Duration;

pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const REDIRECT_LIMIT: usize = 10;
const POOL_IDLE_TIMEOUT_SEC: u64 = 90;

/// Build a reqwest client for talking to the translation server.
pub(crate) fn build_client(timeout_ms: u64) -> Result<Client> {
    let timeout_ms = if timeout_ms == 0 {
        DEFAULT_TIMEOUT_MS
    } else {
        timeout_ms
    };

    Client::builder()
        .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .timeout(Duration::from_millis(timeout_ms))
        .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SEC))
        .build()
        .map_err(|e| ScaffoldError::Config(format!("failed to build client: {e}")))
}

/// Join a server base URL and a channel name with exactly one slash.
pub fn server_uri(base: &str, channel: &str) -> String {
    let base = base.trim_end_matches('/');
    let channel = channel.trim_start_matches('/');
    if channel.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/{channel}")
    }
}
