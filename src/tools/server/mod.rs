//! Translation Server Client

mod client;

pub use client::server_uri;

use crate::error::{Result, ScaffoldError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;

/// The remote service that loads translators and runs them against a URL.
#[async_trait]
pub trait TranslationServer: Send + Sync {
    /// Translate `url` and return the server's JSON reply untouched.
    async fn translate_raw(&self, url: &str) -> Result<Value>;

    /// Translate `url`, requiring the reply to be an array of items.
    async fn translate(&self, url: &str) -> Result<Vec<Value>> {
        match self.translate_raw(url).await? {
            Value::Array(items) => Ok(items),
            other => Err(ScaffoldError::network_error(format!(
                "expected a JSON array of items, got: {}",
                truncate(&other.to_string(), 200)
            ))),
        }
    }
}

/// [`TranslationServer`] over HTTP.
///
/// Each call is `POST <base>/<channel>` with the target URL as a
/// `text/plain` body.
pub struct HttpTranslationServer {
    client: Client,
    endpoint: String,
}

impl HttpTranslationServer {
    pub fn new(base_url: &str, channel: &str, timeout_ms: u64) -> Result<Self> {
        Ok(Self {
            client: client::build_client(timeout_ms)?,
            endpoint: server_uri(base_url, channel),
        })
    }
}

#[async_trait]
impl TranslationServer for HttpTranslationServer {
    async fn translate_raw(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(url.to_string())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScaffoldError::network_error(format!(
                "translation server returned {status}: {}",
                truncate(body.trim(), 200)
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            ScaffoldError::network_error(format!("invalid JSON from translation server: {e}"))
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
