use crate::error::{Result, ScaffoldError};
use crate::tools::compare::MatchMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Local translation server used during development.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:1969/";
pub const DEFAULT_CHANNEL: &str = "web";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_CONCURRENCY: usize = 1;

pub const ENV_SERVER_URL: &str = "SCAFFOLDED_SERVER_URL";
pub const ENV_CHANNEL: &str = "SCAFFOLDED_CHANNEL";
pub const ENV_TIMEOUT_MS: &str = "SCAFFOLDED_TIMEOUT_MS";
pub const ENV_CONCURRENCY: &str = "SCAFFOLDED_CONCURRENCY";
pub const ENV_TRANSLATORS_DIR: &str = "TEMP_TRANSLATORS_DIR";
pub const ENV_IGNORE_KEY_ORDER: &str = "SCAFFOLDED_IGNORE_KEY_ORDER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub server_url: String,
    pub channel: String,
    pub timeout_ms: u64,
    /// Test cases in flight at once. 1 runs them one after another.
    pub concurrency: usize,
    /// Where translator scripts are written for the server to pick up.
    pub translators_dir: PathBuf,
    pub match_mode: MatchMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            channel: DEFAULT_CHANNEL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            concurrency: DEFAULT_CONCURRENCY,
            translators_dir: std::env::temp_dir(),
            match_mode: MatchMode::Strict,
        }
    }
}

impl Config {
    /// Defaults overridden by whatever is set in the process environment.
    ///
    /// Values are only parsed here; call [`Config::validate`] once every
    /// override has been applied.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get(ENV_SERVER_URL) {
            cfg.server_url = url;
        }
        if let Some(channel) = get(ENV_CHANNEL) {
            cfg.channel = channel;
        }
        if let Some(raw) = get(ENV_TIMEOUT_MS) {
            cfg.timeout_ms = parse_number(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = get(ENV_CONCURRENCY) {
            cfg.concurrency = parse_number(ENV_CONCURRENCY, &raw)?;
        }
        if let Some(dir) = get(ENV_TRANSLATORS_DIR) {
            cfg.translators_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get(ENV_IGNORE_KEY_ORDER) {
            if parse_flag(ENV_IGNORE_KEY_ORDER, &raw)? {
                cfg.match_mode = MatchMode::IgnoreKeyOrder;
            }
        }

        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.server_url).map_err(|e| {
            ScaffoldError::Config(format!("invalid server url {:?}: {e}", self.server_url))
        })?;
        if self.timeout_ms == 0 {
            return Err(ScaffoldError::Config("timeout must be greater than zero".into()));
        }
        if self.concurrency == 0 {
            return Err(ScaffoldError::Config("concurrency must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| ScaffoldError::Config(format!("{name} must be a positive integer, got {raw:?}")))
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ScaffoldError::Config(format!("{name} must be a boolean, got {raw:?}"))),
    }
}
