//! Configuration parsed from environment variables.

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOMEPAGE_FILE_PATH: &str = "app/page.tsx";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// How a reorder is pushed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderMode {
    /// One `POST /reorder` call; the backend is trusted to apply it atomically.
    Bulk,
    /// One `update {order}` per moved section, with partial-failure detection.
    PerSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend_url: String,
    pub port: u16,
    pub homepage_file_path: String,
    pub timeouts: HttpTimeouts,
    pub reorder_mode: ReorderMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_owned(),
            port: DEFAULT_PORT,
            homepage_file_path: DEFAULT_HOMEPAGE_FILE_PATH.to_owned(),
            timeouts: HttpTimeouts::default(),
            reorder_mode: ReorderMode::Bulk,
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `BACKEND_URL`: section service base URL, default `http://localhost:3001`
    /// - `PORT`: proxy listen port, default 3000
    /// - `HOMEPAGE_FILE_PATH`: save target for generated code, default `app/page.tsx`
    /// - `HOMEPAGE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `HOMEPAGE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `HOMEPAGE_REORDER_MODE`: `bulk` (default) or `per_section`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = std::env::var("BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let port = env_parse("PORT", DEFAULT_PORT)?;
        let homepage_file_path =
            std::env::var("HOMEPAGE_FILE_PATH").unwrap_or_else(|_| DEFAULT_HOMEPAGE_FILE_PATH.to_owned());
        let timeouts = HttpTimeouts {
            request_secs: env_parse("HOMEPAGE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse("HOMEPAGE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let reorder_mode = parse_reorder_mode(std::env::var("HOMEPAGE_REORDER_MODE").ok().as_deref())?;

        Ok(Self { backend_url, port, homepage_file_path, timeouts, reorder_mode })
    }
}

fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::Invalid { var: key, reason: e.to_string() }),
        Err(_) => Ok(default),
    }
}

fn parse_reorder_mode(raw: Option<&str>) -> Result<ReorderMode, ConfigError> {
    match raw.unwrap_or("bulk") {
        "bulk" => Ok(ReorderMode::Bulk),
        "per_section" => Ok(ReorderMode::PerSection),
        other => Err(ConfigError::Invalid {
            var: "HOMEPAGE_REORDER_MODE",
            reason: format!("unsupported mode '{other}' (expected 'bulk' or 'per_section')"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
