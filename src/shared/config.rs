//! Application configuration. Backend location, offline mode, UI toggles.

use serde::Deserialize;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Simulated latency of the offline mock backend.
pub const DEFAULT_MOCK_LATENCY_MS: u64 = 600;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Backend base URL. Read from DOC_CHAT_BASE_URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Use the in-process mock backend instead of HTTP. Read from DOC_CHAT_MOCK.
    #[serde(default)]
    pub mock: Option<bool>,

    /// Mock backend latency in ms. Read from DOC_CHAT_MOCK_LATENCY_MS.
    #[serde(default)]
    pub mock_latency_ms: Option<u64>,

    /// Skip the startup banner. Read from DOC_CHAT_NO_BANNER.
    #[serde(default)]
    pub no_banner: Option<bool>,
}

impl AppConfig {
    /// Environment (DOC_CHAT_*, .env included) plus an optional file named by DOC_CHAT_CONFIG.
    /// Environment wins over the file.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("DOC_CHAT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::with_prefix("DOC_CHAT").try_parsing(true));
        c.build()?.try_deserialize()
    }

    /// Returns the backend URL without a trailing slash. Defaults to DEFAULT_BASE_URL.
    pub fn base_url_or_default(&self) -> String {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn is_mock(&self) -> bool {
        self.mock.unwrap_or(false)
    }

    pub fn mock_latency_ms_or_default(&self) -> u64 {
        self.mock_latency_ms.unwrap_or(DEFAULT_MOCK_LATENCY_MS)
    }

    pub fn show_banner(&self) -> bool {
        !self.no_banner.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.base_url_or_default(), DEFAULT_BASE_URL);
        assert!(!cfg.is_mock());
        assert!(cfg.show_banner());
        assert_eq!(cfg.mock_latency_ms_or_default(), DEFAULT_MOCK_LATENCY_MS);
    }

    #[test]
    fn test_base_url_normalized() {
        let cfg = AppConfig {
            base_url: Some(" http://qa.internal:9000/ ".to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.base_url_or_default(), "http://qa.internal:9000");

        let blank = AppConfig {
            base_url: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.base_url_or_default(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc-chat.toml");
        std::fs::write(&path, "base_url = \"http://10.0.0.5:8000\"\nmock = true\n").unwrap();

        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from(path.as_path()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.base_url_or_default(), "http://10.0.0.5:8000");
        assert!(cfg.is_mock());
    }
}
