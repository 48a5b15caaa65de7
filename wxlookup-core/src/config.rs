use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/weather";
pub const DEFAULT_LOADING_DELAY_MS: u64 = 800;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// endpoint = "http://localhost:8000/weather"
/// loading_delay_ms = 800
/// request_timeout_secs = 10
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Weather endpoint receiving `POST` submissions.
    pub endpoint: String,

    /// Pause between a result arriving and it being shown.
    pub loading_delay_ms: u64,

    /// No timeout when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            loading_delay_ms: DEFAULT_LOADING_DELAY_MS,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Parse and check the configured endpoint.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid endpoint URL '{}'", self.endpoint))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(anyhow!(
                "Unsupported endpoint scheme '{other}' in '{}'.\n\
                 Hint: run `wxlookup configure --endpoint http://host:port/weather`.",
                self.endpoint
            )),
        }
    }

    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Does not check the endpoint; `endpoint_url` does that where it is used.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wxlookup", "wxlookup")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Per-run settings from the command line, layered over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub loading_delay_ms: Option<u64>,
    /// Zero disables the timeout.
    pub request_timeout_secs: Option<u64>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(self, config: &mut Config) {
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(delay_ms) = self.loading_delay_ms {
            config.loading_delay_ms = delay_ms;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = (secs > 0).then_some(secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_backend() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoint_url().unwrap().as_str(), DEFAULT_ENDPOINT);
        assert_eq!(cfg.loading_delay(), Duration::from_millis(800));
        assert_eq!(cfg.request_timeout(), None);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let cfg = Config::from_toml("loading_delay_ms = 0\n").expect("valid toml");
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.loading_delay(), Duration::ZERO);
    }

    #[test]
    fn timeout_and_endpoint_are_read() {
        let cfg = Config::from_toml(
            "endpoint = \"https://weather.example.com/api/weather\"\nrequest_timeout_secs = 5\n",
        )
        .expect("valid toml");

        assert_eq!(cfg.endpoint_url().unwrap().host_str(), Some("weather.example.com"));
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn rejects_non_http_endpoint_on_use() {
        let cfg = Config::from_toml("endpoint = \"ftp://example.com/weather\"\n").expect("loads");
        let err = cfg.endpoint_url().unwrap_err();
        assert!(err.to_string().contains("Unsupported endpoint scheme"));

        let cfg = Config::from_toml("endpoint = \"not a url\"\n").expect("loads");
        let err = cfg.endpoint_url().unwrap_err();
        assert!(err.to_string().contains("Invalid endpoint URL"));
    }

    #[test]
    fn bad_saved_endpoint_can_be_overridden() {
        let mut cfg =
            Config::from_toml("endpoint = \"localhost:8000/weather\"\nloading_delay_ms = 100\n")
                .expect("file with a bad endpoint still loads");
        assert!(cfg.endpoint_url().is_err());

        let overrides = Overrides {
            endpoint: Some("http://localhost:8000/weather".to_string()),
            ..Overrides::default()
        };
        assert!(!overrides.is_empty());
        overrides.apply(&mut cfg);

        assert_eq!(cfg.endpoint_url().unwrap().as_str(), DEFAULT_ENDPOINT);
        assert_eq!(cfg.loading_delay_ms, 100);
    }

    #[test]
    fn zero_timeout_override_disables_timeout() {
        let mut cfg = Config { request_timeout_secs: Some(10), ..Config::default() };
        Overrides { request_timeout_secs: Some(0), ..Overrides::default() }.apply(&mut cfg);
        assert_eq!(cfg.request_timeout(), None);

        Overrides { loading_delay_ms: Some(0), ..Overrides::default() }.apply(&mut cfg);
        assert_eq!(cfg.loading_delay(), Duration::ZERO);
        assert!(Overrides::default().is_empty());
    }

    #[test]
    fn toml_roundtrip_omits_missing_timeout() {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        assert!(!text.contains("request_timeout_secs"));
        assert_eq!(Config::from_toml(&text).expect("parse"), cfg);
    }
}
