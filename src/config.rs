// Runtime configuration.
//
// Values come from an optional TOML file in the OS config directory
// (e.g. ~/.config/wayfarer/config.toml on Linux) and are then overridden by
// environment variables. Nothing secret lives in the source: the Wikimedia
// token is only ever read from the file or from `WIKIMEDIA_API_TOKEN`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_WIKI_URL: &str = "https://api.wikimedia.org/core/v1/wikivoyage/en";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the country-data service.
    pub countries_url: String,
    /// Base URL of the wiki search API used for excerpts.
    pub wiki_url: String,
    /// Bearer token for the wiki API. Requests go out anonymously without it.
    pub wiki_token: Option<String>,
    /// Contact address sent in the wiki User-Agent header.
    pub contact_email: Option<String>,
    /// Directory the wishlist and travels files are written to.
    pub output_dir: PathBuf,
    /// Per-request timeout for both APIs.
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            wiki_url: DEFAULT_WIKI_URL.to_string(),
            wiki_token: None,
            contact_email: None,
            output_dir: PathBuf::from("."),
            http_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Apply overrides from a key lookup. `Config::load` passes the process
    /// environment; tests pass a closure over a fixed map.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("WAYFARER_COUNTRIES_URL") {
            self.countries_url = url;
        }
        if let Some(url) = non_empty("WAYFARER_WIKI_URL") {
            self.wiki_url = url;
        }
        if let Some(token) = non_empty("WIKIMEDIA_API_TOKEN") {
            self.wiki_token = Some(token);
        }
        if let Some(email) = non_empty("WIKIMEDIA_CONTACT_EMAIL") {
            self.contact_email = Some(email);
        }
        if let Some(dir) = non_empty("WAYFARER_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(secs) = non_empty("WAYFARER_HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = secs.trim().parse().map_err(|_| {
                Error::Config(format!("WAYFARER_HTTP_TIMEOUT_SECS must be a whole number, got '{}'", secs))
            })?;
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wayfarer").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn overrides_replace_defaults() {
        let vars = env(&[
            ("WAYFARER_COUNTRIES_URL", "http://localhost:9000"),
            ("WIKIMEDIA_API_TOKEN", "abc123"),
            ("WAYFARER_HTTP_TIMEOUT_SECS", "5"),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.countries_url, "http://localhost:9000");
        assert_eq!(config.wiki_token.as_deref(), Some("abc123"));
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        assert_eq!(config.wiki_url, DEFAULT_WIKI_URL);
    }

    #[test]
    fn blank_values_are_ignored() {
        let vars = env(&[("WIKIMEDIA_API_TOKEN", "   ")]);
        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).cloned()).unwrap();
        assert!(config.wiki_token.is_none());
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let vars = env(&[("WAYFARER_HTTP_TIMEOUT_SECS", "soon")]);
        let mut config = Config::default();
        let err = config.apply_overrides(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "contact_email = \"me@example.com\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.contact_email.as_deref(), Some("me@example.com"));
        assert_eq!(config.countries_url, DEFAULT_COUNTRIES_URL);
        assert_eq!(config.http_timeout_secs, 30);
    }
}
