use std::path::PathBuf;
use std::sync::Arc;

use log::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";

/// Application configuration and constants
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the Markdown source of every page
    pub source_dir: Arc<PathBuf>,
    /// Directory holding the rendered HTML of every page
    pub page_dir: Arc<PathBuf>,
    /// Directory searched for template overrides
    pub template_dir: Arc<PathBuf>,
    pub port: u16,
    pub host: String,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            source_dir: Arc::new(PathBuf::from("page-md")),
            page_dir: Arc::new(PathBuf::from("page")),
            template_dir: Arc::new(PathBuf::from("templates")),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
        }
    }

    /// Create configuration with custom values
    pub fn with_custom(
        source_dir: PathBuf,
        page_dir: PathBuf,
        template_dir: PathBuf,
        port: Option<u16>,
        host: Option<String>,
    ) -> Self {
        Self {
            source_dir: Arc::new(source_dir),
            page_dir: Arc::new(page_dir),
            template_dir: Arc::new(template_dir),
            port: port.unwrap_or(DEFAULT_PORT),
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        }
    }

    /// Build configuration from `MDWIKI_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::new();
        let dir = |key: &str, default: &Arc<PathBuf>| {
            lookup(key)
                .map(|v| Arc::new(PathBuf::from(v)))
                .unwrap_or_else(|| Arc::clone(default))
        };

        let port = match lookup("MDWIKI_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid MDWIKI_PORT value {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            source_dir: dir("MDWIKI_SOURCE_DIR", &defaults.source_dir),
            page_dir: dir("MDWIKI_PAGE_DIR", &defaults.page_dir),
            template_dir: dir("MDWIKI_TEMPLATE_DIR", &defaults.template_dir),
            port,
            host: lookup("MDWIKI_HOST").unwrap_or(defaults.host),
        }
    }

    /// Get the socket address string for binding
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source_dir.as_path(), std::path::Path::new("page-md"));
        assert_eq!(config.page_dir.as_path(), std::path::Path::new("page"));
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MDWIKI_SOURCE_DIR", "/srv/wiki/src"),
            ("MDWIKI_PORT", "9000"),
            ("MDWIKI_HOST", "127.0.0.1"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.source_dir.as_path(), std::path::Path::new("/srv/wiki/src"));
        assert_eq!(config.page_dir.as_path(), std::path::Path::new("page"));
        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = Config::from_lookup(|k| (k == "MDWIKI_PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 8080);
    }
}
