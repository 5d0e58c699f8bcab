//! Configuration management for Lugnut.
//!
//! Configuration is read from `~/.config/lugnut/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserSettings,
    pub scrape: ScrapeSettings,
    pub export: ExportSettings,
}

/// Browser launch settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run the browser headless. Off by default: the operator has to see
    /// the page to resolve the anti-bot challenge.
    pub headless: bool,

    /// Page load timeout in seconds (default: 30)
    pub page_load_timeout_secs: u64,

    /// User-agent pool; one entry is picked at random per session.
    pub user_agents: Vec<String>,

    /// Attempt an automatic click-through of the known challenge widget
    /// before falling back to the manual gate (default: false)
    pub auto_challenge: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: false,
            page_load_timeout_secs: 30,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36"
                    .to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) \
                 Gecko/20100101 Firefox/121.0"
                    .to_string(),
            ],
            auto_challenge: false,
        }
    }
}

impl BrowserSettings {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }
}

/// Discovery and extraction settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    /// How long to wait for a required container to materialize (default: 30)
    pub element_wait_secs: u64,

    /// Poll interval while waiting for elements in milliseconds (default: 500)
    pub poll_interval_ms: u64,

    /// Re-read attempts when the listing DOM is replaced mid-read (default: 3)
    pub stale_retries: usize,

    /// Settle time after a pagination click in milliseconds (default: 2000)
    pub page_settle_ms: u64,

    /// Delay between product detail pages in milliseconds (default: 1000)
    pub detail_delay_ms: u64,

    /// Listing page ceiling (default: 500)
    pub max_pages: u32,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            element_wait_secs: 30,
            poll_interval_ms: 500,
            stale_retries: 3,
            page_settle_ms: 2000,
            detail_delay_ms: 1000,
            max_pages: 500,
        }
    }
}

impl ScrapeSettings {
    pub fn element_wait(&self) -> Duration {
        Duration::from_secs(self.element_wait_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }
}

/// Artifact settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Where artifacts are written (default: the desktop folder)
    pub output_dir: Option<PathBuf>,

    /// Column width clamp, in spreadsheet character units
    pub min_col_width: f64,
    pub max_col_width: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            min_col_width: 8.0,
            max_col_width: 50.0,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/lugnut/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("lugnut").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Lugnut Configuration

[browser]
# Run the browser headless (no visible window). Leave off: the operator
# has to see the page to solve the anti-bot challenge.
headless = false

# Page load timeout in seconds
page_load_timeout_secs = 30

# Attempt an automatic click-through of the known challenge widget
# before falling back to the manual prompt
auto_challenge = false

# User-agent pool; one entry is picked at random per session
user_agents = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
]

[scrape]
# How long to wait for a required container to appear (seconds)
element_wait_secs = 30

# Poll interval while waiting for elements (milliseconds)
poll_interval_ms = 500

# Re-read attempts when the listing DOM is replaced mid-read
stale_retries = 3

# Settle time after a pagination click (milliseconds)
page_settle_ms = 2000

# Delay between product detail pages (milliseconds)
detail_delay_ms = 1000

# Listing page ceiling
max_pages = 500

[export]
# Where artifacts are written. Defaults to the desktop folder.
# output_dir = "/path/to/output"

# Column width clamp, in spreadsheet character units
min_col_width = 8.0
max_col_width = 50.0
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert!(!config.browser.headless);
        assert_eq!(config.scrape.max_pages, 500);
        assert_eq!(config.export.min_col_width, 8.0);
        assert_eq!(config.export.max_col_width, 50.0);
        assert!(!config.browser.user_agents.is_empty());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[scrape]
max_pages = 3
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        // Custom value
        assert_eq!(config.scrape.max_pages, 3);
        // Default values
        assert_eq!(config.scrape.stale_retries, 3);
        assert!(!config.browser.headless);
    }

    #[test]
    fn test_empty_config() {
        let content = "";
        let config: Config = toml::from_str(content).expect("Empty config should work");

        assert_eq!(config.scrape.element_wait_secs, 30);
        assert_eq!(config.browser.page_load_timeout_secs, 30);
    }

    #[test]
    fn test_duration_accessors() {
        let config = Config::default();
        assert_eq!(config.scrape.element_wait(), Duration::from_secs(30));
        assert_eq!(config.scrape.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.browser.page_load_timeout(), Duration::from_secs(30));
    }
}
