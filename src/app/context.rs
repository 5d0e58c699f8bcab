use std::path::PathBuf;

use crate::app::error::{LugnutError, Result};
use crate::config::Config;

/// Shared application state: the loaded configuration and the resolved
/// artifact output directory.
pub struct AppContext {
    pub config: Config,
    pub output_dir: PathBuf,
}

impl AppContext {
    /// Build a context from a loaded configuration.
    ///
    /// Output directory resolution order: CLI override, then the
    /// `[export] output_dir` config key, then the operator's desktop
    /// folder, then the current directory.
    pub fn new(config: Config, output_override: Option<PathBuf>) -> Result<Self> {
        let output_dir = match output_override.or_else(|| config.export.output_dir.clone()) {
            Some(dir) => dir,
            None => Self::default_output_dir()?,
        };

        std::fs::create_dir_all(&output_dir)?;

        Ok(Self { config, output_dir })
    }

    fn default_output_dir() -> Result<PathBuf> {
        dirs::desktop_dir()
            .or_else(|| std::env::current_dir().ok())
            .ok_or_else(|| LugnutError::Config("Could not resolve an output directory".into()))
    }
}
