use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Runtime configuration, resolved once at startup and passed to the pieces
/// that need it. Defaults are placeholders; real values come from a config
/// file or `TAWATCH_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base address of the TubeArchivist API, e.g. `http://10.0.0.5:8000/api`.
    pub base_url: String,
    /// Pre-issued API token, sent as `Authorization: Token …`.
    pub token: String,
    /// Path of the persisted selection document.
    pub selection_file: PathBuf,
    /// When set, the unwatched direction also skips videos already in the
    /// target state, matching the watched direction.
    #[serde(default)]
    pub symmetric_marking: bool,
}

impl AppConfig {
    /// Layered load: built-in defaults, then `tawatch.toml` in the working
    /// directory or the user config dir (or an explicit file), then
    /// environment overrides.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("base_url", "http://localhost:8000/api")?
            .set_default("token", "")?
            .set_default("selection_file", "./selected_channels.json")?
            .set_default("symmetric_marking", false)?;

        match file {
            Some(path) => {
                builder = builder.add_source(config::File::from(path));
            }
            None => {
                builder = builder.add_source(config::File::with_name("tawatch").required(false));
                if let Some(dir) = dirs_next::config_dir() {
                    builder = builder.add_source(
                        config::File::from(dir.join("tawatch").join("config.toml"))
                            .required(false),
                    );
                }
            }
        }

        builder = builder.add_source(config::Environment::with_prefix("TAWATCH"));
        builder
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }
}
