//! # hearth-config
//!
//! Layered configuration loading for Hearth using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HEARTH_*` prefix, `__` as separator)
//! 2. Project-level `.hearth/config.toml`
//! 3. User-level `~/.config/hearth/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HEARTH_STORE__TOKEN` -> `store.token`,
//! `HEARTH_STORE__TEMPLATE_DB_ID` -> `store.template_db_id`, etc. The `__`
//! (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use hearth_config::HearthConfig;
//!
//! let config = HearthConfig::load_with_dotenv().expect("config");
//! config.store.validate().expect("store section complete");
//! ```

mod error;
mod store;
mod summarizer;

pub use error::ConfigError;
pub use store::StoreConfig;
pub use summarizer::SummarizerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HearthConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

impl HearthConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if any layer fails to merge or the
    /// merged figment does not extract into [`HearthConfig`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads the nearest `.env` before building the figment. This is the
    /// typical entry point for the CLI and tests.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load with an extra TOML file merged above the project layer.
    ///
    /// Used for the CLI's `--config <path>` override.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::figment_base()
            .merge(Toml::file(path))
            .merge(Env::prefixed("HEARTH_").split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the full figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on
    /// top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_base().merge(Env::prefixed("HEARTH_").split("__"))
    }

    /// Provider chain without the env layer (env always merges last).
    fn figment_base() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: user-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: project-local config
        let local_path = PathBuf::from(".hearth/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hearth").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or the current dir
    /// looking for a `.env` file. Silently does nothing if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
