use crate::compose::compose;
use crate::error::SchemaError;
use crate::raw::RawSchema;
use crate::registry::SchemaRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Folio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaConfig {
    /// Base schema layer, relative to the config directory
    #[serde(default = "default_base")]
    pub base: String,

    /// Override layers applied in order
    #[serde(default)]
    pub overrides: Vec<String>,

    /// Container pattern documents are inserted into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_pattern: Option<String>,
}

fn default_base() -> String {
    "schema.json".to_string()
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            overrides: vec![],
            root_pattern: None,
        }
    }
}

impl SchemaConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: impl AsRef<Path>) -> ConfigResult<Self> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            read_json(&config_path)
        } else {
            debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(SchemaConfig::default())
        }
    }

    /// Paths of every schema layer, base first
    pub fn layer_paths(&self, dir: impl AsRef<Path>) -> Vec<PathBuf> {
        let dir = dir.as_ref();
        std::iter::once(&self.base)
            .chain(&self.overrides)
            .map(|layer| dir.join(layer))
            .collect()
    }

    /// Read every layer and compose them into a registry
    #[instrument(skip(self), fields(layers = self.overrides.len() + 1))]
    pub fn load_registry(&self, dir: &Path) -> ConfigResult<SchemaRegistry> {
        let mut layers = self
            .layer_paths(dir)
            .iter()
            .map(|path| read_json::<RawSchema>(path))
            .collect::<ConfigResult<Vec<_>>>()?
            .into_iter();

        let base = layers.next().unwrap_or_default();
        Ok(compose(base, layers)?)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
