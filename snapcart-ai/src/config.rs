//! Configuration for snapcart-ai
//!
//! Bootstrap settings come from `snapcart-ai.toml` (see `resolve_config_file`
//! for the lookup order); a missing file means built-in defaults. Environment
//! variables override individual recognizer endpoints.

use crate::extractors::{RecognizerSet, RemoteRecognizer, StaticRecognizer};
use crate::fusion::selector::{CATALOG_CUTOFF, QUICK_CUTOFF};
use crate::services::store_links::StoreTemplate;
use crate::types::{Recognizer, SourceKind};
use crate::workflow::PipelineConfig;
use serde::{Deserialize, Serialize};
use snapcart_common::config::{load_toml_config, write_toml_config, LoggingConfig};
use snapcart_common::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Config file name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "snapcart-ai.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SNAPCART_CONFIG";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5780;

/// Service configuration (TOML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Folder holding the product database
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub pipeline: PipelineSettings,

    #[serde(default)]
    pub recognizers: RecognizerSettings,

    /// Shopping sites for outbound search links
    #[serde(default = "default_stores")]
    pub stores: Vec<StoreTemplate>,
}

/// `[pipeline]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    #[serde(default = "default_quick_cutoff")]
    pub quick_cutoff: usize,

    #[serde(default = "default_catalog_cutoff")]
    pub catalog_cutoff: usize,

    /// Per-adapter timeout in milliseconds; 0 waits indefinitely
    #[serde(default)]
    pub signal_timeout_ms: u64,

    /// Optional taxonomy TOML replacing the built-in table
    #[serde(default)]
    pub taxonomy_path: Option<PathBuf>,
}

/// `[recognizers]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerSettings {
    #[serde(default)]
    pub text_url: Option<String>,

    #[serde(default)]
    pub object_url: Option<String>,

    #[serde(default)]
    pub scene_url: Option<String>,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_quick_cutoff() -> usize {
    QUICK_CUTOFF
}

fn default_catalog_cutoff() -> usize {
    CATALOG_CUTOFF
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_stores() -> Vec<StoreTemplate> {
    crate::services::store_links::default_stores()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: DEFAULT_PORT,
            logging: LoggingConfig::default(),
            pipeline: PipelineSettings::default(),
            recognizers: RecognizerSettings::default(),
            stores: default_stores(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            quick_cutoff: QUICK_CUTOFF,
            catalog_cutoff: CATALOG_CUTOFF,
            signal_timeout_ms: 0,
            taxonomy_path: None,
        }
    }
}

impl Default for RecognizerSettings {
    fn default() -> Self {
        Self {
            text_url: None,
            object_url: None,
            scene_url: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl AiConfig {
    /// Load config from `path`, or defaults when no file was found
    ///
    /// Runs before the tracing subscriber exists; the caller logs the outcome.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => load_toml_config::<AiConfig>(path)?,
            None => AiConfig::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration as TOML (atomic replace)
    pub fn save(&self, path: &Path) -> Result<()> {
        write_toml_config(self, path)
    }

    /// `SNAPCART_TEXT_URL`, `SNAPCART_OBJECT_URL`, `SNAPCART_SCENE_URL`
    fn apply_env_overrides(&mut self) {
        let overrides = [
            ("SNAPCART_TEXT_URL", &mut self.recognizers.text_url),
            ("SNAPCART_OBJECT_URL", &mut self.recognizers.object_url),
            ("SNAPCART_SCENE_URL", &mut self.recognizers.scene_url),
        ];
        for (var, slot) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    *slot = Some(value);
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.pipeline.quick_cutoff == 0 || self.pipeline.catalog_cutoff == 0 {
            return Err(Error::Config(
                "pipeline cutoffs must be at least 1".to_string(),
            ));
        }
        for store in &self.stores {
            store.validate()?;
        }
        Ok(())
    }

    pub fn signal_timeout(&self) -> Option<Duration> {
        match self.pipeline.signal_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Search-only pipeline variant
    pub fn quick_pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            cutoff: self.pipeline.quick_cutoff,
            ..PipelineConfig::quick_search()
        }
        .with_signal_timeout(self.signal_timeout())
    }

    /// Pipeline variant with category guess
    pub fn catalog_pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            cutoff: self.pipeline.catalog_cutoff,
            ..PipelineConfig::catalog()
        }
        .with_signal_timeout(self.signal_timeout())
    }

    /// Build the three adapters; signals without an endpoint are unavailable
    pub fn build_recognizers(&self) -> RecognizerSet {
        let timeout = Duration::from_millis(self.recognizers.request_timeout_ms);
        let build = |kind: SourceKind, url: &Option<String>| -> Arc<dyn Recognizer> {
            let Some(url) = url.as_deref().filter(|u| !u.trim().is_empty()) else {
                warn!(signal = %kind, "No recognizer endpoint configured; signal disabled");
                return Arc::new(StaticRecognizer::unavailable(kind));
            };
            match RemoteRecognizer::new(kind, url, timeout) {
                Ok(recognizer) => {
                    info!(signal = %kind, endpoint = %url, "Remote recognizer configured");
                    Arc::new(recognizer)
                }
                Err(e) => {
                    warn!(signal = %kind, error = %e, "Recognizer setup failed; signal disabled");
                    Arc::new(StaticRecognizer::unavailable(kind))
                }
            }
        };

        RecognizerSet::new(
            build(SourceKind::Text, &self.recognizers.text_url),
            build(SourceKind::Object, &self.recognizers.object_url),
            build(SourceKind::Scene, &self.recognizers.scene_url),
        )
    }
}
