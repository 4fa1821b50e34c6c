//! Answering pipeline configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tutor_core::{AppError, AppResult};

/// Tunables for retrieval, context composition and generation timeouts.
///
/// `relevance_divisor` and the excerpt lengths are calibration values: the
/// defaults match what students have been shown so far and should only change
/// together with product input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of search hits kept per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Number of hits turned into context or fallback excerpts
    #[serde(default = "default_context_hits")]
    pub context_hits: usize,

    /// Characters of each body excerpt sent to the language model
    #[serde(default = "default_context_excerpt_chars")]
    pub context_excerpt_chars: usize,

    /// Characters of each body excerpt in a search-only answer
    #[serde(default = "default_fallback_excerpt_chars")]
    pub fallback_excerpt_chars: usize,

    /// Maximum number of links returned with an answer
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Score at which a link's relevance saturates at 1.0
    #[serde(default = "default_relevance_divisor")]
    pub relevance_divisor: f32,

    /// Upper bound on a content store query
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,

    /// Upper bound on a generation call
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
}

fn default_top_k() -> usize {
    5
}

fn default_context_hits() -> usize {
    3
}

fn default_context_excerpt_chars() -> usize {
    300
}

fn default_fallback_excerpt_chars() -> usize {
    200
}

fn default_max_links() -> usize {
    5
}

fn default_relevance_divisor() -> f32 {
    10.0
}

fn default_store_timeout_secs() -> u64 {
    10
}

fn default_generation_timeout_secs() -> u64 {
    30
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            context_hits: default_context_hits(),
            context_excerpt_chars: default_context_excerpt_chars(),
            fallback_excerpt_chars: default_fallback_excerpt_chars(),
            max_links: default_max_links(),
            relevance_divisor: default_relevance_divisor(),
            store_timeout_secs: default_store_timeout_secs(),
            generation_timeout_secs: default_generation_timeout_secs(),
        }
    }
}

impl PipelineConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Reject values that would break the relevance or link invariants.
    pub fn validate(&self) -> AppResult<()> {
        if !(self.relevance_divisor.is_finite() && self.relevance_divisor > 0.0) {
            return Err(AppError::Config(format!(
                "relevance_divisor must be a positive number, got {}",
                self.relevance_divisor
            )));
        }
        if self.max_links > crate::rag::rank::MAX_RANKED_LINKS {
            return Err(AppError::Config(format!(
                "max_links cannot exceed {}",
                crate::rag::rank::MAX_RANKED_LINKS
            )));
        }
        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Load pipeline configuration.
///
/// Loads from `.tutor/pipeline.yaml` if it exists, otherwise returns defaults.
pub fn load_config(workspace: &Path) -> AppResult<PipelineConfig> {
    let config_path = get_config_path(workspace);

    if !config_path.exists() {
        tracing::debug!("Using default pipeline config (no config file found)");
        return Ok(PipelineConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        AppError::Config(format!("Failed to read config at {:?}: {}", config_path, e))
    })?;

    let config: PipelineConfig = serde_yaml::from_str(&content).map_err(|e| {
        AppError::Config(format!("Failed to parse config at {:?}: {}", config_path, e))
    })?;

    config.validate()?;
    tracing::debug!("Loaded pipeline config from {:?}", config_path);
    Ok(config)
}

/// Get the path to the pipeline config file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".tutor").join("pipeline.yaml")
}

/// Get the SQLite content database path.
pub fn get_index_path(workspace: &Path) -> PathBuf {
    workspace.join(".tutor").join("content.sqlite")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.context_hits, 3);
        assert_eq!(config.context_excerpt_chars, 300);
        assert_eq!(config.fallback_excerpt_chars, 200);
        assert_eq!(config.max_links, 5);
        assert_eq!(config.relevance_divisor, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_config_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(temp_dir.path()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_load_serialized_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = PipelineConfig {
            relevance_divisor: 20.0,
            generation_timeout_secs: 5,
            ..Default::default()
        };

        let path = get_config_path(temp_dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();
        let loaded = load_config(temp_dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = get_config_path(temp_dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "top_k: 8\n").unwrap();

        let loaded = load_config(temp_dir.path()).unwrap();
        assert_eq!(loaded.top_k, 8);
        assert_eq!(loaded.context_excerpt_chars, 300);
    }

    #[test]
    fn test_validate_rejects_bad_divisor() {
        let config = PipelineConfig {
            relevance_divisor: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_too_many_links() {
        let config = PipelineConfig {
            max_links: 12,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_paths() {
        let workspace = Path::new("/tmp/course");
        assert!(get_config_path(workspace).ends_with(".tutor/pipeline.yaml"));
        assert!(get_index_path(workspace).ends_with(".tutor/content.sqlite"));
    }
}
