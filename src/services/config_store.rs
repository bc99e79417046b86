// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::FEATURE_DIM;
use crate::services::detection::{EmbeddingFormat, OovPolicy, DEFAULT_HIGHLIGHT_COLOR};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            model: ModelConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

/// Locations of the pretrained artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    #[serde(default = "default_embeddings_path")]
    pub embeddings_path: PathBuf,
    #[serde(default)]
    pub embeddings_format: EmbeddingFormat,
    /// Read only the first N vectors of the embedding artifact
    #[serde(default)]
    pub embeddings_limit: Option<usize>,
    #[serde(default = "default_classifier_path")]
    pub classifier_path: PathBuf,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embeddings_path: default_embeddings_path(),
            embeddings_format: EmbeddingFormat::Binary,
            embeddings_limit: None,
            classifier_path: default_classifier_path(),
            dimension: FEATURE_DIM,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    #[serde(default)]
    pub oov_policy: OovPolicy,
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
    /// Worker threads for per-paragraph classification; 1 runs sequentially
    #[serde(default = "default_workers", alias = "parallel")]
    pub workers: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            oov_policy: OovPolicy::ZeroFill,
            random_seed: None,
            highlight_color: default_highlight_color(),
            workers: default_workers(),
        }
    }
}

fn default_version() -> String { env!("CARGO_PKG_VERSION").to_string() }
fn default_embeddings_path() -> PathBuf { PathBuf::from("GoogleNews-vectors-negative300.bin") }
fn default_classifier_path() -> PathBuf { PathBuf::from("svm_model.json") }
fn default_dimension() -> usize { FEATURE_DIM }
fn default_highlight_color() -> String { DEFAULT_HIGHLIGHT_COLOR.to_string() }
fn default_workers() -> usize { 1 }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Store backed by an explicit config file path
    pub fn with_file(config_file: PathBuf) -> Self {
        let config_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("policyscan"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), String> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| format!("Failed to create backup dir: {}", e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file)
            .map_err(|e| format!("Failed to create backup: {}", e))?;

        // Keep only last 10 backups
        self.cleanup_old_backups(&backup_dir, 10)?;

        Ok(())
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), String> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(|e| format!("Failed to read backup dir: {}", e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Oldest first; names carry the timestamp so they sort chronologically
        entries.sort_by_key(|e| e.file_name());

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (ConfigStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("policyscan_cfg_{}", uuid::Uuid::new_v4()));
        (ConfigStore::new(dir.clone()), dir)
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model.dimension, 300);
        assert_eq!(config.model.embeddings_format, EmbeddingFormat::Binary);
        assert_eq!(config.validation.oov_policy, OovPolicy::ZeroFill);
        assert_eq!(config.validation.highlight_color, "#ff0000");
        assert_eq!(config.validation.workers, 1);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{"validation": {"oovPolicy": "random_fill", "randomSeed": 42}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.validation.oov_policy, OovPolicy::RandomFill);
        assert_eq!(config.validation.random_seed, Some(42));
        assert_eq!(config.validation.highlight_color, "#ff0000");
        assert_eq!(config.model.dimension, 300);
    }

    #[test]
    fn test_workers_accepts_parallel_key() {
        let json = r#"{"validation": {"parallel": 4}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.validation.workers, 4);

        let json = r#"{"validation": {"workers": 2}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.validation.workers, 2);
    }

    #[test]
    fn test_missing_file_loads_default() {
        let (store, _dir) = temp_store();
        let config = store.load().unwrap();
        assert_eq!(config.model.classifier_path, PathBuf::from("svm_model.json"));
    }

    #[test]
    fn test_save_load_and_backup() {
        let (store, dir) = temp_store();
        let mut config = AppConfig::default();
        store.save(&config).unwrap();

        config.model.embeddings_format = EmbeddingFormat::Text;
        config.model.embeddings_limit = Some(500_000);
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.model.embeddings_format, EmbeddingFormat::Text);
        assert_eq!(loaded.model.embeddings_limit, Some(500_000));

        let backups = fs::read_dir(dir.join("backups")).unwrap().count();
        assert_eq!(backups, 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_with_file_uses_parent_dir() {
        let store = ConfigStore::with_file(PathBuf::from("/tmp/policyscan/custom.json"));
        assert_eq!(store.config_file(), Path::new("/tmp/policyscan/custom.json"));
    }
}
