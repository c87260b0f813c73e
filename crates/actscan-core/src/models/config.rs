//! Configuration structures for the screenshot pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the actscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActscanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Image store configuration.
    pub storage: StorageConfig,

    /// Ingestion configuration.
    pub ingest: IngestConfig,

    /// Model configuration.
    pub models: ModelConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Keep `[UNK]` tokens emitted by the recognizer instead of blanking them.
    pub keep_unk: bool,

    /// Drop recognized boxes below this confidence (0.0 - 1.0). The default
    /// keeps every box.
    pub min_confidence: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            keep_unk: false,
            min_confidence: 0.0,
        }
    }
}

/// Per-user image store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory; each user gets a subdirectory.
    pub images_dir: PathBuf,

    /// File extensions treated as images (lowercase, no dot).
    pub extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("public").join("images"),
            extensions: ["png", "jpg", "jpeg", "webp", "bmp", "tif", "tiff"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

/// What to do with an image whose OCR pass fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrFailurePolicy {
    /// Leave the image out of the output.
    Skip,
    /// Emit a record whose raw text describes the failure.
    #[default]
    Record,
}

/// Ingestion pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Handling of per-image OCR failures.
    pub on_ocr_failure: OcrFailurePolicy,
}

/// Model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ActscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }

    /// True when all model files are present in the model directory.
    pub fn models_present(&self) -> bool {
        [
            &self.models.detection_model,
            &self.models.recognition_model,
            &self.models.dictionary,
        ]
        .iter()
        .all(|name| self.model_path(name).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ActscanConfig =
            serde_json::from_str(r#"{"ingest": {"on_ocr_failure": "skip"}}"#).unwrap();

        assert_eq!(config.ingest.on_ocr_failure, OcrFailurePolicy::Skip);
        assert_eq!(config.models.detection_model, "det.onnx");
        assert_eq!(config.storage.images_dir, PathBuf::from("public").join("images"));
        assert!(config.storage.extensions.iter().any(|e| e == "png"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ActscanConfig::default();
        config.ocr.keep_unk = true;
        config.save(&path).unwrap();

        let loaded = ActscanConfig::from_file(&path).unwrap();
        assert!(loaded.ocr.keep_unk);
        assert_eq!(loaded.ingest.on_ocr_failure, OcrFailurePolicy::Record);
    }

    #[test]
    fn test_models_present() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ActscanConfig::default();
        config.models.model_dir = dir.path().to_path_buf();
        assert!(!config.models_present());

        for name in ["det.onnx", "latin_rec.onnx", "latin_dict.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        assert!(config.models_present());
    }
}
