//! Ingestion pipeline: resolve a user's images, OCR each one, and assemble
//! activity records in enumeration order.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::ActscanError;
use crate::extract::RecordAssembler;
use crate::models::activity::{ActivityRecord, UserAnalysis};
use crate::models::config::OcrFailurePolicy;
use crate::ocr::{OcrResult, TextRecognizer};
use crate::store::ImageStore;

/// OCR output for one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrPage {
    /// Image identifier (file name).
    pub file: String,
    /// Recognized text, or the failure description.
    pub text: String,
    /// Mean recognition confidence; `None` on failure or when nothing was read.
    pub confidence: Option<f32>,
    /// True when OCR failed and `text` holds the error.
    pub failed: bool,
}

/// Drives OCR over a set of images and feeds the text to the assembler.
pub struct Ingestor<R: TextRecognizer> {
    recognizer: R,
    policy: OcrFailurePolicy,
    assembler: RecordAssembler,
}

impl<R: TextRecognizer> Ingestor<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            policy: OcrFailurePolicy::default(),
            assembler: RecordAssembler::new(),
        }
    }

    /// Set what happens when OCR fails on an image.
    pub fn with_failure_policy(mut self, policy: OcrFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Decode an image and run OCR on it.
    pub fn ocr_image(&self, path: &Path) -> Result<OcrResult, ActscanError> {
        let image = image::open(path)?;
        Ok(self.recognizer.recognize(&image)?)
    }

    /// OCR one image, applying the failure policy.
    ///
    /// Returns `None` only when the image failed and the policy is `Skip`.
    pub fn ocr_page(&self, path: &Path) -> Option<OcrPage> {
        let file = file_id(path);

        match self.ocr_image(path) {
            Ok(result) => Some(OcrPage {
                confidence: result.mean_confidence(),
                text: result.text,
                file,
                failed: false,
            }),
            Err(e) => {
                warn!("OCR failed for {}: {}", path.display(), e);
                match self.policy {
                    OcrFailurePolicy::Skip => None,
                    OcrFailurePolicy::Record => Some(OcrPage {
                        file,
                        text: format!("OCR failed: {}", e),
                        confidence: None,
                        failed: true,
                    }),
                }
            }
        }
    }

    /// OCR every image, in the given order.
    pub fn ocr_pages<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<OcrPage> {
        paths
            .iter()
            .filter_map(|p| self.ocr_page(p.as_ref()))
            .collect()
    }

    /// Turn OCR pages into records.
    pub fn assemble(&self, pages: &[OcrPage]) -> Vec<ActivityRecord> {
        self.assembler
            .assemble(pages.iter().map(|p| (p.file.as_str(), p.text.as_str())))
    }

    /// OCR and extract a list of image files.
    pub fn process_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<ActivityRecord> {
        self.assemble(&self.ocr_pages(paths))
    }

    /// OCR and extract every image stored for a user.
    pub fn process_user(&self, store: &ImageStore, user_id: &str) -> Result<UserAnalysis, ActscanError> {
        let images = store.list_images(user_id)?;
        info!("Processing {} images for user {}", images.len(), user_id.trim());

        Ok(UserAnalysis {
            analysis: self.process_paths(&images),
        })
    }
}

/// Image identifier used in records: the file name.
pub fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
