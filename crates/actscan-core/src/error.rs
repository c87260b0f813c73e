//! Error types for the actscan-core library.

use thiserror::Error;

/// Main error type for the actscan library.
#[derive(Error, Debug)]
pub enum ActscanError {
    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to activity field extraction.
///
/// Extraction over text is total, so the only failure is being handed
/// something that is not text at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Input was not valid text.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text detection or recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to the per-user image store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// User id is empty or would escape the store root.
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    /// No such user directory.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Source file for an import is missing or not a file.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// Underlying filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the actscan library.
pub type Result<T> = std::result::Result<T, ActscanError>;
