//! Core library for fitness activity screenshot processing.
//!
//! This crate provides:
//! - Rule-based extraction of activity fields (name, date, location,
//!   distance, pace, time, achievements) from OCR text
//! - Record assembly per source image
//! - A per-user image store
//! - An OCR adapter over `pure-onnx-ocr` and the ingestion pipeline that
//!   connects store, OCR and extraction

pub mod error;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod ocr;
pub mod store;

pub use error::{ActscanError, ExtractionError, OcrError, Result, StoreError};
pub use extract::{
    assemble_records, extract, ActivityExtractor, ExtractionResult, RecordAssembler, RuleExtractor,
};
pub use ingest::{Ingestor, OcrPage};
pub use models::activity::{ActivityFields, ActivityRecord, AnalysisResponse, Field, UserAnalysis};
pub use ocr::{OcrResult, TextBox, TextRecognizer};
pub use store::ImageStore;

#[cfg(feature = "native")]
pub use ocr::{create_engine_from_dir, PureOcrEngine};
