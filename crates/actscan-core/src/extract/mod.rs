//! Activity field extraction from OCR text.

mod assembler;
mod extractor;
pub mod rules;

pub use assembler::{assemble_records, RecordAssembler};
pub use extractor::{extract, ExtractionResult, RuleExtractor};

use crate::models::activity::{ActivityFields, ActivityRecord};

/// Trait for activity field extractors.
///
/// Implementations must be total over text input: every `&str`, including
/// the empty string, yields a record with zero or more fields set.
pub trait ActivityExtractor {
    /// Extract activity fields from plain text.
    fn extract(&self, text: &str) -> ActivityFields;

    /// Extract a full record for one source image.
    fn extract_record(&self, file: &str, text: &str) -> ActivityRecord {
        ActivityRecord::new(file, text, self.extract(text))
    }
}
