//! Record assembly: one record per (image, OCR text) pair, in input order.

use tracing::debug;

use crate::models::activity::{ActivityRecord, UserAnalysis};

use super::{ActivityExtractor, RuleExtractor};

/// Assemble records with the built-in rules.
pub fn assemble_records<I, F, T>(pages: I) -> Vec<ActivityRecord>
where
    I: IntoIterator<Item = (F, T)>,
    F: AsRef<str>,
    T: AsRef<str>,
{
    RecordAssembler::new().assemble(pages)
}

/// Packages extractor output per source image.
#[derive(Debug, Clone, Default)]
pub struct RecordAssembler<E = RuleExtractor> {
    extractor: E,
}

impl RecordAssembler<RuleExtractor> {
    pub fn new() -> Self {
        Self {
            extractor: RuleExtractor::new(),
        }
    }
}

impl<E: ActivityExtractor> RecordAssembler<E> {
    /// Use a specific extractor.
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// One record per pair, same order, no merging or deduplication.
    pub fn assemble<I, F, T>(&self, pages: I) -> Vec<ActivityRecord>
    where
        I: IntoIterator<Item = (F, T)>,
        F: AsRef<str>,
        T: AsRef<str>,
    {
        let records: Vec<ActivityRecord> = pages
            .into_iter()
            .map(|(file, text)| self.extractor.extract_record(file.as_ref(), text.as_ref()))
            .collect();

        debug!("Assembled {} records", records.len());

        records
    }

    /// Assemble records for one user.
    pub fn assemble_user<I, F, T>(&self, pages: I) -> UserAnalysis
    where
        I: IntoIterator<Item = (F, T)>,
        F: AsRef<str>,
        T: AsRef<str>,
    {
        UserAnalysis {
            analysis: self.assemble(pages),
        }
    }
}
