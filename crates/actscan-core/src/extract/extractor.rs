//! Rule-table driven activity extractor.

use std::time::Instant;

use lazy_static::lazy_static;
use serde::Serialize;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::activity::{ActivityFields, Field};

use super::rules::{default_rules, ExtractionMatch, FieldExtractor, FieldRule, PatternList};
use super::ActivityExtractor;

lazy_static! {
    static ref DEFAULT_EXTRACTOR: RuleExtractor = RuleExtractor::new();
}

/// Extract activity fields with the built-in rules.
pub fn extract(text: &str) -> ActivityFields {
    DEFAULT_EXTRACTOR.extract(text)
}

/// Detailed extraction output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Extracted fields.
    pub fields: ActivityFields,
    /// The winning match for every field that was found.
    pub matches: Vec<ExtractionMatch>,
    /// Fields with no match.
    pub missing: Vec<Field>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Extractor evaluating an ordered table of field rules.
#[derive(Debug, Clone)]
pub struct RuleExtractor {
    rules: Vec<FieldRule>,
}

impl RuleExtractor {
    /// Create an extractor with the built-in rule table.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Create an extractor with a custom rule table.
    pub fn with_rules(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Append a rule; it becomes the lowest-priority fallback for its field.
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The full rule table in priority order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// The pattern list for one field.
    pub fn pattern_list(&self, field: Field) -> PatternList<'_> {
        PatternList::for_field(field, &self.rules)
    }

    /// Winning match for a single field.
    pub fn find(&self, field: Field, text: &str) -> Option<ExtractionMatch> {
        self.pattern_list(field).extract(text)
    }

    /// Extract with per-field match details and timing.
    pub fn extract_detailed(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        let matches: Vec<ExtractionMatch> = Field::ALL
            .into_iter()
            .filter_map(|field| self.find(field, text))
            .collect();

        let fields = matches
            .iter()
            .fold(ActivityFields::builder(), |builder, m| builder.with(m.field, &m.value))
            .build();
        let missing = fields.missing();

        debug!(
            "Extracted {} of {} fields from {} characters",
            matches.len(),
            Field::ALL.len(),
            text.len()
        );

        ExtractionResult {
            fields,
            matches,
            missing,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Extract from raw bytes, which must be UTF-8 text.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<ActivityFields, ExtractionError> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            ExtractionError::InvalidInput(format!("OCR text is not valid UTF-8: {}", e))
        })?;
        Ok(self.extract(text))
    }
}

impl Default for RuleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityExtractor for RuleExtractor {
    fn extract(&self, text: &str) -> ActivityFields {
        Field::ALL
            .into_iter()
            .fold(ActivityFields::builder(), |builder, field| {
                builder.with_opt(field, self.find(field, text).map(|m| m.value))
            })
            .build()
    }
}
