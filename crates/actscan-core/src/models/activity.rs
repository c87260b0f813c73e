//! Activity record models.
//!
//! Every field value is a verbatim, trimmed substring of the OCR text it was
//! extracted from. Nothing here parses dates, converts units or turns the
//! achievement count into a number.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One extractable field of an activity summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ActivityName,
    Date,
    Location,
    Distance,
    Pace,
    Time,
    Achievements,
}

impl Field {
    /// All fields in record order.
    pub const ALL: [Field; 7] = [
        Field::ActivityName,
        Field::Date,
        Field::Location,
        Field::Distance,
        Field::Pace,
        Field::Time,
        Field::Achievements,
    ];

    /// JSON key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::ActivityName => "activityName",
            Field::Date => "date",
            Field::Location => "location",
            Field::Distance => "distance",
            Field::Pace => "pace",
            Field::Time => "time",
            Field::Achievements => "achievements",
        }
    }

    /// Column heading used by tabular output.
    pub fn label(&self) -> &'static str {
        match self {
            Field::ActivityName => "Activity",
            Field::Date => "Date",
            Field::Location => "Location",
            Field::Distance => "Distance",
            Field::Pace => "Pace",
            Field::Time => "Moving Time",
            Field::Achievements => "Achievements",
        }
    }

    /// Look a field up by its JSON key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The seven optional fields extracted from one OCR text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    activity_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    distance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    achievements: Option<String>,
}

impl ActivityFields {
    /// Start building a set of fields.
    pub fn builder() -> ActivityFieldsBuilder {
        ActivityFieldsBuilder::default()
    }

    /// Value of a field, if it was extracted.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn activity_name(&self) -> Option<&str> {
        self.get(Field::ActivityName)
    }

    pub fn date(&self) -> Option<&str> {
        self.get(Field::Date)
    }

    pub fn location(&self) -> Option<&str> {
        self.get(Field::Location)
    }

    pub fn distance(&self) -> Option<&str> {
        self.get(Field::Distance)
    }

    pub fn pace(&self) -> Option<&str> {
        self.get(Field::Pace)
    }

    pub fn time(&self) -> Option<&str> {
        self.get(Field::Time)
    }

    pub fn achievements(&self) -> Option<&str> {
        self.get(Field::Achievements)
    }

    /// Fields that were extracted, in record order.
    pub fn present(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }

    /// Fields that were not found, in record order.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::ActivityName => &self.activity_name,
            Field::Date => &self.date,
            Field::Location => &self.location,
            Field::Distance => &self.distance,
            Field::Pace => &self.pace,
            Field::Time => &self.time,
            Field::Achievements => &self.achievements,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::ActivityName => &mut self.activity_name,
            Field::Date => &mut self.date,
            Field::Location => &mut self.location,
            Field::Distance => &mut self.distance,
            Field::Pace => &mut self.pace,
            Field::Time => &mut self.time,
            Field::Achievements => &mut self.achievements,
        }
    }
}

/// Builder for [`ActivityFields`].
///
/// Values are trimmed; a value that is empty after trimming leaves the field
/// unset.
#[derive(Debug, Default)]
pub struct ActivityFieldsBuilder {
    fields: ActivityFields,
}

impl ActivityFieldsBuilder {
    /// Set a field.
    pub fn with(mut self, field: Field, value: impl AsRef<str>) -> Self {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            *self.fields.slot_mut(field) = Some(value.to_string());
        }
        self
    }

    /// Set a field when a value is present.
    pub fn with_opt<S: AsRef<str>>(self, field: Field, value: Option<S>) -> Self {
        match value {
            Some(value) => self.with(field, value),
            None => self,
        }
    }

    pub fn build(self) -> ActivityFields {
        self.fields
    }
}

/// Extraction output for one image: the fields plus the source identifier
/// and the verbatim OCR text they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    file: String,

    #[serde(flatten)]
    fields: ActivityFields,

    raw_text: String,
}

impl ActivityRecord {
    pub fn new(file: impl Into<String>, raw_text: impl Into<String>, fields: ActivityFields) -> Self {
        Self {
            file: file.into(),
            fields,
            raw_text: raw_text.into(),
        }
    }

    /// Source image identifier.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Verbatim OCR output.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn fields(&self) -> &ActivityFields {
        &self.fields
    }

    /// Value of a field, if it was extracted.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(field)
    }
}

/// Records produced for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnalysis {
    pub analysis: Vec<ActivityRecord>,
}

/// Envelope returned for a processing request, keyed by user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub message: String,
    pub data: BTreeMap<String, UserAnalysis>,
}

impl AnalysisResponse {
    /// Successful response for a single user.
    pub fn for_user(user_id: impl Into<String>, records: Vec<ActivityRecord>) -> Self {
        let message = if records.is_empty() {
            "No images to process".to_string()
        } else {
            format!("Processed {} images successfully", records.len())
        };

        let mut data = BTreeMap::new();
        data.insert(user_id.into(), UserAnalysis { analysis: records });

        Self {
            success: true,
            message,
            data,
        }
    }

    /// Failed response with no data.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_trims_and_skips_blank() {
        let fields = ActivityFields::builder()
            .with(Field::Distance, "  5.20 mi ")
            .with(Field::Pace, "   ")
            .with_opt(Field::Time, None::<&str>)
            .build();

        assert_eq!(fields.distance(), Some("5.20 mi"));
        assert_eq!(fields.pace(), None);
        assert_eq!(fields.time(), None);
        assert_eq!(fields.missing().len(), 6);
    }

    #[test]
    fn test_record_serializes_camel_case_without_absent_fields() {
        let fields = ActivityFields::builder()
            .with(Field::ActivityName, "Evening Run")
            .with(Field::Achievements, "3")
            .build();
        let record = ActivityRecord::new("run.png", "Evening Run\nAchievements 3", fields);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "file": "run.png",
                "activityName": "Evening Run",
                "achievements": "3",
                "rawText": "Evening Run\nAchievements 3",
            })
        );
    }

    #[test]
    fn test_record_deserializes_back() {
        let json = r#"{"file":"a.png","distance":"3.1 km","rawText":"3.1 km"}"#;
        let record: ActivityRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.file(), "a.png");
        assert_eq!(record.get(Field::Distance), Some("3.1 km"));
        assert!(record.get(Field::Pace).is_none());
    }

    #[test]
    fn test_field_keys() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("elevation"), None);
    }

    #[test]
    fn test_response_envelope_shape() {
        let response = AnalysisResponse::for_user("alice", Vec::new());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "No images to process");
        assert_eq!(json["data"]["alice"]["analysis"], serde_json::json!([]));
    }
}
