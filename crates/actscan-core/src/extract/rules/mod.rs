//! Rule table for activity field extraction.
//!
//! Each field owns an ordered pattern list. The first rule in a field's list
//! that matches anywhere in the text supplies the value; later rules for the
//! same field are never consulted once one has matched.

pub mod patterns;

use regex::Regex;
use serde::Serialize;

use crate::models::activity::Field;

use patterns::*;

/// Which part of a regex match becomes the field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// The whole match.
    Whole,
    /// A numbered capture group.
    Group(usize),
}

/// One entry of the rule table.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Field this rule populates.
    pub field: Field,
    /// Short identifier, e.g. `distance_km`.
    pub name: String,
    /// Compiled pattern.
    pub pattern: Regex,
    /// Part of the match used as the value.
    pub capture: Capture,
}

impl FieldRule {
    pub fn new(field: Field, name: impl Into<String>, pattern: &Regex, capture: Capture) -> Self {
        Self {
            field,
            name: name.into(),
            pattern: pattern.clone(),
            capture,
        }
    }

    /// Value of the first match of this rule in `text`.
    ///
    /// Matches whose selected part is blank after trimming are skipped.
    pub fn find(&self, text: &str) -> Option<ExtractionMatch> {
        self.find_iter(text).next()
    }

    /// All non-blank matches of this rule in `text`, in text order.
    pub fn find_iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = ExtractionMatch> + 'a {
        self.pattern.captures_iter(text).filter_map(move |caps| {
            let m = match self.capture {
                Capture::Whole => caps.get(0),
                Capture::Group(n) => caps.get(n),
            }?;

            let raw = m.as_str();
            let value = raw.trim();
            if value.is_empty() {
                return None;
            }

            let start = m.start() + (raw.len() - raw.trim_start().len());
            Some(ExtractionMatch {
                field: self.field,
                value: value.to_string(),
                rule: self.name.clone(),
                position: (start, start + value.len()),
            })
        })
    }
}

/// Built-in rules in priority order.
pub fn default_rules() -> Vec<FieldRule> {
    use Capture::*;

    vec![
        FieldRule::new(Field::ActivityName, "activity_name", &ACTIVITY_NAME, Whole),
        FieldRule::new(Field::Date, "date_with_time", &DATE_WITH_TIME, Whole),
        FieldRule::new(Field::Date, "date", &DATE, Whole),
        FieldRule::new(Field::Location, "location_after_dot", &LOCATION_AFTER_DOT, Group(1)),
        FieldRule::new(Field::Location, "location_ward_city", &LOCATION_WARD_CITY, Group(1)),
        FieldRule::new(Field::Distance, "distance_mi", &DISTANCE_MI, Whole),
        FieldRule::new(Field::Distance, "distance_km", &DISTANCE_KM, Whole),
        FieldRule::new(Field::Pace, "pace_mi", &PACE_MI, Whole),
        FieldRule::new(Field::Pace, "pace_km", &PACE_KM, Whole),
        FieldRule::new(Field::Time, "time_min_sec", &TIME_MIN_SEC, Whole),
        FieldRule::new(Field::Time, "time_hms", &TIME_HMS, Whole),
        FieldRule::new(Field::Achievements, "achievements", &ACHIEVEMENTS, Group(1)),
    ]
}

/// A field value found in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMatch {
    /// Field the value belongs to.
    pub field: Field,
    /// Trimmed value, a substring of the source text.
    pub value: String,
    /// Name of the rule that produced it.
    pub rule: String,
    /// Byte range of `value` in the source text.
    pub position: (usize, usize),
}

/// Trait for single-field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// The ordered pattern list for one field.
#[derive(Debug, Clone)]
pub struct PatternList<'r> {
    field: Field,
    rules: Vec<&'r FieldRule>,
}

impl<'r> PatternList<'r> {
    /// Select the rules for `field` from a table, keeping table order.
    pub fn for_field(field: Field, table: &'r [FieldRule]) -> Self {
        Self {
            field,
            rules: table.iter().filter(|r| r.field == field).collect(),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn rules(&self) -> &[&'r FieldRule] {
        &self.rules
    }
}

impl FieldExtractor for PatternList<'_> {
    type Output = ExtractionMatch;

    /// First rule that matches wins, regardless of where in the text a
    /// lower-priority rule would have matched.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.rules.iter().find_map(|rule| rule.find(text))
    }

    /// Every match of every rule, grouped by rule priority.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.rules
            .iter()
            .flat_map(|rule| rule.find_iter(text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_field_has_rules() {
        let table = default_rules();
        for field in Field::ALL {
            assert!(
                !PatternList::for_field(field, &table).rules().is_empty(),
                "no rules for {field}"
            );
        }
    }

    #[test]
    fn test_primary_wins_regardless_of_position() {
        let table = default_rules();
        let distance = PatternList::for_field(Field::Distance, &table);

        let m = distance.extract("8 km warmup then 5 mi").unwrap();
        assert_eq!(m.value, "5 mi");
        assert_eq!(m.rule, "distance_mi");
    }

    #[test]
    fn test_fallback_used_when_primary_absent() {
        let table = default_rules();
        let pace = PatternList::for_field(Field::Pace, &table);

        let m = pace.extract("Pace 5:40 /km").unwrap();
        assert_eq!(m.value, "5:40 /km");
        assert_eq!(m.rule, "pace_km");
    }

    #[test]
    fn test_group_capture_position_is_trimmed() {
        let table = default_rules();
        let location = PatternList::for_field(Field::Location, &table);
        let text = "x · Mission Ward, Example City";

        let m = location.extract(text).unwrap();
        assert_eq!(m.value, "Mission Ward, Example City");
        assert_eq!(&text[m.position.0..m.position.1], m.value);
    }

    #[test]
    fn test_ward_city_fallback_is_trimmed() {
        let table = default_rules();
        let location = PatternList::for_field(Field::Location, &table);

        let m = location.extract("Start\n  Mission Ward, Example City\n").unwrap();
        assert_eq!(m.value, "Mission Ward, Example City");
        assert_eq!(m.rule, "location_ward_city");
    }

    #[test]
    fn test_extract_all_orders_by_priority() {
        let table = default_rules();
        let distance = PatternList::for_field(Field::Distance, &table);

        let all: Vec<String> = distance
            .extract_all("1 km, 2 mi, 3 km")
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(all, vec!["2 mi", "1 km", "3 km"]);
    }
}
