//! Regex patterns for activity summary extraction.
//!
//! All patterns are case-insensitive. Patterns that return a capture group
//! rather than the whole match say so next to their definition.

use lazy_static::lazy_static;
use regex::Regex;

/// English month names and their common abbreviations.
const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sept?(?:ember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

lazy_static! {
    // Activity title: a stock phrase, or any words on one line ending in Run/Ride/Walk
    pub static ref ACTIVITY_NAME: Regex = Regex::new(
        r"(?i)\b(?:Evening Run|Morning Run|Afternoon Run|[\p{L}\d']+(?:[ \t]+[\p{L}\d']+)*[ \t]+(?:Run|Ride|Walk))\b"
    ).unwrap();

    // "October 3, 2023 at 6:15 PM"
    pub static ref DATE_WITH_TIME: Regex = Regex::new(&format!(
        r"(?i)\b{MONTH}\.?\s+\d{{1,2}},?\s+\d{{4}}\s+at\s+\d{{1,2}}:\d{{2}}\s*(?:AM|PM)\b"
    )).unwrap();

    // "October 3, 2023"
    pub static ref DATE: Regex = Regex::new(&format!(
        r"(?i)\b{MONTH}\.?\s+\d{{1,2}},?\s+\d{{4}}\b"
    )).unwrap();

    // Group 1: rest of the line after a middle dot
    pub static ref LOCATION_AFTER_DOT: Regex = Regex::new(
        r"(?i)\x{00B7}[ \t]*([^\n\x{00B7}]*[^\s\x{00B7}])"
    ).unwrap();

    // Group 1: "<words>Ward, <words>City" on one line
    pub static ref LOCATION_WARD_CITY: Regex = Regex::new(
        r"(?i)([\p{L}'\- \t]*Ward,[\p{L}'\- \t]*City)\b"
    ).unwrap();

    // "5.20 mi"
    pub static ref DISTANCE_MI: Regex = Regex::new(
        r"(?i)\b\d+(?:[.,]\d+)?[ \t]*mi\b"
    ).unwrap();

    // "3.1 km"
    pub static ref DISTANCE_KM: Regex = Regex::new(
        r"(?i)\b\d+(?:[.,]\d+)?[ \t]*km\b"
    ).unwrap();

    // "9:15 /mi"
    pub static ref PACE_MI: Regex = Regex::new(
        r"(?i)\b\d{1,2}:\d{2}[ \t]*/[ \t]*mi\b"
    ).unwrap();

    // "5:40 /km"
    pub static ref PACE_KM: Regex = Regex::new(
        r"(?i)\b\d{1,2}:\d{2}[ \t]*/[ \t]*km\b"
    ).unwrap();

    // "45m 12s"
    pub static ref TIME_MIN_SEC: Regex = Regex::new(
        r"(?i)\b\d+m[ \t]*\d+s\b"
    ).unwrap();

    // "1:02:33"
    pub static ref TIME_HMS: Regex = Regex::new(
        r"\b\d{1,2}:\d{2}:\d{2}\b"
    ).unwrap();

    // Group 1: digit run after the label
    pub static ref ACHIEVEMENTS: Regex = Regex::new(
        r"(?i)\bAchievements[\s:]*(\d+)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_name_generic() {
        let m = ACTIVITY_NAME.find("Lunch Ride\n12.4 mi").unwrap();
        assert_eq!(m.as_str(), "Lunch Ride");

        assert!(ACTIVITY_NAME.find("Running shoes").is_none());
    }

    #[test]
    fn test_activity_name_stays_on_one_line() {
        let m = ACTIVITY_NAME.find("Strava\nMorning Walk").unwrap();
        assert_eq!(m.as_str(), "Morning Walk");
    }

    #[test]
    fn test_date_abbreviated_month() {
        let m = DATE.find("Sep 9 2024").unwrap();
        assert_eq!(m.as_str(), "Sep 9 2024");

        let m = DATE.find("Sept. 9, 2024").unwrap();
        assert_eq!(m.as_str(), "Sept. 9, 2024");
    }

    #[test]
    fn test_date_does_not_match_word_prefix() {
        assert!(DATE.find("Marathon 12, 2023").is_none());
    }

    #[test]
    fn test_location_after_dot_stops_at_line_end() {
        let caps = LOCATION_AFTER_DOT
            .captures("June 1, 2024 · Riverside, Springfield  \n5 mi")
            .unwrap();
        assert_eq!(&caps[1], "Riverside, Springfield");
    }

    #[test]
    fn test_distance_ignores_pace_and_minutes() {
        assert!(DISTANCE_MI.find("9:15 /mi").is_none());
        assert!(DISTANCE_MI.find("30 min").is_none());
        assert_eq!(DISTANCE_MI.find("5.20 mi").unwrap().as_str(), "5.20 mi");
    }

    #[test]
    fn test_time_patterns() {
        assert_eq!(TIME_MIN_SEC.find("45m 12s").unwrap().as_str(), "45m 12s");
        assert_eq!(TIME_MIN_SEC.find("45m12s").unwrap().as_str(), "45m12s");
        assert_eq!(TIME_HMS.find("Time 1:02:33").unwrap().as_str(), "1:02:33");
        assert!(TIME_HMS.find("6:15 PM").is_none());
    }

    #[test]
    fn test_achievements_capture() {
        let caps = ACHIEVEMENTS.captures("achievements: 12").unwrap();
        assert_eq!(&caps[1], "12");
    }
}
