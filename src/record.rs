use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of the `date` column, e.g. `08.01.2026 14:05`
pub const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Position of a record in its store's append order, starting at 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One completed session as it is persisted.
///
/// Field order is the column order on disk. New columns go at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(with = "date_format")]
    pub date: NaiveDateTime,
    pub score: u32,
    pub name: String,
    pub misses: u32,
    pub accuracy: f64,
}

impl ScoreRecord {
    /// Builds a record, truncating `date` to the minute the store keeps.
    pub fn new(date: NaiveDateTime, score: u32, name: impl Into<String>, misses: u32) -> Self {
        let date = date
            .with_second(0)
            .and_then(|d| d.with_nanosecond(0))
            .unwrap_or(date);
        Self {
            date,
            score,
            name: name.into(),
            misses,
            accuracy: accuracy(score, misses),
        }
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Hits over attempts, `0.0` when nothing was clicked
pub fn accuracy(score: u32, misses: u32) -> f64 {
    let attempts = score as u64 + misses as u64;
    if attempts == 0 {
        0.0
    } else {
        score as f64 / attempts as f64
    }
}

mod date_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(raw.trim(), DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn accuracy_is_zero_without_attempts() {
        assert_eq!(accuracy(0, 0), 0.0);
    }

    #[test]
    fn accuracy_stays_in_unit_range() {
        assert_eq!(accuracy(3, 1), 0.75);
        assert_eq!(accuracy(5, 0), 1.0);
        assert_eq!(accuracy(0, 4), 0.0);
        assert!((0.0..=1.0).contains(&accuracy(u32::MAX, u32::MAX)));
    }

    #[test]
    fn new_record_truncates_to_minute() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 8)
            .unwrap()
            .and_hms_milli_opt(9, 30, 45, 120)
            .unwrap();
        let record = ScoreRecord::new(date, 12, "", 4);
        assert_eq!(record.date_string(), "08.01.2026 09:30");
        assert_eq!(record.date.second(), 0);
        assert_eq!(record.accuracy, 0.75);
    }

    #[test]
    fn record_id_display() {
        assert_eq!(RecordId(3).to_string(), "#3");
    }
}
