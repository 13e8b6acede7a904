//! Shared scheduling fields and their validation.
//!
//! The form keeps start time, frequency and unit as raw strings while the user
//! types. `ScheduleInput::validate` turns them into a typed [`Schedule`] or
//! reports every failing field at once.

use std::fmt;
use std::num::NonZeroU32;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::model::mapping::{FrequencyUnit, SyncMapping};

/// Date format used to pre-fill the start date from a seed mapping.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleField {
    StartTime,
    Frequency,
    FrequencyUnit,
}

impl fmt::Display for ScheduleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleField::StartTime => f.write_str("startTime"),
            ScheduleField::Frequency => f.write_str("frequency"),
            ScheduleField::FrequencyUnit => f.write_str("freqUnit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Missing(ScheduleField),
    #[error("{field} is invalid: {reason}")]
    Invalid { field: ScheduleField, reason: String },
}

impl FieldError {
    pub fn field(&self) -> ScheduleField {
        match self {
            FieldError::Missing(field) => *field,
            FieldError::Invalid { field, .. } => *field,
        }
    }
}

/// Every field-level problem found in one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schedule: {}", join_errors(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn for_field(&self, field: ScheduleField) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field() == field)
    }
}

/// Validated scheduling fields, attached uniformly to every mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start_time: NaiveDateTime,
    pub frequency: NonZeroU32,
    pub frequency_unit: FrequencyUnit,
}

/// Raw form values for the shared scheduling fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleInput {
    pub start_time: Option<String>,
    pub frequency: Option<String>,
    pub frequency_unit: Option<String>,
}

impl ScheduleInput {
    /// Pre-fills the fields from the first seed mapping, if any.
    pub fn from_seed(seed: &[SyncMapping]) -> Self {
        match seed.first() {
            Some(first) => ScheduleInput {
                start_time: Some(first.start_time.format(DATE_FORMAT).to_string()),
                frequency: Some(first.frequency.to_string()),
                frequency_unit: Some(first.frequency_unit.as_str().to_string()),
            },
            None => ScheduleInput::default(),
        }
    }

    pub fn validate(&self) -> Result<Schedule, ValidationErrors> {
        let start_time = present(&self.start_time, ScheduleField::StartTime).and_then(parse_start_time);
        let frequency = present(&self.frequency, ScheduleField::Frequency).and_then(parse_frequency);
        let frequency_unit =
            present(&self.frequency_unit, ScheduleField::FrequencyUnit).and_then(parse_unit);

        match (start_time, frequency, frequency_unit) {
            (Ok(start_time), Ok(frequency), Ok(frequency_unit)) => Ok(Schedule {
                start_time,
                frequency,
                frequency_unit,
            }),
            (start_time, frequency, frequency_unit) => Err(ValidationErrors(
                [start_time.err(), frequency.err(), frequency_unit.err()]
                    .into_iter()
                    .flatten()
                    .collect(),
            )),
        }
    }
}

fn present(value: &Option<String>, field: ScheduleField) -> Result<&str, FieldError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FieldError::Missing(field)),
    }
}

fn parse_start_time(raw: &str) -> Result<NaiveDateTime, FieldError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| FieldError::Invalid {
            field: ScheduleField::StartTime,
            reason: format!("`{}` is not a date (expected YYYY-MM-DD)", raw),
        })
}

fn parse_frequency(raw: &str) -> Result<NonZeroU32, FieldError> {
    Some(raw)
        .filter(|r| r.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|r| r.parse::<u32>().ok())
        .and_then(NonZeroU32::new)
        .ok_or_else(|| FieldError::Invalid {
            field: ScheduleField::Frequency,
            reason: format!("`{}` is not a positive whole number", raw),
        })
}

fn parse_unit(raw: &str) -> Result<FrequencyUnit, FieldError> {
    raw.parse().map_err(|_| FieldError::Invalid {
        field: ScheduleField::FrequencyUnit,
        reason: format!("`{}` is not one of day, week, month", raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(start: Option<&str>, freq: Option<&str>, unit: Option<&str>) -> ScheduleInput {
        ScheduleInput {
            start_time: start.map(str::to_string),
            frequency: freq.map(str::to_string),
            frequency_unit: unit.map(str::to_string),
        }
    }

    #[test]
    fn validates_complete_input() {
        let schedule = input(Some("2024-03-01"), Some("3"), Some("week"))
            .validate()
            .unwrap();
        assert_eq!(schedule.start_time.to_string(), "2024-03-01 00:00:00");
        assert_eq!(schedule.frequency.get(), 3);
        assert_eq!(schedule.frequency_unit, FrequencyUnit::Week);
    }

    #[test]
    fn accepts_datetime_local_values() {
        let schedule = input(Some("2024-03-01T08:30"), Some("1"), Some("day"))
            .validate()
            .unwrap();
        assert_eq!(schedule.start_time.to_string(), "2024-03-01 08:30:00");
    }

    #[test]
    fn missing_frequency_is_reported_per_field() {
        let errors = input(Some("2024-03-01"), None, Some("day"))
            .validate()
            .unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(
            errors.for_field(ScheduleField::Frequency),
            Some(&FieldError::Missing(ScheduleField::Frequency))
        );
        assert!(errors.for_field(ScheduleField::StartTime).is_none());
    }

    #[test]
    fn collects_every_failing_field() {
        let errors = input(Some("yesterday"), Some("0"), Some("  ")).validate().unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(FieldError::field).collect();
        assert_eq!(
            fields,
            vec![
                ScheduleField::StartTime,
                ScheduleField::Frequency,
                ScheduleField::FrequencyUnit
            ]
        );
        assert!(matches!(
            errors.for_field(ScheduleField::FrequencyUnit),
            Some(FieldError::Missing(_))
        ));
        assert!(errors.to_string().starts_with("invalid schedule: startTime is invalid"));
    }

    #[test]
    fn rejects_non_integer_frequency() {
        for raw in ["-2", "+3", "0", "1.5", "three", "99999999999"] {
            let errors = input(Some("2024-01-01"), Some(raw), Some("day"))
                .validate()
                .unwrap_err();
            assert!(matches!(
                errors.for_field(ScheduleField::Frequency),
                Some(FieldError::Invalid { .. })
            ));
        }
    }

    #[test]
    fn empty_seed_leaves_fields_blank() {
        assert_eq!(ScheduleInput::from_seed(&[]), ScheduleInput::default());
    }
}
