//! Data-driven validation for form submissions.
//!
//! Each operation declares its constraints as a static table of
//! [`FieldRule`]s; one generic evaluator walks the table. Rules are checked
//! in declaration order and, per field, the first failed check wins
//! (presence, then kind, then length). Failures across fields aggregate so
//! a form can surface every problem at once.
//!
//! Evaluation is pure: the same submission against the same schema always
//! yields the same outcome.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone as _, Utc};
use uuid::Uuid;

use crate::domain::input::SubmissionInput;
use crate::domain::outcome::FieldError;
use crate::domain::time_zone::TimeZone;

/// Upper bound shared by the product's free-text fields.
pub const TEXT_MAX: usize = 500;

/// Whether a field must be submitted, and what to say when it is not.
///
/// A required field that is submitted blank fails with the same message as
/// one that is missing; the user fixes both the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The field must be present and non-blank.
    Required {
        /// Message for a missing or blank value.
        missing: &'static str,
    },
    /// The field may be absent (leave unchanged) or blank (clear).
    Optional,
}

/// Constraint kind applied to a submitted value, with the message for a
/// value that does not satisfy it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text up to `max` characters.
    Text {
        /// Maximum length in characters.
        max: usize,
        /// Message for an over-long value.
        too_long: &'static str,
    },
    /// Boolean flag (`true`/`false`, `on`/`off`, `1`/`0`).
    Flag {
        /// Message for an unparseable value.
        invalid: &'static str,
    },
    /// Instant, RFC 3339 or bare `YYYY-MM-DD` (taken as UTC midnight).
    Date {
        /// Message for an unparseable value.
        invalid: &'static str,
    },
    /// Entity identifier in canonical UUID form.
    Id {
        /// Message for an unparseable value.
        invalid: &'static str,
    },
    /// IANA time zone identifier.
    Zone {
        /// Message for an unknown identifier.
        invalid: &'static str,
    },
}

impl FieldKind {
    fn parse(self, raw: &str) -> Result<FieldValue, &'static str> {
        match self {
            Self::Text { max, too_long } => {
                if raw.chars().count() > max {
                    return Err(too_long);
                }
                Ok(FieldValue::Text(raw.to_owned()))
            }
            Self::Flag { invalid } => match raw.to_ascii_lowercase().as_str() {
                "true" | "on" | "1" => Ok(FieldValue::Flag(true)),
                "false" | "off" | "0" => Ok(FieldValue::Flag(false)),
                _ => Err(invalid),
            },
            Self::Date { invalid } => parse_instant(raw).ok_or(invalid),
            Self::Id { invalid } => Uuid::parse_str(raw)
                .map(FieldValue::Identifier)
                .map_err(|_| invalid),
            Self::Zone { invalid } => TimeZone::new(raw)
                .map(FieldValue::Zone)
                .map_err(|_| invalid),
        }
    }
}

fn parse_instant(raw: &str) -> Option<FieldValue> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(FieldValue::Instant(instant.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = Utc.from_utc_datetime(&NaiveDateTime::new(date, NaiveTime::MIN));
    Some(FieldValue::Instant(midnight))
}

/// One field's constraints within an operation schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Submitted field name, also used as the error path.
    pub name: &'static str,
    /// Presence requirement.
    pub presence: Presence,
    /// Value constraint.
    pub kind: FieldKind,
}

/// Typed value of one accepted field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Accepted free text.
    Text(String),
    /// Parsed boolean flag.
    Flag(bool),
    /// Parsed UTC instant.
    Instant(DateTime<Utc>),
    /// Parsed entity identifier.
    Identifier(Uuid),
    /// Validated time zone.
    Zone(TimeZone),
    /// Submitted blank: the stored value should be cleared.
    Cleared,
}

/// Ordered constraint table for one operation.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Operation name used in logs.
    pub operation: &'static str,
    /// Field rules in declaration order.
    pub rules: &'static [FieldRule],
}

impl Schema {
    /// Evaluate a submission against this schema.
    ///
    /// Returns every field failure in declaration order, or the typed values
    /// of all accepted fields.
    pub fn evaluate(&self, input: &SubmissionInput) -> Result<ValidatedInput, Vec<FieldError>> {
        let mut values = BTreeMap::new();
        let mut errors = Vec::new();

        for rule in self.rules {
            match input.get(rule.name) {
                None => {
                    if let Presence::Required { missing } = rule.presence {
                        errors.push(FieldError::new(rule.name, missing));
                    }
                }
                Some(raw) if raw.trim().is_empty() => match rule.presence {
                    Presence::Required { missing } => {
                        errors.push(FieldError::new(rule.name, missing));
                    }
                    Presence::Optional => {
                        values.insert(rule.name, FieldValue::Cleared);
                    }
                },
                Some(raw) => match rule.kind.parse(raw) {
                    Ok(value) => {
                        values.insert(rule.name, value);
                    }
                    Err(message) => errors.push(FieldError::new(rule.name, message)),
                },
            }
        }

        if errors.is_empty() {
            Ok(ValidatedInput { values })
        } else {
            Err(errors)
        }
    }
}

/// Typed field values produced by a successful [`Schema::evaluate`].
///
/// Accessors return `None` both for fields the schema does not know and for
/// optional fields the submission omitted; [`ValidatedInput::cleared`]
/// distinguishes a blank submission from an absent one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedInput {
    values: BTreeMap<&'static str, FieldValue>,
}

impl ValidatedInput {
    /// Accepted text value of `field`.
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.values.get(field) {
            Some(FieldValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Accepted flag value of `field`.
    pub fn flag(&self, field: &str) -> Option<bool> {
        match self.values.get(field) {
            Some(FieldValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }

    /// Accepted instant value of `field`.
    pub fn instant(&self, field: &str) -> Option<DateTime<Utc>> {
        match self.values.get(field) {
            Some(FieldValue::Instant(value)) => Some(*value),
            _ => None,
        }
    }

    /// Accepted identifier value of `field`.
    pub fn identifier(&self, field: &str) -> Option<Uuid> {
        match self.values.get(field) {
            Some(FieldValue::Identifier(value)) => Some(*value),
            _ => None,
        }
    }

    /// Accepted time zone value of `field`.
    pub fn zone(&self, field: &str) -> Option<TimeZone> {
        match self.values.get(field) {
            Some(FieldValue::Zone(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Whether `field` was submitted blank, asking for the stored value to
    /// be cleared.
    pub fn cleared(&self, field: &str) -> bool {
        matches!(self.values.get(field), Some(FieldValue::Cleared))
    }

    /// Whether `field` was submitted at all.
    pub fn provided(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }
}
