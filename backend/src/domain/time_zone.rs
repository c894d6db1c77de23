//! User time zone handling.
//!
//! Due-date filters operate on calendar days in the user's own zone, so the
//! stored IANA identifier must resolve to concrete UTC instants. The
//! [`TimeZone`] newtype validates identifiers against the bundled tz
//! database and converts calendar days into [`DayWindow`] bounds.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone as _, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`TimeZone::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeZoneError {
    /// The identifier was empty once trimmed.
    Empty,
    /// The identifier is not present in the IANA database.
    Unknown(String),
}

impl fmt::Display for TimeZoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "time zone must not be empty"),
            Self::Unknown(raw) => write!(f, "unknown IANA time zone: {raw}"),
        }
    }
}

impl std::error::Error for TimeZoneError {}

/// Validated IANA time zone identifier, e.g. `Europe/London`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeZone(Tz, String);

impl TimeZone {
    /// Validate and construct a [`TimeZone`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, TimeZoneError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// The UTC zone, used when an account has no stored preference.
    pub fn utc() -> Self {
        Self(Tz::UTC, "UTC".to_owned())
    }

    fn from_owned(id: String) -> Result<Self, TimeZoneError> {
        if id.trim().is_empty() {
            return Err(TimeZoneError::Empty);
        }

        let zone: Tz = id.parse().map_err(|_| TimeZoneError::Unknown(id.clone()))?;
        Ok(Self(zone, id))
    }

    /// Both bounds of `date` in this zone, expressed as UTC instants.
    pub fn day_window(&self, date: NaiveDate) -> DayWindow {
        DayWindow {
            start: self.start_of_day(date),
            end: self.end_of_day(date),
        }
    }

    /// First instant of `date` in this zone, expressed in UTC.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        resolve_local(self.0, NaiveDateTime::new(date, NaiveTime::MIN))
    }

    /// Last instant of `date` in this zone (millisecond precision) in UTC.
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let close = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        resolve_local(self.0, NaiveDateTime::new(date, close))
    }
}

/// Map a wall-clock time in `tz` onto the UTC timeline.
///
/// Ambiguous times (clocks rolled back) take the earlier instant; times
/// inside a spring-forward gap step into the next valid hour.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .map_or_else(
            || Utc.from_utc_datetime(&naive),
            |local| local.with_timezone(&Utc),
        )
}

impl AsRef<str> for TimeZone {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<TimeZone> for String {
    fn from(value: TimeZone) -> Self {
        let TimeZone(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for TimeZone {
    type Error = TimeZoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// UTC bounds of one calendar day in a user's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DayWindow {
    /// Inclusive lower bound.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Inclusive upper bound.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}
