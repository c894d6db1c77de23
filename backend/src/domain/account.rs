//! Account aggregate, profile view, and settings schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::UserId;
use crate::domain::principal::Principal;
use crate::domain::schema::{FieldKind, FieldRule, Presence, Schema};
use crate::domain::time_zone::TimeZone;

/// Form field names shared by the account schemas and their handlers.
pub mod fields {
    /// IANA time zone identifier.
    pub const TIME_ZONE: &str = "timeZone";
}

/// Message for a missing, blank, or unknown time zone.
pub const TIME_ZONE_INVALID: &str = "Invalid time zone.";

/// Constraints for updating the account time zone.
pub static UPDATE_TIME_ZONE: Schema = Schema {
    operation: "update_time_zone",
    rules: &[FieldRule {
        name: fields::TIME_ZONE,
        presence: Presence::Required {
            missing: TIME_ZONE_INVALID,
        },
        kind: FieldKind::Zone {
            invalid: TIME_ZONE_INVALID,
        },
    }],
};

/// A locally persisted user account.
///
/// Identity lives with the provider; this row carries the provider-issued
/// id plus the fields the product needs at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Provider-issued stable identifier.
    pub id: UserId,
    /// Email address on record.
    pub email: String,
    /// Name shown in the account header.
    pub display_name: String,
    /// Preferred zone for calendar-day due filters.
    pub time_zone: TimeZone,
    /// First sign-in timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// The principal this account acts as.
    pub fn principal(&self) -> Principal {
        Principal::new(
            self.id.clone(),
            self.email.clone(),
            self.display_name.clone(),
            self.time_zone.clone(),
        )
    }
}

/// Account details exposed to the client.
///
/// The user id deliberately stays server-side; nothing in the client needs
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Email address on record.
    pub email: String,
    /// Name shown in the account header.
    pub display_name: String,
    /// Preferred zone for calendar-day due filters.
    #[schema(value_type = String, example = "Europe/London")]
    pub time_zone: TimeZone,
}

impl From<&Account> for Profile {
    fn from(account: &Account) -> Self {
        Self {
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            time_zone: account.time_zone.clone(),
        }
    }
}
