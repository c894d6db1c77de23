//! Entity identifiers.
//!
//! Every aggregate is keyed by a UUID wrapped in its own newtype so that a
//! task id cannot be passed where a project id is expected. Identifiers keep
//! the raw string alongside the parsed UUID, so values round-trip through
//! serde byte-for-byte.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when parsing an entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    /// The identifier was empty.
    Empty {
        /// Entity the identifier belongs to.
        entity: &'static str,
    },
    /// The identifier was not a canonical UUID.
    Malformed {
        /// Entity the identifier belongs to.
        entity: &'static str,
    },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { entity } => write!(f, "{entity} id must not be empty"),
            Self::Malformed { entity } => write!(f, "{entity} id must be a valid UUID"),
        }
    }
}

impl std::error::Error for IdError {}

macro_rules! entity_id {
    ($(#[$docs:meta])* $name:ident, $entity:literal) => {
        $(#[$docs])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid, String);

        impl $name {
            /// Validate and construct an identifier from borrowed input.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdError> {
                Self::from_owned(id.as_ref().to_owned())
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self::from_uuid(Uuid::new_v4())
            }

            /// Wrap an already-parsed UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid, uuid.to_string())
            }

            fn from_owned(id: String) -> Result<Self, IdError> {
                if id.is_empty() {
                    return Err(IdError::Empty { entity: $entity });
                }
                if id.trim() != id {
                    return Err(IdError::Malformed { entity: $entity });
                }

                let parsed =
                    Uuid::parse_str(&id).map_err(|_| IdError::Malformed { entity: $entity })?;
                Ok(Self(parsed, id))
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.1.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                let $name(_, raw) = value;
                raw
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_owned(value)
            }
        }
    };
}

entity_id!(
    /// Stable user identifier issued by the identity provider.
    UserId,
    "user"
);

entity_id!(
    /// Stable project identifier minted server-side on creation.
    ProjectId,
    "project"
);

entity_id!(
    /// Stable task identifier minted server-side on creation.
    TaskId,
    "task"
);
