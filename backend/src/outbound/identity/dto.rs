//! DTOs for decoding identity service JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into
//! domain records (`BrokeredIdentity`, `BrokeredSession`) in one pass.

use serde::Deserialize;

use crate::domain::ids::UserId;
use crate::domain::ports::{BrokeredIdentity, BrokeredSession};

#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) access_token: String,
    pub(super) user: UserDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) user_metadata: UserMetadataDto,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UserMetadataDto {
    #[serde(default)]
    pub(super) name: Option<String>,
}

impl SessionDto {
    pub(super) fn into_brokered_session(self) -> Result<BrokeredSession, String> {
        if self.access_token.is_empty() {
            return Err("session payload missing an access token".to_owned());
        }
        Ok(BrokeredSession {
            access_token: self.access_token,
            identity: self.user.into_brokered_identity()?,
        })
    }
}

impl UserDto {
    pub(super) fn into_brokered_identity(self) -> Result<BrokeredIdentity, String> {
        let id = UserId::new(&self.id).map_err(|error| format!("user id: {error}"))?;
        let email = self
            .email
            .filter(|email| !email.is_empty())
            .ok_or_else(|| format!("user {} has no email on record", self.id))?;
        // Providers that volunteer no profile name fall back to the email.
        let display_name = match self.user_metadata.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => email.clone(),
        };
        Ok(BrokeredIdentity { id, email, display_name })
    }
}
