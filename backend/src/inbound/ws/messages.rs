//! Wire-level message definitions for the WebSocket adapter.
//!
//! Refresh hints are transformed into these payloads before being
//! serialized to JSON and pushed to connected clients.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{RefreshScope, RefreshSignal};

/// Outbound payload telling the client one slice of its data went stale.
///
/// Carries only the scope; staleness is tracked per scope, not per row, so
/// the client re-fetches the whole family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshMessage {
    /// Scope the client should re-fetch.
    pub scope: RefreshScope,
}

impl From<&RefreshSignal> for RefreshMessage {
    fn from(signal: &RefreshSignal) -> Self {
        Self { scope: signal.scope }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::tasks(RefreshScope::Tasks, r#"{"scope":"tasks"}"#)]
    #[case::projects(RefreshScope::Projects, r#"{"scope":"projects"}"#)]
    fn serialises_the_scope_as_its_wire_name(#[case] scope: RefreshScope, #[case] expected: &str) {
        let message = RefreshMessage { scope };
        assert_eq!(serde_json::to_string(&message).expect("serialise"), expected);
    }
}
