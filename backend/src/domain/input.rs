//! Flat key/value snapshot of one form submission.

use std::collections::BTreeMap;

/// Raw field values captured from an `application/x-www-form-urlencoded`
/// body before validation.
///
/// Keys are field names; values are the submitted strings. A duplicated key
/// keeps the last value, matching how browsers flatten form data. Absent and
/// blank are distinct states and both observable downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionInput {
    fields: BTreeMap<String, String>,
}

impl SubmissionInput {
    /// Empty submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect decoded body pairs, resolving duplicate keys last-wins.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            fields: pairs.into_iter().collect(),
        }
    }

    /// Builder-style setter used by tests and fixtures.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The submitted value for `name`, if the field was present at all.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Whether no fields were submitted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
