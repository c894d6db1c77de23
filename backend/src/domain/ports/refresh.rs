//! Driven port for pushing refresh hints to connected clients.
//!
//! After a successful mutation the owning service publishes the scope that
//! went stale. Connected clients re-fetch that scope; nothing else in the
//! pipeline depends on the hint arriving, so publish failures are logged
//! and swallowed by callers.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::ids::UserId;

/// The slice of a user's data a refresh hint invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshScope {
    /// Task listings and task detail views.
    Tasks,
    /// Project listings and project detail views.
    Projects,
}

impl RefreshScope {
    /// Returns the wire representation pushed to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Projects => "projects",
        }
    }
}

impl std::fmt::Display for RefreshScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One refresh hint addressed to a single user's connected clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSignal {
    /// Owner whose clients should re-fetch.
    pub user: UserId,
    /// Scope that went stale.
    pub scope: RefreshScope,
}

define_port_error! {
    /// Failures surfaced by refresh publishers.
    pub enum RefreshPublishError {
        /// No delivery channel is open any more.
        Closed { message: String } => "refresh channel closed: {message}",
    }
}

/// Driven port for publishing refresh hints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshPublisher: Send + Sync {
    /// Tell the user's connected clients that a scope went stale.
    ///
    /// # Errors
    ///
    /// Returns an error when the hint could not be handed to any delivery
    /// channel. Callers treat this as a logging matter, not a failure of
    /// the mutation that triggered it.
    async fn publish(&self, user: &UserId, scope: RefreshScope) -> Result<(), RefreshPublishError>;
}

/// Publisher that records every hint instead of delivering it.
///
/// Lets tests assert both that mutations publish and, just as importantly,
/// that failed ones do not.
#[derive(Debug, Default)]
pub struct RecordingRefreshPublisher {
    published: Mutex<Vec<(UserId, RefreshScope)>>,
}

impl RecordingRefreshPublisher {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far, in order.
    pub fn published(&self) -> Vec<(UserId, RefreshScope)> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RefreshPublisher for RecordingRefreshPublisher {
    async fn publish(&self, user: &UserId, scope: RefreshScope) -> Result<(), RefreshPublishError> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((user.clone(), scope));
        Ok(())
    }
}
