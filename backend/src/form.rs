//! Form submission bridge.
//!
//! A framework-free state machine that owns the lifecycle of one form
//! instance: Idle until a submission begins, Submitting while the operation
//! is in flight, Settled once an [`ActionResult`] lands. Clients drive it
//! from whatever rendering layer they use; nothing here touches HTTP.
//!
//! Overlapping submissions resolve last-wins. Each [`begin`] mints a ticket
//! that supersedes every earlier one, and [`settle`] discards outcomes
//! presented with a stale ticket, so a slow first submission can never
//! overwrite the state of a later one.
//!
//! [`begin`]: FormSubmission::begin
//! [`settle`]: FormSubmission::settle

use crate::domain::outcome::{ActionResult, FieldError};

/// Handle identifying one submission attempt.
///
/// Tickets are minted in strictly increasing order per form instance; only
/// the most recently minted ticket can settle the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket(u64);

/// Observable phase of the submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// No submission has started, or the last outcome was dismissed.
    Idle,
    /// A submission is in flight; any prior outcome remains readable.
    Submitting,
    /// The latest submission has settled and its outcome is held.
    Settled,
}

/// Whether a [`FormSubmission::settle`] call took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The outcome was recorded (and the success handler ran, if any).
    Applied,
    /// A newer submission had already begun; the outcome was discarded.
    Superseded,
}

type SuccessHandler<T> = Box<dyn FnMut(&T) + Send>;

/// Submission state machine for a single form instance.
///
/// Holds the previous outcome across resubmissions so error lists remain
/// visible while a retry is in flight. The success handler runs on every
/// applied success; configure [`reset_on_success`] for forms that should
/// return to Idle afterwards (creation forms) and leave it off for forms
/// that keep showing the saved state (settings forms).
///
/// [`reset_on_success`]: FormSubmission::reset_on_success
pub struct FormSubmission<T> {
    in_flight: Option<SubmissionTicket>,
    outcome: Option<ActionResult<T>>,
    minted: u64,
    reset_on_success: bool,
    on_success: Option<SuccessHandler<T>>,
}

impl<T> FormSubmission<T> {
    /// Create an idle form with no success handler.
    pub fn new() -> Self {
        Self {
            in_flight: None,
            outcome: None,
            minted: 0,
            reset_on_success: false,
            on_success: None,
        }
    }

    /// Return to Idle after an applied success instead of holding it.
    #[must_use]
    pub fn reset_on_success(mut self) -> Self {
        self.reset_on_success = true;
        self
    }

    /// Register a handler invoked with the payload of every applied success.
    #[must_use]
    pub fn on_success(mut self, handler: impl FnMut(&T) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(handler));
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SubmissionPhase {
        if self.in_flight.is_some() {
            SubmissionPhase::Submitting
        } else if self.outcome.is_some() {
            SubmissionPhase::Settled
        } else {
            SubmissionPhase::Idle
        }
    }

    /// Begin a submission, superseding any submission still in flight.
    ///
    /// Valid from every phase. The previous outcome stays readable until the
    /// new submission settles.
    pub fn begin(&mut self) -> SubmissionTicket {
        self.minted += 1;
        let ticket = SubmissionTicket(self.minted);
        self.in_flight = Some(ticket);
        ticket
    }

    /// Record the outcome of the submission identified by `ticket`.
    ///
    /// An outcome presented with a stale ticket is discarded and reported as
    /// [`Settlement::Superseded`]; the form state does not change.
    pub fn settle(&mut self, ticket: SubmissionTicket, outcome: ActionResult<T>) -> Settlement {
        if self.in_flight != Some(ticket) {
            return Settlement::Superseded;
        }
        self.in_flight = None;
        if let ActionResult::Success { data } = &outcome {
            if let Some(handler) = self.on_success.as_mut() {
                handler(data);
            }
            if self.reset_on_success {
                self.outcome = None;
                return Settlement::Applied;
            }
        }
        self.outcome = Some(outcome);
        Settlement::Applied
    }

    /// Discard the held outcome, returning to Idle.
    ///
    /// Has no effect on a submission in flight.
    pub fn dismiss(&mut self) {
        self.outcome = None;
    }

    /// Outcome of the most recently settled submission, if held.
    pub fn outcome(&self) -> Option<&ActionResult<T>> {
        self.outcome.as_ref()
    }

    /// Errors to render; empty unless the held outcome is a failure.
    pub fn errors(&self) -> &[FieldError] {
        self.outcome.as_ref().map_or(&[], ActionResult::errors)
    }
}

impl<T> Default for FormSubmission<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
