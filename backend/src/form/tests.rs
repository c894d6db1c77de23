//! Tests for the form submission state machine.

use std::sync::{Arc, Mutex, PoisonError};

use rstest::rstest;

use super::*;

fn success(value: &str) -> ActionResult<String> {
    ActionResult::success(value.to_owned())
}

fn failure(message: &str) -> ActionResult<String> {
    ActionResult::failure_message(message)
}

#[rstest]
fn starts_idle_with_nothing_to_render() {
    let form = FormSubmission::<String>::new();

    assert_eq!(form.phase(), SubmissionPhase::Idle);
    assert!(form.outcome().is_none());
    assert!(form.errors().is_empty());
}

#[rstest]
fn begin_enters_submitting() {
    let mut form = FormSubmission::<String>::new();

    form.begin();

    assert_eq!(form.phase(), SubmissionPhase::Submitting);
}

#[rstest]
fn settle_with_the_live_ticket_applies_the_outcome() {
    let mut form = FormSubmission::new();
    let ticket = form.begin();

    let settlement = form.settle(ticket, success("saved"));

    assert_eq!(settlement, Settlement::Applied);
    assert_eq!(form.phase(), SubmissionPhase::Settled);
    assert_eq!(
        form.outcome().and_then(ActionResult::data),
        Some(&"saved".to_owned())
    );
}

#[rstest]
fn failure_stays_settled_so_errors_render() {
    let mut form = FormSubmission::new();
    let ticket = form.begin();

    form.settle(ticket, failure("The task name is required."));

    assert_eq!(form.phase(), SubmissionPhase::Settled);
    let messages: Vec<&str> = form.errors().iter().map(FieldError::message).collect();
    assert_eq!(messages, ["The task name is required."]);
}

#[rstest]
fn resubmission_supersedes_the_slow_first_attempt() {
    let mut form = FormSubmission::new();
    let first = form.begin();
    let second = form.begin();

    assert_eq!(form.settle(second, success("second")), Settlement::Applied);
    assert_eq!(form.settle(first, success("first")), Settlement::Superseded);

    assert_eq!(
        form.outcome().and_then(ActionResult::data),
        Some(&"second".to_owned())
    );
}

#[rstest]
fn stale_settle_does_not_disturb_a_submission_in_flight() {
    let mut form = FormSubmission::new();
    let first = form.begin();
    form.begin();

    assert_eq!(form.settle(first, failure("late")), Settlement::Superseded);

    assert_eq!(form.phase(), SubmissionPhase::Submitting);
    assert!(form.outcome().is_none());
}

#[rstest]
fn previous_errors_stay_visible_while_retrying() {
    let mut form = FormSubmission::new();
    let ticket = form.begin();
    form.settle(ticket, failure("The task name is required."));

    form.begin();

    assert_eq!(form.phase(), SubmissionPhase::Submitting);
    assert_eq!(form.errors().len(), 1);
}

#[rstest]
fn success_handler_receives_the_payload() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut form = FormSubmission::new().on_success(move |data: &String| {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(data.clone());
    });
    let ticket = form.begin();

    form.settle(ticket, success("created"));

    let recorded = seen.lock().unwrap_or_else(PoisonError::into_inner);
    assert_eq!(recorded.as_slice(), ["created".to_owned()]);
}

#[rstest]
fn success_handler_does_not_run_for_superseded_outcomes() {
    let calls = Arc::new(Mutex::new(0u32));
    let sink = Arc::clone(&calls);
    let mut form = FormSubmission::new().on_success(move |_: &String| {
        *sink.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    });
    let first = form.begin();
    let second = form.begin();

    form.settle(first, success("stale"));
    form.settle(second, failure("rejected"));

    assert_eq!(*calls.lock().unwrap_or_else(PoisonError::into_inner), 0);
}

#[rstest]
fn reset_on_success_returns_to_idle() {
    let mut form = FormSubmission::new().reset_on_success();
    let ticket = form.begin();

    form.settle(ticket, success("created"));

    assert_eq!(form.phase(), SubmissionPhase::Idle);
    assert!(form.outcome().is_none());
}

#[rstest]
fn reset_on_success_still_holds_failures() {
    let mut form = FormSubmission::new().reset_on_success();
    let ticket = form.begin();

    form.settle(ticket, failure("rejected"));

    assert_eq!(form.phase(), SubmissionPhase::Settled);
    assert_eq!(form.errors().len(), 1);
}

#[rstest]
fn dismiss_clears_a_held_failure() {
    let mut form = FormSubmission::new();
    let ticket = form.begin();
    form.settle(ticket, failure("rejected"));

    form.dismiss();

    assert_eq!(form.phase(), SubmissionPhase::Idle);
    assert!(form.errors().is_empty());
}

#[rstest]
fn tickets_are_unique_across_the_form_lifetime() {
    let mut form = FormSubmission::<String>::new();
    let first = form.begin();
    let ticket = form.begin();
    form.settle(ticket, success("done"));
    let third = form.begin();

    assert_ne!(first, third);
}
