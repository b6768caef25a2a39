//! Sample tracks used by the routing tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use botanix::routing::{StepCall, StepFuture, StepTableBuilder, TrackSteps};
use botanix::HandlingResult;

/// Three-step form: name, surname, email
///
/// Step 0 holds two candidates so that the command that starts the track is
/// answered by the prompt and the next message by the name check.
#[derive(Debug, Default)]
pub struct SignupHandler;

impl SignupHandler {
    fn prompt_for_name<'a>(&'a self, call: StepCall<'a, ()>) -> StepFuture<'a> {
        Box::pin(async move {
            if call.input.eq_ignore_ascii_case("/signup") {
                Ok(HandlingResult::override_step(0))
            } else {
                Ok(HandlingResult::unhandled("not the start command"))
            }
        })
    }

    fn store_name<'a>(&'a self, call: StepCall<'a, ()>) -> StepFuture<'a> {
        Box::pin(async move {
            if call.input.chars().count() < 3 {
                return Ok(HandlingResult::unhandled("name too short"));
            }
            call.context.set_payload("name", call.input)?;
            Ok(HandlingResult::success())
        })
    }

    fn store_surname<'a>(&'a self, call: StepCall<'a, ()>) -> StepFuture<'a> {
        Box::pin(async move {
            if call.input.chars().count() < 3 {
                return Ok(HandlingResult::unhandled("surname too short"));
            }
            call.context.set_payload("surname", call.input)?;
            Ok(HandlingResult::success())
        })
    }

    fn store_email_2<'a>(&'a self, call: StepCall<'a, ()>) -> StepFuture<'a> {
        Box::pin(async move {
            if !call.input.contains('@') {
                return Ok(HandlingResult::unhandled("not an email"));
            }
            call.context.set_payload("email", call.input)?;
            Ok(HandlingResult::terminal())
        })
    }
}

impl TrackSteps<()> for SignupHandler {
    fn register_steps(steps: &mut StepTableBuilder<Self, ()>) {
        steps
            .entry("prompt_for_name", Self::prompt_for_name)
            .entry("store_name", Self::store_name)
            .step(1, "store_surname", Self::store_surname)
            .named("store_email_2", Self::store_email_2);
    }
}

/// One-shot track that finishes immediately
#[derive(Debug, Default)]
pub struct PingHandler;

impl PingHandler {
    fn pong<'a>(&'a self, _call: StepCall<'a, ()>) -> StepFuture<'a> {
        Box::pin(async move { Ok(HandlingResult::terminal()) })
    }
}

impl TrackSteps<()> for PingHandler {
    fn register_steps(steps: &mut StepTableBuilder<Self, ()>) {
        steps.entry("pong", Self::pong);
    }
}

/// Hands the user over to the help track
#[derive(Debug, Default)]
pub struct EscapeHandler;

impl EscapeHandler {
    fn to_help<'a>(&'a self, _call: StepCall<'a, ()>) -> StepFuture<'a> {
        Box::pin(async move { Ok(HandlingResult::switch_track("Help", 0)) })
    }
}

impl TrackSteps<()> for EscapeHandler {
    fn register_steps(steps: &mut StepTableBuilder<Self, ()>) {
        steps.entry("to_help", Self::to_help);
    }
}

/// Help stand-in that counts how often it ran
#[derive(Debug, Default, Clone)]
pub struct HelpHandler {
    pub calls: Arc<AtomicUsize>,
}

impl HelpHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn show<'a>(&'a self, _call: StepCall<'a, ()>) -> StepFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HandlingResult::success())
        })
    }
}

impl TrackSteps<()> for HelpHandler {
    fn register_steps(steps: &mut StepTableBuilder<Self, ()>) {
        steps.entry("show", Self::show);
    }
}

/// Two accepting candidates on the same step; only the first should run
#[derive(Debug, Default, Clone)]
pub struct RaceHandler {
    pub first: Arc<AtomicUsize>,
    pub second: Arc<AtomicUsize>,
}

impl RaceHandler {
    fn first<'a>(&'a self, _call: StepCall<'a, ()>) -> StepFuture<'a> {
        Box::pin(async move {
            self.first.fetch_add(1, Ordering::SeqCst);
            Ok(HandlingResult::success())
        })
    }

    fn second<'a>(&'a self, _call: StepCall<'a, ()>) -> StepFuture<'a> {
        Box::pin(async move {
            self.second.fetch_add(1, Ordering::SeqCst);
            Ok(HandlingResult::success())
        })
    }

    fn done_1<'a>(&'a self, _call: StepCall<'a, ()>) -> StepFuture<'a> {
        Box::pin(async move { Ok(HandlingResult::terminal()) })
    }
}

impl TrackSteps<()> for RaceHandler {
    fn register_steps(steps: &mut StepTableBuilder<Self, ()>) {
        steps
            .entry("first", Self::first)
            .entry("second", Self::second)
            .named("done_1", Self::done_1);
    }
}
