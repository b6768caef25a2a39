//! Registration track
//!
//! Collects first name, surname and email over four steps. Invalid input is
//! re-prompted and reported as unhandled, so the user stays on the same step.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::handlers::reply::Replier;
use crate::routing::{StepCall, StepFuture, StepTableBuilder, TrackSteps};
use crate::state::HandlingResult;
use crate::utils::errors::Result;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.+@.+\..+").expect("email pattern is a valid regex")
});

const MIN_NAME_LENGTH: usize = 3;

/// Payload keys written by this track
pub struct FieldNames;

impl FieldNames {
    pub const FIRST_NAME: &'static str = "firstName";
    pub const SURNAME: &'static str = "surname";
    pub const EMAIL: &'static str = "email";
}

/// A completed registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub user_id: i64,
    pub first_name: String,
    pub surname: String,
    pub email: String,
}

/// Receives completed registrations
#[async_trait]
pub trait RegistrationSink: Send + Sync {
    async fn register(&self, registration: Registration) -> Result<()>;
}

/// Sink that only records the registration in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRegistrations;

#[async_trait]
impl RegistrationSink for LogRegistrations {
    async fn register(&self, registration: Registration) -> Result<()> {
        info!(
            user_id = registration.user_id,
            first_name = %registration.first_name,
            surname = %registration.surname,
            email = %registration.email,
            "User registered"
        );
        Ok(())
    }
}

/// `/register` - the stateful sign-up form
pub struct RegisterHandler<R, S = LogRegistrations> {
    replier: R,
    sink: S,
}

impl<R: Replier> RegisterHandler<R> {
    pub fn new(replier: R) -> Self {
        Self::with_sink(replier, LogRegistrations)
    }
}

impl<R: Replier, S: RegistrationSink> RegisterHandler<R, S> {
    pub fn with_sink(replier: R, sink: S) -> Self {
        Self { replier, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn ask_for_name<'a, U: Sync>(&'a self, call: StepCall<'a, U>) -> StepFuture<'a> {
        Box::pin(async move {
            self.replier
                .send_text(call.context.user_id(), "Please enter your first name:")
                .await?;
            Ok(HandlingResult::success())
        })
    }

    fn ask_for_surname<'a, U: Sync>(&'a self, call: StepCall<'a, U>) -> StepFuture<'a> {
        Box::pin(async move {
            let user_id = call.context.user_id();
            let first_name = call.input.trim();
            if first_name.chars().count() < MIN_NAME_LENGTH {
                self.replier
                    .send_text(user_id, "First name must be at least 3 characters. Try again.")
                    .await?;
                return Ok(HandlingResult::unhandled("Invalid input"));
            }

            call.context.set_payload(FieldNames::FIRST_NAME, first_name)?;
            self.replier.send_text(user_id, "Please provide your surname:").await?;
            Ok(HandlingResult::success())
        })
    }

    fn ask_for_email<'a, U: Sync>(&'a self, call: StepCall<'a, U>) -> StepFuture<'a> {
        Box::pin(async move {
            let user_id = call.context.user_id();
            let surname = call.input.trim();
            if surname.chars().count() < MIN_NAME_LENGTH {
                self.replier
                    .send_text(user_id, "Surname must be at least 3 characters. Try again.")
                    .await?;
                return Ok(HandlingResult::unhandled("Invalid input"));
            }

            call.context.set_payload(FieldNames::SURNAME, surname)?;
            self.replier.send_text(user_id, "Please provide your email:").await?;
            Ok(HandlingResult::success())
        })
    }

    fn complete_registration<'a, U: Sync>(&'a self, call: StepCall<'a, U>) -> StepFuture<'a> {
        Box::pin(async move {
            let user_id = call.context.user_id();
            let email = call.input.trim();
            if !EMAIL_PATTERN.is_match(email) {
                self.replier.send_text(user_id, "Not a valid email. Try again.").await?;
                return Ok(HandlingResult::unhandled("Invalid input"));
            }

            call.context.set_payload(FieldNames::EMAIL, email)?;
            let registration = Registration {
                user_id,
                first_name: call.context.get_payload(FieldNames::FIRST_NAME)?,
                surname: call.context.get_payload(FieldNames::SURNAME)?,
                email: email.to_string(),
            };
            self.sink.register(registration).await?;

            self.replier
                .send_text(user_id, "Your registration was successful!")
                .await?;
            Ok(HandlingResult::terminal())
        })
    }
}

impl<R, S, U> TrackSteps<U> for RegisterHandler<R, S>
where
    R: Replier + 'static,
    S: RegistrationSink + 'static,
    U: Send + Sync + 'static,
{
    fn register_steps(steps: &mut StepTableBuilder<Self, U>) {
        steps
            .step(0, "ask_for_name", Self::ask_for_name)
            .step(1, "ask_for_surname", Self::ask_for_surname)
            .step(2, "ask_for_email", Self::ask_for_email)
            .step(3, "complete_registration", Self::complete_registration);
    }
}
