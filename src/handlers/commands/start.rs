//! Start track

use crate::handlers::reply::Replier;
use crate::routing::{StepCall, StepFuture, StepTableBuilder, TrackSteps};
use crate::state::HandlingResult;

pub const WELCOME_TEXT: &str = "Welcome to our bot!\n\
    You may choose:\n\
    /start to start again\n\
    /help to see this menu\n\
    /register to register with us";

/// `/start` - greets the user and ends immediately
pub struct StartHandler<R> {
    replier: R,
}

impl<R: Replier> StartHandler<R> {
    pub fn new(replier: R) -> Self {
        Self { replier }
    }

    fn welcome<'a, U: Sync>(&'a self, call: StepCall<'a, U>) -> StepFuture<'a> {
        Box::pin(async move {
            self.replier.send_text(call.context.user_id(), WELCOME_TEXT).await?;
            Ok(HandlingResult::terminal())
        })
    }
}

impl<R: Replier + 'static, U: Send + Sync + 'static> TrackSteps<U> for StartHandler<R> {
    fn register_steps(steps: &mut StepTableBuilder<Self, U>) {
        steps.entry("welcome", Self::welcome);
    }
}
