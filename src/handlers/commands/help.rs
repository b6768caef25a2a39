//! Help track

use crate::handlers::reply::Replier;
use crate::routing::{StepCall, StepFuture, StepTableBuilder, TrackSteps};
use crate::state::HandlingResult;

pub const HELP_TEXT: &str = "You may choose:\n\
    /start to start again\n\
    /help to see this menu\n\
    /register to register with us";

/// `/help` - shows the command menu
pub struct HelpHandler<R> {
    replier: R,
}

impl<R: Replier> HelpHandler<R> {
    pub fn new(replier: R) -> Self {
        Self { replier }
    }

    fn send_help<'a, U: Sync>(&'a self, call: StepCall<'a, U>) -> StepFuture<'a> {
        Box::pin(async move {
            self.replier.send_text(call.context.user_id(), HELP_TEXT).await?;
            Ok(HandlingResult::success())
        })
    }
}

impl<R: Replier + 'static, U: Send + Sync + 'static> TrackSteps<U> for HelpHandler<R> {
    fn register_steps(steps: &mut StepTableBuilder<Self, U>) {
        steps.entry("send_help", Self::send_help);
    }
}
