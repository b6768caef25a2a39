//! Track handlers and their step tables
//!
//! A track is a linear, resumable workflow. Its steps are plain functions
//! registered against a step number; several functions may share a number
//! and are tried in registration order until one of them handles the input.
//!
//! ```rust,ignore
//! impl<U: Send + Sync + 'static> TrackSteps<U> for SignupHandler {
//!     fn register_steps(steps: &mut StepTableBuilder<Self, U>) {
//!         steps
//!             .entry("ask_name", Self::ask_name)
//!             .step(1, "store_name", Self::store_name)
//!             .named("finish_2", Self::finish);
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use async_trait::async_trait;
use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::state::{HandlingContext, HandlingResult};
use crate::utils::errors::{BotanixError, Result};

static STEP_SUFFIX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[_A-Za-z0-9]+_(\d+)$").expect("step suffix pattern is a valid regex")
});

/// Future returned by a step function
pub type StepFuture<'a> = BoxFuture<'a, Result<HandlingResult>>;

/// Everything a step function gets to see for one input
pub struct StepCall<'a, U> {
    /// Trimmed message text
    pub input: &'a str,
    /// Transport update, opaque to the engine
    pub update: &'a U,
    /// The user's context, mutable so steps can record payload
    pub context: &'a mut HandlingContext,
}

/// A step function of the track type `H`
pub type StepFn<H, U> = for<'a> fn(&'a H, StepCall<'a, U>) -> StepFuture<'a>;

struct NamedStep<H, U> {
    name: &'static str,
    func: StepFn<H, U>,
}

/// Immutable mapping from step number to its ordered candidate functions
pub struct StepTable<H, U> {
    groups: BTreeMap<u32, Vec<NamedStep<H, U>>>,
}

impl<H, U> StepTable<H, U> {
    /// Registered step numbers, ascending
    pub fn steps(&self) -> Vec<u32> {
        self.groups.keys().copied().collect()
    }

    pub fn contains(&self, step: u32) -> bool {
        self.groups.contains_key(&step)
    }

    /// Names of the functions registered for `step`, in registration order
    pub fn group(&self, step: u32) -> Option<Vec<&'static str>> {
        self.groups
            .get(&step)
            .map(|group| group.iter().map(|s| s.name).collect())
    }
}

impl<H, U> fmt::Debug for StepTable<H, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.groups.iter().map(|(step, group)| {
                (step, group.iter().map(|s| s.name).collect::<Vec<_>>())
            }))
            .finish()
    }
}

/// Collects step registrations for a track type
pub struct StepTableBuilder<H, U> {
    groups: BTreeMap<u32, Vec<NamedStep<H, U>>>,
}

impl<H, U> StepTableBuilder<H, U> {
    fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    /// Register `func` under an explicit step number
    pub fn step(&mut self, step: u32, name: &'static str, func: StepFn<H, U>) -> &mut Self {
        self.groups
            .entry(step)
            .or_default()
            .push(NamedStep { name, func });
        self
    }

    /// Register `func` without step information; it belongs to step 0
    pub fn entry(&mut self, name: &'static str, func: StepFn<H, U>) -> &mut Self {
        self.step(0, name, func)
    }

    /// Register `func` under the step encoded as a `_<n>` suffix of `name`,
    /// falling back to step 0
    pub fn named(&mut self, name: &'static str, func: StepFn<H, U>) -> &mut Self {
        let step = step_from_name(name).unwrap_or(0);
        self.step(step, name, func)
    }

    fn build(self) -> StepTable<H, U> {
        StepTable {
            groups: self.groups,
        }
    }
}

/// Step number encoded in a trailing `_<digits>` suffix
pub fn step_from_name(name: &str) -> Option<u32> {
    STEP_SUFFIX_PATTERN
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Track name derived from a type: its last path segment without generics,
/// with any `Handler` suffix removed, lower-cased
pub fn track_name_of<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let ident = base.rsplit("::").next().unwrap_or(base);
    let ident = ident.strip_suffix("Handler").unwrap_or(ident);
    ident.to_lowercase()
}

/// Implemented by workflow types to declare their steps
pub trait TrackSteps<U>: Sized + Send + Sync + 'static {
    /// Declare every step function of the track
    fn register_steps(steps: &mut StepTableBuilder<Self, U>);

    /// Name users start the track with, without the command marker
    fn track_name(&self) -> String {
        track_name_of::<Self>()
    }
}

/// A workflow the dispatcher can route to
#[async_trait]
pub trait TrackHandler<U: Send + Sync>: Send + Sync {
    /// Lower-case track name
    fn name(&self) -> &str;

    fn has_step(&self, step: u32) -> bool;

    /// Run the step group at `context.step()` against one input
    async fn dispatch(&self, input: &str, update: &U, context: &mut HandlingContext) -> Result<HandlingResult>;
}

/// A [`TrackSteps`] type with its step table built once
pub struct Track<H, U> {
    name: String,
    handler: H,
    steps: StepTable<H, U>,
}

impl<H: TrackSteps<U>, U> Track<H, U> {
    pub fn new(handler: H) -> Self {
        let mut builder = StepTableBuilder::new();
        H::register_steps(&mut builder);
        let name = handler.track_name().to_lowercase();

        Self {
            name,
            handler,
            steps: builder.build(),
        }
    }

    pub fn steps(&self) -> &StepTable<H, U> {
        &self.steps
    }
}

impl<H, U> fmt::Debug for Track<H, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("name", &self.name)
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<H, U> TrackHandler<U> for Track<H, U>
where
    H: TrackSteps<U>,
    U: Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn has_step(&self, step: u32) -> bool {
        self.steps.contains(step)
    }

    async fn dispatch(&self, input: &str, update: &U, context: &mut HandlingContext) -> Result<HandlingResult> {
        let step = context.step();
        let group = self.steps.groups.get(&step).ok_or_else(|| BotanixError::UnknownStep {
            track: self.name.clone(),
            step,
            user_id: context.user_id(),
            input: input.to_string(),
        })?;

        let mut last = None;
        for candidate in group {
            trace!(track = %self.name, step = step, function = candidate.name, "Invoking step function");
            let call = StepCall {
                input,
                update,
                context: &mut *context,
            };
            let result = (candidate.func)(&self.handler, call).await?;
            if result.is_handled() {
                return Ok(result);
            }
            last = Some(result);
        }

        Ok(last.unwrap_or_else(|| HandlingResult::unhandled("No step function registered")))
    }
}
