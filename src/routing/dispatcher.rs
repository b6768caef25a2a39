//! Main router
//!
//! Classifies each inbound message, finds or creates the user's context,
//! hands the input to the right track, and then moves, persists or clears the
//! context according to the result.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

use crate::state::{ContextStore, HandlingContext, HandlingResult};
use crate::utils::errors::{BotanixError, Result};
use crate::utils::logging::{log_dispatch, log_routing_error};
use super::command::{classify, Inbound};
use super::track::{Track, TrackHandler, TrackSteps};

/// Tracks that never persist context unless configured otherwise
pub const DEFAULT_GENERIC_TRACKS: [&str; 2] = ["help", "start"];

/// Whether the context being worked on lives in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Persistence {
    Stored,
    Ephemeral,
}

/// Routes messages to registered tracks
pub struct Dispatcher<U> {
    store: Arc<dyn ContextStore>,
    tracks: HashMap<String, Box<dyn TrackHandler<U>>>,
    generic_tracks: HashSet<String>,
}

impl<U: Send + Sync + 'static> Dispatcher<U> {
    /// Create a dispatcher with no tracks and the default generic tracks
    pub fn new(store: Arc<dyn ContextStore>) -> Self {
        Self {
            store,
            tracks: HashMap::new(),
            generic_tracks: DEFAULT_GENERIC_TRACKS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the set of tracks whose context is never persisted
    pub fn with_generic_tracks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.generic_tracks = names
            .into_iter()
            .map(|name| name.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Register a workflow type; its step table is built here, once
    pub fn with_track<H: TrackSteps<U>>(self, handler: H) -> Self {
        let track = Track::new(handler);
        debug!(track = ?track, steps = ?track.steps().steps(), "Step table built");
        self.with_track_handler(Box::new(track))
    }

    /// Register an already constructed track handler
    pub fn with_track_handler(mut self, handler: Box<dyn TrackHandler<U>>) -> Self {
        let name = handler.name().to_lowercase();
        if self.tracks.contains_key(&name) {
            warn!(track = %name, "Track registered twice, replacing the earlier handler");
        }
        debug!(track = %name, "Track registered");
        self.tracks.insert(name, handler);
        self
    }

    /// Registered track names, sorted
    pub fn track_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tracks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_generic(&self, track: &str) -> bool {
        self.generic_tracks.contains(&track.to_lowercase())
    }

    /// Route one inbound message from `user_id`
    ///
    /// `update` is the transport's own representation of the message and is
    /// passed through to step functions untouched.
    pub async fn route(&self, user_id: i64, raw_input: &str, update: &U) -> Result<HandlingResult> {
        let span = tracing::info_span!("route", user_id = user_id);
        async move {
            let input = raw_input.trim();
            let routed = match classify(input) {
                Inbound::Continuation => self.resume(user_id, input, update).await,
                Inbound::TrackStart { track } => self.start(user_id, input, &track, update).await,
            };

            match routed {
                Ok(outcome) => Ok(outcome),
                Err((err, track, step)) => {
                    log_routing_error(user_id, input, track.as_deref(), step, &err);
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn resume(&self, user_id: i64, input: &str, update: &U) -> RoutingOutcome {
        let context = self.store.get_active(user_id).await.map_err(|e| (e, None, None))?;
        let Some(context) = context else {
            debug!(user_id = user_id, "No active context for continuation input");
            return Ok(HandlingResult::unhandled("no active choice"));
        };

        self.run(context, Persistence::Stored, input, update).await
    }

    async fn start(&self, user_id: i64, input: &str, track: &str, update: &U) -> RoutingOutcome {
        if !self.tracks.contains_key(track) {
            return Err((self.unknown_track(track, user_id, input), Some(track.to_string()), None));
        }

        if self.is_generic(track) {
            debug!(user_id = user_id, track = track, "Starting generic track without persistence");
            let context = HandlingContext::new(user_id, track);
            return self.run(context, Persistence::Ephemeral, input, update).await;
        }

        info!(user_id = user_id, track = track, "Starting track");
        let context = self
            .store
            .create_new(user_id, track)
            .await
            .map_err(|e| (e, Some(track.to_string()), Some(0)))?;
        self.run(context, Persistence::Stored, input, update).await
    }

    async fn run(
        &self,
        mut context: HandlingContext,
        persistence: Persistence,
        input: &str,
        update: &U,
    ) -> RoutingOutcome {
        let user_id = context.user_id();
        let track = context.track_name().to_lowercase();
        let step = context.step();
        let fail = |err: BotanixError| (err, Some(track.clone()), Some(step));

        let handler = self
            .tracks
            .get(&track)
            .ok_or_else(|| fail(self.unknown_track(&track, user_id, input)))?;

        let result = handler.dispatch(input, update, &mut context).await.map_err(fail)?;
        log_dispatch(user_id, &track, step, &result);

        // a terminal result ends whatever the user had going, generic or not
        if result.is_terminal() {
            self.store.clear(user_id).await.map_err(fail)?;
            debug!(user_id = user_id, track = %track, "Track finished, context cleared");
            return Ok(result);
        }

        if !result.is_handled() {
            return Ok(result);
        }

        match (result.step_override(), result.new_track_name()) {
            (Some(next_step), Some(next_track)) => {
                let next_track = next_track.to_lowercase();
                let Some(target) = self.tracks.get(&next_track) else {
                    return Err(fail(self.unknown_track(&next_track, user_id, input)));
                };
                if !target.has_step(next_step) {
                    return Err(fail(BotanixError::UnknownStep {
                        track: next_track,
                        step: next_step,
                        user_id,
                        input: input.to_string(),
                    }));
                }
                debug!(user_id = user_id, from = %track, to = %next_track, step = next_step, "Switching track");
                context.switch_track(next_track, next_step);
            }
            (Some(next_step), None) => context.override_step(next_step),
            _ => context.advance_step().map_err(fail)?,
        }

        if persistence == Persistence::Stored {
            self.store.put(user_id, &context).await.map_err(fail)?;
        }

        Ok(result)
    }

    fn unknown_track(&self, track: &str, user_id: i64, input: &str) -> BotanixError {
        BotanixError::UnknownTrack {
            track: track.to_string(),
            user_id,
            input: input.to_string(),
        }
    }
}

/// Result of a routing attempt, with the track and step it failed at
type RoutingOutcome = std::result::Result<HandlingResult, (BotanixError, Option<String>, Option<u32>)>;

impl<U> std::fmt::Debug for Dispatcher<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tracks: Vec<&String> = self.tracks.keys().collect();
        tracks.sort();
        f.debug_struct("Dispatcher")
            .field("tracks", &tracks)
            .field("generic_tracks", &self.generic_tracks)
            .finish_non_exhaustive()
    }
}
