//! Routing engine
//!
//! This module contains the dispatch core: command classification, track
//! step tables, and the main router that drives the per-user state machine.

pub mod command;
pub mod dispatcher;
pub mod track;

pub use command::{classify, Inbound, COMMAND_MARKER};
pub use dispatcher::{Dispatcher, DEFAULT_GENERIC_TRACKS};
pub use track::{
    step_from_name, track_name_of, StepCall, StepFn, StepFuture, StepTable, StepTableBuilder, Track,
    TrackHandler, TrackSteps,
};
