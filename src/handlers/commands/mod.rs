//! Command tracks module
//!
//! This module contains the sample tracks started by bot commands like
//! /start, /help and /register.

pub mod help;
pub mod register;
pub mod start;

pub use help::{HelpHandler, HELP_TEXT};
pub use register::{FieldNames, LogRegistrations, RegisterHandler, Registration, RegistrationSink};
pub use start::{StartHandler, WELCOME_TEXT};
