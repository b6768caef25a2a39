//! Handling results
//!
//! Every step function ends by returning one of these. A result can only be
//! built through its factory functions, which keeps the terminal and
//! step-override outcomes mutually exclusive.

/// Outcome of one routing attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlingResult {
    handled: bool,
    unhandled_reason: Option<String>,
    is_terminal: bool,
    step_override: Option<u32>,
    new_track_name: Option<String>,
}

/// Match-friendly view of a [`HandlingResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition<'a> {
    /// Handled, move to the next step
    Advance,
    /// Handled, continue from the given step
    Jump(u32),
    /// Handled, continue in another track
    Switch { track: &'a str, step: u32 },
    /// Handled, the workflow is over
    Terminal,
    /// Not handled, the step stays where it is
    Unhandled(Option<&'a str>),
}

impl HandlingResult {
    fn handled() -> Self {
        Self {
            handled: true,
            unhandled_reason: None,
            is_terminal: false,
            step_override: None,
            new_track_name: None,
        }
    }

    /// Handled; advance by one step
    pub fn success() -> Self {
        Self::handled()
    }

    /// Not handled; the next candidate in the step group gets a chance
    pub fn unhandled(reason: impl Into<String>) -> Self {
        Self {
            handled: false,
            unhandled_reason: Some(reason.into()),
            ..Self::handled()
        }
    }

    /// Handled; the workflow concludes and its context is discarded
    pub fn terminal() -> Self {
        Self {
            is_terminal: true,
            ..Self::handled()
        }
    }

    /// Handled; jump to `step` instead of incrementing
    pub fn override_step(step: u32) -> Self {
        Self {
            step_override: Some(step),
            ..Self::handled()
        }
    }

    /// Handled; continue the conversation in `track_name` from `step`
    pub fn switch_track(track_name: impl Into<String>, step: u32) -> Self {
        Self {
            step_override: Some(step),
            new_track_name: Some(track_name.into()),
            ..Self::handled()
        }
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    pub fn unhandled_reason(&self) -> Option<&str> {
        self.unhandled_reason.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    pub fn step_override(&self) -> Option<u32> {
        self.step_override
    }

    pub fn new_track_name(&self) -> Option<&str> {
        self.new_track_name.as_deref()
    }

    pub fn disposition(&self) -> Disposition<'_> {
        if !self.handled {
            return Disposition::Unhandled(self.unhandled_reason());
        }
        if self.is_terminal {
            return Disposition::Terminal;
        }
        match (self.step_override, self.new_track_name.as_deref()) {
            (Some(step), Some(track)) => Disposition::Switch { track, step },
            (Some(step), None) => Disposition::Jump(step),
            _ => Disposition::Advance,
        }
    }
}
