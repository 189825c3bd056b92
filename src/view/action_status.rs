//! Progress line for the action currently running.
//!
//! `Idle -> Loading -> (Success | Error) -> Idle`. The terminal phases clear
//! themselves after a per-action delay, applied by `tick`.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ActionStatus {
    phase: ActionPhase,
    message: String,
    clear_at: Option<Instant>,
}

impl Default for ActionStatus {
    fn default() -> Self {
        Self {
            phase: ActionPhase::Idle,
            message: String::new(),
            clear_at: None,
        }
    }
}

impl ActionStatus {
    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ActionPhase::Loading
    }

    /// Enters `Loading`, cancelling any pending clear.
    pub fn begin(&mut self, message: impl Into<String>) {
        self.set(ActionPhase::Loading, message.into(), None);
    }

    /// Updates the message of a running action.
    pub fn step(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.phase != ActionPhase::Loading {
            tracing::warn!(
                phase = ?self.phase,
                message = %message,
                "status step outside a running action"
            );
        }
        self.set(ActionPhase::Loading, message, None);
    }

    pub fn succeed(&mut self, message: impl Into<String>, clear_after: Duration) {
        self.set(ActionPhase::Success, message.into(), clear_deadline(clear_after));
    }

    pub fn fail(&mut self, message: impl Into<String>, clear_after: Duration) {
        self.set(ActionPhase::Error, message.into(), clear_deadline(clear_after));
    }

    /// Returns to `Idle` once the clear deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.clear_at.is_some_and(|at| now >= at) {
            *self = Self::default();
        }
    }

    fn set(&mut self, phase: ActionPhase, message: String, clear_at: Option<Instant>) {
        self.phase = phase;
        self.message = message;
        self.clear_at = clear_at;
    }
}

/// `None` when the delay overflows the clock; the status then stays until the
/// next action replaces it.
fn clear_deadline(clear_after: Duration) -> Option<Instant> {
    Instant::now().checked_add(clear_after)
}

#[cfg(test)]
#[path = "tests/action_status_tests.rs"]
mod tests;
