//! Countdown shared by the Neuro Center and meditation sessions.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("headband is not connected")]
    NotConnected,
    #[error("cannot change the session while it is running")]
    LockedWhileActive,
    #[error("unknown meditation mode: {0}")]
    UnknownMode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SessionTimer {
    duration_secs: u32,
    remaining_secs: u32,
    active: bool,
}

impl SessionTimer {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Change the length. Refused while running.
    pub fn set_duration(&mut self, duration_secs: u32) -> Result<(), SessionError> {
        if self.active {
            return Err(SessionError::LockedWhileActive);
        }
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
        Ok(())
    }

    /// Begin counting. An expired timer starts over from the full duration.
    pub fn start(&mut self) {
        if self.remaining_secs == 0 {
            self.remaining_secs = self.duration_secs;
        }
        self.active = self.remaining_secs > 0;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// One second elapsed. Returns `true` exactly when the countdown expires.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// `m:ss`.
    pub fn formatted(&self) -> String {
        format!("{}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}
