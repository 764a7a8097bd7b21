/// Run state definitions for tracking crawl progress
///
/// A run starts `Idle`, moves to `Running` once its seed is accepted, and
/// ends in exactly one of the three terminal states.
use crate::SitemapError;
use std::fmt;

/// Represents the current state of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Created but not yet started
    Idle,

    /// Batches are being dispatched
    Running,

    // ===== Terminal States =====
    /// Frontier exhausted or page limit reached
    Completed,

    /// Stopped on external request; no completion event is emitted
    Cancelled,

    /// Stopped by an internal error; an error event was emitted
    Failed,
}

impl RunState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    /// Returns true if the transition `self -> next` is allowed
    ///
    /// `Idle -> Running`, `Running -> {Completed, Cancelled, Failed}`, and
    /// `Idle -> Failed` for errors raised before the first batch.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Idle, Self::Failed)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Cancelled)
                | (Self::Running, Self::Failed)
        )
    }

    /// Performs a checked transition
    ///
    /// # Returns
    ///
    /// * `Ok(RunState)` - The new state
    /// * `Err(SitemapError::InvalidTransition)` - The transition is not allowed
    pub fn transition(self, next: RunState) -> Result<RunState, SitemapError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(SitemapError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
