use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("per-word time budget exceeded")]
pub struct TimeBudgetExceeded;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("glyph rasterization is not supported in this environment")]
    Unsupported,
    #[error("surface has no area ({width}x{height} px)")]
    EmptySurface { width: u32, height: u32 },
    #[error("run was already started")]
    AlreadyStarted,
}

/// Why a word was left out of the cloud without aborting the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BelowMinSize,
    NoSpace,
}

/// Wall-clock budget for placing a single word. Checked cooperatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    #[must_use]
    pub const fn none() -> Self {
        Self { at: None }
    }

    /// A zero budget disables the deadline.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        if budget.is_zero() {
            return Self::none();
        }
        Self {
            at: Instant::now().checked_add(budget),
        }
    }

    #[must_use]
    pub fn exceeded(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() > at)
    }

    pub fn check(&self) -> Result<(), TimeBudgetExceeded> {
        if self.exceeded() {
            Err(TimeBudgetExceeded)
        } else {
            Ok(())
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}
