//! Motor and curtain state

use core::fmt;

use super::pattern::Direction;

/// Motion state of a curtain motor
///
/// Exactly one value holds at a time. Only the driver's public operations
/// change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotorState {
    /// Not stepping
    #[default]
    Idle,
    /// Traversing forward
    Opening,
    /// Traversing in reverse
    Closing,
}

impl MotorState {
    /// State for a traversal in the given direction
    pub fn moving(direction: Direction) -> Self {
        match direction {
            Direction::Forward => MotorState::Opening,
            Direction::Reverse => MotorState::Closing,
        }
    }

    /// Check if a traversal is in progress
    pub fn is_moving(&self) -> bool {
        !matches!(self, MotorState::Idle)
    }

    /// Direction of the traversal in progress
    pub fn direction(&self) -> Option<Direction> {
        match self {
            MotorState::Idle => None,
            MotorState::Opening => Some(Direction::Forward),
            MotorState::Closing => Some(Direction::Reverse),
        }
    }
}

impl fmt::Display for MotorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MotorState::Idle => "idle",
            MotorState::Opening => "opening",
            MotorState::Closing => "closing",
        })
    }
}

/// Assumed curtain position
///
/// Updated only when a traversal runs to completion. There is no end-stop,
/// so this is what the driver believes, not what the track reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurtainPosition {
    /// Fully open
    Open,
    /// Fully closed
    #[default]
    Closed,
}

impl CurtainPosition {
    /// Position reached by completing a traversal in the given direction
    pub fn reached_by(direction: Direction) -> Self {
        match direction {
            Direction::Forward => CurtainPosition::Open,
            Direction::Reverse => CurtainPosition::Closed,
        }
    }

    /// Check if the curtain is open
    pub fn is_open(&self) -> bool {
        matches!(self, CurtainPosition::Open)
    }
}

impl fmt::Display for CurtainPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CurtainPosition::Open => "open",
            CurtainPosition::Closed => "closed",
        })
    }
}

/// Result of an open or close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    /// Full traversal ran; position updated
    Completed,
    /// Motor was already moving; nothing happened
    Busy,
    /// Stop requested mid-traversal; position unchanged
    Aborted,
}

/// Progress after a bounded batch of sub-steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Traversal still running
    InFlight {
        /// Sub-steps left to emit
        remaining: u32,
    },
    /// Traversal finished this batch
    Completed,
    /// Stop requested during this batch
    Aborted,
    /// No traversal in progress
    Idle,
}
