//! Step sequencing and motion state
//!
//! The step pattern table and the index walk over it, plus the motor and
//! curtain state shared by every curtain driver.

pub mod pattern;
pub mod state;

pub use pattern::{Direction, Phase, StepPattern, FULL_STEP, LINE_COUNT, PHASE_COUNT};
pub use state::{CurtainPosition, MotionOutcome, MotorState, Progress};
