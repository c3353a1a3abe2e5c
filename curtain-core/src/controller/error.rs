//! Controller error type

use core::fmt;

use crate::traits::{Button, CurtainDriver, LightSensor};

/// A hardware fault seen by the controller
///
/// Each variant wraps the collaborator's own error. All of them are fatal
/// to the polling loop; busy motors are reported through
/// [`MotionOutcome`](crate::motion::MotionOutcome) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError<M, B, L> {
    /// Motor line write failed
    Motor(M),
    /// Button read or release failed
    Button(B),
    /// Light sensor read failed
    LightSensor(L),
}

/// Controller error for a given set of collaborators
pub type CycleError<M, O, L> = ControllerError<
    <M as CurtainDriver>::Error,
    <O as Button>::Error,
    <L as LightSensor>::Error,
>;

impl<M: fmt::Display, B: fmt::Display, L: fmt::Display> fmt::Display for ControllerError<M, B, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::Motor(e) => write!(f, "motor fault: {}", e),
            ControllerError::Button(e) => write!(f, "button fault: {}", e),
            ControllerError::LightSensor(e) => write!(f, "light sensor fault: {}", e),
        }
    }
}

impl<M, B, L> core::error::Error for ControllerError<M, B, L>
where
    M: fmt::Debug + fmt::Display,
    B: fmt::Debug + fmt::Display,
    L: fmt::Debug + fmt::Display,
{
}
