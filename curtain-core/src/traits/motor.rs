//! Curtain motor trait

use crate::motion::{CurtainPosition, MotionOutcome};

/// A motor that moves the curtain between its two end positions
///
/// `open` and `close` block until the traversal finishes. A request made
/// while a traversal is in progress is not an error: it returns
/// [`MotionOutcome::Busy`] and leaves the motor untouched.
pub trait CurtainDriver {
    /// Error type for line writes
    type Error;

    /// Run a full opening traversal
    fn open(&mut self) -> Result<MotionOutcome, Self::Error>;

    /// Run a full closing traversal
    fn close(&mut self) -> Result<MotionOutcome, Self::Error>;

    /// Force the motor idle without changing the assumed position
    ///
    /// Safe to call at any time, any number of times.
    fn stop(&mut self);

    /// Assumed curtain position
    fn position(&self) -> CurtainPosition;

    /// Check if the curtain is believed open
    fn is_open(&self) -> bool {
        self.position().is_open()
    }

    /// Check if a traversal is in progress
    fn is_moving(&self) -> bool;

    /// Drive every motor line low
    ///
    /// Idempotent. Called on shutdown so the coils are not left energised.
    fn release(&mut self) -> Result<(), Self::Error>;
}
