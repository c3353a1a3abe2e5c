//! Stop request source
//!
//! Polled by long-running operations at safe points. The process-level
//! implementation is [`RunControl`](crate::controller::RunControl), flipped
//! from a signal handler.

use core::sync::atomic::{AtomicBool, Ordering};

/// Something that can ask a running operation to halt
pub trait StopRequest {
    /// Check if a stop has been requested
    fn is_requested(&self) -> bool;
}

impl<T: StopRequest + ?Sized> StopRequest for &T {
    fn is_requested(&self) -> bool {
        (**self).is_requested()
    }
}

/// Raw flag: set means stop
impl StopRequest for AtomicBool {
    fn is_requested(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// Stop source that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStop;

impl StopRequest for NeverStop {
    fn is_requested(&self) -> bool {
        false
    }
}
