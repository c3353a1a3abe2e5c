//! Run/stop control and the polling loop
//!
//! [`RunControl`] is the only thing shared between the control thread and
//! the process's signal handler. The handler calls
//! [`request_stop`](RunControl::request_stop); the loop notices at the next
//! cycle boundary and the motor notices after its current sub-step.

use core::sync::atomic::{AtomicU8, Ordering};

use embedded_hal::delay::DelayNs;
use log::{error, info};

use super::{CurtainController, CycleAction, CycleError};
use crate::traits::{Button, CurtainDriver, LightSensor, StopRequest};

/// Polling loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Loop may run (or is running)
    Running,
    /// Stop requested, loop has not finished cleanup yet
    Stopping,
    /// Loop exited and hardware was released
    Stopped,
}

impl RunState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => RunState::Running,
            1 => RunState::Stopping,
            _ => RunState::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            RunState::Running => 0,
            RunState::Stopping => 1,
            RunState::Stopped => 2,
        }
    }
}

/// Run/stop control shared with the hosting process
///
/// Usable from a `static`. Starts out [`RunState::Running`] so a stop
/// requested before the loop starts is honoured.
#[derive(Debug)]
pub struct RunControl {
    state: AtomicU8,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl {
    /// Create a control in the running state
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(0),
        }
    }

    /// Current state
    pub fn state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Check if the loop should keep going
    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Ask the loop (and any traversal in progress) to halt
    ///
    /// Safe to call from a signal handler, and more than once.
    pub fn request_stop(&self) {
        if self.state() == RunState::Running {
            self.set(RunState::Stopping);
        }
    }

    /// Allow the loop to run again after it stopped
    pub fn resume(&self) {
        self.set(RunState::Running);
    }

    fn mark_stopped(&self) {
        self.set(RunState::Stopped);
    }

    fn set(&self, state: RunState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }
}

impl StopRequest for RunControl {
    fn is_requested(&self) -> bool {
        !self.is_running()
    }
}

impl<M, O, C, L> CurtainController<M, O, C, L>
where
    M: CurtainDriver,
    O: Button,
    C: Button<Error = O::Error>,
    L: LightSensor,
{
    /// Poll until a stop is requested or a hardware fault occurs
    ///
    /// Each iteration runs one cycle then waits the polling interval.
    /// [`shutdown`](Self::shutdown) runs on every exit path; a cycle error
    /// takes precedence over a cleanup error in the result.
    pub fn run<D: DelayNs>(
        &mut self,
        delay: &mut D,
        control: &RunControl,
    ) -> Result<(), CycleError<M, O, L>> {
        info!("SmartCurtains is running");
        let mut cycles: u64 = 0;

        let result = loop {
            if !control.is_running() {
                info!("Stop requested after {} cycles", cycles);
                break Ok(());
            }
            match self.run_cycle() {
                Ok(CycleAction::Idle) => {}
                Ok(action) => info!("Cycle {}: {:?}", cycles, action),
                Err(e) => {
                    error!("Hardware fault on cycle {}, shutting down", cycles);
                    break Err(e);
                }
            }
            cycles += 1;
            delay.delay_ms(self.config.poll_interval_ms);
        };

        let cleanup = self.shutdown();
        control.mark_stopped();
        result.and(cleanup)
    }
}
