//! Curtain polling controller
//!
//! Arbitrates between the open button, the close button and the light
//! threshold, issuing at most one motor command per cycle. Priority is
//! open button, then close button, then light; the light sensor is only
//! consulted on cycles where neither button is held.
//!
//! The controller keeps no state of its own between cycles. There is no
//! edge detection: a held button re-issues its command every cycle, and the
//! motor's busy check is what keeps a traversal from being restarted.

mod error;
mod run;

#[cfg(test)]
mod testing;

pub use error::{ControllerError, CycleError};
pub use run::{RunControl, RunState};

use log::{debug, info};

use crate::config::ControllerConfig;
use crate::motion::MotionOutcome;
use crate::traits::{Button, CurtainDriver, LightSensor};

/// What caused an open command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Open button held
    Button,
    /// Light reading above threshold
    Light,
}

/// Motor command issued during one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleAction {
    /// No command issued
    Idle,
    /// `open()` called
    Open(Trigger, MotionOutcome),
    /// `close()` called from the close button
    Close(MotionOutcome),
}

/// Polling controller owning the motor and its input collaborators
pub struct CurtainController<M, O, C, L> {
    motor: M,
    open_button: O,
    close_button: C,
    light_sensor: L,
    config: ControllerConfig,
}

impl<M, O, C, L> CurtainController<M, O, C, L>
where
    M: CurtainDriver,
    O: Button,
    C: Button<Error = O::Error>,
    L: LightSensor,
{
    /// Create a controller and put the motor in a known (idle) state
    pub fn new(
        mut motor: M,
        open_button: O,
        close_button: C,
        light_sensor: L,
        config: ControllerConfig,
    ) -> Self {
        motor.stop();
        info!(
            "Curtain controller ready: threshold {} lux, poll {} ms, curtain assumed {}",
            config.light_threshold_lux,
            config.poll_interval_ms,
            motor.position()
        );
        Self {
            motor,
            open_button,
            close_button,
            light_sensor,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Get the motor
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// Get the motor mutably
    pub fn motor_mut(&mut self) -> &mut M {
        &mut self.motor
    }

    /// Take the collaborators back
    pub fn into_parts(self) -> (M, O, C, L) {
        (
            self.motor,
            self.open_button,
            self.close_button,
            self.light_sensor,
        )
    }

    /// Read the light sensor and open if the reading is above threshold
    ///
    /// Returns `None` when no command was issued: reading at or below the
    /// threshold, or the curtain already open or moving.
    pub fn check_light_and_open(
        &mut self,
    ) -> Result<Option<MotionOutcome>, CycleError<M, O, L>> {
        let lux = self
            .light_sensor
            .read_lux()
            .map_err(ControllerError::LightSensor)?;
        debug!("Light level: {} lux", lux);

        if !self.config.exceeds_threshold(lux) {
            return Ok(None);
        }
        if self.motor.is_open() || self.motor.is_moving() {
            return Ok(None);
        }

        info!(
            "Light level {} lux above {} lux, opening the curtain",
            lux, self.config.light_threshold_lux
        );
        self.motor
            .open()
            .map(Some)
            .map_err(ControllerError::Motor)
    }

    /// Run one polling cycle
    pub fn run_cycle(&mut self) -> Result<CycleAction, CycleError<M, O, L>> {
        if self
            .open_button
            .is_pressed()
            .map_err(ControllerError::Button)?
        {
            info!("Open button pressed, opening the curtain");
            let outcome = self.motor.open().map_err(ControllerError::Motor)?;
            return Ok(CycleAction::Open(Trigger::Button, outcome));
        }

        if self
            .close_button
            .is_pressed()
            .map_err(ControllerError::Button)?
        {
            info!("Close button pressed, closing the curtain");
            let outcome = self.motor.close().map_err(ControllerError::Motor)?;
            return Ok(CycleAction::Close(outcome));
        }

        Ok(match self.check_light_and_open()? {
            Some(outcome) => CycleAction::Open(Trigger::Light, outcome),
            None => CycleAction::Idle,
        })
    }

    /// Stop the motor and release every line the controller owns
    ///
    /// All releases are attempted even if one fails; the first failure is
    /// returned.
    pub fn shutdown(&mut self) -> Result<(), CycleError<M, O, L>> {
        info!("Cleaning up hardware");
        self.motor.stop();
        let motor = self.motor.release().map_err(ControllerError::Motor);
        let open = self.open_button.release().map_err(ControllerError::Button);
        let close = self.close_button.release().map_err(ControllerError::Button);
        motor.and(open).and(close)
    }
}
