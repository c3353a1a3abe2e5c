//! Simulated collaborators for controller tests

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::CurtainController;
use crate::config::ControllerConfig;
use crate::motion::{CurtainPosition, MotionOutcome};
use crate::traits::{Button, CurtainDriver, LightSensor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault;

/// Motor that completes instantly and counts calls
#[derive(Debug, Default)]
pub struct MockMotor {
    pub opens: u32,
    pub closes: u32,
    pub stops: u32,
    pub releases: u32,
    pub position: CurtainPosition,
    pub moving: bool,
    pub fail_motion: bool,
    pub fail_release: bool,
}

impl MockMotor {
    fn traverse(&mut self, target: CurtainPosition) -> Result<MotionOutcome, Fault> {
        if self.fail_motion {
            return Err(Fault);
        }
        if self.moving {
            return Ok(MotionOutcome::Busy);
        }
        self.position = target;
        Ok(MotionOutcome::Completed)
    }
}

impl CurtainDriver for MockMotor {
    type Error = Fault;

    fn open(&mut self) -> Result<MotionOutcome, Fault> {
        self.opens += 1;
        self.traverse(CurtainPosition::Open)
    }

    fn close(&mut self) -> Result<MotionOutcome, Fault> {
        self.closes += 1;
        self.traverse(CurtainPosition::Closed)
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.moving = false;
    }

    fn position(&self) -> CurtainPosition {
        self.position
    }

    fn is_moving(&self) -> bool {
        self.moving
    }

    fn release(&mut self) -> Result<(), Fault> {
        self.releases += 1;
        if self.fail_release {
            Err(Fault)
        } else {
            Ok(())
        }
    }
}

/// Button handle; clones share state
#[derive(Debug, Clone, Default)]
pub struct MockButton {
    pressed: Rc<Cell<bool>>,
    released: Rc<Cell<bool>>,
    failing: Rc<Cell<bool>>,
}

impl MockButton {
    pub fn press(&self, pressed: bool) {
        self.pressed.set(pressed);
    }

    pub fn fail(&self) {
        self.failing.set(true);
    }

    pub fn released(&self) -> bool {
        self.released.get()
    }
}

impl Button for MockButton {
    type Error = Fault;

    fn is_pressed(&mut self) -> Result<bool, Fault> {
        if self.failing.get() {
            return Err(Fault);
        }
        Ok(self.pressed.get())
    }

    fn release(&mut self) -> Result<(), Fault> {
        self.released.set(true);
        Ok(())
    }
}

/// Sensor replaying a fixed list of readings, then failing
#[derive(Debug, Default)]
pub struct MockLight {
    readings: VecDeque<f32>,
}

impl LightSensor for MockLight {
    type Error = Fault;

    fn read_lux(&mut self) -> Result<f32, Fault> {
        self.readings.pop_front().ok_or(Fault)
    }
}

pub type TestController = CurtainController<MockMotor, MockButton, MockButton, MockLight>;

pub fn controller_with_buttons(readings: &[f32]) -> (MockButton, MockButton, TestController) {
    let open = MockButton::default();
    let close = MockButton::default();
    let light = MockLight {
        readings: readings.iter().copied().collect(),
    };
    let controller = CurtainController::new(
        MockMotor::default(),
        open.clone(),
        close.clone(),
        light,
        ControllerConfig::default(),
    );
    (open, close, controller)
}

pub fn controller_with(readings: &[f32]) -> TestController {
    controller_with_buttons(readings).2
}
