//! Wiring the configured pins and bus to the drivers

use anyhow::{Context, Result};
use curtain_core::config::PinConfig;
use curtain_core::controller::{CurtainController, RunControl};
use curtain_drivers::input::GpioButton;
use curtain_drivers::sensor::Bh1750;
use curtain_drivers::stepper::Uln2003Stepper;
use curtain_hal_linux::{Delay, LinuxBoard, LinuxI2c, LinuxInput, LinuxOutput};
use log::info;

use crate::config::DaemonConfig;

/// Curtain motor as wired on the board
pub type Motor = Uln2003Stepper<LinuxOutput, Delay, &'static RunControl>;

/// Button as wired on the board
pub type BoardButton = GpioButton<LinuxInput>;

/// Controller with every collaborator on real hardware
pub type Controller = CurtainController<Motor, BoardButton, BoardButton, Bh1750<LinuxI2c>>;

fn motor_line(board: &mut LinuxBoard, pin: &PinConfig) -> Result<LinuxOutput> {
    board
        .output(pin)
        .with_context(|| format!("failed to claim motor line gpio{}", pin.pin))
}

fn button(board: &mut LinuxBoard, pin: &PinConfig, samples: u8, name: &str) -> Result<BoardButton> {
    let line = board
        .input(pin)
        .with_context(|| format!("failed to claim {} button on gpio{}", name, pin.pin))?;
    let button = if pin.inverted {
        GpioButton::active_low(line)
    } else {
        GpioButton::new(line)
    };
    Ok(button.with_debounce(samples))
}

/// Claim every pin and the bus, and build the controller
///
/// The motor aborts a traversal as soon as `control` leaves the running
/// state.
pub fn build(config: &DaemonConfig, control: &'static RunControl) -> Result<Controller> {
    let hw = &config.curtain.hardware;
    let mut board = LinuxBoard::new().context("failed to open the GPIO controller")?;

    let [a, b, c, d] = &hw.motor_pins;
    let lines = [
        motor_line(&mut board, a)?,
        motor_line(&mut board, b)?,
        motor_line(&mut board, c)?,
        motor_line(&mut board, d)?,
    ];
    let motor = Uln2003Stepper::new(lines, Delay::new(), config.curtain.motor)
        .with_stop_request(control);

    let open = button(&mut board, &hw.open_button, config.debounce_samples, "open")?;
    let close = button(&mut board, &hw.close_button, config.debounce_samples, "close")?;

    let sensor_hw = hw.light_sensor;
    let bus = board
        .i2c(sensor_hw.bus)
        .with_context(|| format!("failed to open I2C bus {}", sensor_hw.bus))?;
    let sensor = Bh1750::new(bus, sensor_hw.address)?;

    info!("Hardware claimed");
    Ok(CurtainController::new(
        motor,
        open,
        close,
        sensor,
        config.curtain.controller,
    ))
}
