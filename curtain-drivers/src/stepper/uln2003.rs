//! ULN2003 curtain stepper (28BYJ-48)
//!
//! The ULN2003 darlington board has no step/dir interface: the host drives
//! its four inputs directly, one [`Phase`] of the step pattern per sub-step.
//! This driver owns the four lines and a blocking delay, walks the pattern
//! forward to open and in reverse to close, and tracks motion state and the
//! assumed curtain position.
//!
//! # Motion model
//!
//! - A traversal is `cycles_per_traversal` full cycles of the pattern, each
//!   cycle four sub-steps, each sub-step four line writes followed by the
//!   inter-step delay.
//! - Requests while a traversal is in progress are rejected as busy.
//! - The position only changes when a traversal runs to completion. A stop
//!   request or a line fault leaves it where it was. Nothing verifies that
//!   the curtain actually reached the end of its track.
//!
//! # Usage
//!
//! ```ignore
//! let mut motor = Uln2003Stepper::new(lines, delay, MotorConfig::default())
//!     .with_stop_request(&RUN_CONTROL);
//! motor.open()?; // blocks for the whole traversal
//!
//! // Or in bounded batches:
//! motor.begin(Direction::Reverse);
//! while let Progress::InFlight { .. } = motor.advance(64)? {}
//! ```

use embedded_hal::delay::DelayNs;
use log::{info, trace, warn};

use curtain_core::config::MotorConfig;
use curtain_core::motion::{
    CurtainPosition, Direction, MotionOutcome, MotorState, Phase, Progress, StepPattern,
    FULL_STEP, LINE_COUNT, PHASE_COUNT,
};
use curtain_core::traits::{CurtainDriver, NeverStop, StopRequest};
use curtain_hal::OutputPin;

/// Four-line unipolar stepper moving a curtain
pub struct Uln2003Stepper<P, D, S = NeverStop> {
    /// IN1..IN4, in pattern column order
    lines: [P; LINE_COUNT],
    delay: D,
    stop_request: S,
    pattern: &'static StepPattern,
    config: MotorConfig,
    state: MotorState,
    position: CurtainPosition,
    /// Sub-steps emitted in the current traversal
    emitted: u32,
}

impl<P, D> Uln2003Stepper<P, D, NeverStop> {
    /// Create a stepper with the full-step pattern and the curtain assumed closed
    pub fn new(lines: [P; LINE_COUNT], delay: D, config: MotorConfig) -> Self {
        Self {
            lines,
            delay,
            stop_request: NeverStop,
            pattern: &FULL_STEP,
            config,
            state: MotorState::Idle,
            position: CurtainPosition::Closed,
            emitted: 0,
        }
    }
}

impl<P, D, S> Uln2003Stepper<P, D, S> {
    /// Poll `stop_request` before every sub-step and abort when it fires
    pub fn with_stop_request<T: StopRequest>(self, stop_request: T) -> Uln2003Stepper<P, D, T> {
        Uln2003Stepper {
            lines: self.lines,
            delay: self.delay,
            stop_request,
            pattern: self.pattern,
            config: self.config,
            state: self.state,
            position: self.position,
            emitted: self.emitted,
        }
    }

    /// Use a different step pattern
    pub fn with_pattern(mut self, pattern: &'static StepPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the assumed starting position
    pub fn with_position(mut self, position: CurtainPosition) -> Self {
        self.position = position;
        self
    }

    /// Get the current motion state
    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Get the configuration
    pub fn config(&self) -> &MotorConfig {
        &self.config
    }

    /// Sub-steps left in the current traversal (0 when idle)
    pub fn remaining_sub_steps(&self) -> u32 {
        if self.state.is_moving() {
            self.config.sub_steps().saturating_sub(self.emitted)
        } else {
            0
        }
    }

    /// Get the output lines
    pub fn lines(&self) -> &[P; LINE_COUNT] {
        &self.lines
    }

    /// Take the output lines back
    pub fn into_lines(self) -> [P; LINE_COUNT] {
        self.lines
    }
}

impl<P, D, S> Uln2003Stepper<P, D, S>
where
    P: OutputPin,
    D: DelayNs,
    S: StopRequest,
{
    /// Start a traversal without emitting anything
    ///
    /// Returns `false` (and changes nothing) if a traversal is already in
    /// progress.
    pub fn begin(&mut self, direction: Direction) -> bool {
        if self.state.is_moving() {
            warn!(
                "Motor is already moving ({}), ignoring {:?} request",
                self.state, direction
            );
            return false;
        }

        self.state = MotorState::moving(direction);
        self.emitted = 0;
        info!(
            "Motor {}: {} sub-steps, {} us apart",
            self.state,
            self.config.sub_steps(),
            self.config.step_delay_us
        );
        true
    }

    /// Emit at most `max_sub_steps` sub-steps of the current traversal
    ///
    /// The stop request is checked before each sub-step, so a stop takes
    /// effect within one inter-step delay. On a line fault the motor drops
    /// to idle before the error is returned.
    pub fn advance(&mut self, max_sub_steps: u32) -> Result<Progress, P::Error> {
        let Some(direction) = self.state.direction() else {
            return Ok(Progress::Idle);
        };
        let total = self.config.sub_steps();
        let mut budget = max_sub_steps;

        while budget > 0 && self.emitted < total {
            if self.stop_request.is_requested() {
                info!(
                    "Stop requested while {} at sub-step {}/{}",
                    self.state, self.emitted, total
                );
                self.state = MotorState::Idle;
                self.emitted = 0;
                self.release_lines()?;
                return Ok(Progress::Aborted);
            }

            let phase = *self.pattern.phase_at(direction, self.emitted);
            if let Err(e) = self.write_phase(&phase) {
                warn!(
                    "Line write failed while {} at sub-step {}/{}",
                    self.state, self.emitted, total
                );
                self.state = MotorState::Idle;
                self.emitted = 0;
                return Err(e);
            }

            self.emitted += 1;
            budget -= 1;
            self.delay.delay_us(self.config.step_delay_us);
        }

        if self.emitted < total {
            return Ok(Progress::InFlight {
                remaining: total - self.emitted,
            });
        }

        self.state = MotorState::Idle;
        self.emitted = 0;
        self.position = CurtainPosition::reached_by(direction);
        info!("Curtain is {}", self.position);
        Ok(Progress::Completed)
    }

    fn traverse(&mut self, direction: Direction) -> Result<MotionOutcome, P::Error> {
        if !self.begin(direction) {
            return Ok(MotionOutcome::Busy);
        }
        loop {
            match self.advance(PHASE_COUNT as u32)? {
                Progress::InFlight { .. } => {}
                Progress::Completed => return Ok(MotionOutcome::Completed),
                Progress::Aborted | Progress::Idle => return Ok(MotionOutcome::Aborted),
            }
        }
    }

    fn write_phase(&mut self, phase: &Phase) -> Result<(), P::Error> {
        for (line, level) in self.lines.iter_mut().zip(phase.iter()) {
            line.set_state(*level)?;
        }
        trace!("phase {:?}", phase);
        Ok(())
    }

    fn release_lines(&mut self) -> Result<(), P::Error> {
        let mut result = Ok(());
        for line in self.lines.iter_mut() {
            let written = line.set_low();
            if result.is_ok() {
                result = written;
            }
        }
        result
    }
}

impl<P, D, S> CurtainDriver for Uln2003Stepper<P, D, S>
where
    P: OutputPin,
    D: DelayNs,
    S: StopRequest,
{
    type Error = P::Error;

    fn open(&mut self) -> Result<MotionOutcome, P::Error> {
        self.traverse(Direction::Forward)
    }

    fn close(&mut self) -> Result<MotionOutcome, P::Error> {
        self.traverse(Direction::Reverse)
    }

    fn stop(&mut self) {
        if self.state.is_moving() {
            info!(
                "Motor stopped while {} after {} sub-steps",
                self.state, self.emitted
            );
        }
        self.state = MotorState::Idle;
        self.emitted = 0;
    }

    fn position(&self) -> CurtainPosition {
        self.position
    }

    fn is_moving(&self) -> bool {
        self.state.is_moving()
    }

    fn release(&mut self) -> Result<(), P::Error> {
        self.release_lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::cell::Cell;
    use core::sync::atomic::{AtomicBool, Ordering};

    use curtain_hal::mock::{LineJournal, MockError, MockOutputPin};
    use proptest::prelude::*;

    #[derive(Default)]
    struct CountingDelay {
        total_us: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_us += ns as u64 / 1000;
        }
    }

    /// Stop source that fires once it has been polled `after` times
    struct StopAfterChecks {
        left: Cell<u32>,
    }

    impl StopAfterChecks {
        fn new(after: u32) -> Self {
            Self {
                left: Cell::new(after),
            }
        }
    }

    impl StopRequest for StopAfterChecks {
        fn is_requested(&self) -> bool {
            let left = self.left.get();
            if left == 0 {
                true
            } else {
                self.left.set(left - 1);
                false
            }
        }
    }

    type TestStepper = Uln2003Stepper<MockOutputPin, CountingDelay>;

    fn stepper(cycles: u32) -> (LineJournal, TestStepper) {
        let journal = LineJournal::new();
        let config = MotorConfig {
            cycles_per_traversal: cycles,
            step_delay_us: 10_000,
        };
        let motor = Uln2003Stepper::new(journal.outputs(), CountingDelay::default(), config);
        (journal, motor)
    }

    fn expected_forward(sub_steps: usize) -> Vec<Phase> {
        (0..sub_steps).map(|k| *FULL_STEP.phase(k)).collect()
    }

    #[test]
    fn test_initial_state() {
        let (journal, motor) = stepper(2);

        assert_eq!(motor.state(), MotorState::Idle);
        assert!(!motor.is_moving());
        assert!(!motor.is_open());
        assert_eq!(motor.remaining_sub_steps(), 0);
        assert!(journal.is_empty());
    }

    #[test]
    fn test_open_runs_full_traversal() {
        let (journal, mut motor) = stepper(3);

        assert_eq!(motor.open(), Ok(MotionOutcome::Completed));
        assert!(motor.is_open());
        assert!(!motor.is_moving());

        assert_eq!(journal.frames::<4>(), expected_forward(12));
        assert_eq!(journal.len(), 12 * LINE_COUNT);
        assert_eq!(motor.delay.total_us, 12 * 10_000);
    }

    #[test]
    fn test_default_traversal_length() {
        let journal = LineJournal::new();
        let mut motor = Uln2003Stepper::new(
            journal.outputs(),
            CountingDelay::default(),
            MotorConfig::default(),
        );

        motor.open().unwrap();
        assert_eq!(journal.frames::<4>().len(), 2048);
        assert_eq!(motor.delay.total_us, 2048 * 10_000);
    }

    #[test]
    fn test_close_after_open() {
        let (_journal, mut motor) = stepper(2);

        motor.open().unwrap();
        assert_eq!(motor.close(), Ok(MotionOutcome::Completed));
        assert!(!motor.is_open());
        assert!(!motor.is_moving());
    }

    #[test]
    fn test_close_is_reverse_of_open() {
        let (open_journal, mut opener) = stepper(5);
        let (close_journal, mut closer) = stepper(5);

        opener.open().unwrap();
        closer.close().unwrap();

        let mut reversed = open_journal.frames::<4>();
        reversed.reverse();
        assert_eq!(close_journal.frames::<4>(), reversed);
        assert_eq!(close_journal.frames::<4>()[0], [false, false, true, true]);
    }

    #[test]
    fn test_open_when_open_runs_again() {
        // No end-stop: the driver trusts the caller
        let (journal, mut motor) = stepper(1);

        motor.open().unwrap();
        motor.open().unwrap();
        assert_eq!(journal.frames::<4>().len(), 8);
        assert!(motor.is_open());
    }

    #[test]
    fn test_advance_in_batches() {
        let (journal, mut motor) = stepper(2);

        assert!(motor.begin(Direction::Forward));
        assert_eq!(motor.state(), MotorState::Opening);
        assert_eq!(motor.advance(3), Ok(Progress::InFlight { remaining: 5 }));
        assert_eq!(motor.remaining_sub_steps(), 5);
        assert_eq!(motor.advance(4), Ok(Progress::InFlight { remaining: 1 }));
        assert_eq!(motor.advance(4), Ok(Progress::Completed));
        assert_eq!(motor.advance(4), Ok(Progress::Idle));

        assert!(motor.is_open());
        assert_eq!(journal.frames::<4>(), expected_forward(8));
    }

    #[test]
    fn test_requests_while_moving_are_busy() {
        let (journal, mut motor) = stepper(4);

        motor.begin(Direction::Forward);
        motor.advance(6).unwrap();
        let writes = journal.len();

        assert_eq!(motor.open(), Ok(MotionOutcome::Busy));
        assert_eq!(motor.close(), Ok(MotionOutcome::Busy));
        assert!(!motor.begin(Direction::Reverse));

        assert_eq!(motor.state(), MotorState::Opening);
        assert_eq!(motor.remaining_sub_steps(), 10);
        assert_eq!(journal.len(), writes);
        assert!(!motor.is_open());
    }

    #[test]
    fn test_stop_mid_traversal_keeps_position() {
        let (_journal, mut motor) = stepper(4);

        motor.begin(Direction::Forward);
        motor.advance(5).unwrap();
        motor.stop();

        assert_eq!(motor.state(), MotorState::Idle);
        assert!(!motor.is_open());
        assert_eq!(motor.advance(4), Ok(Progress::Idle));
    }

    #[test]
    fn test_restart_after_stop_begins_at_first_phase() {
        let (journal, mut motor) = stepper(1);

        motor.begin(Direction::Forward);
        motor.advance(3).unwrap();
        motor.stop();
        journal.clear();

        motor.open().unwrap();
        assert_eq!(journal.frames::<4>(), expected_forward(4));
    }

    #[test]
    fn test_assumed_start_position() {
        let (_journal, motor) = stepper(1);
        let motor = motor.with_position(CurtainPosition::Open);
        assert!(motor.is_open());
    }

    #[test]
    fn test_stop_request_aborts_and_releases() {
        let journal = LineJournal::new();
        let mut motor = Uln2003Stepper::new(
            journal.outputs(),
            CountingDelay::default(),
            MotorConfig::default(),
        )
        .with_stop_request(StopAfterChecks::new(5));

        assert_eq!(motor.open(), Ok(MotionOutcome::Aborted));
        assert_eq!(motor.state(), MotorState::Idle);
        assert!(!motor.is_open());

        // Five sub-steps, then one release frame
        let frames = journal.frames::<4>();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[5], [false; 4]);
        assert!(motor.lines().iter().all(|line| line.is_set_low()));
        assert_eq!(motor.delay.total_us, 5 * 10_000);
    }

    #[test]
    fn test_stop_requested_before_start_emits_nothing() {
        let flag = AtomicBool::new(true);
        let (journal, motor) = stepper(2);
        let mut motor = motor.with_stop_request(&flag);

        assert_eq!(motor.close(), Ok(MotionOutcome::Aborted));
        assert_eq!(journal.frames::<4>(), vec![[false; 4]]);

        flag.store(false, Ordering::Release);
        assert_eq!(motor.close(), Ok(MotionOutcome::Completed));
    }

    #[test]
    fn test_release_drives_all_low() {
        let (_journal, mut motor) = stepper(1);

        motor.open().unwrap();
        assert!(motor.lines().iter().any(|line| line.is_set_high()));

        motor.release().unwrap();
        assert!(motor.lines().iter().all(|line| line.is_set_low()));
        motor.release().unwrap();
        assert!(motor.lines().iter().all(|line| line.is_set_low()));
        assert!(motor.is_open());
    }

    #[test]
    fn test_line_fault_drops_to_idle() {
        let (journal, mut motor) = stepper(4);
        journal.fail_after(10);

        assert_eq!(motor.open(), Err(MockError::Fault));
        assert_eq!(motor.state(), MotorState::Idle);
        assert!(!motor.is_open());
    }

    #[test]
    fn test_custom_pattern() {
        static WAVE: StepPattern = StepPattern::new([
            [true, false, false, false],
            [false, true, false, false],
            [false, false, true, false],
            [false, false, false, true],
        ]);
        let (journal, motor) = stepper(1);
        let mut motor = motor.with_pattern(&WAVE);

        motor.close().unwrap();
        assert_eq!(
            journal.frames::<4>(),
            vec![
                [false, false, false, true],
                [false, false, true, false],
                [false, true, false, false],
                [true, false, false, false],
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_busy_rejection_leaves_state(
            progressed in 0u32..16,
            requests in proptest::collection::vec(any::<bool>(), 1..20),
        ) {
            let (journal, mut motor) = stepper(4);
            motor.begin(Direction::Forward);
            motor.advance(progressed).unwrap();
            let remaining = motor.remaining_sub_steps();
            let writes = journal.len();

            for open in requests {
                let outcome = if open { motor.open() } else { motor.close() };
                prop_assert_eq!(outcome, Ok(MotionOutcome::Busy));
                prop_assert_eq!(motor.state(), MotorState::Opening);
                prop_assert_eq!(motor.remaining_sub_steps(), remaining);
            }
            prop_assert_eq!(journal.len(), writes);
        }

        #[test]
        fn prop_stop_is_idempotent(calls in 0usize..50, opened in any::<bool>()) {
            let (journal, mut motor) = stepper(1);
            if opened {
                motor.open().unwrap();
            }
            let writes = journal.len();

            for _ in 0..calls {
                motor.stop();
                prop_assert_eq!(motor.state(), MotorState::Idle);
            }
            prop_assert_eq!(motor.is_open(), opened);
            prop_assert_eq!(journal.len(), writes);
        }

        #[test]
        fn prop_reverse_symmetry(cycles in 1u32..20) {
            let (open_journal, mut opener) = stepper(cycles);
            let (close_journal, mut closer) = stepper(cycles);
            opener.open().unwrap();
            closer.close().unwrap();

            let mut reversed = open_journal.frames::<4>();
            reversed.reverse();
            prop_assert_eq!(close_journal.frames::<4>(), reversed);
        }
    }
}
