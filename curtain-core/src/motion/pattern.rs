//! Four-phase step pattern
//!
//! A unipolar stepper behind a ULN2003 is driven by energising its four
//! coil lines in a fixed rotating pattern. The table is walked cyclically:
//! forward reads entries 0, 1, 2, 3, 0, ... and reverse reads 3, 2, 1, 0,
//! 3, ... so both directions share one lookup and cannot drift apart.

/// Output lines driven by the pattern
pub const LINE_COUNT: usize = 4;

/// Entries in one full cycle of the pattern
pub const PHASE_COUNT: usize = 4;

/// Line levels for one sub-step (`true` = high)
pub type Phase = [bool; LINE_COUNT];

/// Rotation direction through the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Entries 0 → 3, opens the curtain
    Forward,
    /// Entries 3 → 0, closes the curtain
    Reverse,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Immutable cyclic table of phase vectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPattern {
    phases: [Phase; PHASE_COUNT],
}

/// Two-phase-on full stepping for the 28BYJ-48
pub static FULL_STEP: StepPattern = StepPattern::new([
    [true, false, false, true],
    [true, true, false, false],
    [false, true, true, false],
    [false, false, true, true],
]);

impl StepPattern {
    /// Create a pattern from its four phases
    pub const fn new(phases: [Phase; PHASE_COUNT]) -> Self {
        Self { phases }
    }

    /// Table entry used for the given sub-step of a traversal
    pub fn entry_for(direction: Direction, sub_step: u32) -> usize {
        let k = sub_step as usize % PHASE_COUNT;
        match direction {
            Direction::Forward => k,
            Direction::Reverse => PHASE_COUNT - 1 - k,
        }
    }

    /// Phase at a table entry (wraps)
    pub fn phase(&self, entry: usize) -> &Phase {
        &self.phases[entry % PHASE_COUNT]
    }

    /// Phase emitted at the given sub-step of a traversal
    pub fn phase_at(&self, direction: Direction, sub_step: u32) -> &Phase {
        self.phase(Self::entry_for(direction, sub_step))
    }

    /// All phases in table order
    pub fn phases(&self) -> &[Phase; PHASE_COUNT] {
        &self.phases
    }
}
