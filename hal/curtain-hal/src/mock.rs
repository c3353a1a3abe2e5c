//! Simulated GPIO lines and I2C bus for host-side testing
//!
//! Output lines share a [`LineJournal`] that records every write in order,
//! so tests can replay exactly what a driver put on the wire. Input lines
//! and the bus are cheap handles: clone one, give it to the driver, and
//! keep the other to drive or inspect the simulation.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use crate::gpio::{InputPin, OutputPin};
use crate::i2c::I2cBus;

/// Errors reported by simulated hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// Injected hardware fault
    Fault,
    /// Access after the pin was released
    Released,
    /// No scripted response queued for a bus read
    Nack,
}

impl core::fmt::Display for MockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MockError::Fault => f.write_str("simulated hardware fault"),
            MockError::Released => f.write_str("pin already released"),
            MockError::Nack => f.write_str("no device response"),
        }
    }
}

/// A single recorded line write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWrite {
    /// Index of the line within its journal
    pub line: usize,
    /// Level written
    pub high: bool,
}

#[derive(Debug, Default)]
struct JournalInner {
    writes: Vec<LineWrite>,
    fail_after: Option<usize>,
}

/// Shared, ordered record of writes made through a set of output lines
#[derive(Debug, Clone, Default)]
pub struct LineJournal {
    inner: Rc<RefCell<JournalInner>>,
}

impl LineJournal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an output line recording into this journal
    pub fn output(&self, line: usize) -> MockOutputPin {
        MockOutputPin {
            line,
            high: false,
            journal: self.clone(),
        }
    }

    /// Create `N` output lines numbered `0..N`
    pub fn outputs<const N: usize>(&self) -> [MockOutputPin; N] {
        core::array::from_fn(|line| self.output(line))
    }

    /// All writes so far, in order
    pub fn writes(&self) -> Vec<LineWrite> {
        self.inner.borrow().writes.clone()
    }

    /// Number of writes so far
    pub fn len(&self) -> usize {
        self.inner.borrow().writes.len()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget recorded writes (the fault limit is kept)
    pub fn clear(&self) {
        self.inner.borrow_mut().writes.clear();
    }

    /// Make every write after the first `writes` fail with [`MockError::Fault`]
    pub fn fail_after(&self, writes: usize) {
        self.inner.borrow_mut().fail_after = Some(writes);
    }

    /// Group the recorded writes into frames of `N` consecutive writes
    ///
    /// Each frame holds the level written to each line, indexed by line.
    /// A trailing partial frame is dropped.
    pub fn frames<const N: usize>(&self) -> Vec<[bool; N]> {
        self.inner
            .borrow()
            .writes
            .chunks_exact(N)
            .map(|chunk| {
                let mut frame = [false; N];
                for write in chunk {
                    if write.line < N {
                        frame[write.line] = write.high;
                    }
                }
                frame
            })
            .collect()
    }

    fn record(&self, line: usize, high: bool) -> Result<(), MockError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(limit) = inner.fail_after {
            if inner.writes.len() >= limit {
                return Err(MockError::Fault);
            }
        }
        inner.writes.push(LineWrite { line, high });
        Ok(())
    }
}

/// Simulated output line
#[derive(Debug)]
pub struct MockOutputPin {
    line: usize,
    high: bool,
    journal: LineJournal,
}

impl MockOutputPin {
    /// Line index within the journal
    pub fn line(&self) -> usize {
        self.line
    }
}

impl OutputPin for MockOutputPin {
    type Error = MockError;

    fn set_high(&mut self) -> Result<(), MockError> {
        self.journal.record(self.line, true)?;
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), MockError> {
        self.journal.record(self.line, false)?;
        self.high = false;
        Ok(())
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Simulated input line
///
/// Clones share the same level, so a test keeps one handle and drives
/// the level while the driver reads through the other.
#[derive(Debug, Clone, Default)]
pub struct MockInputPin {
    level: Rc<Cell<bool>>,
    faulty: Rc<Cell<bool>>,
    released: Rc<Cell<bool>>,
}

impl MockInputPin {
    /// Create an input line reading low
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level the line will read
    pub fn drive(&self, high: bool) {
        self.level.set(high);
    }

    /// Make subsequent reads fail with [`MockError::Fault`]
    pub fn inject_fault(&self) {
        self.faulty.set(true);
    }

    /// Whether `release` has been called
    pub fn is_released(&self) -> bool {
        self.released.get()
    }
}

impl InputPin for MockInputPin {
    type Error = MockError;

    fn is_high(&mut self) -> Result<bool, MockError> {
        if self.released.get() {
            return Err(MockError::Released);
        }
        if self.faulty.get() {
            return Err(MockError::Fault);
        }
        Ok(self.level.get())
    }

    fn release(&mut self) -> Result<(), MockError> {
        self.released.set(true);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct BusInner {
    writes: Vec<(u8, Vec<u8>)>,
    responses: VecDeque<Vec<u8>>,
    faulty: bool,
}

/// Simulated I2C bus with scripted read responses
#[derive(Debug, Clone, Default)]
pub struct MockI2c {
    inner: Rc<RefCell<BusInner>>,
}

impl MockI2c {
    /// Create a bus with no queued responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the bytes returned by the next read
    pub fn queue_read(&self, bytes: &[u8]) {
        self.inner.borrow_mut().responses.push_back(bytes.to_vec());
    }

    /// All writes so far as `(address, bytes)`
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.inner.borrow().writes.clone()
    }

    /// Make every subsequent transfer fail with [`MockError::Fault`]
    pub fn inject_fault(&self) {
        self.inner.borrow_mut().faulty = true;
    }
}

impl I2cBus for MockI2c {
    type Error = MockError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), MockError> {
        let mut inner = self.inner.borrow_mut();
        if inner.faulty {
            return Err(MockError::Fault);
        }
        inner.writes.push((address, data.to_vec()));
        Ok(())
    }

    fn read(&mut self, _address: u8, buf: &mut [u8]) -> Result<(), MockError> {
        let mut inner = self.inner.borrow_mut();
        if inner.faulty {
            return Err(MockError::Fault);
        }
        let response = inner.responses.pop_front().ok_or(MockError::Nack)?;
        for (dst, src) in buf.iter_mut().zip(response.iter()) {
            *dst = *src;
        }
        Ok(())
    }
}
