//! Slow bring-up sequences for checking one register on its own.
//!
//! Shift and latch clocks are driven together, so every step also latches and
//! the outputs trail the shifted bits by one step. At the default step time
//! each change is visible for a full second.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};

use crate::config::PROBE_STEP_MS;
use crate::error::Result;
use crate::lines::{ChainLines, Signal};

const PROBE_SETTLE_US: u32 = 10;

/// What a probe cycle shifts through the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Eight ones then eight zeros: outputs fill up, then drain. Used on the
    /// column register.
    FillDrain,
    /// A single one followed by seven zeros: one output at a time. Used on
    /// the row register.
    OneHot,
}

impl Walk {
    pub const fn steps(self) -> usize {
        match self {
            Walk::FillDrain => 16,
            Walk::OneHot => 8,
        }
    }

    /// Serial data for step `step` of a cycle.
    pub const fn bit(self, step: usize) -> bool {
        match self {
            Walk::FillDrain => step % 16 < 8,
            Walk::OneHot => step % 8 == 0,
        }
    }
}

pub struct RegisterProbe<L, D> {
    lines: L,
    delay: D,
    walk: Walk,
    step_ms: u32,
}

impl<L, D> RegisterProbe<L, D>
where
    L: ChainLines,
    D: DelayUs<u32> + DelayMs<u32>,
{
    pub fn new(lines: L, delay: D, walk: Walk) -> Self {
        Self {
            lines,
            delay,
            walk,
            step_ms: PROBE_STEP_MS,
        }
    }

    pub fn with_step_ms(self, step_ms: u32) -> Self {
        Self { step_ms, ..self }
    }

    pub fn release(self) -> (L, D) {
        (self.lines, self.delay)
    }

    /// Clears the register through SRCLR with both clocks pulsed once.
    pub fn clear(&mut self) -> Result<(), L::Error> {
        self.lines.clear_line(Signal::Clear)?;
        self.clocks(false)?;
        self.delay.delay_us(PROBE_SETTLE_US);
        self.clocks(true)?;
        self.delay.delay_us(PROBE_SETTLE_US);
        self.lines.set_line(Signal::Clear)
    }

    /// Runs one full walk.
    pub fn cycle(&mut self) -> Result<(), L::Error> {
        for step in 0..self.walk.steps() {
            let bit = self.walk.bit(step);
            self.step(bit)?;
        }
        Ok(())
    }

    fn step(&mut self, bit: bool) -> Result<(), L::Error> {
        self.lines.write_line(Signal::SerialData, bit)?;
        self.clocks(false)?;
        self.delay.delay_ms(self.step_ms);
        self.clocks(true)?;
        self.delay.delay_ms(self.step_ms);
        Ok(())
    }

    /// Both clocks to one level. Latch first on the way up, see
    /// `MatrixDriver` for why.
    fn clocks(&mut self, high: bool) -> Result<(), L::Error> {
        self.lines.write_line(Signal::LatchClock, high)?;
        self.lines.write_line(Signal::ShiftClock, high)
    }
}
