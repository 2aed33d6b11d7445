//! Host model of the two latched shift registers.
//!
//! [`MatrixSim`] hands out [`SimPin`]s and a [`SimDelay`] that drive it
//! through the same `embedded-hal` traits the firmware uses, and records every
//! latch edge so tests can see what the matrix showed and for how long.

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::OutputPin;
use heapless::Vec;

use crate::config::DriverConfig;
use crate::driver::MatrixDriver;
use crate::error::Error;
use crate::lines::{ShiftChain, Signal};

pub const LOG_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    Row,
    Column,
}

/// One 8-bit serial-in, parallel-out register with a storage latch.
///
/// Bit 7 is output QA, the first stage; each shift clock moves QA towards QH.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    shift: u8,
    latch: u8,
    ser: bool,
    srclk: bool,
    rclk: bool,
    /// SRCLR level, high when released.
    clr: bool,
}

impl Register {
    pub const fn new() -> Self {
        Self {
            shift: 0,
            latch: 0,
            ser: false,
            srclk: false,
            rclk: false,
            clr: true,
        }
    }

    pub fn shifted(&self) -> u8 {
        self.shift
    }

    pub fn latched(&self) -> u8 {
        self.latch
    }

    pub fn clear_asserted(&self) -> bool {
        !self.clr
    }

    /// Applies a level change, returning true on a latch edge.
    fn drive(&mut self, signal: Signal, high: bool) -> bool {
        match signal {
            Signal::SerialData => self.ser = high,
            Signal::ShiftClock => {
                let rising = high && !self.srclk;
                self.srclk = high;
                if rising && self.clr {
                    self.shift = (self.shift >> 1) | ((self.ser as u8) << 7);
                }
            }
            Signal::LatchClock => {
                let rising = high && !self.rclk;
                self.rclk = high;
                if rising {
                    self.latch = self.shift;
                    return true;
                }
            }
            Signal::Clear => {
                self.clr = high;
                if !high {
                    self.shift = 0;
                }
            }
        }
        false
    }
}

impl Default for Register {
    fn default() -> Self {
        Self::new()
    }
}

/// State of both chains right after one latch edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latch {
    pub chain: Chain,
    pub at_us: u64,
    /// The edge happened while SRCLR was asserted.
    pub cleared: bool,
    pub rows: u8,
    pub columns: u8,
}

/// A column latch edge outside of a clear: one displayed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub at_us: u64,
    /// The selected row, `None` unless exactly one row output is on.
    pub row: Option<usize>,
    pub columns: u8,
}

#[derive(Debug, Default)]
pub struct MatrixSim {
    row: Register,
    column: Register,
    now_us: u64,
    latches: Vec<Latch, LOG_CAPACITY>,
    dropped: usize,
}

impl MatrixSim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a driver whose pins and delay all land in `sim`.
    pub fn driver(sim: &RefCell<Self>, config: DriverConfig) -> SimDriver<'_> {
        MatrixDriver::new(
            Self::chain(sim, Chain::Row),
            Self::chain(sim, Chain::Column),
            SimDelay(sim),
            config,
        )
    }

    pub fn chain(sim: &RefCell<Self>, chain: Chain) -> SimChain<'_> {
        let pin = |signal| SimPin { sim, chain, signal };
        match ShiftChain::new(
            pin(Signal::SerialData),
            pin(Signal::ShiftClock),
            pin(Signal::LatchClock),
            pin(Signal::Clear),
        ) {
            Ok(chain) => chain,
            Err(Error::Line { source, .. }) => match source {},
        }
    }

    pub fn delay(sim: &RefCell<Self>) -> SimDelay<'_> {
        SimDelay(sim)
    }

    /// Puts arbitrary contents in both registers, as after power-up.
    pub fn preload(&mut self, rows: u8, columns: u8) {
        self.row.shift = rows;
        self.row.latch = rows;
        self.column.shift = columns;
        self.column.latch = columns;
    }

    pub fn register(&self, chain: Chain) -> &Register {
        match chain {
            Chain::Row => &self.row,
            Chain::Column => &self.column,
        }
    }

    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    pub fn is_dark(&self) -> bool {
        self.row.latch == 0 && self.column.latch == 0
    }

    /// Currently lit row and its columns.
    pub fn visible(&self) -> Option<(usize, u8)> {
        match (select_row(self.row.latch), self.column.latch) {
            (Some(row), columns) if columns != 0 => Some((row, columns)),
            _ => None,
        }
    }

    pub fn latches(&self) -> &[Latch] {
        &self.latches
    }

    /// Latch edges that did not fit in the log.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn clear_log(&mut self) {
        self.latches.clear();
        self.dropped = 0;
    }

    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        self.latches
            .iter()
            .filter(|l| l.chain == Chain::Column && !l.cleared)
            .map(|l| Frame {
                at_us: l.at_us,
                row: select_row(l.rows),
                columns: l.columns,
            })
    }

    fn drive(&mut self, chain: Chain, signal: Signal, high: bool) {
        let register = match chain {
            Chain::Row => &mut self.row,
            Chain::Column => &mut self.column,
        };
        let cleared = register.clear_asserted();
        if register.drive(signal, high) {
            let latch = Latch {
                chain,
                at_us: self.now_us,
                cleared,
                rows: self.row.latch,
                columns: self.column.latch,
            };
            if self.latches.push(latch).is_err() {
                self.dropped += 1;
            }
        }
    }
}

/// Output QA drives row 0.
fn select_row(outputs: u8) -> Option<usize> {
    if outputs.count_ones() == 1 {
        Some(outputs.leading_zeros() as usize)
    } else {
        None
    }
}

pub struct SimPin<'a> {
    sim: &'a RefCell<MatrixSim>,
    chain: Chain,
    signal: Signal,
}

impl OutputPin for SimPin<'_> {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.sim.borrow_mut().drive(self.chain, self.signal, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.sim.borrow_mut().drive(self.chain, self.signal, true);
        Ok(())
    }
}

/// Advances the simulated clock instead of waiting.
pub struct SimDelay<'a>(&'a RefCell<MatrixSim>);

impl DelayUs<u32> for SimDelay<'_> {
    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().now_us += u64::from(us);
    }
}

impl DelayMs<u32> for SimDelay<'_> {
    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().now_us += u64::from(ms) * 1_000;
    }
}

pub type SimChain<'a> = ShiftChain<SimPin<'a>, SimPin<'a>, SimPin<'a>, SimPin<'a>>;
pub type SimDriver<'a> = MatrixDriver<SimChain<'a>, SimChain<'a>, SimDelay<'a>>;
