//! Logical signals of one shift-register chain.

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

use crate::error::{Error, Result};

/// The four control inputs shared by the 74HC595 and TPIC6B596.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    /// SER
    SerialData,
    /// SRCLK, shifts on the rising edge.
    ShiftClock,
    /// RCLK, copies the shift register to the outputs on the rising edge.
    LatchClock,
    /// SRCLR, active low.
    Clear,
}

/// Drive access to the signals of one chain.
///
/// `set_line` always means electrically high; for [`Signal::Clear`] that is
/// the inactive level.
pub trait ChainLines {
    type Error;

    fn set_line(&mut self, signal: Signal) -> Result<(), Self::Error>;

    fn clear_line(&mut self, signal: Signal) -> Result<(), Self::Error>;

    fn write_line(&mut self, signal: Signal, high: bool) -> Result<(), Self::Error> {
        if high {
            self.set_line(signal)
        } else {
            self.clear_line(signal)
        }
    }

    /// Low, settle, high, settle. Leaves the line high, i.e. a rising edge
    /// has just happened.
    fn pulse<D: DelayUs<u32>>(
        &mut self,
        signal: Signal,
        delay: &mut D,
        settle_us: u32,
    ) -> Result<(), Self::Error> {
        self.clear_line(signal)?;
        delay.delay_us(settle_us);
        self.set_line(signal)?;
        delay.delay_us(settle_us);
        Ok(())
    }
}

/// A chain wired to four GPIO outputs.
pub struct ShiftChain<SER, SRCLK, RCLK, CLR> {
    ser: SER,
    srclk: SRCLK,
    rclk: RCLK,
    clr: CLR,
}

impl<SER, SRCLK, RCLK, CLR, E> ShiftChain<SER, SRCLK, RCLK, CLR>
where
    SER: OutputPin<Error = E>,
    SRCLK: OutputPin<Error = E>,
    RCLK: OutputPin<Error = E>,
    CLR: OutputPin<Error = E>,
{
    /// Takes the pins and parks them: clear released, clocks and data low.
    pub fn new(ser: SER, srclk: SRCLK, rclk: RCLK, clr: CLR) -> Result<Self, E> {
        let mut chain = Self {
            ser,
            srclk,
            rclk,
            clr,
        };
        chain.set_line(Signal::Clear)?;
        chain.clear_line(Signal::SerialData)?;
        chain.clear_line(Signal::ShiftClock)?;
        chain.clear_line(Signal::LatchClock)?;
        Ok(chain)
    }

    pub fn release(self) -> (SER, SRCLK, RCLK, CLR) {
        (self.ser, self.srclk, self.rclk, self.clr)
    }
}

impl<SER, SRCLK, RCLK, CLR, E> ChainLines for ShiftChain<SER, SRCLK, RCLK, CLR>
where
    SER: OutputPin<Error = E>,
    SRCLK: OutputPin<Error = E>,
    RCLK: OutputPin<Error = E>,
    CLR: OutputPin<Error = E>,
{
    type Error = E;

    fn set_line(&mut self, signal: Signal) -> Result<(), E> {
        let res = match signal {
            Signal::SerialData => self.ser.set_high(),
            Signal::ShiftClock => self.srclk.set_high(),
            Signal::LatchClock => self.rclk.set_high(),
            Signal::Clear => self.clr.set_high(),
        };
        res.map_err(|source| Error::Line { signal, source })
    }

    fn clear_line(&mut self, signal: Signal) -> Result<(), E> {
        let res = match signal {
            Signal::SerialData => self.ser.set_low(),
            Signal::ShiftClock => self.srclk.set_low(),
            Signal::LatchClock => self.rclk.set_low(),
            Signal::Clear => self.clr.set_low(),
        };
        res.map_err(|source| Error::Line { signal, source })
    }
}
