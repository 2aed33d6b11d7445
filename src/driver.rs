//! Row/column multiplexing over the two shift-register chains.
//!
//! One refresh cycle is eight frames. Each frame selects one row on the row
//! chain, shifts that row's bits into the column chain and latches both, then
//! holds the frame for the dwell time.

use embedded_hal::blocking::delay::DelayUs;

use crate::config::{BitOrder, DriverConfig, LatchOrder, RowClocking};
use crate::error::Result;
use crate::lines::{ChainLines, Signal};
use crate::pattern::{PatternBuffer, ROWS};

pub struct MatrixDriver<R, C, D> {
    row: R,
    col: C,
    delay: D,
    config: DriverConfig,
    /// The tied-clock pre-shift has been done since the last row clear.
    primed: bool,
}

impl<R, C, D, E> MatrixDriver<R, C, D>
where
    R: ChainLines<Error = E>,
    C: ChainLines<Error = E>,
    D: DelayUs<u32>,
{
    pub fn new(row: R, col: C, delay: D, config: DriverConfig) -> Self {
        Self {
            row,
            col,
            delay,
            config,
            primed: false,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn release(self) -> (R, C, D) {
        (self.row, self.col, self.delay)
    }

    /// Clears both chains so every output is dark.
    pub fn clear(&mut self) -> Result<(), E> {
        clear_chain(&mut self.row, &mut self.delay, self.config.settle_us)?;
        clear_chain(&mut self.col, &mut self.delay, self.config.settle_us)?;
        self.primed = false;
        #[cfg(feature = "defmt")]
        defmt::trace!("matrix cleared");
        Ok(())
    }

    /// Darkens the columns without touching the row chain.
    pub fn blank(&mut self) -> Result<(), E> {
        clear_chain(&mut self.col, &mut self.delay, self.config.settle_us)
    }

    /// Shifts the select bits the row chain must carry ahead of frame 0.
    ///
    /// With tied clocks the output latch lags the shift register by one
    /// pulse, so without this the first frame of every start would be wasted.
    /// `refresh` calls this on its own after a clear. Once primed the row
    /// chain stays aligned across cycles, so further calls do nothing until
    /// the next `clear`.
    pub fn prime(&mut self) -> Result<(), E> {
        if self.primed {
            return Ok(());
        }
        let settle = self.config.settle_us;
        for k in 0..self.config.row_clocking.lead() {
            self.row.clear_line(Signal::LatchClock)?;
            self.row.clear_line(Signal::ShiftClock)?;
            self.row.write_line(Signal::SerialData, k == 0)?;
            self.delay.delay_us(settle);
            self.commit_row()?;
            self.delay.delay_us(settle);
        }
        self.primed = true;
        Ok(())
    }

    /// Runs one full refresh cycle of `pattern`.
    pub fn refresh(&mut self, pattern: &PatternBuffer) -> Result<(), E> {
        self.refresh_with(|row| pattern.row(row))
    }

    /// Runs one full refresh cycle, asking `row_bits` for each row just before
    /// that row is shifted out.
    ///
    /// Anything that changes the source between two calls shows up from the
    /// next row on: a cycle may mix old and new rows, and the following cycle
    /// is consistent again.
    pub fn refresh_with<F>(&mut self, mut row_bits: F) -> Result<(), E>
    where
        F: FnMut(usize) -> u8,
    {
        if !self.primed {
            self.prime()?;
        }
        for row in 0..ROWS {
            let bits = row_bits(row);
            self.frame(row, bits)?;
        }
        Ok(())
    }

    fn frame(&mut self, row: usize, bits: u8) -> Result<(), E> {
        let settle = self.config.settle_us;

        match self.config.row_clocking {
            RowClocking::Tied => {
                self.row.clear_line(Signal::LatchClock)?;
                self.row.clear_line(Signal::ShiftClock)?;
            }
            RowClocking::Split => self.row.clear_line(Signal::LatchClock)?,
        }
        self.col.clear_line(Signal::LatchClock)?;

        let lead = self.config.row_clocking.lead();
        let select = (row + lead) % ROWS == 0;
        self.row.write_line(Signal::SerialData, select)?;
        if self.config.row_clocking == RowClocking::Split {
            self.row.pulse(Signal::ShiftClock, &mut self.delay, settle)?;
        }

        if self.config.blank_columns {
            self.blank()?;
            self.col.clear_line(Signal::LatchClock)?;
        }
        self.shift_columns(bits)?;

        self.commit_row()?;
        if self.config.latch_order == LatchOrder::RowFirst {
            self.delay.delay_us(settle);
        }
        self.col.set_line(Signal::LatchClock)?;

        self.delay.delay_us(self.config.dwell_us);
        Ok(())
    }

    fn shift_columns(&mut self, bits: u8) -> Result<(), E> {
        for j in 0..8 {
            let bit = match self.config.bit_order {
                BitOrder::LsbFirst => j,
                BitOrder::MsbFirst => 7 - j,
            };
            self.col.write_line(Signal::SerialData, bits & (1 << bit) != 0)?;
            self.col
                .pulse(Signal::ShiftClock, &mut self.delay, self.config.settle_us)?;
        }
        Ok(())
    }

    /// Raises the row latch. With tied clocks the shift clock rises on the
    /// same edge; the latch goes first so it captures the pre-shift state,
    /// which is what the shared edge does on the part.
    fn commit_row(&mut self) -> Result<(), E> {
        self.row.set_line(Signal::LatchClock)?;
        if self.config.row_clocking == RowClocking::Tied {
            self.row.set_line(Signal::ShiftClock)?;
        }
        Ok(())
    }
}

/// Active-low clear: hold SRCLR low across a shift edge and a latch edge so
/// both the shift register and the outputs end up zero.
fn clear_chain<L, D>(lines: &mut L, delay: &mut D, settle_us: u32) -> Result<(), L::Error>
where
    L: ChainLines,
    D: DelayUs<u32>,
{
    lines.clear_line(Signal::Clear)?;
    lines.clear_line(Signal::ShiftClock)?;
    lines.clear_line(Signal::LatchClock)?;
    delay.delay_us(settle_us);
    lines.set_line(Signal::ShiftClock)?;
    delay.delay_us(settle_us);
    lines.set_line(Signal::LatchClock)?;
    delay.delay_us(settle_us);
    lines.set_line(Signal::Clear)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::table;
    use crate::sim::{Chain, MatrixSim};
    use core::cell::RefCell;
    use std::vec::Vec;

    fn lit_rows(sim: &RefCell<MatrixSim>) -> Vec<(Option<usize>, u8)> {
        sim.borrow().frames().map(|f| (f.row, f.columns)).collect()
    }

    fn expected(pattern: &PatternBuffer) -> Vec<(Option<usize>, u8)> {
        (0..8).map(|row| (Some(row), pattern.row(row))).collect()
    }

    #[test]
    fn clear_leaves_both_chains_dark() {
        let sim = RefCell::new(MatrixSim::new());
        sim.borrow_mut().preload(0xff, 0xff);
        let mut driver = MatrixSim::driver(&sim, DriverConfig::TIED);

        driver.clear().unwrap();

        let sim = sim.borrow();
        assert!(sim.is_dark());
        assert_eq!(sim.register(Chain::Row).shifted(), 0);
        assert_eq!(sim.register(Chain::Column).shifted(), 0);
    }

    #[test]
    fn tied_clocks_show_row_zero_first() {
        let sim = RefCell::new(MatrixSim::new());
        let mut driver = MatrixSim::driver(&sim, DriverConfig::TIED);
        let pattern = PatternBuffer::from_rows(table::MONOGRAM);

        driver.clear().unwrap();
        sim.borrow_mut().clear_log();
        driver.refresh(&pattern).unwrap();

        assert_eq!(lit_rows(&sim), expected(&pattern));
    }

    #[test]
    fn repeated_prime_keeps_one_row_selected() {
        let sim = RefCell::new(MatrixSim::new());
        let mut driver = MatrixSim::driver(&sim, DriverConfig::TIED);
        let pattern = PatternBuffer::from_rows(table::MONOGRAM);

        driver.clear().unwrap();
        driver.prime().unwrap();
        driver.prime().unwrap();
        sim.borrow_mut().clear_log();
        driver.refresh(&pattern).unwrap();
        assert_eq!(lit_rows(&sim), expected(&pattern));

        // Priming between cycles must not push a second select bit in.
        driver.prime().unwrap();
        sim.borrow_mut().clear_log();
        driver.refresh(&pattern).unwrap();
        assert_eq!(lit_rows(&sim), expected(&pattern));
    }

    #[test]
    fn tied_clocks_without_prime_waste_a_frame() {
        // Without the pre-shift the select bit only reaches the outputs one
        // whole cycle later.
        let sim = RefCell::new(MatrixSim::new());
        let mut driver = MatrixSim::driver(&sim, DriverConfig::TIED);
        let pattern = PatternBuffer::from_rows(table::MONOGRAM);
        driver.clear().unwrap();
        driver.primed = true;
        sim.borrow_mut().clear_log();

        driver.refresh(&pattern).unwrap();
        assert!(lit_rows(&sim).iter().all(|(row, _)| row.is_none()));

        sim.borrow_mut().clear_log();
        driver.refresh(&pattern).unwrap();
        assert_eq!(lit_rows(&sim), expected(&pattern));
    }

    #[test]
    fn split_clocks_need_no_prime() {
        let sim = RefCell::new(MatrixSim::new());
        let mut driver = MatrixSim::driver(&sim, DriverConfig::SPLIT);
        let pattern = PatternBuffer::from_rows([1, 2, 4, 8, 16, 32, 64, 128]);

        driver.clear().unwrap();
        let before = sim.borrow().now_us();
        driver.prime().unwrap();
        assert_eq!(sim.borrow().now_us(), before);

        sim.borrow_mut().clear_log();
        driver.refresh(&pattern).unwrap();
        assert_eq!(lit_rows(&sim), expected(&pattern));
    }

    #[test]
    fn blanking_hides_columns_between_rows() {
        let sim = RefCell::new(MatrixSim::new());
        let mut driver = MatrixSim::driver(&sim, DriverConfig::BLANKING);
        let pattern = PatternBuffer::from_rows(table::MONOGRAM);

        driver.clear().unwrap();
        sim.borrow_mut().clear_log();
        driver.refresh(&pattern).unwrap();

        assert_eq!(lit_rows(&sim), expected(&pattern));
        let blanked = sim
            .borrow()
            .latches()
            .iter()
            .filter(|l| l.chain == Chain::Column && l.cleared)
            .count();
        assert_eq!(blanked, 8);
    }

    #[test]
    fn msb_first_mirrors_columns() {
        let sim = RefCell::new(MatrixSim::new());
        let config = DriverConfig::SPLIT.with_bit_order(BitOrder::MsbFirst);
        let mut driver = MatrixSim::driver(&sim, config);

        driver.clear().unwrap();
        sim.borrow_mut().clear_log();
        driver.refresh(&PatternBuffer::from_rows(table::MONOGRAM)).unwrap();

        let frames = lit_rows(&sim);
        assert_eq!(frames[0], (Some(0), 0xc6u8.reverse_bits()));
        assert_eq!(frames[2], (Some(2), 0x54u8.reverse_bits()));
    }

    #[test]
    fn rows_are_pulled_in_order() {
        let sim = RefCell::new(MatrixSim::new());
        let mut driver = MatrixSim::driver(&sim, DriverConfig::SPLIT);
        let mut asked = Vec::new();

        driver
            .refresh_with(|row| {
                asked.push(row);
                0
            })
            .unwrap();
        assert_eq!(asked, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn blank_keeps_row_selection() {
        let sim = RefCell::new(MatrixSim::new());
        let mut driver = MatrixSim::driver(&sim, DriverConfig::SPLIT);
        driver.clear().unwrap();
        driver.refresh(&PatternBuffer::from_rows([0xff; 8])).unwrap();

        driver.blank().unwrap();
        let sim = sim.borrow();
        assert_eq!(sim.register(Chain::Column).latched(), 0);
        assert_eq!(sim.register(Chain::Row).latched(), 0b0000_0001);
    }
}
