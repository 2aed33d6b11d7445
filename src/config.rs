//! Timing constants and driver configuration.
//!
//! All delays were picked on the bench, not derived from the datasheets.

/// Settling time between a data change and the following clock edge.
pub const SETTLE_US: u32 = 1;

/// How long each row stays lit before the next one is shifted in.
pub const DWELL_US: u32 = 20;

/// Button contact bounce window.
pub const DEBOUNCE_MS: u32 = 5;

/// Dial toggle period: one overflow of a 16-bit timer at 16 MHz / 8.
pub const TOGGLE_PERIOD_US: u32 = 32_768;

/// Step time of the register probes, slow enough to follow by eye.
pub const PROBE_STEP_MS: u32 = 500;

/// How the row chain's shift and latch clocks are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RowClocking {
    /// Shift and latch clocks rise on the same edge. The latch captures the
    /// shift register as it was before the edge, so outputs lag by one pulse.
    Tied,
    /// The shift clock is pulsed before the latch clock rises; a bit becomes
    /// visible on the frame it is shifted in.
    Split,
}

impl RowClocking {
    /// Number of rows the one-hot select bit must be shifted ahead of the
    /// row that is being displayed.
    pub const fn lead(self) -> usize {
        match self {
            RowClocking::Tied => 1,
            RowClocking::Split => 0,
        }
    }
}

/// Order in which the two latch clocks rise at the end of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LatchOrder {
    /// Back to back, with no settle delay in between.
    Together,
    /// Row latch, settle, then column latch. The new row is selected before
    /// its columns appear.
    RowFirst,
}

/// Order in which a row byte is shifted into the column chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Bit 0 first. It ends up on the last output, so the MSB is the
    /// leftmost LED.
    LsbFirst,
    MsbFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    pub row_clocking: RowClocking,
    pub latch_order: LatchOrder,
    pub bit_order: BitOrder,
    /// Clear the column chain before shifting each row in.
    pub blank_columns: bool,
    pub settle_us: u32,
    pub dwell_us: u32,
}

impl DriverConfig {
    /// Tied row clocks and simultaneous latches, as on the display test board.
    pub const TIED: Self = Self {
        row_clocking: RowClocking::Tied,
        latch_order: LatchOrder::Together,
        bit_order: BitOrder::LsbFirst,
        blank_columns: false,
        settle_us: SETTLE_US,
        dwell_us: DWELL_US,
    };

    /// Split row clocks, used by the button board.
    pub const SPLIT: Self = Self {
        row_clocking: RowClocking::Split,
        ..Self::TIED
    };

    /// Split row clocks with per-row blanking and row-first latching, used by
    /// the dial board where the columns must never light with a stale row.
    pub const BLANKING: Self = Self {
        row_clocking: RowClocking::Split,
        latch_order: LatchOrder::RowFirst,
        blank_columns: true,
        ..Self::TIED
    };

    pub const fn with_dwell_us(self, dwell_us: u32) -> Self {
        Self { dwell_us, ..self }
    }

    pub const fn with_bit_order(self, bit_order: BitOrder) -> Self {
        Self { bit_order, ..self }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::SPLIT
    }
}
