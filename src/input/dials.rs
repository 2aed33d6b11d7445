//! Two potentiometers pick the cell; a periodic timer blinks it.

use crate::input::Cursor;
use crate::pattern::PatternBuffer;

/// Top three bits of a `resolution_bits` wide sample, so always in 0..=7.
///
/// `resolution_bits` must lie in `3..=16`; [`Dials::new`] enforces that.
pub const fn quantize(sample: u16, resolution_bits: u8) -> u8 {
    ((sample >> (resolution_bits - 3)) & 0b111) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dials {
    resolution_bits: u8,
    cursor: Cursor,
}

impl Dials {
    /// For the ATmega's 10-bit converter.
    pub const TEN_BIT: Self = Self::new(10);
    /// For the RP2040's 12-bit converter.
    pub const TWELVE_BIT: Self = Self::new(12);

    /// Panics unless `resolution_bits` is in `3..=16`.
    pub const fn new(resolution_bits: u8) -> Self {
        assert!(
            resolution_bits >= 3 && resolution_bits <= 16,
            "converter width must be 3 to 16 bits"
        );
        Self {
            resolution_bits,
            cursor: Cursor::new(0, 0),
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Positions the cursor straight from a pair of samples. No stepping and
    /// no clamping, the quantization already bounds both coordinates.
    pub fn update(&mut self, row_sample: u16, col_sample: u16) -> Cursor {
        self.cursor = Cursor::new(
            quantize(row_sample, self.resolution_bits),
            quantize(col_sample, self.resolution_bits),
        );
        self.cursor
    }

    /// Timer tick: flips the cell under the cursor and returns its new state.
    pub fn toggle(&self, pattern: &mut PatternBuffer) -> bool {
        pattern.toggle(self.cursor.row(), self.cursor.col())
    }
}
