//! Fixed patterns for the display-test firmware and start-up states.

use crate::pattern::PatternBuffer;

/// The "M" test monogram from the display bring-up board.
pub const MONOGRAM: [u8; 8] = [0xc6, 0x6c, 0x54, 0x44, 0x44, 0x44, 0x44, 0xc6];

pub const DARK: [u8; 8] = [0; 8];

/// Top-left LED lit, where the button cursor starts.
pub const CURSOR_START: [u8; 8] = [0x80, 0, 0, 0, 0, 0, 0, 0];

pub const fn pattern(rows: [u8; 8]) -> PatternBuffer {
    PatternBuffer::from_rows(rows)
}
