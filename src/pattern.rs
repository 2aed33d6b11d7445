use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

pub const ROWS: usize = 8;
pub const COLS: usize = 8;

/// One bit per LED: bit `col` of row `row` lights (row, col).
///
/// Column 7 is the leftmost LED, column 0 the rightmost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternBuffer {
    rows: [u8; ROWS],
}

impl PatternBuffer {
    pub const fn new() -> Self {
        Self { rows: [0; ROWS] }
    }

    pub const fn from_rows(rows: [u8; ROWS]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[u8; ROWS] {
        &self.rows
    }

    /// Bits of `row`. Panics if `row` is not below [`ROWS`].
    pub fn row(&self, row: usize) -> u8 {
        self.rows[row]
    }

    pub fn set_row(&mut self, row: usize, bits: u8) {
        self.rows[row] = bits;
    }

    pub fn get(&self, row: u8, col: u8) -> bool {
        self.rows[row as usize] & mask(col) != 0
    }

    pub fn set(&mut self, row: u8, col: u8) {
        self.rows[row as usize] |= mask(col);
    }

    pub fn clear(&mut self, row: u8, col: u8) {
        self.rows[row as usize] &= !mask(col);
    }

    /// Flips one LED and returns its new state.
    pub fn toggle(&mut self, row: u8, col: u8) -> bool {
        self.rows[row as usize] ^= mask(col);
        self.get(row, col)
    }

    pub fn fill(&mut self, lit: bool) {
        self.rows = [if lit { 0xff } else { 0 }; ROWS];
    }

    pub fn is_dark(&self) -> bool {
        self.rows.iter().all(|&bits| bits == 0)
    }

    pub fn lit_count(&self) -> u32 {
        self.rows.iter().map(|bits| bits.count_ones()).sum()
    }
}

fn mask(col: u8) -> u8 {
    debug_assert!((col as usize) < COLS, "column {} out of range", col);
    1 << col
}

impl From<[u8; ROWS]> for PatternBuffer {
    fn from(rows: [u8; ROWS]) -> Self {
        Self::from_rows(rows)
    }
}

impl OriginDimensions for PatternBuffer {
    fn size(&self) -> Size {
        Size::new(COLS as u32, ROWS as u32)
    }
}

/// `x` runs left to right, so x = 0 is column 7.
impl DrawTarget for PatternBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if !(0..COLS as i32).contains(&point.x) || !(0..ROWS as i32).contains(&point.y) {
                continue;
            }
            let row = point.y as u8;
            let col = (COLS as i32 - 1 - point.x) as u8;
            match color {
                BinaryColor::On => self.set(row, col),
                BinaryColor::Off => self.clear(row, col),
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PatternBuffer {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:b}", &self.rows[..])
    }
}
