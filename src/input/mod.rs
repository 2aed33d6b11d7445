//! The three interchangeable sources that feed the pattern buffer.

pub mod buttons;
pub mod dials;
pub mod table;

pub use buttons::{ButtonPad, Cursor, Direction};
pub use dials::Dials;
