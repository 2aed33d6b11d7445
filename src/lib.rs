//! Row/column multiplexed 8x8 LED matrix driven through two latched
//! serial-in shift registers.
//!
//! The column chain (an SN74HC595) selects which LEDs of
//! the active row light up, the row chain (a TPIC6B596) sinks the one active
//! row. [`driver::MatrixDriver`] walks all eight rows fast enough that the
//! whole [`pattern::PatternBuffer`] appears lit at once.
//!
//! Everything here is generic over `embedded-hal` 0.2 traits. The Pico
//! firmware lives in `src/bin/` and is built with the `rp2040` feature:
//!
//! ```text
//! cargo build --release --target thumbv6m-none-eabi --features rp2040 --bin matrix-buttons
//! ```
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod driver;
pub mod error;
pub mod input;
pub mod lines;
pub mod pattern;
pub mod probe;
pub mod sim;

#[cfg(feature = "rp2040")]
pub mod board;

pub use driver::MatrixDriver;
pub use error::{Error, Result};
pub use pattern::PatternBuffer;
