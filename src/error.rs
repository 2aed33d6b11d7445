use derive_more::Display;

use crate::lines::Signal;

/// Failure reported by the pin implementation behind a chain.
///
/// The shift registers themselves never report anything: a timing violation
/// is a wiring problem, not something software can observe.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Driving `signal` failed.
    #[display("driving {signal:?} failed: {source:?}")]
    Line { signal: Signal, source: E },
}

pub type Result<T, E> = core::result::Result<T, Error<E>>;

impl<E> Error<E> {
    pub fn signal(&self) -> Signal {
        match self {
            Error::Line { signal, .. } => *signal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_signal_and_the_pin_error() {
        let err: Error<char> = Error::Line {
            signal: Signal::LatchClock,
            source: 'x',
        };
        assert_eq!(err.to_string(), "driving LatchClock failed: 'x'");
        assert_eq!(err.signal(), Signal::LatchClock);
    }
}
