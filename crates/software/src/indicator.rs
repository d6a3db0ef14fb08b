//! The bank of eight LEDs above the keys.

use crate::{configuration::IDLE_LED, shifter::OutputShifter};
use core::convert::Infallible;
use embedded_hal::digital::OutputPin;

/// Folds LED indices into a bitmask. Indices past the end of the bank contribute nothing.
pub fn mask(leds: &[u8]) -> u8 {
    leds.iter()
        .filter(|&&led| led < 8)
        .fold(0, |mask, &led| mask | 1 << led)
}

/// The LED bank and the pattern it currently shows.
#[derive(Debug)]
pub struct Indicator<P> {
    shifter: OutputShifter<P>,
    pattern: u8,
}

impl<P: OutputPin<Error = Infallible>> Indicator<P> {
    /// Wraps the chain. Nothing is written until the first update.
    pub fn new(shifter: OutputShifter<P>) -> Self {
        Self {
            shifter,
            pattern: 0,
        }
    }

    /// Lights exactly the LEDs in `leds`.
    pub fn light(&mut self, leds: &[u8]) {
        self.pattern = mask(leds);
        self.shifter.write(self.pattern);
    }

    /// Lights a single LED, darkening the rest.
    pub fn light_one(&mut self, led: u8) {
        self.light(&[led]);
    }

    /// Darkens the bank.
    pub fn idle(&mut self) {
        self.light_one(IDLE_LED);
    }

    /// Returns the bitmask last written.
    pub fn pattern(&self) -> u8 {
        self.pattern
    }
}
