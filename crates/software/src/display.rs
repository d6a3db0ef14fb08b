//! The pair of seven-segment digits that name the active mode.

use crate::shifter::OutputShifter;
use core::convert::Infallible;
use embedded_hal::digital::OutputPin;

/// Digit value which renders as a dark display.
pub const BLANK: u8 = 16;

/// Segment patterns for digits 0 through 15, segment A in the most significant bit and the decimal point in the
/// least. 10 through 15 render as the letters A, C, F, L, P and U.
const SEGMENTS: [u8; 16] = [
    0b1111_1100,
    0b0110_0000,
    0b1101_1010,
    0b1111_0010,
    0b0110_0110,
    0b1011_0110,
    0b1011_1110,
    0b1110_0000,
    0b1111_1110,
    0b1111_0110,
    0b1110_1110,
    0b1001_1100,
    0b1000_1110,
    0b0001_1100,
    0b1100_1110,
    0b0111_1100,
];

/// Returns the segment pattern for `digit`; [`BLANK`] and anything without a glyph render dark.
pub fn segments(digit: u8) -> u8 {
    SEGMENTS.get(usize::from(digit)).copied().unwrap_or(0)
}

/// Two independent digits, each on its own shift register chain.
#[derive(Debug)]
pub struct Display<P> {
    left: OutputShifter<P>,
    right: OutputShifter<P>,
    digits: (u8, u8),
}

impl<P: OutputPin<Error = Infallible>> Display<P> {
    /// Wraps the two chains. Nothing is written until the first [`show`](Self::show).
    pub fn new(left: OutputShifter<P>, right: OutputShifter<P>) -> Self {
        Self {
            left,
            right,
            digits: (BLANK, BLANK),
        }
    }

    /// Writes both digits.
    pub fn show(&mut self, left: u8, right: u8) {
        self.left.write(segments(left));
        self.right.write(segments(right));
        self.digits = (left, right);
    }

    /// Returns the (left, right) digits last written.
    pub fn digits(&self) -> (u8, u8) {
        self.digits
    }
}
