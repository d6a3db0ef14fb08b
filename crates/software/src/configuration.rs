//! Fixed tables and timings that shape how the controller behaves, plus a trait for cycling through the variants of
//! pushbutton-selected settings. Nothing here changes at runtime; the device has no persistent configuration.

use embassy_time::Duration;
use num_traits::{FromPrimitive, ToPrimitive};
use wmidi::Channel;

/// A trait which allows infinite cycling of an enum's variants.
///
/// Useful for pushbutton user interfaces, allowing presses to advance from the current to the next variant,
/// cycling back to the beginning when all variants have been exhausted.
pub trait CycleConfig {
    /// Return the next variant, cycling back to the beginning as needed.
    fn cycle(self) -> Self
    where
        Self: FromPrimitive + ToPrimitive + Sized,
    {
        let next = self.to_u8().and_then(|index| index.checked_add(1));
        next.and_then(<Self as FromPrimitive>::from_u8)
            .or_else(|| <Self as FromPrimitive>::from_u8(0))
            .unwrap_or(self)
    }
}

/// Every message leaves on the first MIDI channel.
pub const MIDI_CHANNEL: Channel = Channel::Ch1;

/// Number of keys on the panel.
pub const KEY_COUNT: usize = 8;

/// Each mode shifts the keys up by an octave.
pub const NOTES_PER_MODE: u8 = 12;

/// Velocity sent with every NoteOn.
pub const PRESS_VELOCITY: u8 = 127;

/// Velocity sent with every NoteOff.
pub const RELEASE_VELOCITY: u8 = 0;

/// Controller assigned to the first multiplexed knob, indexed by mode.
pub const CHANNEL_ZERO_CONTROLLERS: [u8; 7] = [20, 21, 22, 23, 24, 25, 26];

/// Which LED lights up for each key (by key index) in modes that echo key presses.
pub const KEY_LEDS: [u8; KEY_COUNT] = [0, 1, 2, 3, 7, 6, 5, 4];

/// An index past the end of the LED bank, so the idle pattern is all LEDs dark.
pub const IDLE_LED: u8 = 8;

/// Number of knobs read through the analog multiplexer.
pub const MULTIPLEXED_CHANNELS: usize = 7;

/// Controllers of the two knobs wired straight to the ADC.
pub const DIRECT_CONTROLLERS: [u8; 2] = [8, 9];

/// Raw sample distance that moves a delta controller by one step.
pub const DELTA_STEP: i32 = 512;

/// Value every delta controller starts from.
pub const DELTA_INITIAL_VALUE: u8 = 64;

/// Controllers adjusted in delta mode, paired with [`DELTA_GATE_KEYS`].
pub const DELTA_CONTROLLERS: [u8; 2] = [1, 30];

/// Keys which must be held for the matching [`DELTA_CONTROLLERS`] entry to follow the first knob.
pub const DELTA_GATE_KEYS: [usize; 2] = [0, 3];

/// Controller receiving encoder nudges.
pub const ENCODER_CONTROLLER: u8 = 10;

/// Relative value sent when the encoder turns left.
pub const ENCODER_DECREMENT: u8 = 127;

/// Relative value sent when the encoder turns right.
pub const ENCODER_INCREMENT: u8 = 1;

/// Key shared with the encoder's left contact.
pub const ENCODER_LEFT_KEY: usize = 5;

/// Key shared with the encoder's right contact.
pub const ENCODER_RIGHT_KEY: usize = 2;

/// How long the multiplexer output needs to stabilize after switching channels.
pub const SETTLE_DELAY: Duration = Duration::from_millis(2);

/// Pause at the end of every scan.
pub const LOOP_PERIOD: Duration = Duration::from_millis(10);

/// How long each frame of the start-up LED sweep is shown.
pub const GREETING_STEP: Duration = Duration::from_millis(150);

/// Number of times the start-up LED sweep repeats.
pub const GREETING_ROUNDS: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;
    use num_derive::{FromPrimitive, ToPrimitive};

    #[derive(Debug, Clone, Copy, ToPrimitive, FromPrimitive, PartialEq)]
    enum Shape {
        Sine,
        Square,
        Saw,
    }
    impl CycleConfig for Shape {}

    #[test]
    fn cycle_advances_then_wraps() {
        let shape = Shape::Sine.cycle();
        assert_eq!(Shape::Square, shape, "Expected left but got right");

        let shape = shape.cycle();
        assert_eq!(Shape::Saw, shape, "Expected left but got right");

        let shape = shape.cycle();
        assert_eq!(
            Shape::Sine,
            shape,
            "Should wrap around to first variant; expected left but got right"
        );
    }

    #[test]
    fn key_leds_are_a_permutation() {
        let mut seen = [false; KEY_COUNT];
        for led in KEY_LEDS {
            seen[usize::from(led)] = true;
        }
        assert!(seen.iter().all(|&s| s), "Every LED should belong to one key");
    }
}
