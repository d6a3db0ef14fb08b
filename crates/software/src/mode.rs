//! The seven modes of the controller and everything they decide: which notes the keys play, what the first knob
//! controls, which extras are active and what the display and LEDs show.

use crate::configuration::{
    CHANNEL_ZERO_CONTROLLERS, CycleConfig, DELTA_GATE_KEYS, IDLE_LED, NOTES_PER_MODE,
};
use num_derive::{FromPrimitive, ToPrimitive};

/// Digits shown on the (left, right) seven-segment displays, indexed by mode.
const DISPLAY_DIGITS: [(u8, u8); 7] = [
    (14, 13),
    (14, 0),
    (13, 0),
    (16, 11),
    (14, 10),
    (12, 1),
    (13, 14),
];

/// LEDs lit while a mode is active, indexed by mode.
const STATIC_LEDS: [&[u8]; 7] = [
    &[IDLE_LED],
    &[4, 7],
    &[2, 4, 5, 6, 7],
    &[IDLE_LED],
    &[IDLE_LED],
    &[1, 2, 6],
    &[0, 1, 2, 3, 4, 6],
];

/// A reinterpretation context for the panel, advanced by the mode button.
///
/// The mode number doubles as an octave offset for the keys: mode `n` plays notes `12n` through `12n + 7`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ToPrimitive, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Plain keyboard; key presses are echoed on the LEDs.
    #[default]
    M0,
    /// Delta mode: keys 0 and 3 stop playing notes and instead gate relative control of CC 1 and CC 30 from the
    /// first knob.
    M1,
    /// Encoder mode: the encoder contacts additionally send relative nudges on CC 10.
    M2,
    /// Plain keyboard, one octave up from [`Mode::M2`].
    M3,
    /// Plain keyboard, one octave up from [`Mode::M3`].
    M4,
    /// Keyboard with a fixed LED pattern.
    M5,
    /// Keyboard with a fixed LED pattern.
    M6,
}
impl CycleConfig for Mode {}

impl Mode {
    fn index(self) -> usize {
        self as usize
    }

    /// Returns the mode number, 0 through 6.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Returns the note played by key `key` in this mode.
    pub fn note(self, key: usize) -> u8 {
        // at most 12 * 6 + 7
        NOTES_PER_MODE * self.number() + key as u8
    }

    /// Returns `true` if key `key` is withheld from note output because it gates a delta controller.
    pub fn mutes_key(self, key: usize) -> bool {
        self == Self::M1 && DELTA_GATE_KEYS.contains(&key)
    }

    /// Returns the controller number of the first multiplexed knob.
    pub fn channel_zero_controller(self) -> u8 {
        CHANNEL_ZERO_CONTROLLERS[self.index()]
    }

    /// Returns the (left, right) digits for the seven-segment displays.
    pub fn display_digits(self) -> (u8, u8) {
        DISPLAY_DIGITS[self.index()]
    }

    /// Returns the LEDs lit when this mode is entered.
    pub fn static_leds(self) -> &'static [u8] {
        STATIC_LEDS[self.index()]
    }

    /// Returns `true` if key presses light their LED and releases restore the idle pattern. Other modes keep their
    /// static pattern on the LEDs.
    pub fn echoes_keys(self) -> bool {
        matches!(self, Self::M0 | Self::M3 | Self::M4)
    }

    /// Returns `true` if the first knob drives the delta controllers rather than its own control change.
    pub fn uses_delta(self) -> bool {
        self == Self::M1
    }

    /// Returns `true` if the encoder contacts send relative nudges.
    pub fn uses_encoder(self) -> bool {
        self == Self::M2
    }
}
