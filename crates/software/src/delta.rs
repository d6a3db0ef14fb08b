//! Relative ("delta") control: while a gate key is held, movement of a knob nudges a stored controller value up or
//! down instead of jumping it to the knob's position.

use crate::{
    configuration::{DELTA_INITIAL_VALUE, DELTA_STEP},
    midi::Event,
};

/// One relatively controlled value and the knob reading it is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeltaChannel {
    controller: u8,
    value: u8,
    reference: Option<u16>,
    gate_was_pressed: bool,
}

impl DeltaChannel {
    /// A channel for `controller` starting from the middle of the range.
    ///
    /// The gate starts out as if it were held, so a key already down when delta mode is entered has to be released
    /// and pressed again before it takes effect.
    pub const fn new(controller: u8) -> Self {
        Self {
            controller,
            value: DELTA_INITIAL_VALUE,
            reference: None,
            gate_was_pressed: true,
        }
    }

    /// Feeds one knob reading and the current state of the gate key.
    ///
    /// Pressing the gate captures the reading as the reference. While the gate is held, every full
    /// [`DELTA_STEP`] the knob has moved away from the reference shifts the value, clamped to 0–127. A knob reading
    /// below the reference raises the value. The step count is the floor of the distance over [`DELTA_STEP`], so
    /// a reading just above the reference already lowers the value by one. When the value actually changes the returned ControlChange carries it,
    /// and the reference moves to the current reading so that further movement is measured from here.
    pub fn update(&mut self, raw: u16, gate_pressed: bool) -> Option<Event> {
        if gate_pressed && !self.gate_was_pressed {
            self.reference = Some(raw);
        }
        self.gate_was_pressed = gate_pressed;

        let reference = self.reference.filter(|_| gate_pressed)?;
        // floored: a drop shy of a full step counts for nothing, any rise counts as at least one step down
        let delta = (i32::from(reference) - i32::from(raw)).div_euclid(DELTA_STEP);
        if delta == 0 {
            return None;
        }

        // the clamp keeps the candidate within 0..=127
        let candidate = (i32::from(self.value) + delta).clamp(0, 127) as u8;
        if candidate == self.value {
            return None;
        }

        self.value = candidate;
        self.reference = Some(raw);
        Some(Event::control_change(self.controller, candidate))
    }

    /// Returns the accumulated value.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns the reading movement is currently measured against.
    pub fn reference(&self) -> Option<u16> {
        self.reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A channel whose gate has just been pressed at `raw`.
    fn gated(raw: u16) -> DeltaChannel {
        let mut channel = DeltaChannel::new(1);
        channel.update(raw, false);
        assert_eq!(None, channel.update(raw, true), "Capturing should not emit");
        channel
    }

    #[test]
    fn held_gate_at_start_is_ignored() {
        let mut channel = DeltaChannel::new(1);
        assert_eq!(None, channel.update(40000, true), "Expected no emission");
        assert_eq!(None, channel.update(0, true), "Expected no emission");
        assert_eq!(None, channel.reference(), "Expected no reference");
        assert_eq!(64, channel.value(), "Expected left but got right");
    }

    #[test]
    fn press_captures_reference() {
        let channel = gated(40000);
        assert_eq!(Some(40000), channel.reference(), "Expected left but got right");
    }

    #[test]
    fn step_down_raises_value() {
        let mut channel = gated(40000);
        assert_eq!(
            Some(Event::control_change(1, 83)),
            channel.update(30000, true),
            "Expected left but got right"
        );
        assert_eq!(83, channel.value(), "Expected left but got right");
        assert_eq!(Some(30000), channel.reference(), "Expected re-baseline");
    }

    #[test]
    fn repeat_reading_after_emission_is_quiet() {
        let mut channel = gated(40000);
        assert!(channel.update(30000, true).is_some(), "Expected an emission");
        assert_eq!(None, channel.update(30000, true), "Expected no emission");
        assert_eq!(83, channel.value(), "Expected left but got right");
    }

    #[test]
    fn step_up_lowers_value() {
        let mut channel = gated(10000);
        assert_eq!(
            Some(Event::control_change(1, 61)),
            channel.update(11100, true),
            "Expected left but got right"
        );
    }

    #[test]
    fn drop_shy_of_a_step_is_ignored() {
        let mut channel = gated(10000);
        assert_eq!(None, channel.update(9489, true), "Expected no emission");
        assert_eq!(None, channel.update(9999, true), "Expected no emission");
        assert_eq!(Some(10000), channel.reference(), "Reference should hold");
    }

    #[test]
    fn any_rise_lowers_value() {
        let mut channel = gated(10000);
        assert_eq!(
            Some(Event::control_change(1, 63)),
            channel.update(10001, true),
            "Expected left but got right"
        );
        assert_eq!(Some(10001), channel.reference(), "Expected re-baseline");

        let mut channel = gated(10000);
        assert_eq!(
            Some(Event::control_change(1, 63)),
            channel.update(10511, true),
            "Expected left but got right"
        );
    }

    #[test]
    fn rise_rounds_toward_more_steps() {
        let mut channel = DeltaChannel::new(30);
        channel.update(40000, false);
        channel.update(40000, true);
        // -10000 / 512 = -19.53
        assert_eq!(
            Some(Event::control_change(30, 44)),
            channel.update(50000, true),
            "Expected left but got right"
        );
    }

    #[test]
    fn released_gate_freezes_value() {
        let mut channel = gated(40000);
        channel.update(30000, true);
        assert_eq!(None, channel.update(0, false), "Expected no emission");
        assert_eq!(None, channel.update(u16::MAX, false), "Expected no emission");
        assert_eq!(83, channel.value(), "Expected left but got right");
    }

    #[test]
    fn value_stays_in_range() {
        let mut channel = gated(u16::MAX);
        assert_eq!(
            Some(Event::control_change(1, 127)),
            channel.update(0, true),
            "Expected left but got right"
        );
        assert_eq!(None, channel.update(0, true), "Already at the top");

        let readings = [65535, 0, 65535, 1024, 40000, 512, 0, 65535, 65535, 30000];
        for (i, &raw) in readings.iter().cycle().take(200).enumerate() {
            // toggle the gate now and then to force fresh references
            channel.update(raw, i % 7 != 0);
            assert!(channel.value() <= 127, "Value left range at step {}", i);
        }
    }

    #[test]
    fn clamps_at_bottom() {
        let mut channel = gated(0);
        assert_eq!(
            Some(Event::control_change(1, 0)),
            channel.update(u16::MAX, true),
            "Expected left but got right"
        );
        assert_eq!(None, channel.update(u16::MAX, true), "Already at the bottom");
    }
}
