//! The messages the controller emits and the seam through which they leave the core.

use core::fmt;
use wmidi::{Channel, ControlFunction, MidiMessage, Note, U7};

/// USB-MIDI cable number the device sends on.
const CABLE: u8 = 0;

/// Saturates `value` into the 7-bit data range.
fn seven_bit(value: u8) -> U7 {
    U7::from_u8_lossy(value.min(0x7F))
}

/// One outgoing MIDI event.
///
/// Only the three channel voice messages the panel can produce are representable; all values are 7-bit by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key went down.
    NoteOn {
        /// Note number.
        note: Note,
        /// Strike velocity.
        velocity: U7,
    },
    /// A key came up.
    NoteOff {
        /// Note number.
        note: Note,
        /// Release velocity.
        velocity: U7,
    },
    /// A knob moved, or a relative nudge.
    ControlChange {
        /// Controller number.
        controller: ControlFunction,
        /// New (or relative) value.
        value: U7,
    },
}

impl Event {
    /// Builds a NoteOn, clamping out-of-range numbers into 0–127.
    pub fn note_on(note: u8, velocity: u8) -> Self {
        Self::NoteOn {
            note: Note::from(seven_bit(note)),
            velocity: seven_bit(velocity),
        }
    }

    /// Builds a NoteOff, clamping out-of-range numbers into 0–127.
    pub fn note_off(note: u8, velocity: u8) -> Self {
        Self::NoteOff {
            note: Note::from(seven_bit(note)),
            velocity: seven_bit(velocity),
        }
    }

    /// Builds a ControlChange, clamping out-of-range numbers into 0–127.
    pub fn control_change(controller: u8, value: u8) -> Self {
        Self::ControlChange {
            controller: ControlFunction(seven_bit(controller)),
            value: seven_bit(value),
        }
    }

    /// Converts the event into a [`MidiMessage`] on `channel`.
    pub fn to_midi(self, channel: Channel) -> MidiMessage<'static> {
        match self {
            Self::NoteOn { note, velocity } => MidiMessage::NoteOn(channel, note, velocity),
            Self::NoteOff { note, velocity } => MidiMessage::NoteOff(channel, note, velocity),
            Self::ControlChange { controller, value } => {
                MidiMessage::ControlChange(channel, controller, value)
            }
        }
    }

    /// Encodes the event as a 32-bit USB-MIDI Event Packet on cable 0.
    ///
    /// The header's Code Index Number equals the high nibble of the status byte for channel voice messages.
    pub fn usb_packet(self, channel: Channel) -> [u8; 4] {
        let (kind, data1, data2) = match self {
            Self::NoteOn { note, velocity } => (0x90, u8::from(note), u8::from(velocity)),
            Self::NoteOff { note, velocity } => (0x80, u8::from(note), u8::from(velocity)),
            Self::ControlChange { controller, value } => (0xB0, u8::from(controller), u8::from(value)),
        };
        let status = kind | channel.index();
        [(CABLE << 4) | (status >> 4), status, data1, data2]
    }

    /// Writes a one-line, human-readable description, e.g. `Note ON: 12` or `CC 20 = 64`.
    pub fn describe<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        match *self {
            Self::NoteOn { note, .. } => write!(out, "Note ON: {}", u8::from(note)),
            Self::NoteOff { note, .. } => write!(out, "Note OFF: {}", u8::from(note)),
            Self::ControlChange { controller, value } => {
                write!(out, "CC {} = {}", u8::from(controller), u8::from(value))
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Event {
    fn format(&self, fmt: defmt::Formatter) {
        match *self {
            Self::NoteOn { note, velocity } => defmt::write!(
                fmt,
                "NoteOn {{ note: {} ({}), velocity: {} }}",
                note.to_str(),
                u8::from(note),
                u8::from(velocity)
            ),
            Self::NoteOff { note, velocity } => defmt::write!(
                fmt,
                "NoteOff {{ note: {} ({}), velocity: {} }}",
                note.to_str(),
                u8::from(note),
                u8::from(velocity)
            ),
            Self::ControlChange { controller, value } => defmt::write!(
                fmt,
                "ControlChange {{ controller: {}, value: {} }}",
                u8::from(controller),
                u8::from(value)
            ),
        }
    }
}

/// Destination for outgoing events.
///
/// Sending is fire-and-forget: there is no acknowledgment, and an event an implementation cannot deliver is lost.
pub trait MidiSink {
    /// Hands `event` to the transport.
    fn send(&mut self, event: Event);
}

impl<S: MidiSink + ?Sized> MidiSink for &mut S {
    fn send(&mut self, event: Event) {
        (**self).send(event);
    }
}
