//! This crate contains architecture-agnostic logic for the REKOPI MIDI controller: eight keys, a mode button and
//! nine potentiometers are scanned and turned into [MIDI](https://midi.org/midi-1-0) notes and control changes, while
//! two seven-segment digits and a bank of eight LEDs report the active mode.
//!
//! Hardware is reached only through [`embedded-hal`](embedded_hal) traits plus the small [`analog::Sampler`] and
//! [`midi::MidiSink`] seams, so every decision the device makes can be exercised on the host. The firmware crate wires
//! these up to the RP2040 and USB.

#![deny(missing_docs)]
#![no_std]

#[macro_use]
mod fmt;

pub mod analog;
pub mod boot;
pub mod configuration;
pub mod controller;
pub mod delta;
pub mod display;
pub mod indicator;
pub mod input;
pub mod midi;
pub mod mode;
pub mod shifter;

/// Waits out `duration` on `delay`.
pub(crate) async fn pause<D: embedded_hal_async::delay::DelayNs>(
    delay: &mut D,
    duration: embassy_time::Duration,
) {
    delay.delay_us(duration.as_micros() as u32).await;
}

/// Unwraps the result of an operation on a pin whose error type is uninhabited.
pub(crate) fn infallible<T>(result: Result<T, core::convert::Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

#[cfg(test)]
pub(crate) mod fake;
