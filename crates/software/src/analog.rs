//! Potentiometer scanning: multiplexer channel selection, quantization to 7-bit values and suppression of repeats.

use crate::{configuration::SETTLE_DELAY, infallible, pause};
use core::convert::Infallible;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;
use wmidi::U7;

/// Full-scale reading of a [`Sampler`].
const FULL_SCALE: u32 = u16::MAX as u32;

/// Maps a 16-bit sample onto 0–127, rounding to the nearest step.
///
/// The scale is inverted: the knobs are wired so that turning them up lowers the voltage, hence a full-scale
/// reading is 0 and a zero reading is 127.
pub fn quantize(raw: u16) -> U7 {
    let scaled = (u32::from(raw) * 127 + FULL_SCALE / 2) / FULL_SCALE;
    // scaled never exceeds 127
    U7::from_u8_lossy(127 - scaled.min(127) as u8)
}

/// The ADC inputs wired to knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogInput {
    /// The common output of the analog multiplexer.
    Multiplexer,
    /// The first knob wired straight to the ADC.
    DirectA,
    /// The second knob wired straight to the ADC.
    DirectB,
}

impl AnalogInput {
    /// The directly wired inputs, in scan order.
    pub const DIRECT: [Self; 2] = [Self::DirectA, Self::DirectB];
}

/// Something that can take a reading from an [`AnalogInput`].
pub trait Sampler {
    /// Returns the current reading scaled to 0–65535.
    fn sample(&mut self, input: AnalogInput) -> u16;
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn sample(&mut self, input: AnalogInput) -> u16 {
        (**self).sample(input)
    }
}

/// An 8-way analog multiplexer addressed by three select lines.
#[derive(Debug)]
pub struct Multiplexer<P> {
    select: [P; 3],
}

impl<P: OutputPin<Error = Infallible>> Multiplexer<P> {
    /// Takes the select lines, least significant (S0) first.
    pub fn new(select: [P; 3]) -> Self {
        Self { select }
    }

    /// Routes input `channel` (0–7) to the common output.
    pub fn select(&mut self, channel: u8) {
        for (bit, line) in self.select.iter_mut().enumerate() {
            infallible(line.set_state(PinState::from((channel >> bit) & 1 == 1)));
        }
    }

    /// Selects `channel`, waits for the output to settle and samples it.
    pub async fn read<S: Sampler, D: DelayNs>(
        &mut self,
        channel: u8,
        sampler: &mut S,
        delay: &mut D,
    ) -> u16 {
        self.select(channel);
        pause(delay, SETTLE_DELAY).await;
        sampler.sample(AnalogInput::Multiplexer)
    }
}

/// Remembers the last value sent for one knob so that only changes go out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChangeFilter {
    last: Option<U7>,
}

impl ChangeFilter {
    /// Returns `Some(value)` and remembers it if it differs from the last value passed through, `None` otherwise.
    pub fn update(&mut self, value: U7) -> Option<U7> {
        if self.last == Some(value) {
            None
        } else {
            self.last = Some(value);
            Some(value)
        }
    }

    /// Returns the last value passed through, if any.
    pub fn last(&self) -> Option<U7> {
        self.last
    }
}
