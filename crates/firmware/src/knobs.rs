//! Reads the panel's potentiometers through the RP2040's ADC.

use defmt::warn;
use embassy_rp::adc::{Adc, Blocking, Channel};
use rekopi_lib::analog::{AnalogInput, Sampler};

/// Stretches a 12-bit conversion over the full 16-bit range, so 0xFFF becomes 0xFFFF.
fn widen(raw: u16) -> u16 {
    let raw = raw & 0x0FFF;
    (raw << 4) | (raw >> 8)
}

/// The ADC and the three inputs wired to knobs.
pub struct Knobs {
    adc: Adc<'static, Blocking>,
    multiplexer: Channel<'static>,
    direct: [Channel<'static>; 2],
    /// Last good reading per input, handed out again if a conversion fails.
    last: [u16; 3],
}

impl Knobs {
    pub fn new(
        adc: Adc<'static, Blocking>,
        multiplexer: Channel<'static>,
        direct: [Channel<'static>; 2],
    ) -> Self {
        Self {
            adc,
            multiplexer,
            direct,
            last: [0; 3],
        }
    }
}

impl Sampler for Knobs {
    fn sample(&mut self, input: AnalogInput) -> u16 {
        let (channel, slot) = match input {
            AnalogInput::Multiplexer => (&mut self.multiplexer, 0),
            AnalogInput::DirectA => (&mut self.direct[0], 1),
            AnalogInput::DirectB => (&mut self.direct[1], 2),
        };
        match self.adc.blocking_read(channel) {
            Ok(raw) => {
                self.last[slot] = widen(raw);
            }
            Err(error) => {
                warn!("Reading {} failed ({}); repeating the last value", input, error);
            }
        }
        self.last[slot]
    }
}
