//! Bit-banged driver for an 8-bit serial-in, parallel-out shift register (74HC595 style).

use crate::infallible;
use core::convert::Infallible;
use embedded_hal::digital::{OutputPin, PinState};

/// One shift register chain, driven through its storage (latch), shift (clock) and data lines.
#[derive(Debug)]
pub struct OutputShifter<P> {
    latch: P,
    clock: P,
    data: P,
}

impl<P: OutputPin<Error = Infallible>> OutputShifter<P> {
    /// Takes ownership of the three lines and drives them all low.
    pub fn new(mut latch: P, mut clock: P, mut data: P) -> Self {
        for line in [&mut latch, &mut clock, &mut data] {
            infallible(line.set_low());
        }
        Self { latch, clock, data }
    }

    /// Shifts `byte` out least-significant bit first and latches it onto the outputs.
    ///
    /// The displays downstream decode the bits in exactly this order.
    pub fn write(&mut self, byte: u8) {
        infallible(self.latch.set_low());
        for bit in 0..8 {
            infallible(self.clock.set_low());
            infallible(self.data.set_state(PinState::from((byte >> bit) & 1 == 1)));
            infallible(self.clock.set_high());
        }
        infallible(self.latch.set_high());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::Bench;

    const LATCH: usize = 0;
    const CLOCK: usize = 1;
    const DATA: usize = 2;

    fn shifter(bench: &Bench) -> OutputShifter<crate::fake::FakeOutput> {
        let shifter = OutputShifter::new(bench.output(LATCH), bench.output(CLOCK), bench.output(DATA));
        bench.clear_writes();
        shifter
    }

    #[test]
    fn new_drives_lines_low() {
        let bench = Bench::new();
        let _shifter = OutputShifter::new(bench.output(LATCH), bench.output(CLOCK), bench.output(DATA));
        assert_eq!(
            [(LATCH, false), (CLOCK, false), (DATA, false)].as_slice(),
            bench.writes().as_slice(),
            "Expected left but got right"
        );
    }

    #[test]
    fn write_sequence() {
        let bench = Bench::new();
        let mut shifter = shifter(&bench);
        shifter.write(0b0000_0001);

        let writes = bench.writes();
        assert_eq!(2 + 8 * 3, writes.len(), "Expected left but got right");
        assert_eq!((LATCH, false), writes[0], "Latch should open first");
        assert_eq!(
            [(CLOCK, false), (DATA, true), (CLOCK, true)].as_slice(),
            &writes[1..4],
            "First bit out should be the least significant"
        );
        assert_eq!((LATCH, true), writes[writes.len() - 1], "Latch should close last");
    }

    #[test]
    fn bits_go_out_lsb_first() {
        let bench = Bench::new();
        let mut shifter = shifter(&bench);
        shifter.write(0b1100_1010);

        // sample the data line on every rising clock edge
        let mut level = false;
        let mut sampled = 0_u8;
        let mut count = 0;
        for (line, value) in bench.writes() {
            match line {
                DATA => level = value,
                CLOCK if value => {
                    sampled |= u8::from(level) << count;
                    count += 1;
                }
                _ => {}
            }
        }
        assert_eq!(8, count, "Expected left but got right");
        assert_eq!(0b1100_1010, sampled, "Expected left but got right");
    }
}
