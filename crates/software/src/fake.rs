//! In-memory stand-ins for the panel hardware, shared by the unit tests.

extern crate std;

use crate::{
    analog::{AnalogInput, Sampler},
    midi::{Event, MidiSink},
};
use core::{cell::RefCell, convert::Infallible};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use std::{rc::Rc, vec::Vec};

/// Output lines 0..3 are reserved for the multiplexer selector (S0 first).
pub(crate) const SELECTOR_LINES: [usize; 3] = [0, 1, 2];

#[derive(Default)]
struct State {
    pressed: [bool; 16],
    levels: [bool; 16],
    writes: Vec<(usize, bool)>,
    multiplexed: [u16; 8],
    direct: [u16; 2],
}

/// Shared state behind every fake pin handed out by one bench.
#[derive(Clone, Default)]
pub(crate) struct Bench(Rc<RefCell<State>>);

impl Bench {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn input(&self, index: usize) -> FakeInput {
        FakeInput {
            bench: self.clone(),
            index,
        }
    }

    pub(crate) fn output(&self, line: usize) -> FakeOutput {
        FakeOutput {
            bench: self.clone(),
            line,
        }
    }

    pub(crate) fn sampler(&self) -> FakeSampler {
        FakeSampler {
            bench: self.clone(),
            requests: Vec::new(),
        }
    }

    pub(crate) fn press(&self, index: usize) {
        self.0.borrow_mut().pressed[index] = true;
    }

    pub(crate) fn release(&self, index: usize) {
        self.0.borrow_mut().pressed[index] = false;
    }

    pub(crate) fn set_multiplexed(&self, channel: usize, raw: u16) {
        self.0.borrow_mut().multiplexed[channel] = raw;
    }

    pub(crate) fn set_direct(&self, index: usize, raw: u16) {
        self.0.borrow_mut().direct[index] = raw;
    }

    pub(crate) fn level(&self, line: usize) -> bool {
        self.0.borrow().levels[line]
    }

    /// Every (line, level) written so far, oldest first.
    pub(crate) fn writes(&self) -> Vec<(usize, bool)> {
        self.0.borrow().writes.clone()
    }

    pub(crate) fn clear_writes(&self) {
        self.0.borrow_mut().writes.clear();
    }

    fn selected_channel(&self) -> usize {
        SELECTOR_LINES
            .iter()
            .enumerate()
            .map(|(bit, &line)| usize::from(self.level(line)) << bit)
            .sum()
    }
}

pub(crate) struct FakeInput {
    bench: Bench,
    index: usize,
}

impl ErrorType for FakeInput {
    type Error = Infallible;
}

impl InputPin for FakeInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.bench.0.borrow().pressed[self.index])
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.bench.0.borrow().pressed[self.index])
    }
}

pub(crate) struct FakeOutput {
    bench: Bench,
    line: usize,
}

impl FakeOutput {
    fn set(&mut self, level: bool) {
        let mut state = self.bench.0.borrow_mut();
        state.levels[self.line] = level;
        state.writes.push((self.line, level));
    }
}

impl ErrorType for FakeOutput {
    type Error = Infallible;
}

impl OutputPin for FakeOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}

/// Answers multiplexer reads with the value stored for whichever channel the selector lines point at.
pub(crate) struct FakeSampler {
    bench: Bench,
    pub(crate) requests: Vec<(AnalogInput, usize)>,
}

impl Sampler for FakeSampler {
    fn sample(&mut self, input: AnalogInput) -> u16 {
        let channel = self.bench.selected_channel();
        self.requests.push((input, channel));
        let state = self.bench.0.borrow();
        match input {
            AnalogInput::Multiplexer => state.multiplexed[channel],
            AnalogInput::DirectA => state.direct[0],
            AnalogInput::DirectB => state.direct[1],
        }
    }
}

/// Returns immediately, keeping a tally of the time that would have passed.
#[derive(Default)]
pub(crate) struct NoDelay {
    pub(crate) elapsed_ns: u64,
}

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}

impl MidiSink for Vec<Event> {
    fn send(&mut self, event: Event) {
        self.push(event);
    }
}
