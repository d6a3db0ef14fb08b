//! The controller: every piece of state the panel needs, and the scan that turns the state of its controls into MIDI
//! events and visual feedback.
//!
//! One scan runs these steps in order, and the next scan starts only after the previous one finished:
//!
//! 1. If the mode changed since the last scan, show its digits and static LED pattern.
//! 2. Poll the mode button; a press advances the mode.
//! 3. Poll the keys and send notes.
//! 4. Read the seven multiplexed knobs (or feed the delta controllers from the first one in delta mode).
//! 5. Read the two direct knobs.
//! 6. In encoder mode, poll the encoder contacts.

use crate::{
    analog::{AnalogInput, ChangeFilter, Multiplexer, Sampler, quantize},
    configuration::{
        CycleConfig, DELTA_CONTROLLERS, DELTA_GATE_KEYS, DIRECT_CONTROLLERS, ENCODER_CONTROLLER,
        ENCODER_DECREMENT, ENCODER_INCREMENT, ENCODER_LEFT_KEY, ENCODER_RIGHT_KEY, GREETING_ROUNDS,
        GREETING_STEP, KEY_COUNT, KEY_LEDS, LOOP_PERIOD, MULTIPLEXED_CHANNELS, PRESS_VELOCITY,
        RELEASE_VELOCITY,
    },
    delta::DeltaChannel,
    display::Display,
    indicator::Indicator,
    input::{Button, Edge, EdgeDetector},
    midi::{Event, MidiSink},
    mode::Mode,
    pause,
    shifter::OutputShifter,
};
use core::convert::Infallible;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

/// The hardware a [`Controller`] is built from.
#[derive(Debug)]
pub struct Panel<I, O> {
    /// The eight keys, left to right.
    pub keys: [I; KEY_COUNT],
    /// The button that advances the mode.
    pub mode_button: I,
    /// Multiplexer select lines, S0 first.
    pub selector: [O; 3],
    /// Chain driving the left seven-segment digit.
    pub left_digit: OutputShifter<O>,
    /// Chain driving the right seven-segment digit.
    pub right_digit: OutputShifter<O>,
    /// Chain driving the LED bank.
    pub leds: OutputShifter<O>,
}

/// Owns all of the panel's state for the life of the program.
#[derive(Debug)]
pub struct Controller<I, O> {
    mode: Mode,
    /// The mode whose digits and LEDs are on display, if any.
    rendered: Option<Mode>,
    mode_button: Button<I>,
    keys: [Button<I>; KEY_COUNT],
    /// Left and right encoder contacts; tracked apart from the keys they share a line with.
    encoder: [EdgeDetector; 2],
    multiplexer: Multiplexer<O>,
    /// Multiplexed knobs first, then the direct ones.
    knobs: [ChangeFilter; MULTIPLEXED_CHANNELS + 2],
    deltas: [DeltaChannel; 2],
    display: Display<O>,
    indicator: Indicator<O>,
}

fn emit<M: MidiSink>(sink: &mut M, event: Event) {
    info!("Sending {}", event);
    sink.send(event);
}

impl<I, O> Controller<I, O>
where
    I: InputPin<Error = Infallible>,
    O: OutputPin<Error = Infallible>,
{
    /// Builds a controller in mode 0 with every knob unsent, so the first scan reports all of them.
    pub fn new(panel: Panel<I, O>) -> Self {
        Self {
            mode: Mode::default(),
            rendered: None,
            mode_button: Button::new(panel.mode_button),
            keys: panel.keys.map(Button::new),
            encoder: [EdgeDetector::released(); 2],
            multiplexer: Multiplexer::new(panel.selector),
            knobs: Default::default(),
            deltas: DELTA_CONTROLLERS.map(DeltaChannel::new),
            display: Display::new(panel.left_digit, panel.right_digit),
            indicator: Indicator::new(panel.leds),
        }
    }

    /// Plays the power-up LED sweep: pairs of LEDs four apart step across the bank.
    pub async fn greet<D: DelayNs>(&mut self, delay: &mut D) {
        for _ in 0..GREETING_ROUNDS {
            for step in 0..4 {
                self.indicator.light(&[step, step + 4]);
                pause(delay, GREETING_STEP).await;
            }
        }
    }

    /// Scans forever, pausing [`LOOP_PERIOD`] between scans.
    pub async fn run<S, D, M>(&mut self, sampler: &mut S, delay: &mut D, sink: &mut M) -> !
    where
        S: Sampler,
        D: DelayNs,
        M: MidiSink,
    {
        loop {
            self.scan(sampler, delay, sink).await;
            pause(delay, LOOP_PERIOD).await;
        }
    }

    /// Runs one pass over every control.
    pub async fn scan<S, D, M>(&mut self, sampler: &mut S, delay: &mut D, sink: &mut M)
    where
        S: Sampler,
        D: DelayNs,
        M: MidiSink,
    {
        self.render();
        self.poll_mode_button();
        self.poll_keys(sink);
        self.scan_multiplexed(sampler, delay, sink).await;
        self.scan_direct(sampler, sink);
        if self.mode.uses_encoder() {
            self.poll_encoder(sink);
        }
    }

    /// Returns the active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the seven-segment displays.
    pub fn display(&self) -> &Display<O> {
        &self.display
    }

    /// Returns the LED bank.
    pub fn indicator(&self) -> &Indicator<O> {
        &self.indicator
    }

    /// Returns the delta controllers, in the order of [`DELTA_CONTROLLERS`].
    pub fn deltas(&self) -> &[DeltaChannel; 2] {
        &self.deltas
    }

    fn render(&mut self) {
        if self.rendered == Some(self.mode) {
            return;
        }
        let (left, right) = self.mode.display_digits();
        self.display.show(left, right);
        self.indicator.light(self.mode.static_leds());
        self.rendered = Some(self.mode);
    }

    fn poll_mode_button(&mut self) {
        if self.mode_button.poll() == Edge::Press {
            self.mode = self.mode.cycle();
            info!("Mode {}", self.mode.number());
        }
    }

    fn poll_keys<M: MidiSink>(&mut self, sink: &mut M) {
        let mode = self.mode;
        for (key, button) in self.keys.iter_mut().enumerate() {
            let edge = button.poll();
            if edge == Edge::None || mode.mutes_key(key) {
                continue;
            }

            let note = mode.note(key);
            if edge == Edge::Press {
                emit(sink, Event::note_on(note, PRESS_VELOCITY));
                if mode.echoes_keys() {
                    self.indicator.light_one(KEY_LEDS[key]);
                }
            } else {
                emit(sink, Event::note_off(note, RELEASE_VELOCITY));
                if mode.echoes_keys() {
                    self.indicator.idle();
                }
            }
        }
    }

    async fn scan_multiplexed<S, D, M>(&mut self, sampler: &mut S, delay: &mut D, sink: &mut M)
    where
        S: Sampler,
        D: DelayNs,
        M: MidiSink,
    {
        for index in 0..MULTIPLEXED_CHANNELS {
            // knob n sits on multiplexer input n + 1
            let raw = self
                .multiplexer
                .read(index as u8 + 1, sampler, delay)
                .await;

            if index == 0 && self.mode.uses_delta() {
                self.follow_deltas(raw, sink);
                continue;
            }

            let controller = if index == 0 {
                self.mode.channel_zero_controller()
            } else {
                index as u8 + 1
            };
            if let Some(value) = self.knobs[index].update(quantize(raw)) {
                emit(sink, Event::control_change(controller, u8::from(value)));
            }
        }
    }

    fn follow_deltas<M: MidiSink>(&mut self, raw: u16, sink: &mut M) {
        for (channel, key) in self.deltas.iter_mut().zip(DELTA_GATE_KEYS) {
            let gate_pressed = self.keys[key].is_pressed();
            if let Some(event) = channel.update(raw, gate_pressed) {
                emit(sink, event);
            }
        }
    }

    fn scan_direct<S: Sampler, M: MidiSink>(&mut self, sampler: &mut S, sink: &mut M) {
        let direct = AnalogInput::DIRECT.into_iter().zip(DIRECT_CONTROLLERS);
        for (slot, (input, controller)) in direct.enumerate() {
            let raw = sampler.sample(input);
            if let Some(value) = self.knobs[MULTIPLEXED_CHANNELS + slot].update(quantize(raw)) {
                emit(sink, Event::control_change(controller, u8::from(value)));
            }
        }
    }

    fn poll_encoder<M: MidiSink>(&mut self, sink: &mut M) {
        let left = self.keys[ENCODER_LEFT_KEY].is_pressed();
        let right = self.keys[ENCODER_RIGHT_KEY].is_pressed();

        if self.encoder[0].update(left) == Edge::Press {
            emit(sink, Event::control_change(ENCODER_CONTROLLER, ENCODER_DECREMENT));
        }
        if self.encoder[1].update(right) == Edge::Press {
            emit(sink, Event::control_change(ENCODER_CONTROLLER, ENCODER_INCREMENT));
        }
    }
}
