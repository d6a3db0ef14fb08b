//! Edge detection for the panel's momentary controls.
//!
//! All controls are wired active-low against a pull-up, so a line reading low means the control is held. Edges are
//! found by comparing each sample with the previous one; there is no timed debounce. Contact bounce is absorbed only
//! by the cadence of the scan loop (see [`LOOP_PERIOD`][crate::configuration::LOOP_PERIOD]), so a bounce that spans
//! two scans is reported as an extra press.

use crate::infallible;
use core::convert::Infallible;
use embedded_hal::digital::InputPin;

/// The result of comparing a control's current sample with its previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Nothing changed.
    None,
    /// The control went from released to held.
    Press,
    /// The control went from held to released.
    Release,
}

/// Remembers the last sampled state of one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeDetector {
    pressed: bool,
}

impl EdgeDetector {
    /// A detector whose previous sample was "released".
    pub const fn released() -> Self {
        Self { pressed: false }
    }

    /// A detector whose previous sample was "held".
    pub const fn pressed() -> Self {
        Self { pressed: true }
    }

    /// Records `pressed` as the latest sample and reports how it differs from the one before.
    pub fn update(&mut self, pressed: bool) -> Edge {
        let edge = match (self.pressed, pressed) {
            (false, true) => Edge::Press,
            (true, false) => Edge::Release,
            _ => Edge::None,
        };
        self.pressed = pressed;
        edge
    }

    /// Returns the last recorded sample.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

/// A momentary control on an active-low input line.
#[derive(Debug)]
pub struct Button<P> {
    pin: P,
    edge: EdgeDetector,
}

impl<P: InputPin<Error = Infallible>> Button<P> {
    /// Wraps `pin`, treating the control as released until the first poll.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            edge: EdgeDetector::released(),
        }
    }

    /// Reads the line without touching the stored sample.
    pub fn is_pressed(&mut self) -> bool {
        infallible(self.pin.is_low())
    }

    /// Reads the line, stores the sample and reports any edge.
    pub fn poll(&mut self) -> Edge {
        let pressed = self.is_pressed();
        self.edge.update(pressed)
    }
}
