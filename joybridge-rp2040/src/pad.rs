//! Digital button inputs sampled into a [`StateRecord`].
//!
//! Buttons are wired between the GPIO and ground with the internal pull-up
//! enabled, so a pressed button reads low. Analog axes are left centered.

use defmt::Format;
use embedded_hal::digital::InputPin;
use heapless::Vec;
use joybridge_core::{Button, StateRecord};

/// One GPIO per button at most.
pub const MAX_PAD_PINS: usize = Button::COUNT;

/// Error type for pad sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum PadError {
    /// Every button already has a pin.
    Full,
    /// The button is already bound to another pin.
    AlreadyBound(Button),
    /// Pin read failed.
    Pin,
}

/// Set of GPIO inputs, each bound to one button.
pub struct PadInputs<P> {
    pins: Vec<(Button, P), MAX_PAD_PINS>,
}

impl<P: InputPin> PadInputs<P> {
    #[must_use]
    pub const fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Bind `pin` to `button`.
    pub fn bind(&mut self, button: Button, pin: P) -> Result<(), PadError> {
        if self.pins.iter().any(|(b, _)| *b == button) {
            return Err(PadError::AlreadyBound(button));
        }
        self.pins.push((button, pin)).map_err(|_| PadError::Full)
    }

    /// Read every bound pin into a fresh record.
    pub fn sample(&mut self) -> Result<StateRecord, PadError> {
        let mut record = StateRecord::blank();
        for (button, pin) in self.pins.iter_mut() {
            let pressed = pin.is_low().map_err(|_| PadError::Pin)?;
            record.set_button(*button, pressed);
        }
        Ok(record)
    }

    /// Number of bound buttons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

impl<P: InputPin> Default for PadInputs<P> {
    fn default() -> Self {
        Self::new()
    }
}
