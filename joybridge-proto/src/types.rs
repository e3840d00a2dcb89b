//! Controller state types: Button, Buttons, AnalogStick, Axis, StateRecord.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// A physical digital input.
///
/// The discriminant is the bit offset of the input inside the record's
/// 3-byte boolean block, so reordering variants changes the wire layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Button {
    Triangle = 0,
    Circle = 1,
    Square = 2,
    Cross = 3,
    L1 = 4,
    L2 = 5,
    L3 = 6,
    R1 = 7,
    R2 = 8,
    R3 = 9,
    Select = 10,
    Start = 11,
    Home = 12,
    DpadLeft = 13,
    DpadUp = 14,
    DpadRight = 15,
    DpadDown = 16,
}

impl Button {
    /// Number of digital inputs carried by the record.
    pub const COUNT: usize = 17;

    /// Every button in wire order.
    pub const ALL: [Button; Self::COUNT] = [
        Button::Triangle,
        Button::Circle,
        Button::Square,
        Button::Cross,
        Button::L1,
        Button::L2,
        Button::L3,
        Button::R1,
        Button::R2,
        Button::R3,
        Button::Select,
        Button::Start,
        Button::Home,
        Button::DpadLeft,
        Button::DpadUp,
        Button::DpadRight,
        Button::DpadDown,
    ];

    /// Bit offset of this button, counted from bit 0 of byte 0.
    #[inline]
    #[must_use]
    pub const fn bit_offset(self) -> u8 {
        self as u8
    }

    /// Byte of the record holding this button.
    #[inline]
    #[must_use]
    pub const fn byte_offset(self) -> usize {
        (self as usize) / 8
    }

    /// Single-bit mask inside [`Button::byte_offset`].
    #[inline]
    #[must_use]
    pub const fn bit_mask(self) -> u8 {
        1 << ((self as u8) % 8)
    }
}

/// Button state represented as a bitfield.
///
/// Bit `n` is the button whose [`Button::bit_offset`] is `n`. Only the low
/// 17 bits are meaningful; the rest are padding and always masked off.
///
/// # Example
///
/// ```
/// use joybridge_proto::Buttons;
///
/// let buttons = Buttons::TRIANGLE | Buttons::CROSS;
/// assert!(buttons.contains(Buttons::TRIANGLE));
/// assert!(!buttons.contains(Buttons::CIRCLE));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Buttons(u32);

impl Buttons {
    pub const TRIANGLE: Self = Self::from_button(Button::Triangle);
    pub const CIRCLE: Self = Self::from_button(Button::Circle);
    pub const SQUARE: Self = Self::from_button(Button::Square);
    pub const CROSS: Self = Self::from_button(Button::Cross);
    pub const L1: Self = Self::from_button(Button::L1);
    pub const L2: Self = Self::from_button(Button::L2);
    pub const L3: Self = Self::from_button(Button::L3);
    pub const R1: Self = Self::from_button(Button::R1);
    pub const R2: Self = Self::from_button(Button::R2);
    pub const R3: Self = Self::from_button(Button::R3);
    pub const SELECT: Self = Self::from_button(Button::Select);
    pub const START: Self = Self::from_button(Button::Start);
    pub const HOME: Self = Self::from_button(Button::Home);
    pub const DPAD_LEFT: Self = Self::from_button(Button::DpadLeft);
    pub const DPAD_UP: Self = Self::from_button(Button::DpadUp);
    pub const DPAD_RIGHT: Self = Self::from_button(Button::DpadRight);
    pub const DPAD_DOWN: Self = Self::from_button(Button::DpadDown);

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Mask covering the 17 meaningful bits.
    pub const VALID_MASK: u32 = (1 << Button::COUNT) - 1;

    #[inline]
    #[must_use]
    pub const fn from_button(button: Button) -> Self {
        Self(1 << button.bit_offset())
    }

    /// Build from a raw value, dropping padding bits.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw & Self::VALID_MASK)
    }

    /// Check if the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Buttons) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if a single button is pressed.
    #[inline]
    #[must_use]
    pub const fn is_pressed(self, button: Button) -> bool {
        self.contains(Self::from_button(button))
    }

    /// Press or release a single button.
    #[inline]
    pub fn set(&mut self, button: Button, pressed: bool) {
        let mask = Self::from_button(button).0;
        if pressed {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    /// Get the raw value (bits 0..=16).
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if no buttons are pressed.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the pressed buttons in wire order.
    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |b| self.is_pressed(*b))
    }
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        Self::from_button(button)
    }
}

impl BitOr for Buttons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Buttons {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Buttons {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for Buttons {
    type Output = Self;

    // Padding bits stay clear.
    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0 & Self::VALID_MASK)
    }
}

/// Analog stick with X/Y axes.
///
/// Range: [0, 255]. 0 is fully left/up, 255 fully right/down, 128 centered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogStick {
    pub x: u8,
    pub y: u8,
}

impl AnalogStick {
    /// Neutral axis value.
    pub const CENTER: u8 = 128;

    pub const CENTERED: Self = Self {
        x: Self::CENTER,
        y: Self::CENTER,
    };

    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    #[inline]
    #[must_use]
    pub const fn is_centered(&self) -> bool {
        self.x == Self::CENTER && self.y == Self::CENTER
    }
}

impl Default for AnalogStick {
    fn default() -> Self {
        Self::CENTERED
    }
}

/// One of the four analog axes.
///
/// The discriminant is the byte offset of the axis in the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Axis {
    LeftStickX = 3,
    LeftStickY = 4,
    RightStickX = 5,
    RightStickY = 6,
}

impl Axis {
    /// Every axis in wire order.
    pub const ALL: [Axis; 4] = [
        Axis::LeftStickX,
        Axis::LeftStickY,
        Axis::RightStickX,
        Axis::RightStickY,
    ];

    #[inline]
    #[must_use]
    pub const fn byte_offset(self) -> usize {
        self as usize
    }
}

/// Complete controller state at one instant.
///
/// Contains:
/// - 17 digital buttons (13 face/shoulder/system buttons + 4 d-pad directions)
/// - 2 analog sticks (left/right, each with X/Y)
///
/// The wire form is produced by [`StateRecord::to_bytes`]; see [`crate::layout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateRecord {
    pub buttons: Buttons,
    pub left_stick: AnalogStick,
    pub right_stick: AnalogStick,
}

impl StateRecord {
    /// Create a blank record: no buttons pressed, both sticks centered.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            buttons: Buttons::NONE,
            left_stick: AnalogStick::CENTERED,
            right_stick: AnalogStick::CENTERED,
        }
    }

    /// Check if this record equals [`StateRecord::blank`].
    #[inline]
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.buttons.is_empty() && self.left_stick.is_centered() && self.right_stick.is_centered()
    }

    #[inline]
    #[must_use]
    pub const fn is_pressed(&self, button: Button) -> bool {
        self.buttons.is_pressed(button)
    }

    #[inline]
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.buttons.set(button, pressed);
    }

    /// Builder-style variant of [`StateRecord::set_button`].
    #[inline]
    #[must_use]
    pub fn with_button(mut self, button: Button, pressed: bool) -> Self {
        self.set_button(button, pressed);
        self
    }

    /// Read one analog axis.
    #[inline]
    #[must_use]
    pub const fn axis(&self, axis: Axis) -> u8 {
        match axis {
            Axis::LeftStickX => self.left_stick.x,
            Axis::LeftStickY => self.left_stick.y,
            Axis::RightStickX => self.right_stick.x,
            Axis::RightStickY => self.right_stick.y,
        }
    }

    /// Write one analog axis. Every `u8` is a valid position.
    #[inline]
    pub fn set_axis(&mut self, axis: Axis, value: u8) {
        match axis {
            Axis::LeftStickX => self.left_stick.x = value,
            Axis::LeftStickY => self.left_stick.y = value,
            Axis::RightStickX => self.right_stick.x = value,
            Axis::RightStickY => self.right_stick.y = value,
        }
    }

    /// Builder-style variant of [`StateRecord::set_axis`].
    #[inline]
    #[must_use]
    pub fn with_axis(mut self, axis: Axis, value: u8) -> Self {
        self.set_axis(axis, value);
        self
    }
}

impl Default for StateRecord {
    fn default() -> Self {
        Self::blank()
    }
}
