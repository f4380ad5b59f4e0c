//! Standard NES joypad.
//!
//! Implements the 8-button pad readable through `$4016/$4017`.

use bitflags::bitflags;

/// Button ordering follows the shift register bit layout (A first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];
}

bitflags! {
    /// Pressed buttons, one bit per [`Button`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const A = 1 << 0;
        const B = 1 << 1;
        const SELECT = 1 << 2;
        const START = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;
        const LEFT = 1 << 6;
        const RIGHT = 1 << 7;
    }
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        Buttons::from_bits_retain(1 << button as u8)
    }
}

/// Serially-readable controller state with latch/strobe behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controller {
    strobe: bool,
    latched: u8,
    state: Buttons,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update a button's pressed state.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.state.set(button.into(), pressed);
    }

    /// Replace the whole pressed-button mask.
    pub fn set_buttons(&mut self, buttons: Buttons) {
        self.state = buttons;
    }

    pub fn buttons(&self) -> Buttons {
        self.state
    }

    /// `$4016` write. The button state is latched when the strobe drops.
    pub fn write_strobe(&mut self, data: u8) {
        self.strobe = data & 0x01 != 0;
        if !self.strobe {
            self.latched = self.state.bits();
        }
    }

    /// Reads the next button bit. While the strobe is held high every read
    /// returns the A button. Once all eight bits are out, reads return 0.
    pub fn read(&mut self) -> u8 {
        let bit = if self.strobe {
            self.state.contains(Buttons::A) as u8
        } else {
            let bit = self.latched & 0x01;
            self.latched >>= 1;
            bit
        };
        bit | 0x40 // Upper bits float high on hardware.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_buttons_in_order_after_strobe() {
        let mut pad = Controller::new();
        pad.set_button(Button::A, true);
        pad.set_button(Button::Start, true);
        pad.set_button(Button::Right, true);
        pad.write_strobe(1);
        pad.write_strobe(0);

        let bits: Vec<u8> = (0..8).map(|_| pad.read() & 1).collect();
        assert_eq!(bits, [1, 0, 0, 1, 0, 0, 0, 1]);
        assert_eq!(pad.read(), 0x40, "exhausted register reads zero");
    }

    #[test]
    fn strobe_high_keeps_returning_a() {
        let mut pad = Controller::new();
        pad.set_buttons(Buttons::A | Buttons::B);
        pad.write_strobe(1);
        assert_eq!(pad.read(), 0x41);
        assert_eq!(pad.read(), 0x41);
    }

    #[test]
    fn state_changes_after_latch_are_not_seen() {
        let mut pad = Controller::new();
        pad.write_strobe(1);
        pad.write_strobe(0);
        pad.set_button(Button::A, true);
        assert_eq!(pad.read(), 0x40);
        assert_eq!(Buttons::from(Button::Down), Buttons::DOWN);
    }
}
