//! Controller input as seen by the frame loop
//!
//! The input device is polled once per tick. It exposes one analog stick and
//! the set of buttons currently held.

bitflags::bitflags! {
    /// Buttons currently held on the controller
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u16 {
        const D_UP = 1 << 0;
        const D_DOWN = 1 << 1;
        const D_LEFT = 1 << 2;
        const D_RIGHT = 1 << 3;
        const A = 1 << 4;
        const B = 1 << 5;
        const Z = 1 << 6;
        const L = 1 << 7;
        const R = 1 << 8;
        const START = 1 << 9;
    }
}

impl Buttons {
    /// Look up a button by its input-script name (`"d_up"`, `"up"`, `"l"`, ...).
    ///
    /// Case-insensitive, and accepts the short d-pad aliases.
    pub fn from_script_name(name: &str) -> Option<Buttons> {
        match name.to_ascii_lowercase().as_str() {
            "d_up" | "up" => Some(Buttons::D_UP),
            "d_down" | "down" => Some(Buttons::D_DOWN),
            "d_left" | "left" => Some(Buttons::D_LEFT),
            "d_right" | "right" => Some(Buttons::D_RIGHT),
            "a" => Some(Buttons::A),
            "b" => Some(Buttons::B),
            "z" => Some(Buttons::Z),
            "l" => Some(Buttons::L),
            "r" => Some(Buttons::R),
            "start" => Some(Buttons::START),
            _ => None,
        }
    }
}

/// One polled controller sample
///
/// Stick axes are raw device units (-128..=127). The camera treats them as
/// unitless scale factors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub stick_x: i8,
    pub stick_y: i8,
    pub held: Buttons,
}

impl InputFrame {
    /// Input with only buttons held
    pub fn holding(held: Buttons) -> Self {
        Self {
            held,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_held(&self, button: Buttons) -> bool {
        self.held.contains(button)
    }
}

/// Source of per-tick controller input
pub trait InputSource {
    /// Poll the device. Called exactly once per tick.
    fn poll(&mut self) -> InputFrame;
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn poll(&mut self) -> InputFrame {
        (**self).poll()
    }
}

/// Input source that never presses anything
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn poll(&mut self) -> InputFrame {
        InputFrame::default()
    }
}
