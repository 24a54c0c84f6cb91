//! Front-panel push buttons

use embassy_rp::gpio::Input;
use embassy_time::{block_for, Duration};

use medibox_core::traits::{Button, InputReader};

/// Poll interval while waiting for a press
const POLL_MS: u64 = 10;

/// Four active-low push buttons on pulled-up inputs
pub struct ButtonPad<'d> {
    up: Input<'d>,
    down: Input<'d>,
    ok: Input<'d>,
    cancel: Input<'d>,
}

impl<'d> ButtonPad<'d> {
    pub fn new(up: Input<'d>, down: Input<'d>, ok: Input<'d>, cancel: Input<'d>) -> Self {
        Self { up, down, ok, cancel }
    }

    fn input(&mut self, button: Button) -> &mut Input<'d> {
        match button {
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Ok => &mut self.ok,
            Button::Cancel => &mut self.cancel,
        }
    }
}

impl InputReader for ButtonPad<'_> {
    fn is_pressed(&mut self, button: Button) -> bool {
        self.input(button).is_low()
    }

    fn wait_for_press(&mut self) -> Button {
        loop {
            for button in [Button::Up, Button::Down, Button::Ok, Button::Cancel] {
                if self.is_pressed(button) {
                    return button;
                }
            }
            block_for(Duration::from_millis(POLL_MS));
        }
    }
}
