//! Buzzer and indicator LED

use embassy_rp::gpio::Output;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};

use medibox_core::traits::AlertActuator;

/// PWM counter tick rate after the divider (125 MHz system / 125)
const PWM_TICK_HZ: u32 = 1_000_000;

/// Square-wave buzzer on PWM channel B plus an indicator LED
pub struct BuzzerLed<'d> {
    buzzer: Pwm<'d>,
    led: Output<'d>,
}

impl<'d> BuzzerLed<'d> {
    pub fn new(buzzer: Pwm<'d>, led: Output<'d>) -> Self {
        Self { buzzer, led }
    }

    fn tone_config(frequency_hz: u16) -> PwmConfig {
        let mut config = PwmConfig::default();
        config.divider = 125u8.into();
        let top = (PWM_TICK_HZ / frequency_hz.max(1) as u32) as u16;
        config.top = top;
        config.compare_b = top / 2; // 50% duty square wave
        config
    }
}

impl AlertActuator for BuzzerLed<'_> {
    fn start_tone(&mut self, frequency_hz: u16) {
        self.buzzer.set_config(&Self::tone_config(frequency_hz));
    }

    fn stop_tone(&mut self) {
        let mut config = PwmConfig::default();
        config.divider = 125u8.into();
        config.compare_b = 0;
        self.buzzer.set_config(&config);
    }

    fn set_indicator(&mut self, on: bool) {
        if on {
            self.led.set_high();
        } else {
            self.led.set_low();
        }
    }
}
