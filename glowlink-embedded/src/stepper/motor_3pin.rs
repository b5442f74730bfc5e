use embedded_hal::digital::OutputPin;

use super::Motor;

/// Driver with dedicated enable, direction and step lines. The enable line
/// is active-low, matching common external stepper driver modules.
pub struct ThreePinMotor<Pin>
where
    Pin: OutputPin,
{
    enable_pin: Pin,
    dir_pin: Pin,
    step_pin: Pin,
    dir_pin_inverted: bool,
    enabled: bool,
}

impl<Pin> ThreePinMotor<Pin>
where
    Pin: OutputPin,
{
    pub fn new(enable_pin: Pin, dir_pin: Pin, step_pin: Pin) -> Self {
        Self {
            enable_pin,
            dir_pin,
            step_pin,
            dir_pin_inverted: false,
            enabled: false,
        }
    }

    pub fn with_inverted_direction(mut self) -> Self {
        self.dir_pin_inverted = true;
        self
    }

    fn set_direction(&mut self, step: i64) {
        let dir_high = if step >= 0 {
            !self.dir_pin_inverted
        } else {
            self.dir_pin_inverted
        };

        if dir_high {
            self.dir_pin.set_high().ok();
        } else {
            self.dir_pin.set_low().ok();
        }
    }
}

impl<Pin> Motor for ThreePinMotor<Pin>
where
    Pin: OutputPin,
{
    fn step(&mut self, step: i64) {
        if !self.enabled {
            return;
        }
        self.set_direction(step);
        self.step_pin.set_high().ok();
        self.step_pin.set_low().ok();
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.enable_pin.set_low().ok();
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.enable_pin.set_high().ok();
    }
}
