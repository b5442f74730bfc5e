use alloc::vec::Vec;

use embassy_time::{Duration, Timer};

use super::Motor;

/// Runtime drive parameters shared by every axis.
#[derive(Debug, Clone)]
pub struct MotorConfig {
    pub microsteps: u8,
    pub step_interval: Duration,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            microsteps: 16,
            step_interval: Duration::from_micros(250),
        }
    }
}

/// Drives up to four motor axes from the record's step targets. Targets
/// are relative moves; the caller clears the record's `position` back to
/// zero after each drive cycle.
pub struct MotorBank<M: Motor> {
    motors: Vec<M>,
    config: MotorConfig,
}

impl<M: Motor> MotorBank<M> {
    pub fn new(motors: Vec<M>, config: MotorConfig) -> Self {
        Self { motors, config }
    }

    pub fn motor_count(&self) -> usize {
        self.motors.len()
    }

    /// Issue each axis its relative move. Axes with a zero target are left
    /// untouched and their motors stay disabled.
    pub async fn drive(&mut self, targets: &[i32; 4]) {
        for (motor, &target) in self.motors.iter_mut().zip(targets.iter()) {
            if target == 0 {
                continue;
            }
            let pulses = i64::from(target) * i64::from(self.config.microsteps);
            let direction = if pulses > 0 { 1 } else { -1 };
            motor.enable();
            for _ in 0..pulses.unsigned_abs() {
                motor.step(direction);
                Timer::after(self.config.step_interval).await;
            }
            motor.disable();
        }
    }
}
