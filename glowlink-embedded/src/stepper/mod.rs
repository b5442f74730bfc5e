mod bank;
mod motor_3pin;

pub use bank::{MotorBank, MotorConfig};
pub use motor_3pin::ThreePinMotor;

pub trait Motor {
    fn step(&mut self, step: i64);

    fn enable(&mut self);

    fn disable(&mut self);
}
