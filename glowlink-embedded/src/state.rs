use alloc::string::String;

use glowlink_api::{ControlBody, StateBody};

/// Canonical device record. Constructed once at startup, mutated only by
/// decoded control frames and local setter calls, and handed out by value
/// as a snapshot to actuator collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    pub id: String,
    pub power: bool,
    pub color: [u8; 3],
    pub brightness: u8,
    pub auto_brightness: bool,
    pub position: [i32; 4],
    pub auto_position: bool,
    pub distance: f32,
}

impl DeviceState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            power: false,
            color: [0; 3],
            brightness: 0,
            auto_brightness: false,
            position: [0; 4],
            auto_position: false,
            distance: 0.0,
        }
    }

    /// Overwrite the record from an inbound replacement payload. An absent
    /// `distance` leaves the current reading untouched.
    pub fn apply(&mut self, body: &ControlBody) {
        self.power = body.power;
        self.color = body.color;
        self.brightness = body.brightness;
        self.auto_brightness = body.auto_brightness;
        self.position = body.position;
        self.auto_position = body.auto_position;
        if let Some(distance) = body.distance {
            self.distance = distance;
        }
    }

    /// Wire snapshot of the record.
    pub fn body(&self) -> StateBody {
        StateBody {
            power: self.power,
            color: self.color,
            brightness: self.brightness,
            auto_brightness: self.auto_brightness,
            position: self.position,
            auto_position: self.auto_position,
            distance: self.distance,
        }
    }
}
