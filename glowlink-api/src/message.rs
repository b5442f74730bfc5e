use alloc::string::String;

use serde::{Deserialize, Serialize};

/// One JSON message carried over the channel, tagged by its `type` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Frame {
    /// Device to server, first frame after every channel open.
    Register {
        /// Device identifier.
        id: String,
    },
    /// Device to server, full snapshot of the device record.
    State {
        /// Device identifier.
        id: String,
        /// Snapshot payload.
        state: StateBody,
    },
    /// Server to device, full-state replacement.
    Control {
        /// Replacement payload.
        state: ControlBody,
        /// Optional out-of-band instruction, see [`Command`].
        #[serde(default, skip_serializing_if = "Option::is_none")]
        command: Option<String>,
    },
}

/// Full snapshot of the device record as pushed to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateBody {
    pub power: bool,
    pub color: [u8; 3],
    pub brightness: u8,
    pub auto_brightness: bool,
    pub position: [i32; 4],
    pub auto_position: bool,
    pub distance: f32,
}

/// Inbound replacement payload. Fields absent on the wire overwrite with
/// their default value; `distance` is an extension field and is applied
/// only when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlBody {
    pub power: bool,
    pub color: [u8; 3],
    pub brightness: u8,
    pub auto_brightness: bool,
    pub position: [i32; 4],
    pub auto_position: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
}

/// Out-of-band instruction attached to a control frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Full device restart after the accompanying state is applied.
    Restart,
}

impl Command {
    /// Parse the wire representation. Unknown values are not commands.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "restart" => Some(Self::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restart => "restart",
        }
    }
}
