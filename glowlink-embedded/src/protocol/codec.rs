use alloc::string::String;
use alloc::vec::Vec;

use glowlink_api::{Command, ControlBody, Frame, JsonProtocol, Protocol};

use crate::state::DeviceState;
use crate::{Error, Result};

/// Encode the registration handshake frame.
pub fn encode_register(id: &str) -> Result<Vec<u8>> {
    JsonProtocol
        .serialize(&Frame::Register {
            id: String::from(id),
        })
        .map_err(|_| Error::Encode)
}

/// Encode a full snapshot of the device record.
pub fn encode_state(state: &DeviceState) -> Result<Vec<u8>> {
    JsonProtocol
        .serialize(&Frame::State {
            id: state.id.clone(),
            state: state.body(),
        })
        .map_err(|_| Error::Encode)
}

/// Decode an inbound frame into a replacement payload and an optional
/// command. Anything other than a well-formed control frame is an error;
/// the caller drops the frame with no partial application.
pub fn decode_control(raw: &[u8]) -> Result<(ControlBody, Option<Command>)> {
    let frame: Frame = JsonProtocol.deserialize(raw).map_err(|_| Error::Decode)?;
    match frame {
        Frame::Control { state, command } => {
            let command = match command.as_deref() {
                Some(raw_command) => {
                    let parsed = Command::parse(raw_command);
                    if parsed.is_none() {
                        log::warn!("unrecognized command `{}` ignored", raw_command);
                    }
                    parsed
                }
                None => None,
            };
            Ok((state, command))
        }
        _ => Err(Error::Decode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_layout() {
        let bytes = encode_register("esp32-s3-device").unwrap();
        assert_eq!(
            core::str::from_utf8(&bytes).unwrap(),
            r#"{"type":"register","id":"esp32-s3-device"}"#
        );
    }

    #[test]
    fn state_snapshot_carries_every_field() {
        let mut state = DeviceState::new("esp32-s3-device");
        state.power = true;
        state.color = [10, 20, 30];
        state.brightness = 128;
        state.position = [1, -1, 0, 0];
        state.distance = 0.5;

        let bytes = encode_state(&state).unwrap();
        let text = core::str::from_utf8(&bytes).unwrap();
        assert!(text.starts_with(r#"{"type":"state","id":"esp32-s3-device","state":{"#));
        assert!(text.contains(r#""power":true"#));
        assert!(text.contains(r#""color":[10,20,30]"#));
        assert!(text.contains(r#""brightness":128"#));
        assert!(text.contains(r#""position":[1,-1,0,0]"#));
        assert!(text.contains(r#""distance":0.5"#));
    }

    #[test]
    fn control_round_trip_applies_to_record() {
        let raw = br#"{"type":"control","state":{"power":true,"color":[10,20,30],"brightness":128,"auto_brightness":false,"position":[1,-1,0,0],"auto_position":false}}"#;
        let (body, command) = decode_control(raw).unwrap();
        assert_eq!(command, None);

        let mut state = DeviceState::new("esp32-s3-device");
        state.apply(&body);
        assert!(state.power);
        assert_eq!(state.color, [10, 20, 30]);
        assert_eq!(state.brightness, 128);
        assert_eq!(state.position, [1, -1, 0, 0]);
    }

    #[test]
    fn restart_command_is_recognized() {
        let raw = br#"{"type":"control","state":{},"command":"restart"}"#;
        let (_, command) = decode_control(raw).unwrap();
        assert_eq!(command, Some(Command::Restart));
    }

    #[test]
    fn unknown_command_decodes_without_command() {
        let raw = br#"{"type":"control","state":{},"command":"self-destruct"}"#;
        let (_, command) = decode_control(raw).unwrap();
        assert_eq!(command, None);
    }

    #[test]
    fn non_control_frames_are_errors() {
        let state = br#"{"type":"state","id":"x","state":{"power":false,"color":[0,0,0],"brightness":0,"auto_brightness":false,"position":[0,0,0,0],"auto_position":false,"distance":0.0}}"#;
        assert_eq!(decode_control(state).unwrap_err(), Error::Decode);
        assert_eq!(decode_control(b"{oops").unwrap_err(), Error::Decode);
    }
}
