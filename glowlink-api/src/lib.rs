#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod message;
pub mod protocols;

pub use message::{Command, ControlBody, Frame, StateBody};
pub use protocols::{JsonProtocol, Protocol};
