#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod client;
pub mod error;
pub mod light;
pub mod network;
pub mod protocol;
pub mod state;
pub mod stepper;

pub use client::*;
pub use error::*;
pub use network::*;
pub use state::*;
