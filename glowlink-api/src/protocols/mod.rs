pub mod json;

pub use json::JsonProtocol;

use alloc::string::String;
use alloc::vec::Vec;

#[derive(Debug)]
pub enum Error {
    /// Serialization error
    Serialization(String),
    /// Deserialization error
    Deserialization(String),
}

pub type Result<T> = core::result::Result<T, Error>;

pub trait Protocol: Send + Sync {
    /// Serialize data into bytes
    fn serialize<T: serde::Serialize>(&self, data: &T) -> Result<Vec<u8>>;

    /// Deserialize bytes into data
    fn deserialize<T: for<'de> serde::Deserialize<'de>>(&self, bytes: &[u8]) -> Result<T>;

    /// Get protocol name
    fn name(&self) -> &'static str;
}
