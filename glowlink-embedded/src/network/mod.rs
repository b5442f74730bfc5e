mod channel;
mod link;

pub use channel::{ChannelManager, ChannelStatus, SocketEvent, SocketTransport};
pub use link::{Credentials, LinkManager, LinkStatus};

use alloc::string::String;
use alloc::vec::Vec;

/// A network visible in a pre-association scan, reported for diagnostics.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub ssid: String,
    pub rssi: i8,
}

#[allow(async_fn_in_trait)]
pub trait WifiController {
    type Error;

    /// Scan for visible networks
    async fn scan(&mut self) -> Result<Vec<ScanEntry>, Self::Error>;

    /// Associate with the given network, resolving once the outcome is
    /// definitive
    async fn connect(&mut self, ssid: &str, secret: &str) -> Result<(), Self::Error>;

    /// Drop the current association
    async fn disconnect(&mut self) -> Result<(), Self::Error>;

    /// Whether an association is currently established
    fn is_connected(&self) -> bool;
}
