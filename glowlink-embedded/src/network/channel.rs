use alloc::string::String;
use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use crate::Error;
use crate::protocol;

const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(15);
const DEFAULT_RECONNECT_DEBOUNCE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Closed,
    Opening,
    Open,
}

/// Transport-level notification, drained in delivery order from `poll`.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    Opened,
    Closed,
    Frame(Vec<u8>),
    Ping,
    Pong,
}

#[allow(async_fn_in_trait)]
pub trait SocketTransport {
    type Error;

    /// Begin opening a socket to the given endpoint
    async fn open(&mut self, host: &str, port: u16, path: &str) -> Result<(), Self::Error>;

    /// Tear down the current socket
    async fn close(&mut self) -> Result<(), Self::Error>;

    /// Send one opaque frame
    async fn send(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Send a liveness probe
    async fn ping(&mut self) -> Result<(), Self::Error>;

    /// Drain the next pending event, resolving immediately when none is
    /// queued
    async fn poll_event(&mut self) -> Option<SocketEvent>;
}

pub struct ChannelManager<S: SocketTransport> {
    transport: S,
    device_id: String,
    status: ChannelStatus,
    keepalive_interval: Duration,
    reconnect_debounce: Duration,
    last_ping: Option<Instant>,
    last_closed: Option<Instant>,
    dropped_sends: u32,
}

impl<S: SocketTransport> ChannelManager<S> {
    pub fn new(transport: S, device_id: impl Into<String>) -> Self {
        Self {
            transport,
            device_id: device_id.into(),
            status: ChannelStatus::Closed,
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            reconnect_debounce: DEFAULT_RECONNECT_DEBOUNCE,
            last_ping: None,
            last_closed: None,
            dropped_sends: 0,
        }
    }

    pub fn with_keepalive_interval(mut self, interval: Duration) -> Self {
        self.keepalive_interval = interval;
        self
    }

    pub fn with_reconnect_debounce(mut self, debounce: Duration) -> Self {
        self.reconnect_debounce = debounce;
        self
    }

    pub fn status(&self) -> ChannelStatus {
        self.status
    }

    /// Frames dropped because the channel was not open.
    pub fn dropped_sends(&self) -> u32 {
        self.dropped_sends
    }

    /// Get reference to the inner transport layer
    pub fn transport(&self) -> &S {
        &self.transport
    }

    /// Get mutable reference to the inner transport layer
    pub fn transport_mut(&mut self) -> &mut S {
        &mut self.transport
    }

    /// Whether the Closed to Opening edge may fire. The first open is
    /// immediate; later ones wait out the debounce since the last close.
    pub fn reconnect_due(&self) -> bool {
        self.status == ChannelStatus::Closed
            && self
                .last_closed
                .map(|closed| closed.elapsed() >= self.reconnect_debounce)
                .unwrap_or(true)
    }

    pub async fn connect(&mut self, host: &str, port: u16, path: &str) -> Result<(), Error> {
        if self.status != ChannelStatus::Closed {
            let _ = self.transport.close().await;
            self.mark_closed();
        }

        log::info!("opening channel to {}:{}{}", host, port, path);
        self.status = ChannelStatus::Opening;
        match self.transport.open(host, port, path).await {
            Ok(()) => Ok(()),
            Err(_) => {
                log::warn!("channel open failed");
                self.mark_closed();
                Err(Error::ChannelError)
            }
        }
    }

    /// Drain pending transport events once. Inbound frames received while
    /// Open are returned in delivery order; traffic ahead of the
    /// registration handshake is dropped.
    pub async fn poll(&mut self) -> Vec<Vec<u8>> {
        let mut inbound = Vec::new();
        while let Some(event) = self.transport.poll_event().await {
            match event {
                SocketEvent::Opened => {
                    log::info!("channel open, registering as `{}`", self.device_id);
                    self.status = ChannelStatus::Open;
                    self.last_ping = Some(Instant::now());
                    match protocol::encode_register(&self.device_id) {
                        Ok(frame) => {
                            if self.transport.send(&frame).await.is_err() {
                                log::warn!("register send failed");
                                self.mark_closed();
                            }
                        }
                        Err(e) => log::error!("register encode failed: {}", e),
                    }
                }
                SocketEvent::Closed => {
                    if self.status != ChannelStatus::Closed {
                        log::warn!("channel closed by transport");
                    }
                    self.mark_closed();
                }
                SocketEvent::Frame(data) => {
                    if self.status == ChannelStatus::Open {
                        inbound.push(data);
                    } else {
                        log::debug!("frame ahead of registration dropped");
                    }
                }
                SocketEvent::Ping => log::debug!("ping from server"),
                SocketEvent::Pong => log::debug!("pong from server"),
            }
        }
        inbound
    }

    /// Best-effort send. Dropped without queueing or retry when the channel
    /// is not open.
    pub async fn send(&mut self, frame: &[u8]) -> Result<(), Error> {
        if self.status != ChannelStatus::Open {
            self.dropped_sends += 1;
            log::debug!("channel not open, frame dropped");
            return Err(Error::SendDropped);
        }
        match self.transport.send(frame).await {
            Ok(()) => Ok(()),
            Err(_) => {
                log::warn!("send failed, closing channel");
                self.mark_closed();
                Err(Error::ChannelError)
            }
        }
    }

    /// Send a liveness probe when none has been sent for a full keep-alive
    /// interval. No reply is required for the channel to stay open.
    pub async fn maybe_ping(&mut self) {
        if self.status != ChannelStatus::Open {
            return;
        }
        let due = self
            .last_ping
            .map(|ping| ping.elapsed() >= self.keepalive_interval)
            .unwrap_or(true);
        if !due {
            return;
        }
        self.last_ping = Some(Instant::now());
        if self.transport.ping().await.is_err() {
            log::warn!("keep-alive send failed, closing channel");
            self.mark_closed();
        }
    }

    pub async fn close(&mut self) {
        let _ = self.transport.close().await;
        self.mark_closed();
    }

    fn mark_closed(&mut self) {
        if self.status != ChannelStatus::Closed {
            self.status = ChannelStatus::Closed;
            self.last_closed = Some(Instant::now());
        }
    }
}
