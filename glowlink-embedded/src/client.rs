use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use glowlink_api::Command;

use crate::network::{
    ChannelManager, ChannelStatus, Credentials, LinkManager, LinkStatus, SocketTransport,
    WifiController,
};
use crate::protocol;
use crate::state::DeviceState;

const DEFAULT_CHANNEL_PATH: &str = "/ws/device";
const DEFAULT_RESTART_GRACE: Duration = Duration::from_millis(250);

/// Runtime endpoint and identity configuration, fixed per physical build.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub id: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub credentials: Vec<Credentials>,
}

impl ClientConfig {
    pub fn new(
        id: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        credentials: Vec<Credentials>,
    ) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            port,
            path: String::from(DEFAULT_CHANNEL_PATH),
            credentials,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

/// Capability to restart the device, honoured when the server commands it.
pub trait SystemControl {
    fn restart(&mut self);
}

type Observer = Box<dyn FnMut(&DeviceState)>;

/// Orchestrates the link and channel managers from a single poll entry
/// point, applies inbound control frames to the device record, and pushes
/// snapshots back out. The only component actuator collaborators interact
/// with.
pub struct DeviceClient<W, S, C>
where
    W: WifiController,
    S: SocketTransport,
    C: SystemControl,
{
    link: LinkManager<W>,
    channel: ChannelManager<S>,
    system: C,
    state: DeviceState,
    host: String,
    port: u16,
    path: String,
    observer: Option<Observer>,
    restart_grace: Duration,
    restart_at: Option<Instant>,
}

impl<W, S, C> DeviceClient<W, S, C>
where
    W: WifiController,
    S: SocketTransport,
    C: SystemControl,
{
    pub fn new(config: ClientConfig, wifi: W, socket: S, system: C) -> Self {
        let state = DeviceState::new(config.id.clone());
        Self {
            link: LinkManager::new(wifi, config.credentials),
            channel: ChannelManager::new(socket, config.id),
            system,
            state,
            host: config.host,
            port: config.port,
            path: config.path,
            observer: None,
            restart_grace: DEFAULT_RESTART_GRACE,
            restart_at: None,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.link = self.link.with_attempt_timeout(timeout);
        self
    }

    pub fn with_retry_floor(mut self, floor: Duration) -> Self {
        self.link = self.link.with_retry_floor(floor);
        self
    }

    pub fn with_keepalive_interval(mut self, interval: Duration) -> Self {
        self.channel = self.channel.with_keepalive_interval(interval);
        self
    }

    pub fn with_reconnect_debounce(mut self, debounce: Duration) -> Self {
        self.channel = self.channel.with_reconnect_debounce(debounce);
        self
    }

    pub fn with_restart_grace(mut self, grace: Duration) -> Self {
        self.restart_grace = grace;
        self
    }

    pub fn link_status(&self) -> LinkStatus {
        self.link.status()
    }

    pub fn channel_status(&self) -> ChannelStatus {
        self.channel.status()
    }

    /// Immutable snapshot of the device record.
    pub fn state(&self) -> DeviceState {
        self.state.clone()
    }

    /// Register the observer invoked synchronously after every successful
    /// inbound state apply. At most one observer; re-registering replaces.
    pub fn on_state_changed<F>(&mut self, observer: F)
    where
        F: FnMut(&DeviceState) + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Single per-tick entry point: keeps the link alive, re-opens the
    /// channel when due, drains and applies inbound frames, keeps the
    /// channel fresh, and honours a pending restart. Never blocks longer
    /// than one full wireless candidate pass.
    pub async fn poll(&mut self) {
        self.link.ensure_connected().await;

        if self.link.status() == LinkStatus::Up && self.channel.reconnect_due() {
            let _ = self.channel.connect(&self.host, self.port, &self.path).await;
        }

        let frames = self.channel.poll().await;
        for raw in frames {
            self.handle_frame(&raw);
        }

        self.channel.maybe_ping().await;

        if let Some(at) = self.restart_at {
            if Instant::now() >= at {
                self.restart_at = None;
                log::warn!("restarting device");
                self.system.restart();
            }
        }
    }

    /// Encode the current record and send it, unconditionally. A closed
    /// channel drops the frame; the record is never altered.
    pub async fn push_state(&mut self) {
        match protocol::encode_state(&self.state) {
            Ok(frame) => {
                if let Err(e) = self.channel.send(&frame).await {
                    log::debug!("state push not delivered: {}", e);
                }
            }
            Err(e) => log::warn!("state encode failed: {}", e),
        }
    }

    pub async fn set_power(&mut self, on: bool, send_now: bool) {
        self.state.power = on;
        if send_now {
            self.push_state().await;
        }
    }

    pub async fn set_brightness(&mut self, brightness: u8, send_now: bool) {
        self.state.brightness = brightness;
        if send_now {
            self.push_state().await;
        }
    }

    pub async fn set_color(&mut self, r: u8, g: u8, b: u8, send_now: bool) {
        self.state.color = [r, g, b];
        if send_now {
            self.push_state().await;
        }
    }

    pub async fn set_auto_brightness(&mut self, enabled: bool, send_now: bool) {
        self.state.auto_brightness = enabled;
        if send_now {
            self.push_state().await;
        }
    }

    pub async fn set_position(&mut self, position: [i32; 4], send_now: bool) {
        self.state.position = position;
        if send_now {
            self.push_state().await;
        }
    }

    pub async fn set_auto_position(&mut self, enabled: bool, send_now: bool) {
        self.state.auto_position = enabled;
        if send_now {
            self.push_state().await;
        }
    }

    pub async fn set_distance(&mut self, distance: f32, send_now: bool) {
        self.state.distance = distance;
        if send_now {
            self.push_state().await;
        }
    }

    fn handle_frame(&mut self, raw: &[u8]) {
        match protocol::decode_control(raw) {
            Ok((body, command)) => {
                self.state.apply(&body);
                if let Some(observer) = self.observer.as_mut() {
                    observer(&self.state);
                }
                if let Some(Command::Restart) = command {
                    log::info!(
                        "restart commanded, honouring in {}ms",
                        self.restart_grace.as_millis()
                    );
                    self.restart_at = Some(Instant::now() + self.restart_grace);
                }
            }
            Err(e) => log::warn!("inbound frame dropped: {}", e),
        }
    }
}
