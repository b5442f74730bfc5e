use alloc::string::String;
use alloc::vec::Vec;

use embassy_time::{Duration, Instant, with_timeout};
use serde::{Deserialize, Serialize};

use crate::Error;

use super::WifiController;

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_RETRY_FLOOR: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Down,
    Connecting,
    Up,
}

/// One wireless credential pair. Candidates are tried in configuration
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub ssid: String,
    pub secret: String,
}

pub struct LinkManager<W: WifiController> {
    controller: W,
    candidates: Vec<Credentials>,
    status: LinkStatus,
    selected: Option<String>,
    attempt_timeout: Duration,
    retry_floor: Duration,
    last_attempt: Option<Instant>,
}

impl<W: WifiController> LinkManager<W> {
    pub fn new(controller: W, candidates: Vec<Credentials>) -> Self {
        Self {
            controller,
            candidates,
            status: LinkStatus::Down,
            selected: None,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            retry_floor: DEFAULT_RETRY_FLOOR,
            last_attempt: None,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_retry_floor(mut self, floor: Duration) -> Self {
        self.retry_floor = floor;
        self
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    /// Identity of the candidate the current association was made with.
    pub fn selected_ssid(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Cheap per-tick entry point. Runs a full candidate pass only when the
    /// association is down and the retry floor has elapsed since the last
    /// pass, so other poll work is never starved.
    pub async fn ensure_connected(&mut self) {
        if self.controller.is_connected() {
            if self.status != LinkStatus::Up {
                log::info!("wireless association present, marking link up");
                self.status = LinkStatus::Up;
            }
            return;
        }

        if self.status == LinkStatus::Up {
            log::warn!("wireless association lost");
            self.status = LinkStatus::Down;
            self.selected = None;
        }

        if let Some(last) = self.last_attempt {
            if last.elapsed() < self.retry_floor {
                return;
            }
        }

        match self.connect().await {
            Ok(ssid) => log::info!("wireless link up via `{}`", ssid),
            Err(_) => log::warn!(
                "all wireless candidates failed, next pass in {}s",
                self.retry_floor.as_secs()
            ),
        }
    }

    /// One full pass over the candidate list, in order. Each attempt blocks
    /// up to the per-attempt timeout waiting for a definitive outcome;
    /// exhausting the list is non-fatal and reported to the caller.
    pub async fn connect(&mut self) -> Result<String, Error> {
        self.last_attempt = Some(Instant::now());
        self.status = LinkStatus::Connecting;

        if let Ok(entries) = self.controller.scan().await {
            log::info!("scan found {} networks", entries.len());
            for entry in &entries {
                log::debug!("  {} ({} dBm)", entry.ssid, entry.rssi);
            }
        }

        let candidates = self.candidates.clone();
        for candidate in &candidates {
            log::info!("associating with `{}`", candidate.ssid);
            let attempt = with_timeout(
                self.attempt_timeout,
                self.controller.connect(&candidate.ssid, &candidate.secret),
            );
            match attempt.await {
                Ok(Ok(())) if self.controller.is_connected() => {
                    self.status = LinkStatus::Up;
                    self.selected = Some(candidate.ssid.clone());
                    return Ok(candidate.ssid.clone());
                }
                Ok(Ok(())) => {
                    log::warn!("`{}` accepted but did not associate", candidate.ssid);
                }
                Ok(Err(_)) => {
                    log::warn!("association with `{}` failed", candidate.ssid);
                }
                Err(_) => {
                    log::warn!("association with `{}` timed out", candidate.ssid);
                }
            }
            let _ = self.controller.disconnect().await;
        }

        self.status = LinkStatus::Down;
        Err(Error::AllCandidatesFailed)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use tokio::time::sleep;

    use super::super::ScanEntry;
    use super::*;

    #[derive(Debug, Default)]
    struct MockWifi {
        attempts: Vec<String>,
        reachable: Vec<String>,
        unresponsive: Vec<String>,
        connected: bool,
    }

    impl WifiController for MockWifi {
        type Error = ();

        async fn scan(&mut self) -> Result<Vec<ScanEntry>, ()> {
            Ok(vec![ScanEntry {
                ssid: "HUAWEI-FR71E3".to_string(),
                rssi: -40,
            }])
        }

        async fn connect(&mut self, ssid: &str, _secret: &str) -> Result<(), ()> {
            self.attempts.push(ssid.to_string());
            if self.unresponsive.iter().any(|s| s == ssid) {
                core::future::pending::<()>().await;
            }
            if self.reachable.iter().any(|s| s == ssid) {
                self.connected = true;
                Ok(())
            } else {
                Err(())
            }
        }

        async fn disconnect(&mut self) -> Result<(), ()> {
            self.connected = false;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    fn creds(ssids: &[&str]) -> Vec<Credentials> {
        ssids
            .iter()
            .map(|s| Credentials {
                ssid: s.to_string(),
                secret: "pass".to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn first_reachable_candidate_wins() {
        let wifi = MockWifi {
            reachable: vec!["aRolf".to_string()],
            ..Default::default()
        };
        let mut link = LinkManager::new(wifi, creds(&["HUAWEI-FR71E3", "aRolf", "Backup"]));

        let selected = link.connect().await.unwrap();

        assert_eq!(selected, "aRolf");
        assert_eq!(link.status(), LinkStatus::Up);
        assert_eq!(link.selected_ssid(), Some("aRolf"));
        assert_eq!(link.controller.attempts, vec!["HUAWEI-FR71E3", "aRolf"]);
    }

    #[tokio::test]
    async fn exhaustion_is_retried_only_after_the_floor() {
        let mut link = LinkManager::new(MockWifi::default(), creds(&["a", "b"]))
            .with_retry_floor(Duration::from_millis(50));

        assert_eq!(link.connect().await.unwrap_err(), Error::AllCandidatesFailed);
        assert_eq!(link.controller.attempts.len(), 2);
        assert_eq!(link.status(), LinkStatus::Down);

        link.ensure_connected().await;
        link.ensure_connected().await;
        assert_eq!(
            link.controller.attempts.len(),
            2,
            "no pass inside the retry floor"
        );

        sleep(tokio::time::Duration::from_millis(80)).await;
        link.ensure_connected().await;
        assert_eq!(
            link.controller.attempts.len(),
            4,
            "second pass after the floor elapsed"
        );
        assert_eq!(link.status(), LinkStatus::Down);
    }

    #[tokio::test]
    async fn unresponsive_candidate_times_out() {
        let wifi = MockWifi {
            reachable: vec!["aRolf".to_string()],
            unresponsive: vec!["tarpit".to_string()],
            ..Default::default()
        };
        let mut link = LinkManager::new(wifi, creds(&["tarpit", "aRolf"]))
            .with_attempt_timeout(Duration::from_millis(20));

        let selected = link.connect().await.unwrap();

        assert_eq!(selected, "aRolf");
        assert_eq!(link.controller.attempts, vec!["tarpit", "aRolf"]);
    }

    #[tokio::test]
    async fn lost_association_is_reattempted() {
        let wifi = MockWifi {
            reachable: vec!["aRolf".to_string()],
            ..Default::default()
        };
        let mut link = LinkManager::new(wifi, creds(&["aRolf"]))
            .with_retry_floor(Duration::from_millis(0));

        link.ensure_connected().await;
        assert_eq!(link.status(), LinkStatus::Up);

        link.controller.connected = false;
        link.ensure_connected().await;
        assert_eq!(link.status(), LinkStatus::Up, "re-associated on the same tick");
        assert_eq!(link.controller.attempts.len(), 2);
    }
}
