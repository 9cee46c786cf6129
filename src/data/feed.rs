/// Background fetcher for the live feed.
///
/// A worker thread owns the HTTP transport; the board side holds a
/// `FeedHandle` and never blocks. Requests go down one channel, results
/// come back on another, and the main loop polls between frames. Builds
/// without the `live` feature swap in a stub transport that reports
/// itself disabled, which sends the caller down the mock fallback path.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use thiserror::Error;

use crate::data::wire;
use crate::domain::flight::{Flight, Mode};

#[derive(Clone, Debug, Error)]
pub enum FeedError {
    #[error("live feed disabled at build time")]
    Disabled,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("feed endpoint returned HTTP {0}")]
    Upstream(u16),
    #[error("bad feed payload: {0}")]
    Decode(String),
}

pub type FeedResult = Result<Vec<Flight>, FeedError>;

struct FeedRequest {
    airport: String,
    mode: Mode,
}

pub struct FeedHandle {
    requests: Sender<FeedRequest>,
    results: Receiver<(Mode, FeedResult)>,
}

impl FeedHandle {
    /// Start the worker. Dropping the handle closes the request channel,
    /// which ends the thread.
    pub fn spawn(proxy_url: String) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<FeedRequest>();
        let (res_tx, res_rx) = mpsc::channel::<(Mode, FeedResult)>();
        thread::spawn(move || worker(&proxy_url, req_rx, res_tx));
        FeedHandle { requests: req_tx, results: res_rx }
    }

    /// Queue one fetch. Never blocks; a dead worker is ignored.
    pub fn request(&self, airport: &str, mode: Mode) {
        let _ = self.requests.send(FeedRequest { airport: airport.to_string(), mode });
    }

    /// Collect one finished fetch, if any. The mode it was requested for
    /// comes along so the caller can drop deliveries that a mode switch
    /// has since made stale.
    pub fn poll(&self) -> Option<(Mode, FeedResult)> {
        match self.results.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

fn worker(proxy_url: &str, requests: Receiver<FeedRequest>, results: Sender<(Mode, FeedResult)>) {
    let fetcher = transport::Fetcher::new();
    while let Ok(req) = requests.recv() {
        // airport is uppercase alphanumerics by the time it gets here
        // (config sanitizes), so the query string needs no escaping
        let url = format!("{}?airport={}&type={}", proxy_url, req.airport, req.mode.as_query());
        let outcome = fetcher
            .get(&url)
            .and_then(|body| wire::parse_feed(&body).map_err(|e| FeedError::Decode(e.to_string())));
        if results.send((req.mode, outcome)).is_err() {
            break; // board side is gone
        }
    }
}

#[cfg(feature = "live")]
mod transport {
    use std::time::Duration;

    use super::FeedError;

    /// Blocking HTTP transport; one client reused for every request.
    /// A client that failed to build reports on every request instead of
    /// taking the worker down.
    pub struct Fetcher {
        client: Option<reqwest::blocking::Client>,
    }

    impl Fetcher {
        pub fn new() -> Self {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(8))
                .build()
                .ok();
            Fetcher { client }
        }

        pub fn get(&self, url: &str) -> Result<String, FeedError> {
            let client = self
                .client
                .as_ref()
                .ok_or_else(|| FeedError::Transport("http client unavailable".into()))?;
            let response = client
                .get(url)
                .send()
                .map_err(|e| FeedError::Transport(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(FeedError::Upstream(status.as_u16()));
            }
            response.text().map_err(|e| FeedError::Transport(e.to_string()))
        }
    }
}

#[cfg(not(feature = "live"))]
mod transport {
    use super::FeedError;

    /// Stub transport for builds without the `live` feature.
    pub struct Fetcher;

    impl Fetcher {
        pub fn new() -> Self {
            Fetcher
        }

        pub fn get(&self, _url: &str) -> Result<String, FeedError> {
            Err(FeedError::Disabled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn poll_is_empty_before_any_request() {
        let handle = FeedHandle::spawn("http://127.0.0.1:9".to_string());
        assert!(handle.poll().is_none());
    }

    #[test]
    fn unreachable_endpoint_reports_an_error() {
        // port 9 (discard) is closed on any sane host, so a live build gets
        // connection refused; a stub build gets Disabled. Either way the
        // request resolves to an error instead of hanging the caller.
        let handle = FeedHandle::spawn("http://127.0.0.1:9".to_string());
        handle.request("IAD", Mode::Arrivals);

        let deadline = Instant::now() + Duration::from_secs(20);
        loop {
            if let Some((mode, result)) = handle.poll() {
                assert_eq!(mode, Mode::Arrivals);
                assert!(result.is_err());
                return;
            }
            assert!(Instant::now() < deadline, "fetch never resolved");
            thread::sleep(Duration::from_millis(10));
        }
    }
}
