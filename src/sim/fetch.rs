//! Scriptable image fetcher.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::loader::{FetchError, FetchPriority, ImageFetcher};

#[derive(Debug, Clone, Default)]
struct Rule {
    latency: Option<Duration>,
    fail: bool,
}

/// One issued fetch, recorded at call time.
#[derive(Debug, Clone)]
pub struct FetchRecord {
    pub url: String,
    pub priority: FetchPriority,
    /// Start time on the tokio clock; deterministic under a paused clock.
    pub at: tokio::time::Instant,
}

/// Fetcher whose latencies and outcomes are scripted per URL.
pub struct SimFetcher {
    default_latency: Duration,
    fail_all: AtomicBool,
    rules: Mutex<HashMap<String, Rule>>,
    records: Arc<Mutex<Vec<FetchRecord>>>,
}

impl SimFetcher {
    pub fn new(default_latency: Duration) -> Self {
        Self {
            default_latency,
            fail_all: AtomicBool::new(false),
            rules: Mutex::new(HashMap::new()),
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script a failure for one URL.
    pub fn fail(&self, url: &str) {
        self.rules.lock().unwrap().entry(url.to_string()).or_default().fail = true;
    }

    /// Script a failure for every URL.
    pub fn fail_all(&self) {
        self.fail_all.store(true, Ordering::Relaxed);
    }

    /// Script a latency override for one URL.
    pub fn set_latency(&self, url: &str, latency: Duration) {
        self.rules
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .latency = Some(latency);
    }

    /// URLs fetched so far, in start order.
    pub fn started(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    /// Every issued fetch, in start order.
    pub fn records(&self) -> Vec<FetchRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl ImageFetcher for SimFetcher {
    fn fetch(&self, url: &str, priority: FetchPriority) -> BoxFuture<'static, Result<(), FetchError>> {
        self.records.lock().unwrap().push(FetchRecord {
            url: url.to_string(),
            priority,
            at: tokio::time::Instant::now(),
        });
        let rule = self
            .rules
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_default();
        let fail = rule.fail || self.fail_all.load(Ordering::Relaxed);
        let latency = rule.latency.unwrap_or(self.default_latency);
        let url = url.to_string();
        Box::pin(async move {
            tokio::time::sleep(latency).await;
            if fail {
                Err(FetchError(format!("scripted failure for {url}")))
            } else {
                Ok(())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn latency_and_outcome_follow_the_script() {
        let fetcher = SimFetcher::new(Duration::from_millis(40));
        fetcher.fail("bad.webp");
        fetcher.set_latency("slow.webp", Duration::from_millis(500));

        let started = tokio::time::Instant::now();
        fetcher.fetch("ok.webp", FetchPriority::High).await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_millis(40));

        assert!(fetcher.fetch("bad.webp", FetchPriority::Auto).await.is_err());

        let before_slow = tokio::time::Instant::now();
        fetcher.fetch("slow.webp", FetchPriority::Auto).await.unwrap();
        assert_eq!(before_slow.elapsed(), Duration::from_millis(500));

        assert_eq!(fetcher.started(), vec!["ok.webp", "bad.webp", "slow.webp"]);
    }
}
