use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub const DEFAULT_TICK_MS: u64 = 1_000;

/// Stopwatch that counts whole ticks while running.
///
/// The ticker lives on a tokio runtime and only shares the running flag and
/// the counter with the UI thread. There is no reset.
pub struct Timer {
    runtime: Handle,
    interval: Duration,
    running: Arc<AtomicBool>,
    elapsed: Arc<AtomicU64>,
    ticker: Option<JoinHandle<()>>,
}

impl Timer {
    pub fn new(runtime: Handle, interval: Duration) -> Self {
        Timer {
            runtime,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            elapsed: Arc::new(AtomicU64::new(0)),
            ticker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let running = Arc::clone(&self.running);
        let elapsed = Arc::clone(&self.elapsed);
        let interval = self.interval;
        self.ticker = Some(self.runtime.spawn(async move {
            while running.load(Ordering::SeqCst) {
                tokio::time::sleep(interval).await;
                elapsed.fetch_add(1, Ordering::SeqCst);
            }
        }));
        log::info!("timer started at {}", format_elapsed(self.elapsed_seconds()));
    }

    pub fn pause(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        // Cancel the in-flight sleep so a quick resume never runs two tickers.
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        log::info!("timer paused at {}", format_elapsed(self.elapsed_seconds()));
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn display(&self) -> String {
        format!("Timer: {}", format_elapsed(self.elapsed_seconds()))
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_running() {
            "Pause"
        } else {
            "Start"
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

/// `minutes:seconds`, seconds zero-padded, minutes uncapped.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
