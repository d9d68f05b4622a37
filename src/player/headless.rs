use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::core::MediaElement;

const TIME_UPDATE_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct HeadlessState {
    source: Option<String>,
    load_count: usize,
    position: f64,
}

/// In-process media element with no decoder behind it.
///
/// Used by the CLI to simulate playback and by tests to drive time
/// updates deterministically.
#[derive(Debug)]
pub struct HeadlessMedia {
    state: Mutex<HeadlessState>,
    time_tx: broadcast::Sender<f64>,
}

impl Default for HeadlessMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessMedia {
    pub fn new() -> Self {
        let (time_tx, _) = broadcast::channel(TIME_UPDATE_CAPACITY);
        Self {
            state: Mutex::new(HeadlessState::default()),
            time_tx,
        }
    }

    pub fn source(&self) -> Option<String> {
        self.lock().source.clone()
    }

    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    pub fn position(&self) -> f64 {
        self.lock().position
    }

    /// Move the playhead to `current_time` and notify subscribers.
    pub fn emit_time_update(&self, current_time: f64) {
        self.lock().position = current_time;
        let _ = self.time_tx.send(current_time);
    }

    /// Advance from `from` for `duration`, emitting an update every `tick`.
    pub async fn play(&self, from: f64, duration: Duration, tick: Duration) {
        let tick = tick.max(Duration::from_millis(1));
        let end = from + duration.as_secs_f64();
        let mut current = from;

        debug!("Simulating playback from {:.1}s to {:.1}s", from, end);
        self.emit_time_update(current);

        let mut interval = tokio::time::interval(tick);
        interval.tick().await;
        while current < end {
            interval.tick().await;
            current = (current + tick.as_secs_f64()).min(end);
            trace!("timeupdate {:.3}", current);
            self.emit_time_update(current);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MediaElement for HeadlessMedia {
    fn set_source(&self, src: &str) {
        let mut state = self.lock();
        state.source = Some(src.to_string());
        state.position = 0.0;
    }

    fn load(&self) {
        let mut state = self.lock();
        state.load_count += 1;
        debug!("Loading {:?}", state.source);
    }

    fn time_updates(&self) -> broadcast::Receiver<f64> {
        self.time_tx.subscribe()
    }
}
