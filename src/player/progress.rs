use crate::config::PlaybackConfig;
use crate::constants::{PERSIST_INTERVAL_SECS, VIEW_THRESHOLD_SECS};
use crate::models::PlaybackState;

/// Decides what a single time-update notification should trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressPolicy {
    pub view_threshold_secs: f64,
    /// Zero disables position persistence.
    pub persist_interval_secs: u64,
}

/// Outcome of one time update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressStep {
    pub count_view: bool,
    pub persist_position: Option<u64>,
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            view_threshold_secs: VIEW_THRESHOLD_SECS,
            persist_interval_secs: PERSIST_INTERVAL_SECS,
        }
    }
}

impl From<&PlaybackConfig> for ProgressPolicy {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            view_threshold_secs: config.view_threshold_secs,
            persist_interval_secs: config.persist_interval_secs,
        }
    }
}

impl ProgressPolicy {
    /// The view is counted once per loaded video, the first time playback
    /// reaches the threshold. The position is persisted on every update
    /// whose whole seconds fall on an interval boundary, so a boundary
    /// that spans several updates is written several times.
    pub fn evaluate(&self, state: &PlaybackState, current_time: f64) -> ProgressStep {
        if !current_time.is_finite() || current_time < 0.0 {
            return ProgressStep::default();
        }

        let count_view = !state.counted_view
            && state.current_video_id.is_some()
            && current_time >= self.view_threshold_secs;

        let whole_seconds = current_time.floor() as u64;
        let persist_position = (self.persist_interval_secs > 0
            && whole_seconds % self.persist_interval_secs == 0)
            .then_some(whole_seconds);

        ProgressStep {
            count_view,
            persist_position,
        }
    }
}
