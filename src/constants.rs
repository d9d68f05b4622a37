// Playback and display constants shared by the controller and config defaults

/// Application directory name under the platform config/data dirs.
pub const APP_DIR_NAME: &str = "reel-counter";

// === View counting ===
/// Seconds of playback before a view is counted.
pub const VIEW_THRESHOLD_SECS: f64 = 5.0;
/// Position is persisted whenever whole elapsed seconds are a multiple of this.
pub const PERSIST_INTERVAL_SECS: u64 = 5;

// === Title suffixes ===
pub const TITLE_SEPARATOR: &str = " | ";
pub const LOADING_SUFFIX: &str = "loading…";
pub const UNAVAILABLE_SUFFIX: &str = "unavailable";

// === Vote controls ===
pub const LIKE_PREFIX: &str = "👍";
pub const DISLIKE_PREFIX: &str = "👎";
/// Only this key activates a focused vote control.
pub const ACTIVATE_KEY: &str = "Enter";

// === Share link ===
pub const SHARE_QUERY_KEY: &str = "v";
pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost/";
