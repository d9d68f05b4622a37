// Platform-agnostic playback surface used by the player controller.
// A GUI backend wraps its video widget in this; the headless simulator
// in `player::headless` implements it for the CLI and tests.

use tokio::sync::broadcast;

pub trait MediaElement: Send + Sync {
    /// Point the element at a new media URL.
    fn set_source(&self, src: &str);

    /// Begin loading the current source.
    fn load(&self);

    /// Subscribe to playback time updates, in seconds since start.
    /// Fired frequently while media plays.
    fn time_updates(&self) -> broadcast::Receiver<f64>;
}
