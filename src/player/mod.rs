mod controller;
mod headless;
mod progress;

pub use controller::{
    ControllerOptions, PlayerCommand, PlayerComponents, PlayerController, PlayerHandle,
};
pub use headless::HeadlessMedia;
pub use progress::{ProgressPolicy, ProgressStep};
