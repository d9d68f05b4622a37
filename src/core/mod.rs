pub mod player_traits;
pub mod viewmodels;

pub use player_traits::MediaElement;
pub use viewmodels::{PlayerViewModel, ViewSnapshot};
