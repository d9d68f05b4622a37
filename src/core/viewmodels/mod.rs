pub mod player_view_model;
pub mod property;

pub use player_view_model::{Field, PlayerViewModel, ViewSnapshot};
pub use property::{Property, PropertySubscriber};
