pub mod share_link;
pub mod text;

pub use share_link::ShareLink;
pub use text::safe_text;
