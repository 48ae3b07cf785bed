pub mod descriptor;
pub mod item;

pub use descriptor::FeedDescriptor;
pub use item::{FeedItem, ItemsResponse};
