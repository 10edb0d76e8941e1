//! Post stores and the change feed behind their live queries.

mod feed;
mod memory;

pub use feed::{ChangeFeed, POSTS_CHANNEL};
pub use memory::InMemoryPostStore;
