//! Confluence API types.

mod page;
mod space;

pub use page::{Ancestor, Body, Links, Page, Storage, Version};
pub use space::{PageList, Space, SpaceExpandable};
