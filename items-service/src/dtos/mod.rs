pub mod items;

pub use items::{parse_item_body, CreateItemResponse};
