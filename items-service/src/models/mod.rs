pub mod item;

pub use item::{content_id, Item, CREATED_AT_FIELD, ID_FIELD};
