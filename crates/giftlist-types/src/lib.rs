pub mod api;
pub mod models;

pub use models::{Gift, NewGift, ValidationError};
