//! Client side of the gift list: a local key/value cache, a remote API
//! client, and the controller that decides between them.

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod fallback;
pub mod remote;
pub mod store;
pub mod ui;
pub mod view;

pub use cache::LocalCache;
pub use config::ClientConfig;
pub use controller::{Controller, DeleteOutcome, Loaded, Source, Submitted};
pub use error::ClientError;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use ui::{Notification, Ui};
