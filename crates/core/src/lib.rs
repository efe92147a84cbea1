//! fonthost core - catalog sync and font enable/disable logic for
//! self-hosting Google Fonts.

pub mod catalog;
pub mod config;
pub mod embed;
pub mod error;
pub mod fetch;
pub mod handler;
pub mod io;
pub mod settings;
pub mod storage;
pub mod sync;

pub use catalog::{Axis, Catalog, FontRecord};
pub use error::{Error, Result};
pub use fetch::{Fetch, HttpFetch};
pub use handler::{FontsHandler, Redirect, is_valid_font_id};
pub use settings::{EnabledFont, JsonSettingsStore, MemorySettingsStore, SettingsStore};
pub use storage::PublicStorage;
pub use sync::{SyncOptions, SyncRunner, SyncSummary};
