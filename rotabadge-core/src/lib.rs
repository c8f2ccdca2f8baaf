pub mod catalog;
pub mod config;
pub mod error;
pub mod selector;

pub use catalog::{is_eligible, scan_dir, CatalogSnapshot, CatalogStore, ALLOWED_EXTENSIONS};
pub use config::BadgeConfig;
pub use error::{CatalogError, Result, SelectError};
pub use selector::{permutation, seed_at, seed_for, select, Selection, Selector, Slot};
