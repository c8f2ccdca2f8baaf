//! Command implementations for rotabadge CLI

pub mod list;
pub mod pick;
pub mod serve;

// Re-export main dispatcher functions for flat access from main.rs
pub use list::run_list;
pub use pick::run_pick;
pub use serve::run_serve;
