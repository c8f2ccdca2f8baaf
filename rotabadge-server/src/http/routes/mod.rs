//! Route handlers

pub mod badge;
pub mod health;
pub mod root;
