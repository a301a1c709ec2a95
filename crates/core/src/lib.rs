//! Core types and helpers for eventboard
//!
//! This crate contains domain types shared across all other crates.

mod calendar;
mod catalog;
mod constants;
mod dedup;
mod env_config;
mod error;
mod event;
mod subscriber;
mod summary;

pub use calendar::*;
pub use catalog::*;
pub use constants::*;
pub use dedup::*;
pub use env_config::*;
pub use error::*;
pub use event::*;
pub use subscriber::*;
pub use summary::*;
