//! Core types and pure logic shared across the cardbox crates.
//!
//! This crate holds everything independent of the HTTP layer and the stores:
//! - Configuration types
//! - The deck export/import document format
//! - Image upload rules for the media store
//! - The client-held study session state machine and category filter

pub mod categories;
pub mod config;
pub mod error;
pub mod export;
pub mod media;
pub mod study;

pub use error::{Error, Result};
