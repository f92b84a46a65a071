//! Pixvault - store and retrieve images by name in a local vault
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod session;
pub mod source;
pub mod store;
