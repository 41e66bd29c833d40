//! # Core Runtime Module
//!
//! Shared runtime infrastructure for the playback binding core:
//! - Logging and tracing setup with host log forwarding
//! - Player configuration with host collaborator injection
//! - The broadcast event bus carrying player lifecycle notifications
//!
//! ## Overview
//!
//! Nothing here knows about native media backends. `core-playback` builds
//! intents and bindings on top of these pieces, and hosts use this crate
//! directly to install logging and assemble a [`config::PlayerConfig`].

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
