//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-runtime`, `core-playback`). Host applications can
//! depend on `mvb-workspace` and enable `desktop-shims` to get the playback
//! core wired to the desktop dispatcher and path resolver without adding each
//! crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_playback as playback;

#[cfg(feature = "desktop-shims")]
pub use core_runtime as runtime;
