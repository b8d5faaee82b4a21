//! Shared tuning values for the character viewport.
//!
//! Everything here is compile-time data; runtime overrides go through
//! `ViewportConfig` in the application crate.

pub mod camera;
pub mod character;
pub mod lighting;
pub mod path;
pub mod scene;
