//! Core application setup and lifecycle management.
//!
//! Handles the mount lifecycle, window configuration, runtime configuration
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the viewport plugins and platform-specific configurations.
pub mod app_setup;

/// Lifecycle phases, mount epochs and the markers tying entities to a mount.
pub mod app_state;

/// Runtime configuration read when the viewport mounts.
pub mod config;

/// Mount and unmount handling with preflight checks and teardown.
pub mod lifecycle;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
