//! Static stage of the viewport and the pivot that follows a character.
//!
//! The stage is rebuilt on every mount; nothing here outlives an unmount.

/// Camera, sun, ambient light, fog and the tiled ground plane.
pub mod stage;

/// Position-only follower used to carry the camera and sun with a character.
pub mod gyroscope;
