//! Viewport camera and its orbit controller.
//!
//! Pointer drags orbit and pan around a target, the wheel dollies in and out.
//! The controller writes the camera's local transform, so once the camera is
//! parented under a character pivot it orbits that character.

/// Orbit state component and the pointer-driven controller system.
pub mod orbit_camera;
