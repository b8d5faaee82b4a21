//! Embeddable 3D character viewport.
//!
//! Mounts a lit scene with a roster of animated characters into a window or
//! host page canvas, drives them from the keyboard and tears everything down
//! again on unmount.

pub mod engine;
pub mod error;
pub mod rpc;
