use bevy::math::Vec3;

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 4000.0;

/// Initial camera position, local to the pivot once a character is followed.
pub const CAMERA_START_POSITION: Vec3 = Vec3::new(0.0, 150.0, 1300.0);

/// Point the orbit controller revolves around.
pub const ORBIT_TARGET: Vec3 = Vec3::new(0.0, 50.0, 0.0);

/// Radians of orbit per pixel of pointer drag.
pub const ORBIT_ROTATE_SPEED: f32 = 0.005;

/// World units of pan per pixel, scaled by the current orbit radius.
pub const ORBIT_PAN_SPEED: f32 = 0.0012;

/// Dolly factor applied per wheel notch.
pub const ORBIT_ZOOM_STEP: f32 = 0.95;

pub const ORBIT_MIN_DISTANCE: f32 = 50.0;
pub const ORBIT_MAX_DISTANCE: f32 = 3500.0;

/// Keeps the orbit off the poles so `looking_at` never degenerates.
pub const ORBIT_PITCH_LIMIT: f32 = 1.55;
