use bevy::math::Vec3;

/// sRGB 0x666666.
pub const AMBIENT_COLOUR: [u8; 3] = [0x66, 0x66, 0x66];
pub const AMBIENT_BRIGHTNESS: f32 = 300.0;

pub const SUN_ILLUMINANCE: f32 = 7_000.0;
pub const SUN_POSITION: Vec3 = Vec3::new(200.0, 450.0, 500.0);

pub const SHADOW_MAP_SIZE: usize = 1024;
pub const SHADOW_NEAR: f32 = 100.0;
pub const SHADOW_FAR: f32 = 1200.0;
