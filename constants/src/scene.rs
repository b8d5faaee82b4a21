/// Background and fog colour (sRGB 0xffffff).
pub const BACKGROUND_COLOUR: [u8; 3] = [0xff, 0xff, 0xff];

pub const FOG_START: f32 = 1000.0;
pub const FOG_END: f32 = 4000.0;

/// Edge length of the square ground plane.
pub const GROUND_SIZE: f32 = 16000.0;

/// How many times the ground texture tiles along each axis.
pub const GROUND_TEXTURE_REPEAT: f32 = 64.0;
