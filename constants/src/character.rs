/// Rows of characters in the roster grid.
pub const ROSTER_ROWS: usize = 1;

/// Skin columns in the roster grid. Each column wears the skin at the same index.
pub const ROSTER_COLUMNS: usize = 1;

/// Horizontal spacing between roster columns.
pub const COLUMN_SPACING: f32 = 150.0;

/// Depth spacing between roster rows.
pub const ROW_SPACING: f32 = 250.0;

/// Uniform scale applied to every character root.
pub const CHARACTER_SCALE: f32 = 3.0;

// Movement model.
pub const FRONT_ACCELERATION: f32 = 600.0;
pub const BACK_ACCELERATION: f32 = 600.0;
pub const FRONT_DECELERATION: f32 = 600.0;
pub const ANGULAR_SPEED: f32 = 2.5;

/// Below this fraction of max speed an idle character settles into its idle clip.
pub const IDLE_SPEED_FRACTION: f32 = 0.2;

/// Crossfade between animation roles, in milliseconds.
pub const ANIMATION_CROSSFADE_MS: u64 = 250;
