use bevy::prelude::*;
use constants::character::{ROSTER_COLUMNS, ROSTER_ROWS};
use constants::path::{CHARACTER_MANIFEST_PATH, GROUND_TEXTURE_PATH};

/// Runtime configuration for a viewport mount.
///
/// The roster shape is fixed when the viewport mounts; changing it afterwards
/// only affects the next mount.
#[derive(Resource, Debug, Clone)]
pub struct ViewportConfig {
    pub manifest_path: String,
    pub ground_texture: Option<String>,
    pub roster_rows: usize,
    pub roster_columns: usize,
    /// Send a mount request on startup.
    pub auto_mount: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            manifest_path: CHARACTER_MANIFEST_PATH.to_string(),
            ground_texture: Some(GROUND_TEXTURE_PATH.to_string()),
            roster_rows: ROSTER_ROWS,
            roster_columns: ROSTER_COLUMNS,
            auto_mount: true,
        }
    }
}
