use bevy::prelude::*;

/// Counts for the status overlay while the character bundle streams in.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct LoadingProgress {
    pub manifest_loaded: bool,
    pub parts_loaded: usize,
    pub parts_total: usize,
    pub characters_ready: bool,
}

impl LoadingProgress {
    pub fn fraction(&self) -> f32 {
        if self.characters_ready {
            return 1.0;
        }
        if self.parts_total == 0 {
            return 0.0;
        }
        self.parts_loaded as f32 / self.parts_total as f32
    }
}
