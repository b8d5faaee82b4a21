use bevy::animation::graph::AnimationNodeIndex;
use bevy::prelude::*;

use crate::engine::character::motion::AnimationRole;

/// A weapon mesh carries its own copy of the body's clips so it can play
/// them in step with the body.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponParts {
    pub scene: Handle<Scene>,
    pub material: Handle<StandardMaterial>,
    pub graph: Handle<AnimationGraph>,
    pub clips: Vec<(AnimationRole, AnimationNodeIndex)>,
}

impl WeaponParts {
    pub fn clip(&self, role: AnimationRole) -> Option<AnimationNodeIndex> {
        find_clip(&self.clips, role)
    }
}

fn find_clip(
    clips: &[(AnimationRole, AnimationNodeIndex)],
    role: AnimationRole,
) -> Option<AnimationNodeIndex> {
    clips.iter().find(|(r, _)| *r == role).map(|(_, node)| *node)
}

/// Geometry, materials and animation loaded once and shared by every
/// character. Cloning only clones handles.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SharedCharacterParts {
    pub body: Handle<Scene>,
    /// One material per skin, indexed by roster column.
    pub skins: Vec<Handle<StandardMaterial>>,
    pub weapons: Vec<WeaponParts>,
    pub graph: Handle<AnimationGraph>,
    /// Graph node for each role whose clip was found.
    pub clips: Vec<(AnimationRole, AnimationNodeIndex)>,
    pub walk_speed: f32,
    pub crouch_speed: f32,
}

impl SharedCharacterParts {
    pub fn clip(&self, role: AnimationRole) -> Option<AnimationNodeIndex> {
        find_clip(&self.clips, role)
    }

    pub fn skin(&self, index: usize) -> Option<&Handle<StandardMaterial>> {
        self.skins.get(index)
    }

    pub fn weapon(&self, index: usize) -> Option<&WeaponParts> {
        self.weapons.get(index)
    }
}
