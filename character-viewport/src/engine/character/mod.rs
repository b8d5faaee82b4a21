//! Character roster: slots declared on mount, bound to the shared parts once
//! they load, then driven every frame by the shared control intent.

use bevy::prelude::*;

use crate::engine::assets::shared_parts::SharedCharacterParts;
use crate::engine::core::app_state::ViewportPhase;
use crate::engine::core::lifecycle::MountSet;

/// Frame-loop movement and animation role crossfades.
pub mod animation;

/// Binding of loaded parts to declared slots and the camera pivot.
pub mod assembly;

/// Skin, weapon and animation player setup once body scenes spawn.
pub mod dressing;

/// Roster slots and their placement on the ground.
pub mod instance;

/// Movement model and behaviour selection.
pub mod motion;

use animation::{advance_characters, apply_animation_roles};
use assembly::{AssemblyRecord, CharactersAssembled, assemble_characters};
use dressing::{
    bind_character_animation, bind_weapon_animation, dress_characters, dress_weapons,
};
use instance::{Roster, declare_characters};

pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CharactersAssembled>()
            .add_systems(
                OnEnter(ViewportPhase::Mounted),
                declare_characters.in_set(MountSet::Characters),
            )
            .add_systems(Update, assemble_characters)
            .add_systems(
                Update,
                (
                    dress_characters,
                    dress_weapons,
                    bind_character_animation,
                    bind_weapon_animation,
                    advance_characters,
                    apply_animation_roles,
                )
                    .chain()
                    .after(assemble_characters)
                    .run_if(in_state(ViewportPhase::Mounted)),
            )
            .add_systems(OnExit(ViewportPhase::Mounted), release_character_parts);
    }
}

fn release_character_parts(mut commands: Commands) {
    commands.remove_resource::<SharedCharacterParts>();
    commands.remove_resource::<AssemblyRecord>();
    commands.remove_resource::<Roster>();
}
