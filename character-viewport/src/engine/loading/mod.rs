//! Asynchronous loading of the character bundle and the ground texture.
//!
//! A load job is issued on every mount and polled each frame. It resolves
//! the manifest first, then the body, skins and weapons it names, and
//! finally publishes the shared parts tagged with the mount epoch.

use bevy::prelude::*;

use crate::engine::core::app_state::ViewportPhase;
use crate::engine::core::lifecycle::MountSet;

/// Manifest and part loading with per-mount liveness tagging.
pub mod character_loader;

/// Load counters read by the status overlay.
pub mod progress;

/// Sampler configuration for the tiled ground texture.
pub mod texture_config;

use character_loader::{
    CharacterLoadJob, CharacterPartsReady, begin_character_load, cancel_character_load,
    poll_character_load,
};
use progress::LoadingProgress;

pub struct CharacterLoadingPlugin;

impl Plugin for CharacterLoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadingProgress>()
            .add_event::<CharacterPartsReady>()
            .add_systems(
                OnEnter(ViewportPhase::Mounted),
                begin_character_load.in_set(MountSet::Load),
            )
            .add_systems(
                Update,
                poll_character_load.run_if(resource_exists::<CharacterLoadJob>),
            )
            .add_systems(OnExit(ViewportPhase::Mounted), cancel_character_load);
    }
}
