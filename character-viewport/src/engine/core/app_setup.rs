use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::assets::character_manifest::CharacterManifest;
use crate::engine::character::CharacterPlugin;
use crate::engine::core::lifecycle::ViewportLifecyclePlugin;
use crate::engine::core::window_config::create_window_config;
use crate::engine::input::ViewportInputPlugin;
use crate::engine::loading::CharacterLoadingPlugin;
use crate::engine::scene::stage::StagePlugin;
use crate::engine::systems::OverlayPlugin;
use crate::rpc::web_rpc::WebRpcPlugin;

/// Everything the viewport adds on top of Bevy's own plugins.
pub struct CharacterViewportPlugin;

impl Plugin for CharacterViewportPlugin {
    fn build(&self, app: &mut App) {
        app
            // Registers CharacterManifest as a loadable asset type from JSON files.
            .add_plugins(JsonAssetPlugin::<CharacterManifest>::new(&["character.json"]))
            .add_plugins(ViewportLifecyclePlugin)
            .add_plugins(ViewportInputPlugin)
            .add_plugins(StagePlugin)
            .add_plugins(CharacterLoadingPlugin)
            .add_plugins(CharacterPlugin)
            .add_plugins(OverlayPlugin)
            .add_plugins(WebRpcPlugin);
    }
}

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(CharacterViewportPlugin);

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: "wgpu=error,naga=warn".into(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
