//! Headless app builders shared by the unit tests.

use std::time::Duration;

use bevy::gltf::Gltf;
use bevy::input::ButtonState;
use bevy::input::InputPlugin;
use bevy::input::keyboard::{Key, KeyboardInput, NativeKey};
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::window::{ExitCondition, PrimaryWindow};

use crate::engine::core::app_setup::CharacterViewportPlugin;
use crate::engine::core::app_state::{GraphicsContext, ViewportRequest};
use crate::engine::core::config::ViewportConfig;

fn base_app(primary_window: Option<Window>) -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        TransformPlugin,
        InputPlugin,
        WindowPlugin {
            primary_window,
            exit_condition: ExitCondition::DontExit,
            ..default()
        },
        AssetPlugin {
            file_path: concat!(env!("CARGO_MANIFEST_DIR"), "/assets").to_string(),
            ..default()
        },
    ))
    .init_asset::<Mesh>()
    .init_asset::<StandardMaterial>()
    .init_asset::<Image>()
    .init_asset::<Scene>()
    .init_asset::<AnimationClip>()
    .init_asset::<AnimationGraph>()
    .init_asset::<Gltf>()
    .add_plugins(bevy::diagnostic::FrameTimeDiagnosticsPlugin::default())
    .add_plugins(CharacterViewportPlugin);

    app.finish();
    app.cleanup();

    // Headless runs have no renderer; the tests stand in for one.
    app.insert_resource(GraphicsContext).insert_resource(ViewportConfig {
        ground_texture: None,
        auto_mount: false,
        ..default()
    });
    app
}

/// Viewport app with a primary window and a stand-in graphics context.
pub fn headless_app() -> App {
    base_app(Some(Window::default()))
}

/// Viewport app with nothing to attach to.
pub fn headless_app_without_window() -> App {
    base_app(None)
}

fn request(app: &mut App, request: ViewportRequest) {
    app.world_mut().send_event(request);
    // One frame to handle the request, one to run the transition.
    app.update();
    app.update();
}

pub fn mount(app: &mut App) {
    request(app, ViewportRequest::Mount);
}

pub fn unmount(app: &mut App) {
    request(app, ViewportRequest::Unmount);
}

fn key(app: &mut App, key_code: KeyCode, state: ButtonState) {
    let window = app
        .world_mut()
        .query_filtered::<Entity, With<PrimaryWindow>>()
        .iter(app.world())
        .next()
        .unwrap_or(Entity::PLACEHOLDER);
    app.world_mut().send_event(KeyboardInput {
        key_code,
        logical_key: Key::Unidentified(NativeKey::Unidentified),
        state,
        text: None,
        repeat: false,
        window,
    });
    app.update();
}

pub fn press(app: &mut App, key_code: KeyCode) {
    key(app, key_code, ButtonState::Pressed);
}

pub fn release(app: &mut App, key_code: KeyCode) {
    key(app, key_code, ButtonState::Released);
}

/// Update until `done` holds, giving background asset loads time to land.
pub fn run_until(app: &mut App, done: impl Fn(&App) -> bool) -> bool {
    for _ in 0..500 {
        app.update();
        if done(app) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    false
}
