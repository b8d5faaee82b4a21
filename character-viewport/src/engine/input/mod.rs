//! Keyboard input mapped to character movement intent.

use bevy::prelude::*;

use crate::engine::camera::orbit_camera::orbit_camera_controller;
use crate::engine::core::app_state::{ListenerKind, ViewportPhase, listener_attached};
use crate::engine::systems::resize::handle_window_resize;

/// Shared movement intent record and the key handler that writes it.
pub mod control_intent;

use control_intent::{ControlIntent, handle_keyboard_intent, reset_control_intent};

/// Routes window, keyboard and pointer events to the viewport while the
/// matching listeners are attached.
pub struct ViewportInputPlugin;

impl Plugin for ViewportInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControlIntent>()
            .add_systems(
                PreUpdate,
                (
                    handle_keyboard_intent,
                    handle_window_resize.run_if(listener_attached(ListenerKind::Resize)),
                )
                    .after(bevy::input::InputSystem),
            )
            .add_systems(
                Update,
                orbit_camera_controller.run_if(in_state(ViewportPhase::Mounted)),
            )
            .add_systems(OnExit(ViewportPhase::Mounted), reset_control_intent);
    }
}
