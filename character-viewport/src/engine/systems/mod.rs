//! Per-frame viewport systems outside the character loop.
//!
//! Covers surface resizing, FPS reporting and the status overlay.

use bevy::prelude::*;

use crate::engine::core::app_state::ViewportPhase;
use crate::engine::core::lifecycle::MountSet;

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host page via RPC and updates the native overlay.
pub mod fps_tracking;

/// Status line and FPS counter drawn over the scene.
pub mod overlay;

/// Surface size tracking and camera aspect updates.
pub mod resize;

use fps_tracking::{fps_notification_system, fps_text_update_system};
use overlay::{spawn_overlay, status_text_update_system};

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(ViewportPhase::Mounted),
            spawn_overlay.in_set(MountSet::Stage),
        )
        .add_systems(
            Update,
            (
                fps_notification_system,
                (fps_text_update_system, status_text_update_system)
                    .run_if(in_state(ViewportPhase::Mounted)),
            ),
        );
    }
}
