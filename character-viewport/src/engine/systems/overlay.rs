use bevy::prelude::*;

use crate::engine::core::app_state::{FpsText, StatusText, ViewportScoped};
use crate::engine::loading::character_loader::{CharacterLoadJob, LoadStage};
use crate::engine::loading::progress::LoadingProgress;

/// Text shown in the status line for the current load state. Empty once the
/// characters are on screen.
pub fn status_line(stage: Option<&LoadStage>, progress: &LoadingProgress) -> String {
    match stage {
        Some(LoadStage::AwaitingParts) if progress.parts_total > 0 => format!(
            "{} ({}/{})",
            LoadStage::AwaitingParts.label(),
            progress.parts_loaded,
            progress.parts_total
        ),
        Some(LoadStage::Complete) if progress.characters_ready => String::new(),
        Some(stage) => stage.label(),
        None => String::new(),
    }
}

pub fn spawn_overlay(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Overlay"),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            ViewportScoped,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.2, 0.2, 0.2)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));

            #[cfg(not(target_arch = "wasm32"))]
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

pub fn status_text_update_system(
    job: Option<Res<CharacterLoadJob>>,
    progress: Res<LoadingProgress>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let line = status_line(job.as_deref().map(|job| &job.stage), &progress);
    for mut text in &mut query {
        if text.0 != line {
            text.0.clone_from(&line);
        }
    }
}
