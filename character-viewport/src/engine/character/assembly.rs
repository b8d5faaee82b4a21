use bevy::prelude::*;
use constants::character::CHARACTER_SCALE;

use crate::engine::camera::orbit_camera::ViewportCamera;
use crate::engine::character::instance::{CharacterBinding, CharacterInstance, Roster};
use crate::engine::character::motion::CharacterMotion;
use crate::engine::core::app_state::{MountEpoch, ViewportPhase, ViewportScoped};
use crate::engine::loading::character_loader::CharacterPartsReady;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::gyroscope::Gyroscope;
use crate::engine::scene::stage::SunLight;

/// Epoch whose characters have been assembled.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyRecord {
    pub epoch: u64,
    pub characters: usize,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharactersAssembled {
    pub epoch: u64,
    pub count: usize,
}

/// Bind the declared roster to freshly loaded parts.
///
/// Parts are accepted only while mounted, only for the current epoch and
/// only once per epoch. Anything else is stale and dropped.
#[allow(clippy::too_many_arguments)]
pub fn assemble_characters(
    mut commands: Commands,
    mut ready: EventReader<CharacterPartsReady>,
    phase: Res<State<ViewportPhase>>,
    epoch: Res<MountEpoch>,
    roster: Option<Res<Roster>>,
    mut record: Option<ResMut<AssemblyRecord>>,
    mut progress: ResMut<LoadingProgress>,
    mut instances: Query<(Entity, &mut CharacterInstance)>,
    camera: Query<Entity, With<ViewportCamera>>,
    sun: Query<Entity, With<SunLight>>,
    mut assembled: EventWriter<CharactersAssembled>,
) {
    for event in ready.read() {
        if *phase.get() != ViewportPhase::Mounted || event.epoch != epoch.0 {
            debug!(
                "Discarding character parts from epoch {} (current epoch {}, {:?})",
                event.epoch,
                epoch.0,
                phase.get()
            );
            continue;
        }
        if record.as_ref().is_some_and(|r| r.epoch == epoch.0) {
            debug!("Characters for epoch {} already assembled", epoch.0);
            continue;
        }
        let Some(roster) = roster.as_deref() else {
            warn!("Character parts arrived before the roster was declared");
            continue;
        };

        let parts = &event.parts;
        let mut slots: Vec<_> = instances.iter_mut().collect();
        slots.sort_by_key(|(_, instance)| instance.slot.index);

        let mut anchor = None;
        for (entity, instance) in &mut slots {
            let slot = instance.slot;
            instance.binding = CharacterBinding::Bound {
                skin: slot.column,
                weapon: (!parts.weapons.is_empty()).then_some(0),
                shadows: true,
            };
            commands.entity(*entity).insert((
                SceneRoot(parts.body.clone()),
                Transform::from_translation(slot.position(roster.columns))
                    .with_scale(Vec3::splat(CHARACTER_SCALE)),
                Visibility::Visible,
                CharacterMotion::new(parts.walk_speed, parts.crouch_speed),
            ));
            if slot.index == roster.followed_index() {
                anchor = Some((*entity, slot.position(roster.columns)));
            }
        }
        let count = slots.len();

        // Camera and sun ride on a pivot that follows one character without
        // inheriting its heading.
        if let Some((anchor, position)) = anchor {
            let riders: Vec<Entity> = camera.iter().chain(sun.iter()).collect();
            commands
                .spawn((
                    Name::new("Gyroscope"),
                    Gyroscope { anchor },
                    Transform::from_translation(position),
                    Visibility::default(),
                    ViewportScoped,
                ))
                .add_children(&riders);
        }

        commands.insert_resource(parts.clone());
        let assembly = AssemblyRecord {
            epoch: epoch.0,
            characters: count,
        };
        match record.as_mut() {
            Some(existing) => **existing = assembly,
            None => commands.insert_resource(assembly),
        }
        progress.characters_ready = true;
        assembled.write(CharactersAssembled {
            epoch: epoch.0,
            count,
        });

        info!("Assembled {count} characters (epoch {})", epoch.0);
        break;
    }
}
