use std::time::Duration;

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

use crate::engine::assets::shared_parts::SharedCharacterParts;
use crate::engine::character::instance::{CharacterBinding, CharacterInstance};
use crate::engine::character::motion::{AnimationRole, CharacterMotion};

/// Weapon scene attached under a character root.
#[derive(Component, Debug, Clone)]
pub struct WeaponMount {
    /// Index into the shared weapon parts.
    pub index: usize,
    pub material: Handle<StandardMaterial>,
    pub shadows: bool,
}

/// Meshes under this entity carry their final material.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Dressed;

/// Links a character root to the animation player inside its body scene.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CharacterAnimator {
    pub player: Entity,
    /// Role currently playing, if its clip exists.
    pub role: Option<AnimationRole>,
    pub reversed: bool,
}

/// Links a weapon mount to the animation player inside its scene. The weapon
/// follows whatever role its character's body is playing.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WeaponAnimator {
    pub player: Entity,
    pub role: Option<AnimationRole>,
    pub reversed: bool,
}

/// Mesh entities below `root`, not descending into weapon mounts.
fn body_meshes(
    root: Entity,
    children: &Query<&Children>,
    meshes: &Query<(), With<Mesh3d>>,
    mounts: &Query<(), With<WeaponMount>>,
) -> Vec<Entity> {
    let mut found = Vec::new();
    let mut queue = vec![root];
    while let Some(entity) = queue.pop() {
        if meshes.contains(entity) {
            found.push(entity);
        }
        if let Ok(kids) = children.get(entity) {
            let kids: &[Entity] = kids;
            queue.extend(kids.iter().copied().filter(|kid| !mounts.contains(*kid)));
        }
    }
    found
}

fn apply_material(
    commands: &mut Commands,
    meshes: &[Entity],
    material: &Handle<StandardMaterial>,
    shadows: bool,
) {
    for &mesh in meshes {
        let mut entity = commands.entity(mesh);
        entity.insert(MeshMaterial3d(material.clone()));
        if shadows {
            entity.remove::<NotShadowCaster>();
        } else {
            entity.insert(NotShadowCaster);
        }
    }
}

/// Apply skins and attach weapons once a body scene has spawned its meshes.
pub fn dress_characters(
    mut commands: Commands,
    parts: Option<Res<SharedCharacterParts>>,
    characters: Query<(Entity, &CharacterInstance), Without<Dressed>>,
    children: Query<&Children>,
    meshes: Query<(), With<Mesh3d>>,
    mounts: Query<(), With<WeaponMount>>,
) {
    let Some(parts) = parts else {
        return;
    };

    for (root, instance) in &characters {
        let CharacterBinding::Bound {
            skin,
            weapon,
            shadows,
        } = instance.binding
        else {
            continue;
        };

        let body = body_meshes(root, &children, &meshes, &mounts);
        if body.is_empty() {
            continue;
        }

        match parts.skin(skin) {
            Some(material) => apply_material(&mut commands, &body, material, shadows),
            None => warn!("Character {} has no skin {skin}", instance.slot.index),
        }

        if let Some((index, weapon)) =
            weapon.and_then(|index| parts.weapon(index).map(|parts| (index, parts)))
        {
            commands.entity(root).with_child((
                Name::new("Weapon"),
                SceneRoot(weapon.scene.clone()),
                Transform::IDENTITY,
                WeaponMount {
                    index,
                    material: weapon.material.clone(),
                    shadows,
                },
            ));
        }

        commands.entity(root).insert(Dressed);
        debug!(
            "Dressed character {} ({} meshes, skin {skin})",
            instance.slot.index,
            body.len()
        );
    }
}

pub fn dress_weapons(
    mut commands: Commands,
    weapons: Query<(Entity, &WeaponMount), Without<Dressed>>,
    children: Query<&Children>,
    meshes: Query<(), With<Mesh3d>>,
    mounts: Query<(), With<WeaponMount>>,
) {
    for (mount, weapon) in &weapons {
        let found = body_meshes(mount, &children, &meshes, &mounts);
        if found.is_empty() {
            continue;
        }
        apply_material(&mut commands, &found, &weapon.material, weapon.shadows);
        commands.entity(mount).insert(Dressed);
    }
}

/// First animation player under `root`, not descending into nested weapon
/// mounts.
fn find_player(
    root: Entity,
    children: &Query<&Children>,
    players: &Query<&mut AnimationPlayer>,
    mounts: &Query<(), With<WeaponMount>>,
) -> Option<Entity> {
    let mut queue = std::collections::VecDeque::from([root]);
    while let Some(entity) = queue.pop_front() {
        if players.contains(entity) {
            return Some(entity);
        }
        if let Ok(kids) = children.get(entity) {
            let kids: &[Entity] = kids;
            queue.extend(kids.iter().copied().filter(|kid| !mounts.contains(*kid)));
        }
    }
    None
}

/// Hand each body's animation player the shared graph and start the role
/// the character is already in.
pub fn bind_character_animation(
    mut commands: Commands,
    parts: Option<Res<SharedCharacterParts>>,
    characters: Query<(Entity, &CharacterMotion), Without<CharacterAnimator>>,
    children: Query<&Children>,
    mut players: Query<&mut AnimationPlayer>,
    mounts: Query<(), With<WeaponMount>>,
) {
    let Some(parts) = parts else {
        return;
    };

    for (root, motion) in &characters {
        let Some(player_entity) = find_player(root, &children, &players, &mounts) else {
            continue;
        };
        let Ok(mut player) = players.get_mut(player_entity) else {
            continue;
        };

        let role = motion.desired_animation();
        let mut transitions = AnimationTransitions::new();
        let playing = parts.clip(role).map(|node| {
            transitions
                .play(&mut player, node, Duration::ZERO)
                .repeat();
            role
        });
        if playing.is_none() {
            warn!("No clip for {role:?}; character stays in bind pose");
        }

        commands.entity(player_entity).insert((
            AnimationGraphHandle(parts.graph.clone()),
            transitions,
        ));
        commands.entity(root).insert(CharacterAnimator {
            player: player_entity,
            role: playing,
            reversed: false,
        });
    }
}

/// Give each weapon's animation player its graph and start it on the role
/// its character is in.
pub fn bind_weapon_animation(
    mut commands: Commands,
    parts: Option<Res<SharedCharacterParts>>,
    weapons: Query<(Entity, &WeaponMount, &ChildOf), Without<WeaponAnimator>>,
    motions: Query<&CharacterMotion>,
    children: Query<&Children>,
    mut players: Query<&mut AnimationPlayer>,
    mounts: Query<(), With<WeaponMount>>,
) {
    let Some(parts) = parts else {
        return;
    };

    for (mount, weapon, child_of) in &weapons {
        let Some(weapon_parts) = parts.weapon(weapon.index) else {
            continue;
        };
        let Some(player_entity) = find_player(mount, &children, &players, &mounts) else {
            continue;
        };
        let Ok(mut player) = players.get_mut(player_entity) else {
            continue;
        };

        let role = motions
            .get(child_of.parent())
            .map(CharacterMotion::desired_animation)
            .unwrap_or(AnimationRole::Idle);
        let mut transitions = AnimationTransitions::new();
        let playing = weapon_parts.clip(role).map(|node| {
            transitions
                .play(&mut player, node, Duration::ZERO)
                .repeat();
            role
        });

        commands.entity(player_entity).insert((
            AnimationGraphHandle(weapon_parts.graph.clone()),
            transitions,
        ));
        commands.entity(mount).insert(WeaponAnimator {
            player: player_entity,
            role: playing,
            reversed: false,
        });
    }
}
