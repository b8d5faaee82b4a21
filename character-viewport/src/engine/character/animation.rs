use std::time::Duration;

use bevy::animation::graph::AnimationNodeIndex;
use bevy::prelude::*;
use constants::character::ANIMATION_CROSSFADE_MS;

use crate::engine::assets::shared_parts::SharedCharacterParts;
use crate::engine::character::dressing::{CharacterAnimator, WeaponAnimator, WeaponMount};
use crate::engine::character::instance::CharacterInstance;
use crate::engine::character::motion::{AnimationRole, CharacterMotion};
use crate::engine::input::control_intent::ControlIntent;

fn playback_speed(reversed: bool) -> f32 {
    if reversed { -1.0 } else { 1.0 }
}

/// Advance every character by the frame delta from the shared intent.
pub fn advance_characters(
    time: Res<Time>,
    intent: Res<ControlIntent>,
    mut characters: Query<(&mut CharacterMotion, &mut Transform), With<CharacterInstance>>,
) {
    let delta = time.delta_secs();
    for (mut motion, mut transform) in &mut characters {
        let step = motion.update(delta, &intent);
        transform.translation += step;
        transform.rotation = Quat::from_rotation_y(motion.body_orientation);
    }
}

/// Move one player onto `role`. Returns the role it ends up playing; a role
/// with no clip keeps whatever is already playing rather than freezing.
fn sync_player(
    player: &mut AnimationPlayer,
    transitions: &mut AnimationTransitions,
    playing: Option<AnimationRole>,
    role: AnimationRole,
    reversed: bool,
    node: Option<AnimationNodeIndex>,
) -> Option<AnimationRole> {
    let Some(node) = node else {
        return playing;
    };
    if playing != Some(role) {
        transitions
            .play(player, node, Duration::from_millis(ANIMATION_CROSSFADE_MS))
            .set_speed(playback_speed(reversed))
            .repeat();
    } else if let Some(active) = player.animation_mut(node) {
        active.set_speed(playback_speed(reversed));
    }
    Some(role)
}

/// Crossfade each body, and the weapon it holds, to the role its character
/// asks for.
pub fn apply_animation_roles(
    parts: Option<Res<SharedCharacterParts>>,
    mut characters: Query<(&CharacterMotion, &mut CharacterAnimator)>,
    mut weapons: Query<(&WeaponMount, &ChildOf, &mut WeaponAnimator)>,
    motions: Query<&CharacterMotion>,
    mut players: Query<(&mut AnimationPlayer, &mut AnimationTransitions)>,
) {
    let Some(parts) = parts else {
        return;
    };

    for (motion, mut animator) in &mut characters {
        let role = motion.desired_animation();
        let reversed = motion.reverse_playback;
        if animator.role == Some(role) && animator.reversed == reversed {
            continue;
        }
        let Ok((mut player, mut transitions)) = players.get_mut(animator.player) else {
            continue;
        };
        animator.role = sync_player(
            &mut player,
            &mut transitions,
            animator.role,
            role,
            reversed,
            parts.clip(role),
        );
        animator.reversed = reversed;
    }

    for (mount, child_of, mut animator) in &mut weapons {
        let Ok(motion) = motions.get(child_of.parent()) else {
            continue;
        };
        let role = motion.desired_animation();
        let reversed = motion.reverse_playback;
        if animator.role == Some(role) && animator.reversed == reversed {
            continue;
        }
        let Some(weapon) = parts.weapon(mount.index) else {
            continue;
        };
        let Ok((mut player, mut transitions)) = players.get_mut(animator.player) else {
            continue;
        };
        animator.role = sync_player(
            &mut player,
            &mut transitions,
            animator.role,
            role,
            reversed,
            weapon.clip(role),
        );
        animator.reversed = reversed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::shared_parts::WeaponParts;

    struct Rig {
        app: App,
        root: Entity,
        player: Entity,
        weapon_player: Entity,
        idle: AnimationNodeIndex,
        walk: AnimationNodeIndex,
    }

    fn idle_player(idle: AnimationNodeIndex) -> (AnimationPlayer, AnimationTransitions) {
        let mut player = AnimationPlayer::default();
        let mut transitions = AnimationTransitions::new();
        transitions.play(&mut player, idle, Duration::ZERO).repeat();
        (player, transitions)
    }

    fn rig() -> Rig {
        let mut graph = AnimationGraph::new();
        let idle = graph.add_clip(Handle::<AnimationClip>::default(), 1.0, graph.root);
        let walk = graph.add_clip(Handle::<AnimationClip>::default(), 1.0, graph.root);
        let parts = SharedCharacterParts {
            body: Handle::default(),
            skins: vec![Handle::default()],
            weapons: vec![WeaponParts {
                scene: Handle::default(),
                material: Handle::default(),
                graph: Handle::default(),
                clips: vec![(AnimationRole::Idle, idle), (AnimationRole::Move, walk)],
            }],
            graph: Handle::default(),
            clips: vec![(AnimationRole::Idle, idle), (AnimationRole::Move, walk)],
            walk_speed: 350.0,
            crouch_speed: 175.0,
        };

        let mut app = App::new();
        app.insert_resource(parts)
            .add_systems(Update, apply_animation_roles);

        let player = app.world_mut().spawn(idle_player(idle)).id();
        let root = app
            .world_mut()
            .spawn((
                CharacterMotion::new(350.0, 175.0),
                CharacterAnimator {
                    player,
                    role: Some(AnimationRole::Idle),
                    reversed: false,
                },
            ))
            .id();

        let weapon_player = app.world_mut().spawn(idle_player(idle)).id();
        app.world_mut().spawn((
            WeaponMount {
                index: 0,
                material: Handle::default(),
                shadows: true,
            },
            WeaponAnimator {
                player: weapon_player,
                role: Some(AnimationRole::Idle),
                reversed: false,
            },
            ChildOf(root),
        ));

        Rig {
            app,
            root,
            player,
            weapon_player,
            idle,
            walk,
        }
    }

    fn set_motion(rig: &mut Rig, role: AnimationRole, reversed: bool) {
        let mut entity = rig.app.world_mut().entity_mut(rig.root);
        let mut motion = entity
            .get_mut::<CharacterMotion>()
            .expect("rig has motion");
        motion.animation = role;
        motion.reverse_playback = reversed;
    }

    fn player(rig: &Rig) -> &AnimationPlayer {
        rig.app
            .world()
            .entity(rig.player)
            .get::<AnimationPlayer>()
            .expect("rig has a player")
    }

    fn weapon_player(rig: &Rig) -> &AnimationPlayer {
        rig.app
            .world()
            .entity(rig.weapon_player)
            .get::<AnimationPlayer>()
            .expect("rig has a weapon player")
    }

    #[test]
    fn role_change_starts_the_new_clip() {
        let mut rig = rig();
        set_motion(&mut rig, AnimationRole::Move, false);

        rig.app.update();

        assert!(player(&rig).is_playing_animation(rig.walk));
        let animator = rig.app.world().entity(rig.root).get::<CharacterAnimator>();
        assert_eq!(animator.and_then(|a| a.role), Some(AnimationRole::Move));
    }

    #[test]
    fn reversing_flips_the_active_clip_speed() {
        let mut rig = rig();
        set_motion(&mut rig, AnimationRole::Move, false);
        rig.app.update();

        set_motion(&mut rig, AnimationRole::Move, true);
        rig.app.update();

        let speed = player(&rig).animation(rig.walk).map(|active| active.speed());
        assert_eq!(speed, Some(-1.0));

        set_motion(&mut rig, AnimationRole::Move, false);
        rig.app.update();
        let speed = player(&rig).animation(rig.walk).map(|active| active.speed());
        assert_eq!(speed, Some(1.0));
    }

    #[test]
    fn missing_clip_keeps_the_current_one() {
        let mut rig = rig();
        set_motion(&mut rig, AnimationRole::Jump, false);

        rig.app.update();

        assert!(player(&rig).is_playing_animation(rig.idle));
        let animator = rig.app.world().entity(rig.root).get::<CharacterAnimator>();
        assert_eq!(animator.and_then(|a| a.role), Some(AnimationRole::Idle));
    }

    #[test]
    fn weapon_plays_the_body_clip_in_step() {
        let mut rig = rig();
        set_motion(&mut rig, AnimationRole::Move, false);
        rig.app.update();

        assert!(weapon_player(&rig).is_playing_animation(rig.walk));
        let weapon = rig
            .app
            .world_mut()
            .query::<&WeaponAnimator>()
            .iter(rig.app.world())
            .next()
            .copied();
        assert_eq!(weapon.and_then(|a| a.role), Some(AnimationRole::Move));

        set_motion(&mut rig, AnimationRole::Move, true);
        rig.app.update();
        let speed = weapon_player(&rig)
            .animation(rig.walk)
            .map(|active| active.speed());
        assert_eq!(speed, Some(-1.0));
    }
}
