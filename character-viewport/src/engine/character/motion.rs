use bevy::prelude::*;
use constants::character::{
    ANGULAR_SPEED, BACK_ACCELERATION, FRONT_ACCELERATION, FRONT_DECELERATION, IDLE_SPEED_FRACTION,
};

use crate::engine::input::control_intent::ControlIntent;

/// Logical animation a character can be playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationRole {
    Move,
    Idle,
    Jump,
    Attack,
    CrouchMove,
    CrouchIdle,
    CrouchAttack,
}

impl AnimationRole {
    pub const ALL: [AnimationRole; 7] = [
        AnimationRole::Move,
        AnimationRole::Idle,
        AnimationRole::Jump,
        AnimationRole::Attack,
        AnimationRole::CrouchMove,
        AnimationRole::CrouchIdle,
        AnimationRole::CrouchAttack,
    ];
}

/// Ease applied while a character coasts to a stop.
pub fn exponential_ease_out(k: f32) -> f32 {
    if k == 1.0 { 1.0 } else { 1.0 - 2f32.powf(-10.0 * k) }
}

/// Per-character movement state advanced each frame from the shared intent.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct CharacterMotion {
    /// Signed ground speed; negative while walking backwards.
    pub speed: f32,
    /// Heading in radians about +Y. Zero faces +Z.
    pub body_orientation: f32,
    pub walk_speed: f32,
    pub crouch_speed: f32,
    pub front_acceleration: f32,
    pub back_acceleration: f32,
    pub front_deceleration: f32,
    pub angular_speed: f32,
    pub crouching: bool,
    /// Role the behaviour logic last asked for.
    pub animation: AnimationRole,
    /// Playback runs backwards while reversing.
    pub reverse_playback: bool,
}

impl CharacterMotion {
    pub fn new(walk_speed: f32, crouch_speed: f32) -> Self {
        Self {
            speed: 0.0,
            body_orientation: 0.0,
            walk_speed,
            crouch_speed,
            front_acceleration: FRONT_ACCELERATION,
            back_acceleration: BACK_ACCELERATION,
            front_deceleration: FRONT_DECELERATION,
            angular_speed: ANGULAR_SPEED,
            crouching: false,
            animation: AnimationRole::Idle,
            reverse_playback: false,
        }
    }

    pub fn max_speed(&self) -> f32 {
        if self.crouching {
            self.crouch_speed
        } else {
            self.walk_speed
        }
    }

    /// Advance speed and heading by `delta` seconds, then pick the animation
    /// role. Returns the ground displacement to apply to the character root.
    pub fn update(&mut self, delta: f32, intent: &ControlIntent) -> Vec3 {
        self.crouching = intent.crouch;
        let max_speed = self.max_speed();
        let max_reverse_speed = -max_speed;

        if intent.move_forward {
            self.speed = (self.speed + delta * self.front_acceleration)
                .clamp(max_reverse_speed, max_speed);
        }
        if intent.move_backward {
            self.speed = (self.speed - delta * self.back_acceleration)
                .clamp(max_reverse_speed, max_speed);
        }

        // Turning also pushes the character forward. Both keys cancel the
        // turn but still accelerate twice.
        if intent.move_left {
            self.body_orientation += delta * self.angular_speed;
            self.speed = (self.speed + delta * self.front_acceleration)
                .clamp(max_reverse_speed, max_speed);
        }
        if intent.move_right {
            self.body_orientation -= delta * self.angular_speed;
            self.speed = (self.speed + delta * self.front_acceleration)
                .clamp(max_reverse_speed, max_speed);
        }

        if !(intent.move_forward || intent.move_backward) {
            if self.speed > 0.0 {
                let k = exponential_ease_out(self.speed / max_speed);
                self.speed =
                    (self.speed - k * delta * self.front_deceleration).clamp(0.0, max_speed);
            } else {
                let k = exponential_ease_out(self.speed / max_reverse_speed);
                self.speed = (self.speed + k * delta * self.back_acceleration)
                    .clamp(max_reverse_speed, 0.0);
            }
        }

        self.update_behaviour(intent);

        let forward_delta = self.speed * delta;
        Vec3::new(
            self.body_orientation.sin() * forward_delta,
            0.0,
            self.body_orientation.cos() * forward_delta,
        )
    }

    fn update_behaviour(&mut self, intent: &ControlIntent) {
        let (mut move_role, mut idle_role) = if intent.crouch {
            (AnimationRole::CrouchMove, AnimationRole::CrouchIdle)
        } else {
            (AnimationRole::Move, AnimationRole::Idle)
        };

        // Actions replace both locomotion roles; attack wins over jump.
        if intent.jump {
            move_role = AnimationRole::Jump;
            idle_role = AnimationRole::Jump;
        }
        if intent.attack {
            let attack = if intent.crouch {
                AnimationRole::CrouchAttack
            } else {
                AnimationRole::Attack
            };
            move_role = attack;
            idle_role = attack;
        }

        if intent.is_moving() {
            self.animation = move_role;
        } else if self.speed.abs() < IDLE_SPEED_FRACTION * self.max_speed() {
            self.animation = idle_role;
            self.reverse_playback = false;
        }

        if intent.move_forward {
            self.reverse_playback = false;
        }
        if intent.move_backward {
            self.reverse_playback = true;
        }
    }

    /// Role the character should currently be animating.
    pub fn desired_animation(&self) -> AnimationRole {
        self.animation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f32 = 1.0 / 60.0;

    fn ogro() -> CharacterMotion {
        CharacterMotion::new(350.0, 175.0)
    }

    fn intent(f: impl FnOnce(&mut ControlIntent)) -> ControlIntent {
        let mut intent = ControlIntent::default();
        f(&mut intent);
        intent
    }

    #[test]
    fn ease_out_is_pinned_at_both_ends() {
        assert_eq!(exponential_ease_out(0.0), 0.0);
        assert_eq!(exponential_ease_out(1.0), 1.0);
        assert!(exponential_ease_out(0.5) > 0.9);
    }

    #[test]
    fn forward_accelerates_up_to_walk_speed() {
        let mut motion = ogro();
        let forward = intent(|i| i.move_forward = true);

        let step = motion.update(STEP, &forward);
        assert!((motion.speed - 10.0).abs() < 1e-3);
        assert!(step.z > 0.0 && step.x.abs() < 1e-6);

        for _ in 0..120 {
            motion.update(STEP, &forward);
        }
        assert_eq!(motion.speed, 350.0);
    }

    #[test]
    fn crouching_caps_speed_lower() {
        let mut motion = ogro();
        let crouch_walk = intent(|i| {
            i.move_forward = true;
            i.crouch = true;
        });
        for _ in 0..120 {
            motion.update(STEP, &crouch_walk);
        }
        assert_eq!(motion.speed, 175.0);
        assert_eq!(motion.desired_animation(), AnimationRole::CrouchMove);
    }

    #[test]
    fn released_keys_coast_to_a_stop() {
        let mut motion = ogro();
        motion.speed = 350.0;

        let idle = ControlIntent::default();
        for _ in 0..120 {
            motion.update(STEP, &idle);
        }
        // The ease-out approaches zero without overshooting it.
        assert!(motion.speed >= 0.0 && motion.speed < 1e-3);
        assert_eq!(motion.desired_animation(), AnimationRole::Idle);
    }

    #[test]
    fn reversing_plays_the_move_clip_backwards() {
        let mut motion = ogro();
        let back = intent(|i| i.move_backward = true);
        for _ in 0..10 {
            motion.update(STEP, &back);
        }
        assert!(motion.speed < 0.0);
        assert_eq!(motion.desired_animation(), AnimationRole::Move);
        assert!(motion.reverse_playback);

        let idle = ControlIntent::default();
        for _ in 0..120 {
            motion.update(STEP, &idle);
        }
        assert!(motion.speed <= 0.0 && motion.speed > -1e-3);
        assert!(!motion.reverse_playback);
    }

    #[test]
    fn turning_rotates_and_pushes_forward() {
        let mut motion = ogro();
        let left = intent(|i| i.move_left = true);

        motion.update(STEP, &left);

        assert!((motion.body_orientation - STEP * ANGULAR_SPEED).abs() < 1e-6);
        assert!(motion.speed > 0.0);

        let right = intent(|i| i.move_right = true);
        motion.update(STEP, &right);
        assert!(motion.body_orientation.abs() < 1e-6);
    }

    #[test]
    fn left_and_right_together_cancel_the_turn_but_push_twice() {
        let mut motion = ogro();
        let both = intent(|i| {
            i.move_left = true;
            i.move_right = true;
        });

        motion.update(STEP, &both);

        assert_eq!(motion.body_orientation, 0.0);
        let pushed = 2.0 * STEP * FRONT_ACCELERATION;
        let coasted =
            pushed - exponential_ease_out(pushed / 350.0) * STEP * FRONT_DECELERATION;
        assert!((motion.speed - coasted).abs() < 1e-3);
        assert!(motion.speed > STEP * FRONT_ACCELERATION);
    }

    #[test]
    fn attack_overrides_jump_and_locomotion() {
        let mut motion = ogro();
        motion.update(STEP, &intent(|i| i.jump = true));
        assert_eq!(motion.desired_animation(), AnimationRole::Jump);

        motion.update(
            STEP,
            &intent(|i| {
                i.jump = true;
                i.attack = true;
                i.move_forward = true;
            }),
        );
        assert_eq!(motion.desired_animation(), AnimationRole::Attack);

        motion.update(
            STEP,
            &intent(|i| {
                i.attack = true;
                i.crouch = true;
            }),
        );
        assert_eq!(motion.desired_animation(), AnimationRole::CrouchAttack);
    }
}
