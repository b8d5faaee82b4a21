use bevy::input::ButtonState;
use bevy::input::keyboard::KeyboardInput;
use bevy::prelude::*;

use crate::engine::core::app_state::{AttachedListeners, ListenerKind};

/// What the player is asking the characters to do this frame.
///
/// A single record is shared by every character, so all of them respond to
/// the same keys.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ControlIntent {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub crouch: bool,
    pub jump: bool,
    pub attack: bool,
}

impl ControlIntent {
    /// Set or clear the flag bound to `key`. Returns false for unbound keys.
    pub fn apply_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let flag = match key {
            KeyCode::ArrowUp | KeyCode::KeyW => &mut self.move_forward,
            KeyCode::ArrowDown | KeyCode::KeyS => &mut self.move_backward,
            KeyCode::ArrowLeft | KeyCode::KeyA => &mut self.move_left,
            KeyCode::ArrowRight | KeyCode::KeyD => &mut self.move_right,
            KeyCode::KeyC => &mut self.crouch,
            KeyCode::Space => &mut self.jump,
            KeyCode::ControlLeft | KeyCode::ControlRight => &mut self.attack,
            _ => return false,
        };
        *flag = pressed;
        true
    }

    /// Any of the four directional flags.
    pub fn is_moving(&self) -> bool {
        self.move_forward || self.move_backward || self.move_left || self.move_right
    }
}

pub fn handle_keyboard_intent(
    mut keys: EventReader<KeyboardInput>,
    listeners: Option<Res<AttachedListeners>>,
    mut intent: ResMut<ControlIntent>,
) {
    let Some(listeners) = listeners else {
        keys.clear();
        return;
    };

    for event in keys.read() {
        let kind = match event.state {
            ButtonState::Pressed => ListenerKind::KeyDown,
            ButtonState::Released => ListenerKind::KeyUp,
        };
        if listeners.contains(kind) {
            intent.apply_key(event.key_code, event.state.is_pressed());
        }
    }
}

pub fn reset_control_intent(mut intent: ResMut<ControlIntent>) {
    *intent = ControlIntent::default();
}
