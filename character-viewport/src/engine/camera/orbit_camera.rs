use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::camera::{
    ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, ORBIT_PAN_SPEED, ORBIT_PITCH_LIMIT,
    ORBIT_ROTATE_SPEED, ORBIT_ZOOM_STEP,
};

use crate::engine::core::app_state::{AttachedListeners, ListenerKind};

/// Marks the camera the viewport renders through.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ViewportCamera;

/// Spherical orbit around `target`, in the camera's parent space.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// Rotation about +Y; zero looks down -Z from the +Z side.
    pub yaw: f32,
    /// Elevation above the target's horizontal plane.
    pub pitch: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Orbit that reproduces a camera sitting at `position` looking at `target`.
    pub fn from_position(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length().max(f32::EPSILON);
        let pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);

        Self {
            target,
            radius: radius.clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE),
            yaw,
            pitch: pitch.clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT),
            rotate_speed: ORBIT_ROTATE_SPEED,
            pan_speed: ORBIT_PAN_SPEED,
            zoom_step: ORBIT_ZOOM_STEP,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
        }
    }

    /// Drag right swings the camera left around the target, drag down lifts it.
    pub fn orbit(&mut self, drag: Vec2) {
        self.yaw -= drag.x * self.rotate_speed;
        self.pitch = (self.pitch + drag.y * self.rotate_speed)
            .clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
    }

    /// Slide the target in the view plane, scaled so the scene tracks the pointer.
    pub fn pan(&mut self, drag: Vec2) {
        let rotation = self.view_rotation();
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        let scale = self.radius * self.pan_speed;
        self.target += (-right * drag.x + up * drag.y) * scale;
    }

    /// Positive notches move closer.
    pub fn zoom(&mut self, notches: f32) {
        self.radius = (self.radius * self.zoom_step.powf(notches))
            .clamp(self.min_distance, self.max_distance);
    }

    pub fn offset(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.pitch.cos() * self.yaw.sin(),
            self.radius * self.pitch.sin(),
            self.radius * self.pitch.cos() * self.yaw.cos(),
        )
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.target + self.offset()).looking_at(self.target, Vec3::Y)
    }

    fn view_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0)
    }
}

pub fn orbit_camera_controller(
    mut cameras: Query<(&mut Transform, &mut OrbitCamera), With<ViewportCamera>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    listeners: Option<Res<AttachedListeners>>,
) {
    let drag: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    if !listeners.is_some_and(|l| l.contains(ListenerKind::Pointer)) {
        return;
    }

    let Ok((mut camera_transform, mut orbit)) = cameras.single_mut() else {
        return;
    };

    if drag != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            orbit.orbit(drag);
        } else if mouse_button.pressed(MouseButton::Right) {
            orbit.pan(drag);
        }
    }

    if scroll_accum.abs() > f32::EPSILON {
        orbit.zoom(scroll_accum);
    }

    if orbit.is_changed() {
        *camera_transform = orbit.transform();
    }
}
