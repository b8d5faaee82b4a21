use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::engine::camera::orbit_camera::ViewportCamera;

/// Current size of the drawable surface.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    /// Logical width.
    pub width: f32,
    /// Logical height.
    pub height: f32,
    /// Device pixel ratio.
    pub scale_factor: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            scale_factor: 1.0,
        }
    }
}

impl ViewportSize {
    pub fn from_window(window: &Window) -> Self {
        Self {
            width: window.width(),
            height: window.height(),
            scale_factor: window.scale_factor(),
        }
    }

    /// Output buffer size in device pixels.
    pub fn physical(&self) -> UVec2 {
        UVec2::new(
            (self.width * self.scale_factor).round() as u32,
            (self.height * self.scale_factor).round() as u32,
        )
    }

    /// Width over height; `None` while the surface has no height.
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.height > 0.0).then(|| self.width / self.height)
    }
}

/// Keep the viewport size and camera projection in step with the window.
pub fn handle_window_resize(
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window>,
    mut viewport: ResMut<ViewportSize>,
    mut cameras: Query<&mut Projection, With<ViewportCamera>>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };

    let scale_factor = windows
        .get(last.window)
        .map(|window| window.scale_factor())
        .unwrap_or(viewport.scale_factor);

    *viewport = ViewportSize {
        width: last.width,
        height: last.height,
        scale_factor,
    };

    let Some(aspect_ratio) = viewport.aspect_ratio() else {
        return;
    };

    for mut projection in &mut cameras {
        if let Projection::Perspective(perspective) = &mut *projection {
            perspective.aspect_ratio = aspect_ratio;
        }
    }

    debug!(
        "Viewport resized to {}x{} (buffer {:?})",
        viewport.width,
        viewport.height,
        viewport.physical()
    );
}
