use bevy::prelude::*;
use bevy::window::PresentMode;
#[cfg(target_arch = "wasm32")]
use constants::path::CANVAS_SELECTOR;

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Character Viewport".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

/// Whether the host page still provides the canvas the viewport draws into.
#[cfg(target_arch = "wasm32")]
pub fn canvas_present() -> bool {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.query_selector(CANVAS_SELECTOR).ok().flatten())
        .is_some()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn canvas_present() -> bool {
    true
}
