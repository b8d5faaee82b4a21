use bevy::prelude::*;

use crate::error::ViewportError;

/// Mount lifecycle of the viewport.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum ViewportPhase {
    #[default]
    Detached,
    Mounted,
    /// A fatal preflight error stopped the last mount attempt.
    Faulted,
}

/// Counts successful mounts. Async work issued under one mount carries the
/// epoch it was issued in and is discarded if the epoch has moved on.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MountEpoch(pub u64);

/// Requests from the binary or the host page to attach or detach the viewport.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportRequest {
    Mount,
    Unmount,
}

/// Raised whenever the viewport has an error to show.
#[derive(Event, Debug, Clone)]
pub struct ViewportErrorEvent(pub ViewportError);

/// Marks entities owned by the current mount. Teardown despawns every
/// top-level entity carrying it, children included.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ViewportScoped;

/// Present once the renderer has a GPU device to draw with.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct GraphicsContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    KeyDown,
    KeyUp,
    Pointer,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 4] = [
        ListenerKind::Resize,
        ListenerKind::KeyDown,
        ListenerKind::KeyUp,
        ListenerKind::Pointer,
    ];
}

/// Input handlers attached by the current mount.
///
/// Input systems consult this before consuming events, so removing the
/// resource detaches every handler at once.
#[derive(Resource, Debug, Default, Clone)]
pub struct AttachedListeners {
    kinds: Vec<ListenerKind>,
}

impl AttachedListeners {
    pub fn all() -> Self {
        Self {
            kinds: ListenerKind::ALL.to_vec(),
        }
    }

    pub fn attach(&mut self, kind: ListenerKind) {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }

    pub fn detach(&mut self, kind: ListenerKind) {
        self.kinds.retain(|k| *k != kind);
    }

    pub fn contains(&self, kind: ListenerKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Run condition: true while a listener of `kind` is attached.
pub fn listener_attached(
    kind: ListenerKind,
) -> impl FnMut(Option<Res<AttachedListeners>>) -> bool + Clone {
    move |listeners: Option<Res<AttachedListeners>>| {
        listeners.is_some_and(|listeners| listeners.contains(kind))
    }
}

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct StatusText;
