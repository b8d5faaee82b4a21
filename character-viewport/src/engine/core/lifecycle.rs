use bevy::prelude::*;
use bevy::render::renderer::RenderDevice;
use bevy::window::PrimaryWindow;

use crate::engine::core::app_state::{
    AttachedListeners, GraphicsContext, MountEpoch, ViewportErrorEvent, ViewportPhase,
    ViewportRequest, ViewportScoped,
};
use crate::engine::core::config::ViewportConfig;
use crate::engine::core::window_config::canvas_present;
use crate::engine::systems::resize::ViewportSize;
use crate::error::ViewportError;

/// Steps run on mount, in dependency order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MountSet {
    /// Epoch, listeners, viewport size.
    Attach,
    /// Camera, lights, ground, overlays.
    Stage,
    /// Empty character slots.
    Characters,
    /// Asynchronous character load.
    Load,
}

pub struct ViewportLifecyclePlugin;

impl Plugin for ViewportLifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ViewportPhase>()
            .init_resource::<MountEpoch>()
            .init_resource::<ViewportConfig>()
            .init_resource::<ViewportSize>()
            .add_event::<ViewportRequest>()
            .add_event::<ViewportErrorEvent>()
            .configure_sets(
                OnEnter(ViewportPhase::Mounted),
                (
                    MountSet::Attach,
                    MountSet::Stage,
                    MountSet::Characters,
                    MountSet::Load,
                )
                    .chain(),
            )
            .add_systems(Startup, request_initial_mount)
            .add_systems(Update, handle_viewport_requests)
            .add_systems(
                OnEnter(ViewportPhase::Mounted),
                begin_mount.in_set(MountSet::Attach),
            )
            .add_systems(OnExit(ViewportPhase::Mounted), teardown_viewport);
    }

    fn finish(&self, app: &mut App) {
        // The render plugin hands its device to the main world once the
        // adapter is ready; without one nothing can be drawn.
        if app.world().contains_resource::<RenderDevice>() {
            app.insert_resource(GraphicsContext);
        } else {
            warn!("No render device available; the viewport will refuse to mount");
        }
    }
}

/// Fatal checks run before any mount work starts.
pub fn preflight(has_attach_point: bool, has_graphics: bool) -> Result<(), ViewportError> {
    if !has_attach_point {
        return Err(ViewportError::Mount {
            reason: "no window or canvas to attach to".into(),
        });
    }
    if !has_graphics {
        return Err(ViewportError::RenderContext);
    }
    Ok(())
}

fn request_initial_mount(
    config: Res<ViewportConfig>,
    mut requests: EventWriter<ViewportRequest>,
) {
    if config.auto_mount {
        requests.write(ViewportRequest::Mount);
    }
}

pub fn handle_viewport_requests(
    mut requests: EventReader<ViewportRequest>,
    phase: Res<State<ViewportPhase>>,
    mut next_phase: ResMut<NextState<ViewportPhase>>,
    windows: Query<(), With<PrimaryWindow>>,
    graphics: Option<Res<GraphicsContext>>,
    mut errors: EventWriter<ViewportErrorEvent>,
    mut deferred_mount: Local<bool>,
) {
    // Several requests can land in one frame; track where they leave us.
    let mut pending = *phase.get();
    let carried = std::mem::take(&mut *deferred_mount).then_some(ViewportRequest::Mount);

    for request in carried.iter().chain(requests.read()) {
        match (request, pending) {
            (ViewportRequest::Mount, ViewportPhase::Mounted) => {
                debug!("Mount requested while already mounted; ignoring");
            }
            // Teardown is queued for this frame; mount again once it has run.
            (ViewportRequest::Mount, _) if *phase.get() == ViewportPhase::Mounted => {
                debug!("Remount requested; deferring until teardown completes");
                *deferred_mount = true;
            }
            (ViewportRequest::Mount, _) => {
                let has_attach_point = !windows.is_empty() && canvas_present();
                match preflight(has_attach_point, graphics.is_some()) {
                    Ok(()) => pending = ViewportPhase::Mounted,
                    Err(err) => {
                        error!("Viewport mount failed: {err}");
                        errors.write(ViewportErrorEvent(err));
                        pending = ViewportPhase::Faulted;
                    }
                }
            }
            (ViewportRequest::Unmount, ViewportPhase::Mounted) => {
                pending = ViewportPhase::Detached;
            }
            (ViewportRequest::Unmount, _) if *deferred_mount => {
                debug!("Unmount cancels the deferred remount");
                *deferred_mount = false;
            }
            (ViewportRequest::Unmount, _) => {
                debug!("Unmount requested while not mounted; ignoring");
            }
        }
    }

    if pending != *phase.get() {
        next_phase.set(pending);
    }
}

pub fn begin_mount(
    mut commands: Commands,
    mut epoch: ResMut<MountEpoch>,
    mut viewport: ResMut<ViewportSize>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    epoch.0 += 1;
    commands.insert_resource(AttachedListeners::all());

    if let Ok(window) = windows.single() {
        *viewport = ViewportSize::from_window(window);
    }

    info!(
        "Mounting viewport (epoch {}, {}x{})",
        epoch.0, viewport.width, viewport.height
    );
}

pub fn teardown_viewport(
    mut commands: Commands,
    roots: Query<Entity, (With<ViewportScoped>, Without<ChildOf>)>,
    epoch: Res<MountEpoch>,
) {
    let mut despawned = 0;
    for entity in &roots {
        commands.entity(entity).try_despawn();
        despawned += 1;
    }
    commands.remove_resource::<AttachedListeners>();

    info!(
        "Viewport unmounted (epoch {}, {} root entities removed)",
        epoch.0, despawned
    );
}

#[cfg(test)]
mod tests {
    use bevy::pbr::DirectionalLightShadowMap;
    use bevy::state::state::StateTransitionEvent;

    use super::*;
    use crate::engine::test_support::{headless_app, headless_app_without_window, mount, unmount};

    #[test]
    fn preflight_rejects_missing_attach_point_first() {
        assert!(matches!(
            preflight(false, false),
            Err(ViewportError::Mount { .. })
        ));
        assert_eq!(preflight(true, false), Err(ViewportError::RenderContext));
        assert_eq!(preflight(true, true), Ok(()));
    }

    #[test]
    fn mount_without_window_faults_and_never_attaches() {
        let mut app = headless_app_without_window();

        mount(&mut app);

        let phase = app.world().resource::<State<ViewportPhase>>();
        assert_eq!(*phase.get(), ViewportPhase::Faulted);
        assert!(!app.world().contains_resource::<AttachedListeners>());
        assert_eq!(app.world().resource::<MountEpoch>().0, 0);
    }

    #[test]
    fn mount_without_graphics_context_faults() {
        let mut app = headless_app();
        app.world_mut().remove_resource::<GraphicsContext>();

        mount(&mut app);

        let phase = app.world().resource::<State<ViewportPhase>>();
        assert_eq!(*phase.get(), ViewportPhase::Faulted);
    }

    #[test]
    fn repeated_mount_is_ignored() {
        let mut app = headless_app();
        mount(&mut app);
        mount(&mut app);

        assert_eq!(app.world().resource::<MountEpoch>().0, 1);
    }

    #[test]
    fn teardown_removes_surface_and_listeners() {
        let mut app = headless_app();
        mount(&mut app);

        let scoped = app
            .world_mut()
            .query_filtered::<Entity, With<ViewportScoped>>()
            .iter(app.world())
            .count();
        assert!(scoped > 0);
        assert!(
            app.world_mut()
                .query_filtered::<Entity, With<Camera3d>>()
                .iter(app.world())
                .next()
                .is_some()
        );

        unmount(&mut app);

        let remaining = app
            .world_mut()
            .query_filtered::<Entity, With<ViewportScoped>>()
            .iter(app.world())
            .count();
        assert_eq!(remaining, 0);
        assert!(
            app.world_mut()
                .query_filtered::<Entity, With<Camera3d>>()
                .iter(app.world())
                .next()
                .is_none()
        );
        assert!(!app.world().contains_resource::<AttachedListeners>());
    }

    fn stage_resources(app: &App) -> (bool, bool, bool) {
        let world = app.world();
        (
            world.contains_resource::<ClearColor>(),
            world.contains_resource::<AmbientLight>(),
            world.contains_resource::<DirectionalLightShadowMap>(),
        )
    }

    #[test]
    fn mount_unmount_pairs_leave_no_residue() {
        let mut app = headless_app();
        let detached = stage_resources(&app);
        mount(&mut app);
        unmount(&mut app);
        let baseline = app.world().entities().len();
        assert_eq!(stage_resources(&app), detached);

        for _ in 0..3 {
            mount(&mut app);
            unmount(&mut app);
        }

        assert_eq!(app.world().entities().len(), baseline);
        assert_eq!(stage_resources(&app), detached);
        assert!(!app.world().contains_resource::<AttachedListeners>());
        assert_eq!(app.world().resource::<MountEpoch>().0, 4);
    }

    #[test]
    fn unmount_then_mount_in_one_frame_remounts() {
        let mut app = headless_app();
        mount(&mut app);
        let mut transitions = app
            .world()
            .resource::<Events<StateTransitionEvent<ViewportPhase>>>()
            .get_cursor_current();

        app.world_mut().send_event(ViewportRequest::Unmount);
        app.world_mut().send_event(ViewportRequest::Mount);
        // Request, teardown plus deferred mount, then the new mount.
        app.update();
        app.update();
        app.update();

        let phase = app.world().resource::<State<ViewportPhase>>();
        assert_eq!(*phase.get(), ViewportPhase::Mounted);
        assert_eq!(app.world().resource::<MountEpoch>().0, 2);

        let events = app
            .world()
            .resource::<Events<StateTransitionEvent<ViewportPhase>>>();
        let entered: Vec<_> = transitions
            .read(events)
            .filter_map(|transition| transition.entered)
            .collect();
        assert_eq!(
            entered,
            vec![ViewportPhase::Detached, ViewportPhase::Mounted]
        );
    }

    #[test]
    fn unmount_cancels_a_deferred_remount() {
        let mut app = headless_app();
        mount(&mut app);

        app.world_mut().send_event(ViewportRequest::Unmount);
        app.world_mut().send_event(ViewportRequest::Mount);
        app.world_mut().send_event(ViewportRequest::Unmount);
        app.update();
        app.update();
        app.update();

        let phase = app.world().resource::<State<ViewportPhase>>();
        assert_eq!(*phase.get(), ViewportPhase::Detached);
        assert_eq!(app.world().resource::<MountEpoch>().0, 1);
    }
}
