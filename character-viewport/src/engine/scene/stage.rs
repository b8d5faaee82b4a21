use bevy::math::Affine2;
use bevy::pbr::{
    CascadeShadowConfigBuilder, DirectionalLightShadowMap, NotShadowCaster,
    ShadowFilteringMethod,
};
use bevy::prelude::*;
use bevy::render::view::Msaa;
use bevy::transform::TransformSystem;
use constants::camera::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_START_POSITION, ORBIT_TARGET,
};
use constants::lighting::{
    AMBIENT_BRIGHTNESS, AMBIENT_COLOUR, SHADOW_FAR, SHADOW_MAP_SIZE, SHADOW_NEAR,
    SUN_ILLUMINANCE, SUN_POSITION,
};
use constants::scene::{
    BACKGROUND_COLOUR, FOG_END, FOG_START, GROUND_SIZE, GROUND_TEXTURE_REPEAT,
};

use crate::engine::camera::orbit_camera::{OrbitCamera, ViewportCamera};
use crate::engine::core::app_state::{ViewportPhase, ViewportScoped};
use crate::engine::core::config::ViewportConfig;
use crate::engine::core::lifecycle::MountSet;
use crate::engine::loading::texture_config::{GroundTexture, configure_ground_texture};
use crate::engine::scene::gyroscope::follow_gyroscope_anchors;
use crate::engine::systems::resize::ViewportSize;

/// The shadow-casting key light. Reparented under the gyroscope pivot once
/// characters are assembled.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct SunLight;

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Ground;

/// Render resources as they stood before the mount replaced them.
#[derive(Resource, Debug, Default, Clone)]
struct StageBaseline {
    clear_color: Option<ClearColor>,
    ambient_light: Option<AmbientLight>,
    shadow_map: Option<DirectionalLightShadowMap>,
}

/// Camera, lights and ground of a mounted viewport.
pub struct StagePlugin;

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(ViewportPhase::Mounted),
            spawn_stage.in_set(MountSet::Stage),
        )
        .add_systems(
            Update,
            configure_ground_texture.run_if(resource_exists::<GroundTexture>),
        )
        .add_systems(
            PostUpdate,
            follow_gyroscope_anchors.before(TransformSystem::TransformPropagate),
        )
        .add_systems(OnExit(ViewportPhase::Mounted), clear_stage_resources);
    }
}

fn background_colour() -> Color {
    let [r, g, b] = BACKGROUND_COLOUR;
    Color::srgb_u8(r, g, b)
}

pub fn perspective_for(viewport: &ViewportSize) -> PerspectiveProjection {
    PerspectiveProjection {
        fov: CAMERA_FOV_DEGREES.to_radians(),
        near: CAMERA_NEAR,
        far: CAMERA_FAR,
        aspect_ratio: viewport.aspect_ratio().unwrap_or(1.0),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn spawn_stage(
    mut commands: Commands,
    config: Res<ViewportConfig>,
    clear_color: Option<Res<ClearColor>>,
    ambient_light: Option<Res<AmbientLight>>,
    shadow_map: Option<Res<DirectionalLightShadowMap>>,
    viewport: Res<ViewportSize>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let background = background_colour();
    let [r, g, b] = AMBIENT_COLOUR;

    commands.insert_resource(StageBaseline {
        clear_color: clear_color.as_deref().cloned(),
        ambient_light: ambient_light.as_deref().cloned(),
        shadow_map: shadow_map.as_deref().cloned(),
    });
    commands.insert_resource(ClearColor(background));
    commands.insert_resource(AmbientLight {
        color: Color::srgb_u8(r, g, b),
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });
    commands.insert_resource(DirectionalLightShadowMap {
        size: SHADOW_MAP_SIZE,
    });

    let orbit = OrbitCamera::from_position(CAMERA_START_POSITION, ORBIT_TARGET);
    commands.spawn((
        Name::new("Viewport Camera"),
        Camera3d::default(),
        Projection::Perspective(perspective_for(&viewport)),
        orbit.transform(),
        Msaa::Sample4,
        ShadowFilteringMethod::Gaussian,
        DistanceFog {
            color: background,
            falloff: FogFalloff::Linear {
                start: FOG_START,
                end: FOG_END,
            },
            ..default()
        },
        orbit,
        ViewportCamera,
        ViewportScoped,
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: SUN_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(SUN_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        CascadeShadowConfigBuilder {
            num_cascades: 1,
            minimum_distance: SHADOW_NEAR,
            maximum_distance: SHADOW_FAR,
            ..default()
        }
        .build(),
        SunLight,
        ViewportScoped,
    ));

    // Ground receives shadows but never casts them.
    let texture = config
        .ground_texture
        .as_ref()
        .map(|path| asset_server.load::<Image>(path));
    let material = materials.add(StandardMaterial {
        base_color: if texture.is_some() {
            Color::WHITE
        } else {
            Color::srgb(0.42, 0.55, 0.30)
        },
        base_color_texture: texture.clone(),
        uv_transform: Affine2::from_scale(Vec2::splat(GROUND_TEXTURE_REPEAT)),
        perceptual_roughness: 1.0,
        ..default()
    });
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        NotShadowCaster,
        Ground,
        ViewportScoped,
    ));

    if let Some(handle) = texture {
        commands.insert_resource(GroundTexture::new(handle));
    }

    info!("Stage ready (ground texture: {:?})", config.ground_texture);
}

fn restore_resource<R: Resource>(commands: &mut Commands, saved: Option<R>) {
    match saved {
        Some(resource) => commands.insert_resource(resource),
        None => commands.remove_resource::<R>(),
    }
}

fn clear_stage_resources(mut commands: Commands, baseline: Option<Res<StageBaseline>>) {
    commands.remove_resource::<GroundTexture>();

    let Some(baseline) = baseline else {
        return;
    };
    let StageBaseline {
        clear_color,
        ambient_light,
        shadow_map,
    } = baseline.clone();
    restore_resource(&mut commands, clear_color);
    restore_resource(&mut commands, ambient_light);
    restore_resource(&mut commands, shadow_map);
    commands.remove_resource::<StageBaseline>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{headless_app, mount, unmount};

    #[test]
    fn mount_builds_camera_sun_and_ground() {
        let mut app = headless_app();
        mount(&mut app);

        let world = app.world_mut();
        let (projection, transform) = world
            .query_filtered::<(&Projection, &Transform), With<ViewportCamera>>()
            .iter(world)
            .next()
            .map(|(p, t)| (p.clone(), *t))
            .expect("camera spawned");
        let Projection::Perspective(perspective) = projection else {
            panic!("camera should be perspective");
        };
        assert!((perspective.fov - 45f32.to_radians()).abs() < 1e-6);
        assert_eq!(perspective.near, CAMERA_NEAR);
        assert_eq!(perspective.far, CAMERA_FAR);
        assert!(transform.translation.distance(CAMERA_START_POSITION) < 1e-2);

        let sun = world
            .query_filtered::<&DirectionalLight, With<SunLight>>()
            .iter(world)
            .next()
            .expect("sun spawned");
        assert!(sun.shadows_enabled);

        let grounds = world
            .query_filtered::<(), (With<Ground>, With<NotShadowCaster>)>()
            .iter(world)
            .count();
        assert_eq!(grounds, 1);
    }

    #[test]
    fn camera_aspect_follows_viewport_at_mount() {
        let size = ViewportSize {
            width: 800.0,
            height: 400.0,
            scale_factor: 1.0,
        };
        assert_eq!(perspective_for(&size).aspect_ratio, 2.0);
    }

    #[test]
    fn ground_texture_tracking_ends_with_mount() {
        let mut app = headless_app();
        app.world_mut().resource_mut::<ViewportConfig>().ground_texture =
            Some("textures/terrain/missing.jpg".into());

        mount(&mut app);
        assert!(app.world().contains_resource::<GroundTexture>());

        unmount(&mut app);
        assert!(!app.world().contains_resource::<GroundTexture>());
    }

    #[test]
    fn unmount_restores_render_resources() {
        let mut app = headless_app();
        app.insert_resource(ClearColor(Color::BLACK));

        mount(&mut app);
        assert_eq!(app.world().resource::<ClearColor>().0, background_colour());
        assert_eq!(
            app.world().resource::<AmbientLight>().brightness,
            AMBIENT_BRIGHTNESS
        );
        assert_eq!(
            app.world().resource::<DirectionalLightShadowMap>().size,
            SHADOW_MAP_SIZE
        );

        unmount(&mut app);
        assert_eq!(app.world().resource::<ClearColor>().0, Color::BLACK);
        assert!(!app.world().contains_resource::<AmbientLight>());
        assert!(!app.world().contains_resource::<DirectionalLightShadowMap>());
        assert!(!app.world().contains_resource::<StageBaseline>());
    }
}
