use bevy::animation::graph::AnimationNodeIndex;
use bevy::asset::{LoadState, RecursiveDependencyLoadState, UntypedAssetId};
use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::engine::assets::character_manifest::{AnimationNames, CharacterManifest};
use crate::engine::assets::shared_parts::{SharedCharacterParts, WeaponParts};
use crate::engine::character::motion::AnimationRole;
use crate::engine::core::app_state::{MountEpoch, ViewportErrorEvent};
use crate::engine::core::config::ViewportConfig;
use crate::engine::loading::progress::LoadingProgress;
use crate::error::ViewportError;

/// Emitted once per mount when every part of the character bundle is ready.
#[derive(Event, Debug, Clone)]
pub struct CharacterPartsReady {
    /// Mount the load was issued under.
    pub epoch: u64,
    pub parts: SharedCharacterParts,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStage {
    AwaitingManifest,
    AwaitingParts,
    Complete,
    Failed(ViewportError),
}

impl LoadStage {
    pub fn label(&self) -> String {
        match self {
            LoadStage::AwaitingManifest => "Loading character manifest".to_string(),
            LoadStage::AwaitingParts => "Loading character parts".to_string(),
            LoadStage::Complete => "Characters ready".to_string(),
            LoadStage::Failed(err) => format!("Error: {err}"),
        }
    }
}

/// One-shot load of the character bundle for a single mount. Dropped on
/// unmount; the next mount issues a fresh job under its own epoch.
#[derive(Resource, Debug)]
pub struct CharacterLoadJob {
    pub epoch: u64,
    pub stage: LoadStage,
    manifest_path: String,
    manifest: Handle<CharacterManifest>,
    parts: Option<PendingParts>,
}

#[derive(Debug)]
struct PendingWeapon {
    mesh: (String, Handle<Gltf>),
    texture: (String, Handle<Image>),
}

#[derive(Debug)]
struct PendingParts {
    manifest: CharacterManifest,
    body: (String, Handle<Gltf>),
    skins: Vec<(String, Handle<Image>)>,
    weapons: Vec<PendingWeapon>,
}

impl PendingParts {
    fn request(manifest: CharacterManifest, asset_server: &AssetServer) -> Self {
        let body_path = manifest.body_path();
        let body = asset_server.load::<Gltf>(&body_path);
        let skins = manifest
            .skin_paths()
            .map(|path| {
                let handle = asset_server.load::<Image>(&path);
                (path, handle)
            })
            .collect();
        let weapons = manifest
            .weapon_paths()
            .map(|(mesh_path, texture_path)| PendingWeapon {
                mesh: (mesh_path.clone(), asset_server.load::<Gltf>(&mesh_path)),
                texture: (texture_path.clone(), asset_server.load::<Image>(&texture_path)),
            })
            .collect();

        Self {
            manifest,
            body: (body_path, body),
            skins,
            weapons,
        }
    }

    fn requests(&self) -> Vec<(&str, UntypedAssetId)> {
        let mut requests = vec![(self.body.0.as_str(), self.body.1.id().untyped())];
        requests.extend(
            self.skins
                .iter()
                .map(|(path, handle)| (path.as_str(), handle.id().untyped())),
        );
        for weapon in &self.weapons {
            requests.push((weapon.mesh.0.as_str(), weapon.mesh.1.id().untyped()));
            requests.push((weapon.texture.0.as_str(), weapon.texture.1.id().untyped()));
        }
        requests
    }

    fn assemble(
        &self,
        gltfs: &Assets<Gltf>,
        materials: &mut Assets<StandardMaterial>,
        graphs: &mut Assets<AnimationGraph>,
    ) -> Result<SharedCharacterParts, ViewportError> {
        let (body_path, body_handle) = &self.body;
        let body = gltfs
            .get(body_handle)
            .ok_or_else(|| ViewportError::asset_load(body_path, "glTF missing after load"))?;
        let body_scene = primary_scene(body).ok_or_else(|| {
            ViewportError::manifest(format!("{body_path} contains no scene"))
        })?;

        let skins = self
            .skins
            .iter()
            .map(|(_, image)| materials.add(textured_material(image.clone())))
            .collect();

        let mut weapons = Vec::with_capacity(self.weapons.len());
        for weapon in &self.weapons {
            let (mesh_path, mesh_handle) = &weapon.mesh;
            let gltf = gltfs
                .get(mesh_handle)
                .ok_or_else(|| ViewportError::asset_load(mesh_path, "glTF missing after load"))?;
            let scene = primary_scene(gltf).ok_or_else(|| {
                ViewportError::manifest(format!("{mesh_path} contains no scene"))
            })?;
            let (graph, clips) = build_animation_graph(&self.manifest.animations, |name| {
                gltf.named_animations.get(name).cloned()
            });
            weapons.push(WeaponParts {
                scene,
                material: materials.add(textured_material(weapon.texture.1.clone())),
                graph: graphs.add(graph),
                clips,
            });
        }

        let (graph, clips) = build_animation_graph(&self.manifest.animations, |name| {
            body.named_animations.get(name).cloned()
        });

        Ok(SharedCharacterParts {
            body: body_scene,
            skins,
            weapons,
            graph: graphs.add(graph),
            clips,
            walk_speed: self.manifest.walk_speed,
            crouch_speed: self.manifest.crouch_speed,
        })
    }
}

fn primary_scene(gltf: &Gltf) -> Option<Handle<Scene>> {
    gltf.default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
}

fn textured_material(texture: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        perceptual_roughness: 1.0,
        reflectance: 0.1,
        ..default()
    }
}

/// One graph node per role whose clip `lookup` can find. Missing clips are
/// logged and their roles left unmapped.
pub fn build_animation_graph(
    names: &AnimationNames,
    mut lookup: impl FnMut(&str) -> Option<Handle<AnimationClip>>,
) -> (AnimationGraph, Vec<(AnimationRole, AnimationNodeIndex)>) {
    let mut graph = AnimationGraph::new();
    let mut clips = Vec::new();

    for role in AnimationRole::ALL {
        let name = names.for_role(role);
        match lookup(name) {
            Some(clip) => {
                let node = graph.add_clip(clip, 1.0, graph.root);
                clips.push((role, node));
            }
            None => warn!("Animation clip '{name}' for {role:?} not found; role left unmapped"),
        }
    }

    (graph, clips)
}

impl CharacterLoadJob {
    pub fn new(epoch: u64, manifest_path: String, manifest: Handle<CharacterManifest>) -> Self {
        Self {
            epoch,
            stage: LoadStage::AwaitingManifest,
            manifest_path,
            manifest,
            parts: None,
        }
    }

    pub fn manifest_path(&self) -> &str {
        &self.manifest_path
    }

    fn poll_manifest(
        &mut self,
        columns: usize,
        asset_server: &AssetServer,
        manifests: &Assets<CharacterManifest>,
        progress: &mut LoadingProgress,
    ) -> Result<(), ViewportError> {
        if let LoadState::Failed(err) = asset_server.load_state(&self.manifest) {
            return Err(ViewportError::asset_load(&self.manifest_path, err));
        }
        let Some(manifest) = manifests.get(&self.manifest) else {
            return Ok(());
        };
        manifest.validate(columns)?;

        let parts = PendingParts::request(manifest.clone(), asset_server);
        progress.manifest_loaded = true;
        progress.parts_total = parts.requests().len();
        info!(
            "Character manifest loaded from {} ({} parts requested)",
            self.manifest_path, progress.parts_total
        );

        self.parts = Some(parts);
        self.stage = LoadStage::AwaitingParts;
        Ok(())
    }

    fn poll_parts(
        &self,
        asset_server: &AssetServer,
        gltfs: &Assets<Gltf>,
        materials: &mut Assets<StandardMaterial>,
        graphs: &mut Assets<AnimationGraph>,
        progress: &mut LoadingProgress,
    ) -> Result<Option<SharedCharacterParts>, ViewportError> {
        let Some(parts) = &self.parts else {
            return Ok(None);
        };

        let mut loaded = 0;
        for (path, id) in parts.requests() {
            if let LoadState::Failed(err) = asset_server.load_state(id) {
                return Err(ViewportError::asset_load(path, err));
            }
            if matches!(
                asset_server.recursive_dependency_load_state(id),
                RecursiveDependencyLoadState::Failed(_)
            ) {
                return Err(ViewportError::asset_load(path, "a dependency failed to load"));
            }
            if asset_server.is_loaded_with_dependencies(id) {
                loaded += 1;
            }
        }
        progress.parts_loaded = loaded;
        if loaded < progress.parts_total {
            return Ok(None);
        }

        parts.assemble(gltfs, materials, graphs).map(Some)
    }
}

pub fn begin_character_load(
    mut commands: Commands,
    config: Res<ViewportConfig>,
    epoch: Res<MountEpoch>,
    asset_server: Res<AssetServer>,
) {
    let manifest = asset_server.load::<CharacterManifest>(&config.manifest_path);
    commands.insert_resource(CharacterLoadJob::new(
        epoch.0,
        config.manifest_path.clone(),
        manifest,
    ));
    commands.insert_resource(LoadingProgress::default());

    info!(
        "Loading characters from {} (epoch {})",
        config.manifest_path, epoch.0
    );
}

#[allow(clippy::too_many_arguments)]
pub fn poll_character_load(
    mut job: ResMut<CharacterLoadJob>,
    config: Res<ViewportConfig>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<CharacterManifest>>,
    gltfs: Res<Assets<Gltf>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut progress: ResMut<LoadingProgress>,
    mut ready: EventWriter<CharacterPartsReady>,
    mut errors: EventWriter<ViewportErrorEvent>,
) {
    let stage = job.stage.clone();
    let result = match stage {
        LoadStage::AwaitingManifest => job.poll_manifest(
            config.roster_columns,
            &asset_server,
            &manifests,
            &mut progress,
        ),
        LoadStage::AwaitingParts => match job.poll_parts(
            &asset_server,
            &gltfs,
            &mut materials,
            &mut graphs,
            &mut progress,
        ) {
            Ok(Some(parts)) => {
                info!(
                    "Character parts ready (epoch {}, {} animation roles)",
                    job.epoch,
                    parts.clips.len()
                );
                ready.write(CharacterPartsReady {
                    epoch: job.epoch,
                    parts,
                });
                job.stage = LoadStage::Complete;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => Err(err),
        },
        LoadStage::Complete | LoadStage::Failed(_) => return,
    };

    if let Err(err) = result {
        error!("Character load failed (epoch {}): {err}", job.epoch);
        errors.write(ViewportErrorEvent(err.clone()));
        job.stage = LoadStage::Failed(err);
    }
}

pub fn cancel_character_load(mut commands: Commands, job: Option<Res<CharacterLoadJob>>) {
    if let Some(job) = job {
        if !matches!(job.stage, LoadStage::Complete | LoadStage::Failed(_)) {
            debug!("Dropping unfinished character load (epoch {})", job.epoch);
        }
        commands.remove_resource::<CharacterLoadJob>();
    }
}
