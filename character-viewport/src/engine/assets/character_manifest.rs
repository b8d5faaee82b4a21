use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::character::motion::AnimationRole;
use crate::error::ViewportError;

/// Clip names inside the body glTF for each animation role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationNames {
    #[serde(rename = "move")]
    pub run: String,
    pub idle: String,
    pub jump: String,
    pub attack: String,
    pub crouch_move: String,
    pub crouch_idle: String,
    /// Crouched attack. The key name matches existing asset bundles.
    pub crouch_attach: String,
}

impl AnimationNames {
    pub fn for_role(&self, role: AnimationRole) -> &str {
        match role {
            AnimationRole::Move => &self.run,
            AnimationRole::Idle => &self.idle,
            AnimationRole::Jump => &self.jump,
            AnimationRole::Attack => &self.attack,
            AnimationRole::CrouchMove => &self.crouch_move,
            AnimationRole::CrouchIdle => &self.crouch_idle,
            AnimationRole::CrouchAttack => &self.crouch_attach,
        }
    }
}

/// Character asset bundle as a Bevy asset. Mirrors the JSON structure:
///
/// ```json
/// {
///   "baseUrl": "models/ogro/",
///   "body": "ogro.glb",
///   "skins": ["grok.png"],
///   "weapons": [["weapon.glb", "weapon.png"]],
///   "animations": { "move": "run", "idle": "stand", ... },
///   "walkSpeed": 350,
///   "crouchSpeed": 175
/// }
/// ```
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterManifest {
    pub base_url: String,
    pub body: String,
    pub skins: Vec<String>,
    /// `[mesh, texture]` pairs.
    pub weapons: Vec<(String, String)>,
    pub animations: AnimationNames,
    pub walk_speed: f32,
    pub crouch_speed: f32,
}

impl CharacterManifest {
    /// Asset path of a file inside the bundle.
    pub fn asset_path(&self, file: &str) -> String {
        if self.base_url.is_empty() || self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, file)
        } else {
            format!("{}/{}", self.base_url, file)
        }
    }

    pub fn body_path(&self) -> String {
        self.asset_path(&self.body)
    }

    pub fn skin_paths(&self) -> impl Iterator<Item = String> + '_ {
        self.skins.iter().map(|skin| self.asset_path(skin))
    }

    pub fn weapon_paths(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.weapons
            .iter()
            .map(|(mesh, texture)| (self.asset_path(mesh), self.asset_path(texture)))
    }

    /// Check the bundle can dress a roster `columns` wide.
    pub fn validate(&self, columns: usize) -> Result<(), ViewportError> {
        if self.body.is_empty() {
            return Err(ViewportError::manifest("no body mesh listed"));
        }
        if self.skins.is_empty() {
            return Err(ViewportError::manifest("no skins listed"));
        }
        if self.skins.len() < columns {
            return Err(ViewportError::manifest(format!(
                "{} skins listed but the roster has {} columns",
                self.skins.len(),
                columns
            )));
        }
        if !(self.walk_speed > 0.0 && self.crouch_speed > 0.0) {
            return Err(ViewportError::manifest("walk and crouch speeds must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OGRO: &str = r#"{
        "baseUrl": "models/ogro/",
        "body": "ogro.glb",
        "skins": ["grok.png", "ogrobase.png"],
        "weapons": [["weapon.glb", "weapon.jpg"]],
        "animations": {
            "move": "run",
            "idle": "stand",
            "jump": "jump",
            "attack": "attack",
            "crouchMove": "cwalk",
            "crouchIdle": "cstand",
            "crouchAttach": "crattack"
        },
        "walkSpeed": 350,
        "crouchSpeed": 175
    }"#;

    fn ogro() -> CharacterManifest {
        serde_json::from_str(OGRO).expect("manifest parses")
    }

    #[test]
    fn parses_camel_case_bundle() {
        let manifest = ogro();
        assert_eq!(manifest.animations.run, "run");
        assert_eq!(manifest.animations.crouch_attach, "crattack");
        assert_eq!(manifest.walk_speed, 350.0);
        assert_eq!(
            manifest.weapons,
            vec![("weapon.glb".to_string(), "weapon.jpg".to_string())]
        );
    }

    #[test]
    fn crouch_attack_reads_the_crouch_attach_key() {
        let manifest = ogro();
        assert_eq!(
            manifest.animations.for_role(AnimationRole::CrouchAttack),
            "crattack"
        );
        assert_eq!(manifest.animations.for_role(AnimationRole::Move), "run");
    }

    #[test]
    fn paths_are_joined_to_base_url() {
        let mut manifest = ogro();
        assert_eq!(manifest.body_path(), "models/ogro/ogro.glb");

        manifest.base_url = "models/ogro".into();
        assert_eq!(
            manifest.skin_paths().collect::<Vec<_>>(),
            vec!["models/ogro/grok.png", "models/ogro/ogrobase.png"]
        );
    }

    #[test]
    fn roster_wider_than_skin_list_is_rejected() {
        let manifest = ogro();
        assert!(manifest.validate(2).is_ok());
        assert!(matches!(
            manifest.validate(3),
            Err(ViewportError::Manifest { .. })
        ));
    }

    #[test]
    fn empty_skin_list_is_rejected() {
        let mut manifest = ogro();
        manifest.skins.clear();
        assert_eq!(
            manifest.validate(0),
            Err(ViewportError::manifest("no skins listed"))
        );
    }
}
