/// Character manifest, relative to the asset root.
pub const CHARACTER_MANIFEST_PATH: &str = "models/ogro/ogro.character.json";

pub const GROUND_TEXTURE_PATH: &str = "textures/terrain/grasslight-big.jpg";

/// Host page element the wasm build renders into.
pub const CANVAS_SELECTOR: &str = "#viewport";
