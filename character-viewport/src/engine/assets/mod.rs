//! Asset definitions for the character bundle.
//!
//! The bundle is described by a JSON manifest naming the body glTF, its
//! skins, weapons and the clip used for each animation role.

/// Character bundle manifest loaded through `bevy_common_assets`.
pub mod character_manifest;

/// Parts shared by every character once the bundle has loaded.
pub mod shared_parts;
