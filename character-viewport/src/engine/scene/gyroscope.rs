use bevy::prelude::*;

/// A pivot that follows its anchor's position but keeps its own rotation
/// and scale. Children of the pivot therefore track the anchor without
/// turning when the anchor turns.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gyroscope {
    pub anchor: Entity,
}

/// Anchors are top-level entities, so their local translation is their world
/// translation. A pivot whose anchor is gone stays where it last was.
pub fn follow_gyroscope_anchors(
    mut pivots: Query<(&Gyroscope, &mut Transform)>,
    anchors: Query<&Transform, Without<Gyroscope>>,
) {
    for (gyroscope, mut transform) in &mut pivots {
        let Ok(anchor) = anchors.get(gyroscope.anchor) else {
            continue;
        };
        if transform.translation != anchor.translation {
            transform.translation = anchor.translation;
        }
    }
}
