use bevy::prelude::*;
use constants::character::{COLUMN_SPACING, ROW_SPACING};

use crate::engine::core::app_state::ViewportScoped;
use crate::engine::core::config::ViewportConfig;

/// Position of a character in the roster grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterSlot {
    /// Row-major index.
    pub index: usize,
    pub row: usize,
    pub column: usize,
}

impl RosterSlot {
    /// Every slot of a `rows` by `columns` grid, row by row.
    pub fn grid(rows: usize, columns: usize) -> impl Iterator<Item = RosterSlot> {
        (0..rows).flat_map(move |row| {
            (0..columns).map(move |column| RosterSlot {
                index: row * columns + column,
                row,
                column,
            })
        })
    }

    /// Ground position of this slot in a roster `columns` wide. Columns are
    /// centred on the origin, rows recede along +Z.
    pub fn position(&self, columns: usize) -> Vec3 {
        Vec3::new(
            (self.column as f32 - columns as f32 / 2.0) * COLUMN_SPACING,
            0.0,
            self.row as f32 * ROW_SPACING,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterBinding {
    /// Declared at mount, waiting for the shared parts.
    Unbound,
    Bound {
        skin: usize,
        weapon: Option<usize>,
        shadows: bool,
    },
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterInstance {
    pub slot: RosterSlot,
    pub binding: CharacterBinding,
}

impl CharacterInstance {
    pub fn is_bound(&self) -> bool {
        matches!(self.binding, CharacterBinding::Bound { .. })
    }
}

/// Roster shape fixed when the viewport mounted.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roster {
    pub rows: usize,
    pub columns: usize,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot index of the character the camera follows.
    pub fn followed_index(&self) -> usize {
        self.columns / 2
    }
}

pub fn declare_characters(mut commands: Commands, config: Res<ViewportConfig>) {
    let roster = Roster {
        rows: config.roster_rows,
        columns: config.roster_columns,
    };

    for slot in RosterSlot::grid(roster.rows, roster.columns) {
        commands.spawn((
            Name::new(format!("Character {}", slot.index)),
            CharacterInstance {
                slot,
                binding: CharacterBinding::Unbound,
            },
            ViewportScoped,
        ));
    }

    commands.insert_resource(roster);
    debug!(
        "Declared {} characters ({}x{})",
        roster.len(),
        roster.rows,
        roster.columns
    );
}
