use std::fmt;

use bevy::prelude::*;
use clap::ValueEnum;
use serde::Deserialize;

/// Difficulty tier chosen when a run starts.
///
/// Every tier maps to a base scalar; gameplay formulas raise it to a
/// per-formula significance, see [`Difficulty::multiplier`].
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Easy, and no dog to protect.
    Jeffrey,
    Easy,
    #[default]
    Normal,
    /// Hard, and no dog at your side.
    Hard,
    Adonis,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Jeffrey,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Adonis,
    ];

    pub fn base(self) -> f32 {
        match self {
            Difficulty::Jeffrey | Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard | Difficulty::Adonis => 1.4,
        }
    }

    /// `D(x)`: the base scalar raised to `significance`. Negative
    /// significances make a value shrink as the game gets harder.
    pub fn multiplier(self, significance: f32) -> f32 {
        self.base().powf(significance)
    }

    pub fn has_dog(self) -> bool {
        !matches!(self, Difficulty::Jeffrey | Difficulty::Hard)
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Jeffrey => "Jeffrey",
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Adonis => "Adonis",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
