use bevy::{ecs::system::SystemParam, prelude::*};

use crate::{
    difficulty::Difficulty,
    health::Dying,
    upgrades::{UpgradeKey, UpgradeLevels, Wallet},
    waves::WaveDirector,
    zombie::ZombieController,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeRow {
    pub key: UpgradeKey,
    pub level: u32,
    pub cost: u32,
    pub affordable: bool,
}

/// Read-only view of a run for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub wave: u32,
    pub wave_active: bool,
    pub zombies_remaining: usize,
    pub coins: f32,
    pub score: u32,
    pub upgrades: Vec<UpgradeRow>,
}

#[derive(SystemParam)]
pub struct HudQuery<'w, 's> {
    director: Res<'w, WaveDirector>,
    levels: Res<'w, UpgradeLevels>,
    wallet: Res<'w, Wallet>,
    difficulty: Res<'w, Difficulty>,
    zombies: Query<'w, 's, (), (With<ZombieController>, Without<Dying>)>,
}

impl<'w, 's> HudQuery<'w, 's> {
    pub fn snapshot(&self) -> HudSnapshot {
        let upgrades = UpgradeKey::ALL
            .iter()
            .map(|&key| {
                let cost = self.levels.cost(key, *self.difficulty);
                UpgradeRow {
                    key,
                    level: self.levels.level(key),
                    cost,
                    affordable: self.wallet.can_afford(cost),
                }
            })
            .collect();
        HudSnapshot {
            wave: self.director.wave,
            wave_active: self.director.is_wave_active(),
            zombies_remaining: self.zombies.iter().count(),
            coins: self.wallet.coins,
            score: self.director.score,
            upgrades,
        }
    }
}
