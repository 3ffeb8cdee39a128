use bevy::prelude::*;

use crate::{
    audio::{PlaySoundEvent, SoundEffect},
    config::GameConfig,
    difficulty::Difficulty,
    error::PurchaseError,
    game::AppState,
    GameSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UpgradeKey {
    FireRate,
    MaxPlayerHealth,
    DoggyHealth,
    BulletPiercing,
    BulletDamage,
    FriendlyFire,
    CoinMultiplier,
    Burst,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeDefinition {
    pub key: UpgradeKey,
    pub name: &'static str,
    pub description: &'static str,
    pub cost_multiplier: f32,
    /// Weight of the upgrade's own level in its price.
    pub self_multiplier: f32,
}

pub const UPGRADES: [UpgradeDefinition; 8] = [
    UpgradeDefinition {
        key: UpgradeKey::FireRate,
        name: "Fire Rate",
        description: "Increases the speed at which you can shoot",
        cost_multiplier: 1.5,
        self_multiplier: 1.0,
    },
    UpgradeDefinition {
        key: UpgradeKey::MaxPlayerHealth,
        name: "Max Health",
        description: "Increases your health",
        cost_multiplier: 0.0,
        self_multiplier: 1.0,
    },
    UpgradeDefinition {
        key: UpgradeKey::DoggyHealth,
        name: "Max Doggy Health",
        description: "Increases your doggy's health",
        cost_multiplier: 0.8,
        self_multiplier: 0.0,
    },
    UpgradeDefinition {
        key: UpgradeKey::BulletPiercing,
        name: "Bullet Piercing",
        description: "Increases the ability for your bullets to go through multiple enemies",
        cost_multiplier: 2.0,
        self_multiplier: 1.8,
    },
    UpgradeDefinition {
        key: UpgradeKey::BulletDamage,
        name: "Bullet Damage",
        description: "Increases the damage of your bullets",
        cost_multiplier: 1.1,
        self_multiplier: 1.0,
    },
    UpgradeDefinition {
        key: UpgradeKey::FriendlyFire,
        name: "Lesser Friendly Fire",
        description: "Reduces the damage your dog takes from your own bullets",
        cost_multiplier: 0.6,
        self_multiplier: 1.0,
    },
    UpgradeDefinition {
        key: UpgradeKey::CoinMultiplier,
        name: "Coin Multiplier",
        description: "Increases the amount of coins you get from killing enemies",
        cost_multiplier: 1.0,
        self_multiplier: 2.0,
    },
    UpgradeDefinition {
        key: UpgradeKey::Burst,
        name: "Burst Shots",
        description: "Shoot multiple shots at once",
        cost_multiplier: 4.0,
        self_multiplier: 3.0,
    },
];

impl UpgradeKey {
    pub const ALL: [UpgradeKey; 8] = [
        UpgradeKey::FireRate,
        UpgradeKey::MaxPlayerHealth,
        UpgradeKey::DoggyHealth,
        UpgradeKey::BulletPiercing,
        UpgradeKey::BulletDamage,
        UpgradeKey::FriendlyFire,
        UpgradeKey::CoinMultiplier,
        UpgradeKey::Burst,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn definition(self) -> &'static UpgradeDefinition {
        &UPGRADES[self.index()]
    }
}

/// Levels bought during the current run. Levels only ever go up.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeLevels {
    levels: [u32; 8],
}

impl UpgradeLevels {
    pub fn level(&self, key: UpgradeKey) -> u32 {
        self.levels[key.index()]
    }

    /// Sum of all levels across all upgrades.
    pub fn total(&self) -> u32 {
        self.levels.iter().sum()
    }

    pub fn cost(&self, key: UpgradeKey, difficulty: Difficulty) -> u32 {
        let definition = key.definition();
        let raw = (10.0
            + self.total() as f32 * 2.0 * difficulty.multiplier(1.0)
            + self.level(key) as f32 * 5.0 * definition.self_multiplier)
            * definition.cost_multiplier
            * difficulty.multiplier(0.5);
        raw.floor().max(0.0) as u32
    }

    /// Buys one level of `key`. On failure nothing changes.
    pub fn purchase(
        &mut self,
        key: UpgradeKey,
        wallet: &mut Wallet,
        difficulty: Difficulty,
    ) -> Result<u32, PurchaseError> {
        let cost = self.cost(key, difficulty);
        if !wallet.can_afford(cost) {
            return Err(PurchaseError::InsufficientFunds {
                key,
                cost,
                balance: wallet.coins,
            });
        }
        wallet.coins -= cost as f32;
        self.levels[key.index()] += 1;
        Ok(cost)
    }

    /// Raises a level for free.
    pub fn grant(&mut self, key: UpgradeKey, levels: u32) {
        self.levels[key.index()] += levels;
    }
}

/// Player currency. Merged coins carry fractional values, so the balance does too.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Wallet {
    pub coins: f32,
}

impl Wallet {
    pub fn new(coins: f32) -> Self {
        Self { coins }
    }

    pub fn credit(&mut self, amount: f32) {
        self.coins += amount;
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.coins >= cost as f32
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(GameConfig::default().starting_coins)
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseUpgrade(pub UpgradeKey);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradePurchased {
    pub key: UpgradeKey,
    pub level: u32,
    pub cost: u32,
}

pub struct UpgradePlugin;

impl Plugin for UpgradePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UpgradeLevels>()
            .init_resource::<Wallet>()
            .add_event::<PurchaseUpgrade>()
            .add_event::<UpgradePurchased>()
            .add_systems(OnEnter(AppState::InGame), reset_upgrades)
            .add_systems(Update, purchase_upgrade_system.in_set(GameSet::Intent));
    }
}

fn reset_upgrades(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(UpgradeLevels::default());
    commands.insert_resource(Wallet::new(config.starting_coins));
}

fn purchase_upgrade_system(
    mut requests: EventReader<PurchaseUpgrade>,
    mut levels: ResMut<UpgradeLevels>,
    mut wallet: ResMut<Wallet>,
    difficulty: Res<Difficulty>,
    mut purchased: EventWriter<UpgradePurchased>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    for PurchaseUpgrade(key) in requests.read() {
        match levels.purchase(*key, &mut wallet, *difficulty) {
            Ok(cost) => {
                let level = levels.level(*key);
                info!("Bought {} level {} for {} coins", key.definition().name, level, cost);
                purchased.send(UpgradePurchased { key: *key, level, cost });
                sound_events.send(PlaySoundEvent(SoundEffect::Positive));
            }
            Err(err) => debug!("Purchase rejected: {}", err),
        }
    }
}
