use bevy::prelude::*;

use crate::{
    health::Health,
    player::Player,
    upgrades::{UpgradeKey, UpgradeLevels},
    waves::WaveDirector,
    GameSet,
};

const BOOST_WAVE: u32 = 20;
const BOOST_LEVELS: u32 = 20;
const BOOSTED_UPGRADES: [UpgradeKey; 5] = [
    UpgradeKey::CoinMultiplier,
    UpgradeKey::MaxPlayerHealth,
    UpgradeKey::BulletDamage,
    UpgradeKey::FireRate,
    UpgradeKey::BulletPiercing,
];
const KILL_DAMAGE: f32 = 10000.0;

/// Whether the debug keys are live. Off unless the binary is started with `--debug`.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugMode(pub bool);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    /// Jump to a late wave with a stack of free upgrades.
    Boost,
    KillPlayer,
}

pub struct DebugMenuPlugin;

impl Plugin for DebugMenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugMode>()
            .add_event::<DebugCommand>()
            .add_systems(Update, debug_command_system.in_set(GameSet::Intent));
    }
}

pub fn apply_boost(director: &mut WaveDirector, levels: &mut UpgradeLevels) {
    director.wave = BOOST_WAVE;
    for key in BOOSTED_UPGRADES {
        levels.grant(key, BOOST_LEVELS);
    }
}

fn debug_command_system(
    mut commands_in: EventReader<DebugCommand>,
    mut director: ResMut<WaveDirector>,
    mut levels: ResMut<UpgradeLevels>,
    mut player_query: Query<&mut Health, With<Player>>,
) {
    for command in commands_in.read() {
        match command {
            DebugCommand::Boost => {
                apply_boost(&mut director, &mut levels);
                warn!("Debug boost: wave {} with {} free levels", director.wave, levels.total());
            }
            DebugCommand::KillPlayer => {
                for mut health in player_query.iter_mut() {
                    health.damage(KILL_DAMAGE);
                }
                warn!("Debug kill");
            }
        }
    }
}
