use bevy::{audio::Volume, prelude::*};
use rand::Rng;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySoundEvent(pub SoundEffect);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Shot,
    Splat,
    Impact,
    ZombieDeath,
    ZombieBig,
    /// One of several growl recordings, picked at random.
    ZombieGrowl,
    WaveStart,
    Bark,
    Hurt,
    Positive,
    /// One of several coin clinks, picked at random.
    Coin,
}

const GROWL_VARIANTS: usize = 18;
const COIN_VARIANTS: usize = 56;

impl SoundEffect {
    pub fn volume(self) -> f32 {
        match self {
            SoundEffect::Shot
            | SoundEffect::Splat
            | SoundEffect::ZombieDeath
            | SoundEffect::ZombieBig
            | SoundEffect::Hurt => 0.2,
            SoundEffect::Impact | SoundEffect::ZombieGrowl => 0.1,
            SoundEffect::WaveStart => 0.3,
            SoundEffect::Bark => 1.0,
            SoundEffect::Positive => 0.32,
            SoundEffect::Coin => 0.25,
        }
    }

    /// Asset path; `variant` only matters for effects with several recordings.
    pub fn path(self, variant: usize) -> String {
        match self {
            SoundEffect::Shot => "audio/shot.wav".to_string(),
            SoundEffect::Splat => "audio/splat.flac".to_string(),
            SoundEffect::Impact => "audio/impact.flac".to_string(),
            SoundEffect::ZombieDeath => "audio/zombie_death.wav".to_string(),
            SoundEffect::ZombieBig => "audio/zombie_big.wav".to_string(),
            SoundEffect::ZombieGrowl => match variant % GROWL_VARIANTS {
                0 => "audio/growls/growl1.wav".to_string(),
                1 => "audio/growls/growl2.wav".to_string(),
                n => format!("audio/growls/monster/monster.{}.ogg", n - 1),
            },
            SoundEffect::WaveStart => "audio/wave_start.wav".to_string(),
            SoundEffect::Bark => "audio/bark.wav".to_string(),
            SoundEffect::Hurt => "audio/hurt.flac".to_string(),
            SoundEffect::Positive => "audio/positive.ogg".to_string(),
            SoundEffect::Coin => format!("audio/coins/Coins_Single_{:02}.mp3", variant % COIN_VARIANTS),
        }
    }

    fn variants(self) -> usize {
        match self {
            SoundEffect::ZombieGrowl => GROWL_VARIANTS,
            SoundEffect::Coin => COIN_VARIANTS,
            _ => 1,
        }
    }
}

/// Plays [`PlaySoundEvent`]s. Needs the asset and audio plugins.
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, play_sound_system);
    }
}

fn play_sound_system(
    mut sound_events: EventReader<PlaySoundEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
) {
    let mut rng = rand::thread_rng();
    for PlaySoundEvent(effect) in sound_events.read() {
        let variant = rng.gen_range(0..effect.variants());
        commands.spawn(AudioBundle {
            source: asset_server.load(effect.path(variant)),
            settings: PlaybackSettings::DESPAWN.with_volume(Volume::new(effect.volume())),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growl_variants_cover_both_sets() {
        assert_eq!(SoundEffect::ZombieGrowl.path(0), "audio/growls/growl1.wav");
        assert_eq!(SoundEffect::ZombieGrowl.path(2), "audio/growls/monster/monster.1.ogg");
        assert_eq!(SoundEffect::ZombieGrowl.path(17), "audio/growls/monster/monster.16.ogg");
        assert_eq!(SoundEffect::Coin.path(7), "audio/coins/Coins_Single_07.mp3");
    }
}
