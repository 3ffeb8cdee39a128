use std::path::PathBuf;

use bevy::prelude::*;
use bevy_hanabi::HanabiPlugin;
use clap::Parser;

use zombie_game::{
    audio::GameAudioPlugin,
    camera_systems::CameraSystemsPlugin,
    config::GameConfig,
    debug_menu::DebugMode,
    difficulty::Difficulty,
    game::StartRun,
    input::InputPlugin,
    ui::GameUiPlugin,
    visual_effects::VisualEffectsPlugin,
    ZombieGamePlugin,
};

const SCREEN_WIDTH: f32 = 1280.0;
const SCREEN_HEIGHT: f32 = 720.0;

#[derive(Parser, Debug)]
#[command(name = "zombie_game", about = "Top-down zombie survival shooter")]
struct Opt {
    /// Skip the main menu and start right away on this difficulty.
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,
    /// RON file overriding the default tunables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for reproducible runs. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Enable the boost (I) and kill (K) keys.
    #[arg(long)]
    debug: bool,
}

fn load_config(opt: &Opt) -> GameConfig {
    let mut config = match &opt.config {
        Some(path) => GameConfig::load(path).unwrap_or_else(|err| {
            warn!("Falling back to default config: {}", err);
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };
    if opt.seed.is_some() {
        config.rng_seed = opt.seed;
    }
    config
}

fn main() {
    let opt = Opt::parse();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Zombies".into(),
            resolution: (SCREEN_WIDTH, SCREEN_HEIGHT).into(),
            resizable: false,
            ..default()
        }),
        ..default()
    }));

    let config = load_config(&opt);
    info!("Config: {:?}", config);
    app.insert_resource(config)
        .insert_resource(DebugMode(opt.debug))
        .add_plugins(HanabiPlugin)
        .add_plugins(ZombieGamePlugin)
        .add_plugins((
            GameAudioPlugin,
            CameraSystemsPlugin,
            VisualEffectsPlugin,
            GameUiPlugin,
            InputPlugin,
        ));

    if let Some(difficulty) = opt.difficulty {
        app.add_systems(Startup, move |mut requests: EventWriter<StartRun>| {
            requests.send(StartRun { difficulty });
        });
    }

    app.run();
}
