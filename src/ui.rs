use bevy::prelude::*;

use crate::{
    components::delta_ms,
    difficulty::Difficulty,
    game::{AppState, GameOverSummary, StartRun},
    hud::{HudQuery, UpgradeRow},
    upgrades::{PurchaseUpgrade, UpgradeKey},
    waves::WaveAnnouncement,
};

const FONT_PATH: &str = "fonts/FiraSans-Bold.ttf";
const TITLE_LIFETIME_MS: f32 = 2500.0;
const TITLE_FADE_START_MS: f32 = 2000.0;
const MENU_KEYS: [KeyCode; 5] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
];
const AFFORDABLE_COLOR: Color = Color::rgba(0.15, 0.35, 0.15, 0.8);
const UNAFFORDABLE_COLOR: Color = Color::rgba(0.2, 0.2, 0.2, 0.8);

#[derive(Component)]
pub struct MainMenuUI;

#[derive(Component)]
pub struct InGameUI;

#[derive(Component)]
pub struct GameOverUI;

#[derive(Component)]
struct StatusText;

/// One row of the upgrade panel. Clicking buys the upgrade.
#[derive(Component, Debug, Clone, Copy)]
pub struct UpgradeButton(pub UpgradeKey);

#[derive(Component)]
struct UpgradeButtonText(UpgradeKey);

#[derive(Component, Debug, Default)]
pub struct WaveTitle {
    pub lifetime_ms: f32,
}

pub struct GameUiPlugin;

impl Plugin for GameUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::MainMenu), setup_main_menu_ui)
            .add_systems(OnExit(AppState::MainMenu), despawn_ui_by_marker::<MainMenuUI>)
            .add_systems(Update, main_menu_input_system.run_if(in_state(AppState::MainMenu)))
            .add_systems(OnEnter(AppState::InGame), setup_ingame_ui)
            .add_systems(OnExit(AppState::InGame), despawn_ui_by_marker::<InGameUI>)
            .add_systems(
                Update,
                (
                    update_status_text_system,
                    update_upgrade_buttons_system,
                    upgrade_button_click_system,
                    spawn_wave_title_system,
                    wave_title_fade_system,
                )
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnEnter(AppState::GameOver), setup_game_over_ui)
            .add_systems(OnExit(AppState::GameOver), despawn_ui_by_marker::<GameOverUI>)
            .add_systems(Update, game_over_input_system.run_if(in_state(AppState::GameOver)));
    }
}

pub fn wave_title(announcement: WaveAnnouncement) -> String {
    match announcement {
        WaveAnnouncement::Started(wave) => format!("Wave {}", wave),
        WaveAnnouncement::Completed(wave) => format!("Wave {} Complete", wave),
    }
}

pub fn upgrade_label(row: &UpgradeRow) -> String {
    let definition = row.key.definition();
    format!(
        "({}) {} Lv {}\n{}\nCost: {}",
        row.key.index() + 1,
        definition.name,
        row.level,
        definition.description,
        row.cost
    )
}

/// Opacity of a title `lifetime_ms` after it appeared, or `None` once it is gone.
pub fn title_opacity(lifetime_ms: f32) -> Option<f32> {
    if lifetime_ms > TITLE_LIFETIME_MS {
        return None;
    }
    let fading = (lifetime_ms - TITLE_FADE_START_MS).max(0.0);
    Some(1.0 - fading / (TITLE_LIFETIME_MS - TITLE_FADE_START_MS))
}

fn text_style(asset_server: &AssetServer, font_size: f32, color: Color) -> TextStyle {
    TextStyle { font: asset_server.load(FONT_PATH), font_size, color }
}

fn despawn_ui_by_marker<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

fn setup_main_menu_ui(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(20.0),
                    ..default()
                },
                ..default()
            },
            MainMenuUI,
        ))
        .with_children(|parent| {
            parent.spawn(
                TextBundle::from_section("Zombies!", text_style(&asset_server, 70.0, Color::WHITE))
                    .with_text_justify(JustifyText::Center),
            );
            parent.spawn(
                TextBundle::from_section(
                    "Choose a difficulty",
                    text_style(&asset_server, 32.0, Color::rgba(0.8, 0.8, 0.8, 1.0)),
                )
                .with_text_justify(JustifyText::Center),
            );
            for (index, difficulty) in Difficulty::ALL.iter().enumerate() {
                parent.spawn(
                    TextBundle::from_section(
                        format!("({}) {}", index + 1, difficulty.label()),
                        text_style(&asset_server, 28.0, Color::WHITE),
                    )
                    .with_text_justify(JustifyText::Center),
                );
            }
        });
}

fn main_menu_input_system(keyboard: Res<ButtonInput<KeyCode>>, mut requests: EventWriter<StartRun>) {
    for (code, difficulty) in MENU_KEYS.iter().zip(Difficulty::ALL) {
        if keyboard.just_pressed(*code) {
            requests.send(StartRun { difficulty });
        }
    }
}

fn setup_ingame_ui(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::SpaceBetween,
                    padding: UiRect::all(Val::Px(10.0)),
                    position_type: PositionType::Absolute,
                    ..default()
                },
                z_index: ZIndex::Global(1),
                ..default()
            },
            InGameUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                TextBundle::from_section("", text_style(&asset_server, 24.0, Color::WHITE)),
                StatusText,
            ));
            parent
                .spawn(NodeBundle {
                    style: Style {
                        flex_direction: FlexDirection::Row,
                        flex_wrap: FlexWrap::Wrap,
                        column_gap: Val::Px(8.0),
                        row_gap: Val::Px(8.0),
                        ..default()
                    },
                    ..default()
                })
                .with_children(|panel| {
                    for key in UpgradeKey::ALL {
                        panel
                            .spawn((
                                ButtonBundle {
                                    style: Style {
                                        width: Val::Px(200.0),
                                        padding: UiRect::all(Val::Px(6.0)),
                                        flex_direction: FlexDirection::Column,
                                        ..default()
                                    },
                                    background_color: UNAFFORDABLE_COLOR.into(),
                                    ..default()
                                },
                                UpgradeButton(key),
                                Name::new(format!("Upgrade {}", key.definition().name)),
                            ))
                            .with_children(|button| {
                                button.spawn((
                                    TextBundle::from_section("", text_style(&asset_server, 16.0, Color::WHITE)),
                                    UpgradeButtonText(key),
                                ));
                            });
                    }
                });
        });
}

fn update_status_text_system(hud: HudQuery, mut texts: Query<&mut Text, With<StatusText>>) {
    let snapshot = hud.snapshot();
    let wave_line = if snapshot.wave_active {
        format!("Wave {} | Zombies: {}", snapshot.wave, snapshot.zombies_remaining)
    } else {
        format!("Wave {} incoming", snapshot.wave + 1)
    };
    for mut text in texts.iter_mut() {
        text.sections[0].value = format!(
            "{}\nScore: {}\nCoins: {}",
            wave_line,
            snapshot.score,
            snapshot.coins.floor()
        );
    }
}

fn update_upgrade_buttons_system(
    hud: HudQuery,
    mut buttons: Query<(&UpgradeButton, &mut BackgroundColor)>,
    mut texts: Query<(&UpgradeButtonText, &mut Text)>,
) {
    let snapshot = hud.snapshot();
    for (button, mut background) in buttons.iter_mut() {
        if let Some(row) = snapshot.upgrades.iter().find(|row| row.key == button.0) {
            *background = if row.affordable { AFFORDABLE_COLOR } else { UNAFFORDABLE_COLOR }.into();
        }
    }
    for (label, mut text) in texts.iter_mut() {
        let Some(row) = snapshot.upgrades.iter().find(|row| row.key == label.0) else {
            continue;
        };
        text.sections[0].value = upgrade_label(row);
    }
}

fn upgrade_button_click_system(
    buttons: Query<(&Interaction, &UpgradeButton), Changed<Interaction>>,
    mut purchases: EventWriter<PurchaseUpgrade>,
) {
    for (interaction, button) in buttons.iter() {
        if *interaction == Interaction::Pressed {
            purchases.send(PurchaseUpgrade(button.0));
        }
    }
}

fn spawn_wave_title_system(
    mut commands: Commands,
    mut announcements: EventReader<WaveAnnouncement>,
    asset_server: Res<AssetServer>,
) {
    for announcement in announcements.read() {
        commands
            .spawn((
                NodeBundle {
                    style: Style {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        position_type: PositionType::Absolute,
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    z_index: ZIndex::Global(5),
                    ..default()
                },
                WaveTitle::default(),
                InGameUI,
            ))
            .with_children(|parent| {
                parent.spawn(TextBundle::from_section(
                    wave_title(*announcement),
                    text_style(&asset_server, 100.0, Color::WHITE),
                ));
            });
    }
}

fn wave_title_fade_system(
    mut commands: Commands,
    time: Res<Time>,
    mut titles: Query<(Entity, &mut WaveTitle, &Children)>,
    mut texts: Query<&mut Text>,
) {
    let dt_ms = delta_ms(&time);
    for (entity, mut title, children) in titles.iter_mut() {
        title.lifetime_ms += dt_ms;
        let Some(opacity) = title_opacity(title.lifetime_ms) else {
            commands.entity(entity).despawn_recursive();
            continue;
        };
        for &child in children.iter() {
            if let Ok(mut text) = texts.get_mut(child) {
                for section in text.sections.iter_mut() {
                    section.style.color.set_a(opacity);
                }
            }
        }
    }
}

fn setup_game_over_ui(
    mut commands: Commands,
    summary: Option<Res<GameOverSummary>>,
    asset_server: Res<AssetServer>,
) {
    let (score, difficulty) = summary.map_or((0, Difficulty::default()), |summary| (summary.score, summary.difficulty));
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(20.0),
                    ..default()
                },
                ..default()
            },
            GameOverUI,
        ))
        .with_children(|parent| {
            parent.spawn(
                TextBundle::from_section("Game Over", text_style(&asset_server, 80.0, Color::RED))
                    .with_text_justify(JustifyText::Center),
            );
            parent.spawn(
                TextBundle::from_section(format!("Score: {}", score), text_style(&asset_server, 50.0, Color::WHITE))
                    .with_text_justify(JustifyText::Center),
            );
            parent.spawn(
                TextBundle::from_section(
                    format!("Difficulty: {}", difficulty),
                    text_style(&asset_server, 36.0, Color::WHITE),
                )
                .with_text_justify(JustifyText::Center),
            );
            parent.spawn(
                TextBundle::from_section(
                    "Restart (R)",
                    text_style(&asset_server, 40.0, Color::rgba(0.8, 0.8, 0.8, 1.0)),
                )
                .with_text_justify(JustifyText::Center),
            );
        });
}

fn game_over_input_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    difficulty: Res<Difficulty>,
    mut requests: EventWriter<StartRun>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        info!("Restarting on {}", *difficulty);
        requests.send(StartRun { difficulty: *difficulty });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_hold_then_fade() {
        assert_eq!(title_opacity(0.0), Some(1.0));
        assert_eq!(title_opacity(2000.0), Some(1.0));
        let fading = title_opacity(2250.0).unwrap_or_default();
        assert!((fading - 0.5).abs() < 1e-5);
        assert_eq!(title_opacity(2600.0), None);
    }

    #[test]
    fn title_text_names_the_wave() {
        assert_eq!(wave_title(WaveAnnouncement::Started(3)), "Wave 3");
        assert_eq!(wave_title(WaveAnnouncement::Completed(3)), "Wave 3 Complete");
    }

    #[test]
    fn upgrade_label_shows_the_description() {
        let row = UpgradeRow { key: UpgradeKey::Burst, level: 2, cost: 40, affordable: false };
        assert_eq!(
            upgrade_label(&row),
            "(8) Burst Shots Lv 2\nShoot multiple shots at once\nCost: 40"
        );
    }
}
