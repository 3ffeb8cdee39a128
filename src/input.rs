use bevy::{prelude::*, window::PrimaryWindow};

use crate::{
    camera_systems::MainCamera,
    debug_menu::{DebugCommand, DebugMode},
    dog::DogOrder,
    game::AppState,
    player::PlayerIntent,
    ui::UpgradeButton,
    upgrades::{PurchaseUpgrade, UpgradeKey},
    GameSet,
};

const UPGRADE_KEYS: [KeyCode; 8] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
];

/// Turns keyboard and mouse state into gameplay intents and events.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                player_intent_system,
                upgrade_hotkey_system,
                dog_order_input_system,
                debug_input_system.run_if(resource_equals(DebugMode(true))),
            )
                .before(GameSet::Intent)
                .run_if(in_state(AppState::InGame)),
        );
    }
}

/// Movement axes from WASD / arrow keys, unnormalized.
pub fn movement_axis(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let mut axis = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        axis.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        axis.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        axis.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        axis.x += 1.0;
    }
    axis
}

fn cursor_world_position(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) -> Option<Vec2> {
    let cursor = windows.get_single().ok()?.cursor_position()?;
    let (camera, camera_transform) = cameras.get_single().ok()?;
    camera.viewport_to_world_2d(camera_transform, cursor)
}

fn player_intent_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    buttons: Query<&Interaction, With<UpgradeButton>>,
    mut intent: ResMut<PlayerIntent>,
) {
    intent.movement = movement_axis(&keyboard);
    if let Some(aim) = cursor_world_position(&windows, &cameras) {
        intent.aim = aim;
    }
    intent.trigger = mouse.pressed(MouseButton::Left) || keyboard.pressed(KeyCode::Space);
    intent.pointer_over_ui = buttons.iter().any(|interaction| *interaction != Interaction::None);
}

fn upgrade_hotkey_system(keyboard: Res<ButtonInput<KeyCode>>, mut purchases: EventWriter<PurchaseUpgrade>) {
    for (code, key) in UPGRADE_KEYS.iter().zip(UpgradeKey::ALL) {
        if keyboard.just_pressed(*code) {
            purchases.send(PurchaseUpgrade(key));
        }
    }
}

fn dog_order_input_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut orders: EventWriter<DogOrder>,
) {
    if keyboard.just_pressed(KeyCode::KeyQ) {
        if let Some(point) = cursor_world_position(&windows, &cameras) {
            orders.send(DogOrder::Stay(point));
        }
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        orders.send(DogOrder::Follow);
    }
}

fn debug_input_system(keyboard: Res<ButtonInput<KeyCode>>, mut commands_out: EventWriter<DebugCommand>) {
    if keyboard.just_pressed(KeyCode::KeyI) {
        commands_out.send(DebugCommand::Boost);
    }
    if keyboard.just_pressed(KeyCode::KeyK) {
        commands_out.send(DebugCommand::KillPlayer);
    }
}
