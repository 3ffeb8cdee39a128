use bevy::prelude::*;

use crate::{
    components::{delta_ms, planar},
    game::AppState,
    physics::REFERENCE_STEP_MS,
    player::Player,
};

/// Catch-up per reference step, scaled by the squared distance to the player.
const CAMERA_PULL: f32 = 0.001;
const CAMERA_Z: f32 = 999.0;

#[derive(Component)]
pub struct MainCamera;

pub struct CameraSystemsPlugin;

impl Plugin for CameraSystemsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, soft_camera_follow_system.run_if(in_state(AppState::InGame)));
    }
}

/// How far the camera moves toward the player this tick. Never overshoots.
pub fn camera_step(camera: Vec2, player: Vec2, dt_ms: f32) -> Vec2 {
    let offset = player - camera;
    let distance = offset.length();
    let pull = (CAMERA_PULL * distance * distance * dt_ms / REFERENCE_STEP_MS).min(distance);
    offset.normalize_or_zero() * pull
}

fn setup_camera(mut commands: Commands) {
    let mut camera_bundle = Camera2dBundle::default();
    camera_bundle.transform.translation.z = CAMERA_Z;
    commands.spawn((camera_bundle, MainCamera));
}

fn soft_camera_follow_system(
    time: Res<Time>,
    player_query: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut camera_query: Query<&mut Transform, (With<MainCamera>, Without<Player>)>,
) {
    let (Ok(player_transform), Ok(mut camera_transform)) =
        (player_query.get_single(), camera_query.get_single_mut())
    else {
        return;
    };
    let step = camera_step(planar(&camera_transform), planar(player_transform), delta_ms(&time));
    camera_transform.translation += step.extend(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_never_overshoots() {
        let step = camera_step(Vec2::ZERO, Vec2::new(5000.0, 0.0), 100.0);
        assert_eq!(step, Vec2::new(5000.0, 0.0));
    }

    #[test]
    fn camera_lags_when_close() {
        let step = camera_step(Vec2::ZERO, Vec2::new(10.0, 0.0), REFERENCE_STEP_MS);
        assert!((step.x - 0.1).abs() < 1e-5);
    }
}
