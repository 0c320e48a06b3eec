//! Movement domain: player spawn.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::abilities::AbilitySet;
use crate::movement::components::{BodySize, GameLayer, Player};
use crate::movement::controller::MovementController;
use crate::movement::resources::MovementTuning;
use crate::movement::senses::SensorSnapshot;

const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 48.0);

pub(crate) fn spawn_player(mut commands: Commands, tuning: Res<MovementTuning>) {
    info!(
        "Spawning player: run_speed={}, jump_velocity={}, jump_height={:.1}",
        tuning.run_speed,
        tuning.jump_velocity,
        tuning.single_jump_height()
    );

    commands.spawn((
        // Identity & movement
        (
            Player,
            MovementController::new(&tuning),
            SensorSnapshot::default(),
            AbilitySet::default(),
            BodySize {
                half_extents: PLAYER_SIZE / 2.0,
            },
        ),
        // Rendering
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(PLAYER_SIZE),
            ..default()
        },
        Transform::from_xyz(0.0, 100.0, 0.0),
        // Physics
        (
            RigidBody::Dynamic,
            Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(0.0), // gravity is applied by the controller
            Friction::new(0.0),
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::Player,
                [GameLayer::Ground, GameLayer::Climbable, GameLayer::Pickup],
            ),
        ),
    ));
}
