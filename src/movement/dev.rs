//! Movement domain: dev arena and debug-only sensor overlay.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::components::{ClimbableWall, GameLayer, Ground};
#[cfg(feature = "dev-tools")]
use crate::movement::components::{Player, KinematicBody};
#[cfg(feature = "dev-tools")]
use crate::movement::controller::MovementController;
#[cfg(feature = "dev-tools")]
use crate::movement::resources::MovementTuning;
use crate::pickups::Pickup;
use crate::movement::abilities::AbilityKind;

fn solid(size: Vec2, pos: Vec2, color: Color) -> impl Bundle {
    (
        Ground,
        Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(pos.x, pos.y, 0.0),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]),
    )
}

/// A hand-built test arena: a floor with a drop on each end, a grabbable
/// platform, a tall wall for wall jumps, a climbable wall, and one pickup
/// per ability.
pub(crate) fn spawn_dev_arena(mut commands: Commands) {
    let ground_color = Color::srgb(0.3, 0.3, 0.35);
    let climb_color = Color::srgb(0.35, 0.5, 0.35);

    // Main floor
    commands.spawn(solid(
        Vec2::new(1600.0, 40.0),
        Vec2::new(0.0, -200.0),
        ground_color,
    ));

    // Grabbable platform: tall enough that its top edge reads as a ledge.
    commands.spawn(solid(
        Vec2::new(240.0, 160.0),
        Vec2::new(420.0, -100.0),
        ground_color,
    ));

    // Low step: too little clearance beneath to ever count as a ledge.
    commands.spawn(solid(
        Vec2::new(160.0, 24.0),
        Vec2::new(-300.0, -168.0),
        ground_color,
    ));

    // Tall wall for wall slides and wall jumps.
    commands.spawn(solid(
        Vec2::new(40.0, 480.0),
        Vec2::new(780.0, 60.0),
        ground_color,
    ));

    // Climbable wall on the far left.
    commands.spawn((
        ClimbableWall,
        Sprite {
            color: climb_color,
            custom_size: Some(Vec2::new(40.0, 480.0)),
            ..default()
        },
        Transform::from_xyz(-780.0, 60.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(40.0, 480.0),
        CollisionLayers::new(GameLayer::Climbable, [GameLayer::Player]),
    ));

    // One pickup per ability, spread along the floor.
    for (i, kind) in [
        AbilityKind::DoubleJump,
        AbilityKind::WallJump,
        AbilityKind::WallCling,
        AbilityKind::Dash,
    ]
    .into_iter()
    .enumerate()
    {
        commands.spawn(Pickup::bundle(
            kind,
            Vec2::new(-120.0 + i as f32 * 80.0, -160.0),
        ));
    }

    info!("Dev arena spawned");
}

/// Sensor ray overlay, the in-engine equivalent of the usual printf: feet in
/// yellow, hand checks in magenta/cyan.
#[cfg(feature = "dev-tools")]
pub(crate) fn draw_sensor_gizmos(
    mut gizmos: Gizmos,
    tuning: Res<MovementTuning>,
    query: Query<(&Transform, &Collider, &MovementController), With<Player>>,
) {
    for (transform, collider, controller) in &query {
        let half = super::systems::collisions::collider_half_extents(collider);
        let body = KinematicBody {
            position: transform.translation.truncate(),
            velocity: Vec2::ZERO,
            half_extents: half,
        };
        let dir = controller.facing().sign();
        let forward = Vec2::new(dir, 0.0);

        let foot_y = -half.y + tuning.foot_raise;
        for foot_x in [-half.x + tuning.foot_inset, half.x - tuning.foot_inset] {
            let foot = body.position + Vec2::new(foot_x, foot_y);
            gizmos.line_2d(
                foot,
                foot + Vec2::NEG_Y * tuning.grounded_foot_distance,
                Color::srgb(1.0, 1.0, 0.0),
            );
        }

        let hand_base =
            body.position + Vec2::new(dir * (half.x - tuning.hand_inset), half.y - tuning.hand_drop);
        let hand = hand_base - Vec2::Y * tuning.ledge_check_height * 0.5;
        let above = hand_base + Vec2::Y * tuning.ledge_check_height * 0.5;
        gizmos.line_2d(
            hand,
            hand + forward * tuning.ledge_check_distance,
            Color::srgb(1.0, 0.0, 1.0),
        );
        gizmos.line_2d(
            above,
            above + forward * tuning.ledge_check_distance,
            Color::srgb(0.0, 1.0, 1.0),
        );
    }
}
