//! Movement domain: the per-tick controller step and physics writeback.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::abilities::AbilitySet;
use crate::movement::components::{BodySize, Facing, KinematicBody, Player};
use crate::movement::controller::MovementController;
use crate::movement::resources::{MovementInput, MovementTuning};
use crate::movement::senses::SensorSnapshot;
use crate::movement::systems::collisions::collider_half_extents;

/// Copy kinematic state out of the physics components, run one controller
/// tick against the current snapshot, and write the results back. The
/// controller owns velocity and (for the ledge lerp states) position; avian
/// remains the only thing integrating velocity into position.
pub(crate) fn apply_locomotion(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    mut commands: Commands,
    mut query: Query<
        (
            Entity,
            &mut Transform,
            &mut LinearVelocity,
            &Collider,
            &BodySize,
            &AbilitySet,
            &SensorSnapshot,
            &mut MovementController,
            &mut Sprite,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (
        entity,
        mut transform,
        mut velocity,
        collider,
        body_size,
        abilities,
        snapshot,
        mut controller,
        mut sprite,
    ) in &mut query
    {
        let was_crouched = controller.crouched();

        let mut body = KinematicBody {
            position: transform.translation.truncate(),
            velocity: Vec2::new(velocity.x, velocity.y),
            half_extents: collider_half_extents(collider),
        };

        controller.tick(&mut body, snapshot, &input, abilities, &tuning, dt);

        velocity.x = body.velocity.x;
        velocity.y = body.velocity.y;
        transform.translation.x = body.position.x;
        transform.translation.y = body.position.y;

        sprite.flip_x = controller.facing() == Facing::Left;

        // Crouch toggles swap the collider between full and reduced height.
        // The body center shifts so the soles stay planted on the floor.
        if controller.crouched() != was_crouched {
            let full = body_size.half_extents;
            let height = if controller.crouched() {
                full.y * 2.0 * tuning.crouch_height_factor
            } else {
                full.y * 2.0
            };
            let center_shift = full.y - height / 2.0;
            if controller.crouched() {
                transform.translation.y -= center_shift;
            } else {
                transform.translation.y += center_shift;
            }
            commands
                .entity(entity)
                .insert(Collider::rectangle(full.x * 2.0, height));
        }
    }
}
