//! Movement domain: snapshot recomputation against the physics world.
//!
//! The sensor math itself lives in `senses.rs` and is backend-agnostic; this
//! module adapts avian's `SpatialQuery` to the [`Raycaster`] trait and
//! refreshes each player's [`SensorSnapshot`] before the locomotion tick.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::components::{ClimbableWall, GameLayer, KinematicBody, Player};
use crate::movement::controller::MovementController;
use crate::movement::resources::MovementTuning;
use crate::movement::senses::{self, Raycaster, SenseHit, SensorSnapshot, Surface};

/// `Raycaster` over avian's spatial query pipeline. Only the level layers
/// are solid to the senses; the hit surface kind comes from whether the hit
/// entity carries the [`ClimbableWall`] marker.
pub(crate) struct AvianCaster<'a, 'w, 's> {
    pub spatial: &'a SpatialQuery<'w, 's>,
    pub climbable: &'a Query<'w, 's, (), With<ClimbableWall>>,
}

impl Raycaster for AvianCaster<'_, '_, '_> {
    fn cast(&self, origin: Vec2, dir: Vec2, max_dist: f32) -> Option<SenseHit> {
        let dir = Dir2::new(dir).ok()?;
        let filter = SpatialQueryFilter::from_mask([GameLayer::Ground, GameLayer::Climbable]);

        let hit = self.spatial.cast_ray(origin, dir, max_dist, true, &filter)?;

        let surface = if self.climbable.contains(hit.entity) {
            Surface::Climbable
        } else {
            Surface::Ground
        };

        Some(SenseHit {
            distance: hit.distance,
            point: origin + *dir * hit.distance,
            normal: hit.normal,
            surface,
        })
    }
}

pub(crate) fn collider_half_extents(collider: &Collider) -> Vec2 {
    match collider.shape_scaled().as_cuboid() {
        Some(c) => Vec2::new(c.half_extents.x, c.half_extents.y),
        None => Vec2::new(12.0, 24.0),
    }
}

/// Recompute every player's sensor snapshot from its current position and
/// facing. Runs before `apply_locomotion`, so state logic always sees facts
/// about the position the last physics step produced.
pub(crate) fn sense_environment(
    spatial_query: SpatialQuery,
    climbable: Query<(), With<ClimbableWall>>,
    tuning: Res<MovementTuning>,
    mut query: Query<
        (
            &Transform,
            &Collider,
            &MovementController,
            &mut SensorSnapshot,
        ),
        With<Player>,
    >,
) {
    let caster = AvianCaster {
        spatial: &spatial_query,
        climbable: &climbable,
    };

    for (transform, collider, controller, mut snapshot) in &mut query {
        let body = KinematicBody {
            position: transform.translation.truncate(),
            velocity: Vec2::ZERO,
            half_extents: collider_half_extents(collider),
        };
        *snapshot = senses::probe(&caster, &body, controller.facing(), &tuning);
    }
}
