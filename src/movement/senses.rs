//! Movement domain: geometric sensing of the character's surroundings.
//!
//! Every tick, before any state logic runs, the character's position and
//! facing are translated into a [`SensorSnapshot`] of environmental facts:
//! how far each foot is from the ground, whether a wall sits at hand height,
//! whether a grabbable ledge is nearby, whether the floor continues ahead.
//! All probes are total functions: a ray that hits nothing reports
//! `f32::INFINITY` or `false`, never an error.

use bevy::prelude::*;

use crate::movement::components::{Facing, KinematicBody};
use crate::movement::resources::MovementTuning;

/// What kind of surface a ray hit, derived from the collider's physics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ground,
    Climbable,
}

/// Result of a single raycast against the level geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SenseHit {
    pub distance: f32,
    pub point: Vec2,
    pub normal: Vec2,
    pub surface: Surface,
}

/// Raycast backend the sensor module queries. The game implements this over
/// avian's `SpatialQuery`; tests supply a hand-built fake world.
pub trait Raycaster {
    fn cast(&self, origin: Vec2, dir: Vec2, max_dist: f32) -> Option<SenseHit>;
}

/// A wall found at hand height in front of the character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSense {
    /// X coordinate of the wall face.
    pub x: f32,
    pub normal: Vec2,
    pub surface: Surface,
}

/// Immutable per-tick result of all geometric queries.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SensorSnapshot {
    pub left_foot_distance: f32,
    pub right_foot_distance: f32,
    pub min_foot_distance: f32,
    /// Normal of whichever foot ray hit closer; `Vec2::Y` when neither hit.
    pub ground_normal: Vec2,

    pub wall_at_hand: Option<WallSense>,
    pub wall_above_hand: bool,
    pub wall_at_crotch: bool,
    /// Top corner of a grabbable ledge: a wall exists at hand height but not
    /// above it, and the ledge's y could be localized from above.
    pub ledge: Option<Vec2>,

    /// Whether ground continues in front of each foot (forward-down rays).
    pub ground_ahead_back: bool,
    pub ground_ahead_front: bool,
    /// X coordinate of the edge when the front foot finds no ground ahead.
    pub climb_down_ledge_x: Option<f32>,
    /// Free fall distance just past the front foot's edge.
    pub forward_drop_clearance: f32,

    /// Downward clearance under the character's center.
    pub clearance_below: f32,
    /// Upward clearance above the character's head.
    pub ceiling_distance: f32,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            left_foot_distance: f32::INFINITY,
            right_foot_distance: f32::INFINITY,
            min_foot_distance: f32::INFINITY,
            ground_normal: Vec2::Y,
            wall_at_hand: None,
            wall_above_hand: false,
            wall_at_crotch: false,
            ledge: None,
            ground_ahead_back: true,
            ground_ahead_front: true,
            climb_down_ledge_x: None,
            forward_drop_clearance: 0.0,
            clearance_below: f32::INFINITY,
            ceiling_distance: f32::INFINITY,
        }
    }
}

fn ray_distance(hit: Option<SenseHit>) -> f32 {
    hit.map_or(f32::INFINITY, |h| h.distance)
}

/// Recompute the full snapshot from the current position and facing.
/// Pure with respect to its inputs: probing twice yields identical results.
pub fn probe(
    caster: &impl Raycaster,
    body: &KinematicBody,
    facing: Facing,
    tuning: &MovementTuning,
) -> SensorSnapshot {
    let mut snapshot = SensorSnapshot::default();
    let half = body.half_extents;
    let dir = facing.sign();
    let forward = Vec2::new(dir, 0.0);

    // Feet: downward rays from just inside each bottom corner.
    let foot_y = -half.y + tuning.foot_raise;
    let left_foot = body.position + Vec2::new(-half.x + tuning.foot_inset, foot_y);
    let right_foot = body.position + Vec2::new(half.x - tuning.foot_inset, foot_y);

    let left_hit = caster.cast(left_foot, Vec2::NEG_Y, tuning.sense_range);
    let right_hit = caster.cast(right_foot, Vec2::NEG_Y, tuning.sense_range);

    // Ray origins sit foot_raise above the soles; report sole-relative distances.
    snapshot.left_foot_distance = ray_distance(left_hit) - tuning.foot_raise;
    snapshot.right_foot_distance = ray_distance(right_hit) - tuning.foot_raise;
    snapshot.min_foot_distance = snapshot
        .left_foot_distance
        .min(snapshot.right_foot_distance);

    // Asymmetric terrain under the feet resolves toward the closer surface.
    snapshot.ground_normal = match (left_hit, right_hit) {
        (Some(l), Some(r)) => {
            if l.distance <= r.distance {
                l.normal
            } else {
                r.normal
            }
        }
        (Some(l), None) => l.normal,
        (None, Some(r)) => r.normal,
        (None, None) => Vec2::Y,
    };

    // Hand-height wall check, then the "no wall just above" ledge condition.
    let hand_base = body.position + Vec2::new(dir * (half.x - tuning.hand_inset), half.y - tuning.hand_drop);
    let hand_pos = hand_base - Vec2::Y * tuning.ledge_check_height * 0.5;
    let above_hand_pos = hand_base + Vec2::Y * tuning.ledge_check_height * 0.5;

    let hand_hit = caster.cast(hand_pos, forward, tuning.ledge_check_distance);
    snapshot.wall_at_hand = hand_hit.map(|h| WallSense {
        x: h.point.x,
        normal: h.normal,
        surface: h.surface,
    });
    snapshot.wall_above_hand = caster
        .cast(above_hand_pos, forward, tuning.ledge_check_distance)
        .is_some();

    let crotch_pos = body.position + Vec2::new(dir * (half.x - tuning.hand_inset), -half.y * 0.5);
    snapshot.wall_at_crotch = caster
        .cast(crotch_pos, forward, tuning.ledge_check_distance)
        .is_some();

    if let Some(wall) = snapshot.wall_at_hand
        && !snapshot.wall_above_hand
    {
        // Localize the ledge's y with a downward ray just past the wall face.
        let over_ledge = Vec2::new(wall.x + dir * 0.5, above_hand_pos.y);
        match caster.cast(over_ledge, Vec2::NEG_Y, tuning.ledge_check_height) {
            Some(top) => snapshot.ledge = Some(Vec2::new(wall.x, top.point.y)),
            None => {
                debug!("wall at hand height but no ledge top found");
            }
        }
    }

    // Floor continuation: forward-down angled rays from each foot.
    let slant = (forward + Vec2::NEG_Y).normalize();
    let check_len = half.x * 2.0;
    let (front_foot, back_foot) = if dir > 0.0 {
        (right_foot, left_foot)
    } else {
        (left_foot, right_foot)
    };
    snapshot.ground_ahead_front = caster.cast(front_foot, slant, check_len).is_some();
    snapshot.ground_ahead_back = caster.cast(back_foot, slant, check_len).is_some();

    if !snapshot.ground_ahead_front {
        // No floor ahead: locate the edge's x for precise foot placement,
        // and measure the drop beyond it.
        let edge_probe = front_foot + forward * half.x;
        snapshot.climb_down_ledge_x = caster
            .cast(edge_probe, -forward, half.x * 2.0)
            .map(|h| h.point.x)
            .or_else(|| {
                // Clean edge with nothing to hit sideways: fall back to the
                // collider's front face.
                Some(body.position.x + dir * half.x)
            });
        snapshot.forward_drop_clearance =
            ray_distance(caster.cast(edge_probe, Vec2::NEG_Y, tuning.sense_range));
    }

    snapshot.clearance_below = ray_distance(caster.cast(
        body.position,
        Vec2::NEG_Y,
        tuning.sense_range,
    )) - half.y;

    let head = body.position + Vec2::Y * half.y;
    snapshot.ceiling_distance = ray_distance(caster.cast(head, Vec2::Y, tuning.sense_range));

    snapshot
}
