//! Movement domain: tuning and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// All movement behavior constants, loadable from `assets/data/movement.ron`.
///
/// The grounded-distance fields deserve a note: landing on uneven geometry
/// makes a single raycast flicker between hit and miss from tick to tick, so
/// groundedness is a three-tier classification instead of one boolean.
/// `grounded_foot_distance` is the tight tier that feeds the on-ground grace
/// timer; `jump_queue_foot_distance` is the loose tier where a jump press is
/// queued and executed on landing; anything beyond is plain airborne.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    // Ground locomotion
    pub run_speed: f32,
    pub run_accel: f32,
    pub decel: f32,
    /// Deceleration used instead of `run_accel` when input opposes current
    /// velocity, so stops and reversals feel snappy.
    pub run_dir_change_decel: f32,
    /// Factor applied to horizontal velocity on landing with no input held.
    pub landing_assist_factor: f32,

    // Air locomotion
    pub air_accel: f32,
    /// Per-tick multiplicative drag, applied only while ascending slower
    /// than the short-jump speed with meaningful horizontal velocity.
    pub air_drag: f32,
    /// Horizontal speed below which air drag no longer applies.
    pub air_drag_min_speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,

    // Jumping
    pub jump_velocity: f32,
    /// Upward velocity cap applied when the jump button is released early.
    pub short_jump_velocity: f32,
    pub double_jump_factor: f32,

    // Walls
    pub wall_slide_speed: f32,
    pub wall_run_gravity_factor: f32,
    pub wall_jump_horizontal: f32,
    pub wall_jump_vertical: f32,
    pub wall_release_grace: f32,
    pub input_delay_after_wall_jump: f32,
    pub climb_speed: f32,

    // Grounded classification (see type-level docs)
    pub grounded_foot_distance: f32,
    pub jump_queue_foot_distance: f32,
    pub ground_grace: f32,
    pub air_grace: f32,

    // Sensing geometry
    pub sense_range: f32,
    pub foot_inset: f32,
    pub foot_raise: f32,
    pub hand_inset: f32,
    pub hand_drop: f32,
    pub ledge_check_height: f32,
    pub ledge_check_distance: f32,
    /// Minimum clearance under the character before a ledge grab is allowed;
    /// prevents grabbing ledges that are really just steps.
    pub ledge_grab_min_clearance: f32,
    /// Minimum drop past the edge before climbing down is allowed; prevents
    /// climbing down onto a platform directly below.
    pub climb_down_min_clearance: f32,

    // Ledge handling
    pub ledge_climb_threshold: f32,
    pub ledge_grab_lerp: f32,
    pub ledge_climb_lerp: f32,
    pub arrive_epsilon: f32,
    /// Fraction of run speed granted when holding run as a ledge climb ends.
    pub run_exit_boost: f32,

    // Crouching
    pub duck_speed_factor: f32,
    pub crouch_height_factor: f32,
    pub stand_up_margin: f32,

    // Dashing
    pub dash_speed: f32,
    pub dash_time: f32,
    pub dash_cooldown: f32,

    pub input_deadzone: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            run_speed: 320.0,
            run_accel: 3000.0,
            decel: 2600.0,
            run_dir_change_decel: 9000.0,
            landing_assist_factor: 0.5,

            air_accel: 1600.0,
            air_drag: 0.96875,
            air_drag_min_speed: 40.0,
            gravity: 1800.0,
            max_fall_speed: 1400.0,

            jump_velocity: 680.0,
            short_jump_velocity: 440.0,
            double_jump_factor: 0.75,

            wall_slide_speed: 160.0,
            wall_run_gravity_factor: 0.75,
            wall_jump_horizontal: 320.0,
            wall_jump_vertical: 680.0,
            wall_release_grace: 0.2,
            input_delay_after_wall_jump: 0.5,
            climb_speed: 180.0,

            grounded_foot_distance: 7.0,
            jump_queue_foot_distance: 18.0,
            ground_grace: 0.025,
            air_grace: 0.025,

            sense_range: 240.0,
            foot_inset: 4.0,
            foot_raise: 2.0,
            hand_inset: 4.0,
            hand_drop: 2.0,
            ledge_check_height: 10.0,
            ledge_check_distance: 14.0,
            ledge_grab_min_clearance: 36.0,
            climb_down_min_clearance: 96.0,

            ledge_climb_threshold: 0.5,
            ledge_grab_lerp: 30.0,
            ledge_climb_lerp: 15.0,
            arrive_epsilon: 3.0,
            run_exit_boost: 0.5,

            duck_speed_factor: 0.5,
            crouch_height_factor: 0.5,
            stand_up_margin: 4.0,

            dash_speed: 900.0,
            dash_time: 0.16,
            dash_cooldown: 0.35,

            input_deadzone: 0.1,
        }
    }
}

impl MovementTuning {
    /// Apex height of a full ground jump: h = v^2 / (2g).
    pub fn single_jump_height(&self) -> f32 {
        self.jump_velocity * self.jump_velocity / (2.0 * self.gravity)
    }
}

/// Input sampled once per frame and consumed by the movement controller.
#[derive(Resource, Debug, Clone, Default)]
pub struct MovementInput {
    pub axis: Vec2,
    pub jump_just_pressed: bool,
    pub jump_held: bool,
    pub jump_just_released: bool,
    pub duck_held: bool,
    pub dash_just_pressed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_jump_height_matches_kinematics() {
        let tuning = MovementTuning {
            jump_velocity: 600.0,
            gravity: 1800.0,
            ..default()
        };
        assert!((tuning.single_jump_height() - 100.0).abs() < 1e-3);
    }
}
