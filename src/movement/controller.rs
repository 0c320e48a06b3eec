//! Movement domain: the per-tick locomotion state machine.
//!
//! The controller owns the character's kinematic intent: it consumes the
//! current [`SensorSnapshot`] and input, runs the active state's update, and
//! then evaluates the transition table (see `transitions.rs`). Exactly one
//! state is active at a time; transitions fire at most once per tick, in
//! table order. One-shot setup happens in the `enter_state`/`exit_state`
//! hooks rather than being inferred from flag combinations.

use bevy::prelude::*;

use crate::movement::abilities::AbilitySet;
use crate::movement::components::{Facing, KinematicBody};
use crate::movement::resources::{MovementInput, MovementTuning};
use crate::movement::senses::SensorSnapshot;
use crate::movement::timer::GraceTimer;
use crate::movement::transitions;

/// Closed set of locomotion states. The animation layer selects clips off
/// `name()`; nothing else should switch on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveState {
    OnGround,
    InAir,
    OnWall,
    OnClimbableWall,
    LedgeGrab,
    ClimbingLedge,
    ClimbingDownLedge,
    Crouching,
    Dashing,
}

impl MoveState {
    pub const ALL: [MoveState; 9] = [
        MoveState::OnGround,
        MoveState::InAir,
        MoveState::OnWall,
        MoveState::OnClimbableWall,
        MoveState::LedgeGrab,
        MoveState::ClimbingLedge,
        MoveState::ClimbingDownLedge,
        MoveState::Crouching,
        MoveState::Dashing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MoveState::OnGround => "OnGround",
            MoveState::InAir => "InAir",
            MoveState::OnWall => "OnWall",
            MoveState::OnClimbableWall => "OnClimbableWall",
            MoveState::LedgeGrab => "LedgeGrab",
            MoveState::ClimbingLedge => "ClimbingLedge",
            MoveState::ClimbingDownLedge => "ClimbingDownLedge",
            MoveState::Crouching => "Crouching",
            MoveState::Dashing => "Dashing",
        }
    }
}

/// Read-only context handed to transition predicates and actions.
pub(crate) struct TickCtx<'a> {
    pub snapshot: &'a SensorSnapshot,
    pub input: &'a MovementInput,
    pub abilities: &'a AbilitySet,
    pub tuning: &'a MovementTuning,
    pub dt: f32,
}

#[derive(Component, Debug)]
pub struct MovementController {
    pub(crate) state: MoveState,
    pub(crate) facing: Facing,

    // Grounded debounce: `on_ground` only flips true after sustained foot
    // contact, `in_air` only after sustained absence. Filters raycast jitter
    // at the moment of landing or leaving the ground.
    pub(crate) on_ground_timer: GraceTimer,
    pub(crate) in_air_timer: GraceTimer,

    pub(crate) let_go_of_wall_timer: GraceTimer,
    pub(crate) input_delay_timer: GraceTimer,
    pub(crate) delay_input: bool,
    pub(crate) able_to_wall_jump: bool,
    /// X component of the current wall's outward normal while wall-attached.
    pub(crate) wall_normal_x: f32,

    pub(crate) double_jump_armed: bool,
    pub(crate) jump_queued: bool,

    pub(crate) dash_timer: GraceTimer,
    pub(crate) dash_cooldown_timer: GraceTimer,
    pub(crate) dash_armed: bool,
    pub(crate) dash_direction: f32,

    /// Lerp target for the ledge grab/climb states.
    pub(crate) target_position: Vec2,
    pub(crate) crouched: bool,
}

impl MovementController {
    pub fn new(tuning: &MovementTuning) -> Self {
        let mut on_ground_timer = GraceTimer::new(tuning.ground_grace);
        on_ground_timer.reset();

        Self {
            state: MoveState::OnGround,
            facing: Facing::Right,
            on_ground_timer,
            in_air_timer: GraceTimer::new(tuning.air_grace),
            let_go_of_wall_timer: GraceTimer::new(tuning.wall_release_grace),
            input_delay_timer: GraceTimer::new(tuning.input_delay_after_wall_jump),
            delay_input: false,
            able_to_wall_jump: false,
            wall_normal_x: -1.0,
            double_jump_armed: false,
            jump_queued: false,
            dash_timer: GraceTimer::new(tuning.dash_time),
            dash_cooldown_timer: GraceTimer::new(tuning.dash_cooldown),
            dash_armed: true,
            dash_direction: 1.0,
            target_position: Vec2::ZERO,
            crouched: false,
        }
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn crouched(&self) -> bool {
        self.crouched
    }

    /// Grace-filtered groundedness; true only after sustained foot contact.
    pub fn on_ground(&self) -> bool {
        self.on_ground_timer.has_finished()
    }

    /// Grace-filtered airborneness; complement of a fresh ground contact.
    pub fn in_air(&self) -> bool {
        self.in_air_timer.has_finished()
    }

    /// Run one physics tick: debounce groundedness, service jump edges, run
    /// the active state's update, then evaluate the transition table.
    pub fn tick(
        &mut self,
        body: &mut KinematicBody,
        snapshot: &SensorSnapshot,
        raw_input: &MovementInput,
        abilities: &AbilitySet,
        tuning: &MovementTuning,
        dt: f32,
    ) {
        // Horizontal input is suppressed for a beat after a wall jump so the
        // kick-away cannot be immediately steered back into the wall.
        let mut input = raw_input.clone();
        if self.delay_input {
            input.axis.x = 0.0;
        }

        if snapshot.min_foot_distance < tuning.grounded_foot_distance {
            self.on_ground_timer.update(dt);
        } else {
            self.on_ground_timer.reset();
        }

        if input.jump_just_pressed {
            self.start_jump(body, snapshot, abilities, tuning);
        }
        if input.jump_just_released {
            self.end_jump(body, tuning);
        }

        match self.state {
            MoveState::OnGround => self.on_ground_update(body, snapshot, &input, tuning, dt),
            MoveState::InAir => self.in_air_update(body, &input, tuning, dt),
            MoveState::OnWall => self.wall_update(body, snapshot, &input, tuning, dt, false),
            MoveState::OnClimbableWall => self.wall_update(body, snapshot, &input, tuning, dt, true),
            MoveState::LedgeGrab => self.ledge_grab_update(body, tuning, dt),
            MoveState::ClimbingLedge => self.climbing_ledge_update(body, tuning, dt),
            MoveState::ClimbingDownLedge => self.climbing_down_ledge_update(body, tuning, dt),
            MoveState::Crouching => self.crouch_update(body, snapshot, &input, tuning, dt),
            MoveState::Dashing => self.dashing_update(body, tuning, dt),
        }

        let ctx = TickCtx {
            snapshot,
            input: &input,
            abilities,
            tuning,
            dt,
        };
        transitions::evaluate(self, body, &ctx);

        self.check_for_queued_jump(body, snapshot, tuning);

        if self.delay_input
            && (self.input_delay_timer.update(dt) || !self.in_air() || self.on_ground())
        {
            self.delay_input = false;
        }

        // Dash re-arms once the cooldown has run out and the character has
        // touched ground or a wall since the last dash.
        self.dash_cooldown_timer.update(dt);
        if !self.dash_armed
            && self.dash_cooldown_timer.has_finished()
            && (self.on_ground() || matches!(self.state, MoveState::OnWall | MoveState::OnClimbableWall))
        {
            self.dash_armed = true;
        }
    }

    // ------------------------------------------------------------------
    // Per-state updates
    // ------------------------------------------------------------------

    fn on_ground_update(
        &mut self,
        body: &mut KinematicBody,
        snapshot: &SensorSnapshot,
        input: &MovementInput,
        tuning: &MovementTuning,
        dt: f32,
    ) {
        self.update_facing(input, tuning);

        // Reversals use the harder direction-change deceleration.
        let accel = if input.axis.x * body.velocity.x < 0.0 {
            tuning.run_dir_change_decel
        } else {
            tuning.run_accel
        };
        body.velocity.x += input.axis.x * accel * dt;
        body.velocity.x = body.velocity.x.clamp(-tuning.run_speed, tuning.run_speed);

        self.decel_if_no_input(body, input, tuning.decel, tuning, dt);

        // Gravity acts along the sensed ground normal so slopes don't slide.
        body.velocity -= snapshot.ground_normal * (tuning.gravity * dt);

        self.in_air_timer.reset();
    }

    fn in_air_update(
        &mut self,
        body: &mut KinematicBody,
        input: &MovementInput,
        tuning: &MovementTuning,
        dt: f32,
    ) {
        self.update_facing(input, tuning);

        body.velocity.x += input.axis.x * tuning.air_accel * dt;
        body.velocity.x = body.velocity.x.clamp(-tuning.run_speed, tuning.run_speed);

        // Drag only bites near the top of a short jump's arc.
        if body.velocity.y > 0.0
            && body.velocity.y < tuning.short_jump_velocity
            && body.velocity.x.abs() > tuning.air_drag_min_speed
        {
            body.velocity.x *= tuning.air_drag;
        }

        self.decel_if_no_input(body, input, tuning.decel, tuning, dt);

        body.velocity.y -= tuning.gravity * dt;
        body.velocity.y = body
            .velocity
            .y
            .clamp(-tuning.max_fall_speed, tuning.max_fall_speed);

        self.in_air_timer.update(dt);
    }

    fn wall_update(
        &mut self,
        body: &mut KinematicBody,
        snapshot: &SensorSnapshot,
        input: &MovementInput,
        tuning: &MovementTuning,
        dt: f32,
        climbable: bool,
    ) {
        // Re-arm the wall jump once the button has been released.
        if !input.jump_held {
            self.able_to_wall_jump = true;
        }

        // Pulling away from the wall only detaches after a grace window.
        if input.axis.x * self.wall_normal_x > 0.0 {
            self.let_go_of_wall_timer.update(dt);
        } else {
            self.let_go_of_wall_timer.reset();
        }

        body.velocity.x = 0.0;

        if climbable {
            if input.axis.y.abs() > tuning.input_deadzone {
                body.velocity.y = input.axis.y * tuning.climb_speed;
            } else {
                body.velocity.y -= tuning.gravity * dt;
                body.velocity.y = body.velocity.y.max(-tuning.wall_slide_speed);
            }

            // Stay flush against the wall face while climbing.
            if let Some(wall) = snapshot.wall_at_hand {
                body.position.x = wall.x + self.wall_normal_x * body.half_extents.x;
            }
        } else {
            body.velocity.y -= tuning.gravity * tuning.wall_run_gravity_factor * dt;
            body.velocity.y = body.velocity.y.max(-tuning.wall_slide_speed);
        }

        self.in_air_timer.update(dt);
    }

    fn ledge_grab_update(&mut self, body: &mut KinematicBody, tuning: &MovementTuning, dt: f32) {
        body.velocity = Vec2::ZERO;
        let t = (tuning.ledge_grab_lerp * dt).min(1.0);
        body.position = body.position.lerp(self.target_position, t);
    }

    /// Two-phase move: clear the vertical distance first, then slide
    /// horizontally onto the surface.
    fn climbing_ledge_update(&mut self, body: &mut KinematicBody, tuning: &MovementTuning, dt: f32) {
        body.velocity = Vec2::ZERO;
        let t = (tuning.ledge_climb_lerp * dt).min(1.0);
        if (self.target_position.y - body.position.y).abs() > tuning.arrive_epsilon {
            body.position.y += (self.target_position.y - body.position.y) * t;
        } else {
            body.position.x += (self.target_position.x - body.position.x) * t;
        }
    }

    /// Mirror of the climb: move out past the edge first, then drop to the
    /// hang position.
    fn climbing_down_ledge_update(
        &mut self,
        body: &mut KinematicBody,
        tuning: &MovementTuning,
        dt: f32,
    ) {
        body.velocity = Vec2::ZERO;
        let t = (tuning.ledge_climb_lerp * dt).min(1.0);
        if (self.target_position.x - body.position.x).abs() > tuning.arrive_epsilon {
            body.position.x += (self.target_position.x - body.position.x) * t;
        } else {
            body.position.y += (self.target_position.y - body.position.y) * t;
        }
    }

    fn crouch_update(
        &mut self,
        body: &mut KinematicBody,
        snapshot: &SensorSnapshot,
        input: &MovementInput,
        tuning: &MovementTuning,
        dt: f32,
    ) {
        self.update_facing(input, tuning);

        let max_speed = tuning.run_speed * tuning.duck_speed_factor;
        let accel = tuning.run_accel * tuning.duck_speed_factor;
        body.velocity.x += input.axis.x * accel * dt;
        body.velocity.x = body.velocity.x.clamp(-max_speed, max_speed);

        self.decel_if_no_input(body, input, tuning.decel, tuning, dt);

        body.velocity -= snapshot.ground_normal * (tuning.gravity * dt);

        self.in_air_timer.reset();
    }

    fn dashing_update(&mut self, body: &mut KinematicBody, tuning: &MovementTuning, dt: f32) {
        body.velocity.x = self.dash_direction * tuning.dash_speed;
        body.velocity.y = 0.0;
        self.dash_timer.update(dt);
        self.in_air_timer.update(dt);
    }

    // ------------------------------------------------------------------
    // Jump policy
    // ------------------------------------------------------------------

    /// A jump request executes immediately when grounded (or a foot is near
    /// enough), queues when within the loose close-to-ground tier, and only
    /// then consults the double jump. Checking the grounded path first means
    /// a grounded player never burns their double jump.
    fn start_jump(
        &mut self,
        body: &mut KinematicBody,
        snapshot: &SensorSnapshot,
        abilities: &AbilitySet,
        tuning: &MovementTuning,
    ) {
        if !matches!(self.state, MoveState::OnGround | MoveState::InAir) {
            return;
        }

        let one_foot_down = snapshot.min_foot_distance < tuning.grounded_foot_distance;

        if !self.in_air() || self.on_ground() || one_foot_down {
            self.execute_jump(body, tuning, 1.0);
        } else if snapshot.min_foot_distance < tuning.jump_queue_foot_distance {
            self.jump_queued = true;
        } else if self.double_jump_armed && abilities.double_jump {
            self.execute_jump(body, tuning, tuning.double_jump_factor);
            self.double_jump_armed = false;
        }
    }

    fn execute_jump(&mut self, body: &mut KinematicBody, tuning: &MovementTuning, factor: f32) {
        body.velocity.y = tuning.jump_velocity * factor;
        self.on_ground_timer.reset();
        self.in_air_timer.finish();
        self.double_jump_armed = true;
    }

    /// Variable jump height: releasing the button early caps the ascent.
    fn end_jump(&mut self, body: &mut KinematicBody, tuning: &MovementTuning) {
        self.jump_queued = false;
        if body.velocity.y > tuning.short_jump_velocity {
            body.velocity.y = tuning.short_jump_velocity;
        }
    }

    fn check_for_queued_jump(
        &mut self,
        body: &mut KinematicBody,
        snapshot: &SensorSnapshot,
        tuning: &MovementTuning,
    ) {
        if !self.jump_queued {
            return;
        }
        if self.on_ground() || snapshot.min_foot_distance < tuning.grounded_foot_distance {
            self.jump_queued = false;
            self.execute_jump(body, tuning, 1.0);
        }
    }

    // ------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------

    fn update_facing(&mut self, input: &MovementInput, tuning: &MovementTuning) {
        if input.axis.x.abs() > tuning.input_deadzone {
            self.facing = Facing::from_sign(input.axis.x);
        }
    }

    fn decel_if_no_input(
        &mut self,
        body: &mut KinematicBody,
        input: &MovementInput,
        decel: f32,
        tuning: &MovementTuning,
        dt: f32,
    ) {
        if input.axis.x.abs() > tuning.input_deadzone {
            return;
        }
        let step = decel * dt;
        if body.velocity.x.abs() > step {
            body.velocity.x -= body.velocity.x.signum() * step;
        } else {
            body.velocity.x = 0.0;
        }
    }

    // ------------------------------------------------------------------
    // Enter/exit hooks (one-shot setup, called by the transition table)
    // ------------------------------------------------------------------

    pub(crate) fn enter_state(&mut self, body: &mut KinematicBody, ctx: &TickCtx) {
        match self.state {
            MoveState::OnGround => {
                self.in_air_timer.reset();
            }
            MoveState::InAir => {}
            MoveState::OnWall | MoveState::OnClimbableWall => {
                self.able_to_wall_jump = !ctx.input.jump_held;
                self.let_go_of_wall_timer.reset();
                self.wall_normal_x = ctx
                    .snapshot
                    .wall_at_hand
                    .map(|w| w.normal.x)
                    .unwrap_or(-self.facing.sign());
            }
            MoveState::LedgeGrab => {
                body.velocity = Vec2::ZERO;
                self.jump_queued = false;
            }
            MoveState::ClimbingLedge | MoveState::ClimbingDownLedge => {}
            MoveState::Crouching => {
                self.crouched = true;
            }
            MoveState::Dashing => {
                self.dash_timer.reset();
                self.dash_cooldown_timer.reset();
                self.dash_armed = false;
                self.dash_direction = if ctx.input.axis.x.abs() > ctx.tuning.input_deadzone {
                    ctx.input.axis.x.signum()
                } else {
                    self.facing.sign()
                };
                body.velocity = Vec2::new(self.dash_direction * ctx.tuning.dash_speed, 0.0);
            }
        }
    }

    pub(crate) fn exit_state(&mut self) {
        match self.state {
            MoveState::OnWall | MoveState::OnClimbableWall => {
                self.able_to_wall_jump = false;
            }
            MoveState::Crouching => {
                self.crouched = false;
            }
            _ => {}
        }
    }
}
