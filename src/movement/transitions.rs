//! Movement domain: the state transition table.
//!
//! Every possible state change lives in [`RULES`], one row per
//! `(from, predicate, to, action)`. The table is scanned once per tick in
//! order; the first matching row fires and at most one transition happens
//! per tick. Ties are broken by row order, so priority is the table layout
//! itself and reachability can be audited by reading (or testing) the table.

use bevy::prelude::*;

use crate::movement::components::{Facing, KinematicBody};
use crate::movement::controller::{MoveState, MovementController, TickCtx};
use crate::movement::senses::Surface;

type Pred = fn(&MovementController, &KinematicBody, &TickCtx) -> bool;
type Action = fn(&mut MovementController, &mut KinematicBody, &TickCtx);

pub(crate) struct Rule {
    pub from: MoveState,
    pub to: MoveState,
    pub pred: Pred,
    pub action: Action,
}

const fn rule(from: MoveState, to: MoveState, pred: Pred, action: Action) -> Rule {
    Rule {
        from,
        to,
        pred,
        action,
    }
}

pub(crate) const RULES: &[Rule] = &[
    // OnGround
    rule(
        MoveState::OnGround,
        MoveState::ClimbingDownLedge,
        can_climb_down,
        begin_climb_down,
    ),
    rule(MoveState::OnGround, MoveState::OnWall, left_ground_into_wall, no_action),
    rule(
        MoveState::OnGround,
        MoveState::OnClimbableWall,
        left_ground_into_climbable,
        no_action,
    ),
    rule(MoveState::OnGround, MoveState::InAir, left_ground, no_action),
    rule(MoveState::OnGround, MoveState::Dashing, can_dash, no_action),
    rule(MoveState::OnGround, MoveState::Crouching, wants_crouch, no_action),
    // InAir
    rule(MoveState::InAir, MoveState::LedgeGrab, ledge_grab_ready, begin_ledge_grab),
    rule(MoveState::InAir, MoveState::OnGround, landed, apply_landing_assist),
    rule(MoveState::InAir, MoveState::OnWall, air_wall_attach, no_action),
    rule(
        MoveState::InAir,
        MoveState::OnClimbableWall,
        air_climbable_attach,
        no_action,
    ),
    rule(MoveState::InAir, MoveState::Dashing, can_dash, no_action),
    // OnWall
    rule(MoveState::OnWall, MoveState::OnGround, landed, apply_landing_assist),
    rule(MoveState::OnWall, MoveState::InAir, wants_wall_jump, do_wall_jump),
    rule(MoveState::OnWall, MoveState::LedgeGrab, ledge_grab_ready, begin_ledge_grab),
    rule(MoveState::OnWall, MoveState::InAir, wall_released, leave_wall),
    // OnClimbableWall
    rule(
        MoveState::OnClimbableWall,
        MoveState::OnGround,
        landed,
        apply_landing_assist,
    ),
    rule(
        MoveState::OnClimbableWall,
        MoveState::InAir,
        wants_wall_jump,
        do_wall_jump,
    ),
    rule(
        MoveState::OnClimbableWall,
        MoveState::LedgeGrab,
        ledge_grab_ready,
        begin_ledge_grab,
    ),
    rule(MoveState::OnClimbableWall, MoveState::InAir, wall_released, leave_wall),
    // LedgeGrab
    rule(
        MoveState::LedgeGrab,
        MoveState::ClimbingLedge,
        wants_ledge_climb,
        begin_ledge_climb,
    ),
    rule(MoveState::LedgeGrab, MoveState::InAir, wants_ledge_jump_away, do_ledge_jump_away),
    rule(MoveState::LedgeGrab, MoveState::InAir, wants_ledge_drop, no_action),
    // ClimbingLedge / ClimbingDownLedge
    rule(
        MoveState::ClimbingLedge,
        MoveState::OnGround,
        arrived_at_target,
        finish_ledge_climb,
    ),
    rule(
        MoveState::ClimbingDownLedge,
        MoveState::LedgeGrab,
        arrived_at_target,
        no_action,
    ),
    // Crouching
    rule(MoveState::Crouching, MoveState::InAir, left_ground, no_action),
    rule(MoveState::Crouching, MoveState::OnGround, can_stand_up, no_action),
    // Dashing
    rule(MoveState::Dashing, MoveState::InAir, dash_finished, no_action),
];

/// Scan the table and fire the first matching rule, running the old state's
/// exit hook, the rule's action, then the new state's enter hook.
pub(crate) fn evaluate(ctrl: &mut MovementController, body: &mut KinematicBody, ctx: &TickCtx) {
    for r in RULES {
        if r.from == ctrl.state && (r.pred)(ctrl, body, ctx) {
            debug!("movement: {} -> {}", r.from.name(), r.to.name());
            ctrl.exit_state();
            (r.action)(ctrl, body, ctx);
            ctrl.state = r.to;
            ctrl.enter_state(body, ctx);
            return;
        }
    }
}

fn no_action(_ctrl: &mut MovementController, _body: &mut KinematicBody, _ctx: &TickCtx) {}

// ----------------------------------------------------------------------
// Predicates
// ----------------------------------------------------------------------

fn left_ground(ctrl: &MovementController, _body: &KinematicBody, _ctx: &TickCtx) -> bool {
    !ctrl.on_ground()
}

fn landed(ctrl: &MovementController, _body: &KinematicBody, _ctx: &TickCtx) -> bool {
    ctrl.on_ground()
}

fn left_ground_into_wall(ctrl: &MovementController, body: &KinematicBody, ctx: &TickCtx) -> bool {
    left_ground(ctrl, body, ctx)
        && ctx.abilities.wall_jump
        && matches!(
            ctx.snapshot.wall_at_hand,
            Some(w) if w.surface == Surface::Ground
        )
}

fn left_ground_into_climbable(
    ctrl: &MovementController,
    body: &KinematicBody,
    ctx: &TickCtx,
) -> bool {
    left_ground(ctrl, body, ctx)
        && ctx.abilities.wall_cling
        && matches!(
            ctx.snapshot.wall_at_hand,
            Some(w) if w.surface == Surface::Climbable
        )
}

fn air_wall_attach(_ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctx.abilities.wall_jump
        && ctx.snapshot.wall_at_crotch
        && matches!(
            ctx.snapshot.wall_at_hand,
            Some(w) if w.surface == Surface::Ground
        )
}

fn air_climbable_attach(_ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctx.abilities.wall_cling
        && ctx.snapshot.wall_at_crotch
        && matches!(
            ctx.snapshot.wall_at_hand,
            Some(w) if w.surface == Surface::Climbable
        )
}

/// A grabbable ledge exists, the player is not pressing down, and there is
/// real air under the character (steps are not ledges).
fn ledge_grab_ready(_ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctx.input.axis.y >= 0.0
        && ctx.snapshot.ledge.is_some()
        && ctx.snapshot.clearance_below >= ctx.tuning.ledge_grab_min_clearance
}

fn wants_wall_jump(ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctrl.able_to_wall_jump && ctx.input.jump_held
}

/// Detach from the wall: pulled away past the grace window, facing away, or
/// the wall is simply gone.
fn wall_released(ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctrl.let_go_of_wall_timer.has_finished()
        || ctrl.facing.sign() * ctrl.wall_normal_x > 0.0
        || ctx.snapshot.wall_at_hand.is_none()
}

fn wants_ledge_climb(_ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctx.input.axis.y >= ctx.tuning.ledge_climb_threshold
}

fn wants_ledge_jump_away(ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctx.input.jump_just_pressed && ctx.input.axis.x * ctrl.facing.sign() < 0.0
}

fn wants_ledge_drop(_ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctx.input.axis.y <= -ctx.tuning.ledge_climb_threshold
}

fn arrived_at_target(ctrl: &MovementController, body: &KinematicBody, ctx: &TickCtx) -> bool {
    body.position.distance(ctrl.target_position) < ctx.tuning.arrive_epsilon
}

fn wants_crouch(_ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctx.input.duck_held
}

fn can_stand_up(_ctrl: &MovementController, body: &KinematicBody, ctx: &TickCtx) -> bool {
    if ctx.input.duck_held {
        return false;
    }
    // Headroom needed to restore the full collider height.
    let needed = body.half_extents.y * 2.0 * (1.0 / ctx.tuning.crouch_height_factor - 1.0)
        + ctx.tuning.stand_up_margin;
    ctx.snapshot.ceiling_distance >= needed
}

fn can_dash(ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctx.input.dash_just_pressed && ctx.abilities.dash && ctrl.dash_armed
}

fn dash_finished(ctrl: &MovementController, _body: &KinematicBody, _ctx: &TickCtx) -> bool {
    ctrl.dash_timer.has_finished()
}

/// Duck pressed at an edge, with a real drop past it: climbing down requires
/// open space below the ledge, not a platform right underneath.
fn can_climb_down(_ctrl: &MovementController, _body: &KinematicBody, ctx: &TickCtx) -> bool {
    ctx.input.duck_held
        && !ctx.snapshot.ground_ahead_front
        && ctx.snapshot.climb_down_ledge_x.is_some()
        && ctx.snapshot.forward_drop_clearance >= ctx.tuning.climb_down_min_clearance
}

// ----------------------------------------------------------------------
// Actions
// ----------------------------------------------------------------------

fn apply_landing_assist(ctrl: &mut MovementController, body: &mut KinematicBody, ctx: &TickCtx) {
    let _ = ctrl;
    // Not trying to move on landing: bleed speed to help stick the landing.
    if ctx.input.axis.x.abs() <= ctx.tuning.input_deadzone {
        body.velocity.x *= ctx.tuning.landing_assist_factor;
    }
}

fn begin_ledge_grab(ctrl: &mut MovementController, body: &mut KinematicBody, ctx: &TickCtx) {
    let Some(ledge) = ctx.snapshot.ledge else {
        return;
    };
    // Hang with the hands at the ledge corner: head level with the ledge top,
    // body on the near side of the wall face.
    let target = Vec2::new(
        ledge.x - ctrl.facing.sign() * body.half_extents.x,
        ledge.y - body.half_extents.y,
    );
    ctrl.target_position = target;
}

fn begin_ledge_climb(ctrl: &mut MovementController, body: &mut KinematicBody, _ctx: &TickCtx) {
    // One body-width forward, one body-height up from the grab point.
    let target = body.position
        + Vec2::new(
            ctrl.facing.sign() * body.half_extents.x * 2.0,
            body.half_extents.y * 2.0,
        );
    ctrl.target_position = target;
}

fn finish_ledge_climb(ctrl: &mut MovementController, body: &mut KinematicBody, ctx: &TickCtx) {
    body.position = ctrl.target_position;
    // Holding run through the climb grants a velocity head start.
    if ctx.input.axis.x.abs() > ctx.tuning.input_deadzone {
        body.velocity.x = ctx.tuning.run_speed * ctx.tuning.run_exit_boost * ctrl.facing.sign();
    }
}

fn begin_climb_down(ctrl: &mut MovementController, body: &mut KinematicBody, ctx: &TickCtx) {
    let edge_x = ctx
        .snapshot
        .climb_down_ledge_x
        .unwrap_or(body.position.x + ctrl.facing.sign() * body.half_extents.x);

    // Back into the ledge: face the platform we are leaving, then hang off
    // its edge one body-height down.
    ctrl.facing = ctrl.facing.flipped();
    let target = Vec2::new(
        edge_x - ctrl.facing.sign() * body.half_extents.x,
        body.position.y - body.half_extents.y * 2.0,
    );
    ctrl.target_position = target;
}

fn do_wall_jump(ctrl: &mut MovementController, body: &mut KinematicBody, ctx: &TickCtx) {
    let away = ctrl.wall_normal_x;
    ctrl.facing = Facing::from_sign(away);

    body.velocity.x = away * ctx.tuning.wall_jump_horizontal;
    body.velocity.y = ctx.tuning.wall_jump_vertical;

    // The kick-away trajectory is protected from immediate re-steering, and
    // a wall jump re-arms the double jump.
    ctrl.input_delay_timer.reset();
    ctrl.delay_input = true;
    ctrl.double_jump_armed = true;
}

fn leave_wall(ctrl: &mut MovementController, _body: &mut KinematicBody, ctx: &TickCtx) {
    // Deliberately letting go does not keep the double jump armed.
    ctrl.double_jump_armed = false;
    if ctx.input.axis.x.abs() > ctx.tuning.input_deadzone {
        ctrl.facing = Facing::from_sign(ctx.input.axis.x);
    }
}

fn do_ledge_jump_away(ctrl: &mut MovementController, body: &mut KinematicBody, ctx: &TickCtx) {
    ctrl.facing = Facing::from_sign(ctx.input.axis.x);

    // Blend the vertical boost by how far up the stick is held.
    let y_blend = (ctx.input.axis.y + 1.0) / 2.0;
    body.velocity.x = ctrl.facing.sign() * ctx.tuning.run_speed * ctx.input.axis.x.abs();
    body.velocity.y = ctx.tuning.jump_velocity * y_blend;

    ctrl.double_jump_armed = true;
}
