//! Core domain: app-level state, camera setup, and camera follow.

use bevy::prelude::*;

use crate::movement::{GraceTimer, MoveState, MovementController, Player};

#[derive(States, Debug, Hash, Eq, PartialEq, Clone, Default)]
pub enum GameState {
    #[default]
    Boot,
    Run,
}

const CAMERA_X_SPEED: f32 = 5.0;
const CAMERA_UP_SPEED: f32 = 3.0;
const CAMERA_DOWN_SPEED: f32 = 5.0;
const LOOK_AHEAD_DISTANCE: f32 = 96.0;
const LOOK_AHEAD_SPEED: f32 = 1.0;
const LOOK_AHEAD_DELAY: f32 = 0.75;

/// Platformer follow behavior for the main camera. Horizontal tracking is
/// unconditional; vertical tracking only happens on the ground, while
/// hanging/climbing (latched until the next landing), or when the player
/// falls below the camera, so an ordinary jump arc does not drag the view
/// up and back down. A facing-direction look-ahead offset kicks in after
/// the player has held a direction for a beat.
#[derive(Component, Debug)]
pub struct FollowCamera {
    keep_tracking_y: bool,
    target_y: f32,
    look_ahead: f32,
    look_ahead_active: bool,
    last_facing: f32,
    facing_change_timer: GraceTimer,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            keep_tracking_y: false,
            target_y: 0.0,
            look_ahead: 0.0,
            look_ahead_active: false,
            last_facing: 0.0,
            facing_change_timer: GraceTimer::new(LOOK_AHEAD_DELAY),
        }
    }
}

impl FollowCamera {
    /// One tracking step: where the camera should move this frame.
    fn track(
        &mut self,
        camera_pos: Vec2,
        player_pos: Vec2,
        state: MoveState,
        on_ground: bool,
        facing: f32,
        dt: f32,
    ) -> Vec2 {
        // Hanging and climbing move the character vertically without ever
        // being "on ground"; keep following until the next landing.
        if matches!(
            state,
            MoveState::LedgeGrab | MoveState::OnWall | MoveState::OnClimbableWall
        ) {
            self.keep_tracking_y = true;
        }
        if on_ground {
            self.keep_tracking_y = false;
        }

        if facing != self.last_facing {
            self.facing_change_timer.reset();
            self.look_ahead_active = false;
        }
        if self.facing_change_timer.running() {
            if self.facing_change_timer.update(dt) {
                self.look_ahead_active = true;
            }
        } else if self.look_ahead_active {
            self.look_ahead = self.look_ahead.lerp(
                facing * LOOK_AHEAD_DISTANCE,
                (LOOK_AHEAD_SPEED * dt).min(1.0),
            );
        }
        self.last_facing = facing;

        if on_ground || self.keep_tracking_y || player_pos.y < camera_pos.y {
            self.target_y = player_pos.y;
        }
        let y_speed = if self.target_y < camera_pos.y {
            CAMERA_DOWN_SPEED
        } else {
            CAMERA_UP_SPEED
        };

        Vec2::new(
            camera_pos.x.lerp(
                player_pos.x + self.look_ahead,
                (CAMERA_X_SPEED * dt).min(1.0),
            ),
            camera_pos.y.lerp(self.target_y, (y_speed * dt).min(1.0)),
        )
    }
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, enter_run.run_if(in_state(GameState::Boot)))
            .add_systems(Update, follow_player);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, FollowCamera::default()));
}

/// Boot exists so content loading runs before any gameplay system sees the
/// tuning resource. Once the Startup schedule has finished we move straight on.
fn enter_run(mut game_state: ResMut<NextState<GameState>>) {
    game_state.set(GameState::Run);
}

fn follow_player(
    time: Res<Time>,
    player: Query<(&Transform, &MovementController), With<Player>>,
    mut camera: Query<(&mut Transform, &mut FollowCamera), Without<Player>>,
) {
    let Ok((player_transform, controller)) = player.single() else {
        return;
    };

    for (mut camera_transform, mut follow) in &mut camera {
        let next = follow.track(
            camera_transform.translation.truncate(),
            player_transform.translation.truncate(),
            controller.state(),
            controller.on_ground(),
            controller.facing().sign(),
            time.delta_secs(),
        );
        camera_transform.translation.x = next.x;
        camera_transform.translation.y = next.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 120.0;

    #[test]
    fn jump_arc_does_not_drag_the_camera_up() {
        let mut follow = FollowCamera::default();
        let mut camera = Vec2::ZERO;

        // Player rises well above the camera mid-jump.
        for _ in 0..60 {
            camera = follow.track(camera, Vec2::new(0.0, 120.0), MoveState::InAir, false, 1.0, DT);
        }
        assert_eq!(camera.y, 0.0);

        // Landing at a higher spot resumes vertical tracking.
        for _ in 0..600 {
            camera = follow.track(
                camera,
                Vec2::new(0.0, 120.0),
                MoveState::OnGround,
                true,
                1.0,
                DT,
            );
        }
        assert!((camera.y - 120.0).abs() < 1.0);
    }

    #[test]
    fn falling_below_the_camera_always_tracks() {
        let mut follow = FollowCamera::default();
        let mut camera = Vec2::ZERO;
        for _ in 0..600 {
            camera = follow.track(
                camera,
                Vec2::new(0.0, -300.0),
                MoveState::InAir,
                false,
                1.0,
                DT,
            );
        }
        assert!(camera.y < -290.0);
    }

    #[test]
    fn wall_climb_latches_vertical_tracking_until_landing() {
        let mut follow = FollowCamera::default();
        let mut camera = Vec2::ZERO;

        // One wall-contact frame is enough to latch.
        camera = follow.track(
            camera,
            Vec2::new(0.0, 50.0),
            MoveState::OnClimbableWall,
            false,
            1.0,
            DT,
        );
        for _ in 0..600 {
            camera = follow.track(camera, Vec2::new(0.0, 200.0), MoveState::InAir, false, 1.0, DT);
        }
        assert!((camera.y - 200.0).abs() < 2.0);
    }

    #[test]
    fn look_ahead_waits_for_the_direction_to_settle() {
        let mut follow = FollowCamera::default();
        let mut camera = Vec2::ZERO;
        let player = Vec2::ZERO;

        // Before the delay runs out the camera stays centered.
        let early_ticks = (LOOK_AHEAD_DELAY / DT) as usize - 5;
        for _ in 0..early_ticks {
            camera = follow.track(camera, player, MoveState::OnGround, true, 1.0, DT);
        }
        assert!(camera.x.abs() < 0.01);

        // Held past the delay, the view drifts out ahead of the player.
        for _ in 0..1200 {
            camera = follow.track(camera, player, MoveState::OnGround, true, 1.0, DT);
        }
        assert!(camera.x > LOOK_AHEAD_DISTANCE * 0.5);

        // Turning around resets the delay before drifting the other way.
        camera = follow.track(camera, player, MoveState::OnGround, true, -1.0, DT);
        let drift_before = camera.x;
        for _ in 0..30 {
            camera = follow.track(camera, player, MoveState::OnGround, true, -1.0, DT);
        }
        assert!((camera.x - drift_before).abs() < CAMERA_X_SPEED);
    }
}
