//! Movement domain: the platformer locomotion core.
//!
//! Split the way the rest of the crate is: pure logic (timer, senses,
//! controller, transition table) with no scheduling concerns, plus thin
//! systems adapting it to input, avian's spatial queries, and the physics
//! components.

pub mod abilities;
pub mod components;
pub mod controller;
pub mod resources;
pub mod senses;
pub mod timer;

mod bootstrap;
mod dev;
mod systems;
mod transitions;


use bevy::prelude::*;

pub use abilities::{AbilityKind, AbilitySet};
pub use components::{BodySize, ClimbableWall, Facing, GameLayer, Ground, KinematicBody, Player};
pub use controller::{MoveState, MovementController};
pub use resources::{MovementInput, MovementTuning};
pub use senses::{Raycaster, SenseHit, SensorSnapshot, Surface};
pub use timer::GraceTimer;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .add_systems(Startup, dev::spawn_dev_arena)
            .add_systems(PostStartup, bootstrap::spawn_player)
            .add_systems(
                Update,
                (
                    systems::read_input,
                    systems::sense_environment,
                    systems::apply_locomotion,
                )
                    .chain(),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Update, dev::draw_sensor_gizmos.after(systems::apply_locomotion));
    }
}
