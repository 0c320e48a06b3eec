//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Solid ground and wall surfaces.
    Ground,
    /// Wall surfaces the character can cling to and climb.
    Climbable,
    /// Player character.
    Player,
    /// Ability pickups (sensors, never block movement).
    Pickup,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for solid level colliders.
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for climbable wall colliders.
#[derive(Component, Debug)]
pub struct ClimbableWall;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    pub fn flipped(self) -> Facing {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }

    pub fn from_sign(x: f32) -> Facing {
        if x < 0.0 { Facing::Left } else { Facing::Right }
    }
}

/// Full standing collider half-extents, kept around so the crouch collider
/// swap can restore the original height.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodySize {
    pub half_extents: Vec2,
}

/// Kinematic state owned by the movement controller for one tick: position
/// and velocity are copied out of the physics components before the tick and
/// written back after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub half_extents: Vec2,
}
