//! Ability pickups: sensor colliders that grant a movement ability on touch.

use avian2d::prelude::*;
use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::movement::abilities::{AbilityKind, AbilitySet};
use crate::movement::components::{GameLayer, Player};

pub struct PickupsPlugin;

impl Plugin for PickupsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<AbilityCollected>().add_systems(
            Update,
            (collect_pickups, announce_collected).chain(),
        );
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Pickup {
    pub kind: AbilityKind,
}

impl Pickup {
    /// Full spawn bundle for a floating pickup at `pos`.
    pub fn bundle(kind: AbilityKind, pos: Vec2) -> impl Bundle {
        let color = match kind {
            AbilityKind::DoubleJump => Color::srgb(0.9, 0.8, 0.2),
            AbilityKind::WallJump => Color::srgb(0.2, 0.7, 0.9),
            AbilityKind::WallCling => Color::srgb(0.4, 0.9, 0.4),
            AbilityKind::Dash => Color::srgb(0.9, 0.4, 0.3),
            AbilityKind::Gun => Color::srgb(0.8, 0.3, 0.8),
        };
        (
            Pickup { kind },
            Sprite {
                color,
                custom_size: Some(Vec2::splat(16.0)),
                ..default()
            },
            Transform::from_xyz(pos.x, pos.y, 0.0),
            RigidBody::Static,
            Collider::rectangle(16.0, 16.0),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::Pickup, [GameLayer::Player]),
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AbilityCollected {
    pub kind: AbilityKind,
}

impl Message for AbilityCollected {}

/// Grants the pickup's ability to the touching player and despawns it.
fn collect_pickups(
    mut commands: Commands,
    mut collision_start_events: MessageReader<CollisionStart>,
    mut collected_events: MessageWriter<AbilityCollected>,
    pickup_query: Query<&Pickup>,
    mut player_query: Query<&mut AbilitySet, With<Player>>,
) {
    for event in collision_start_events.read() {
        let pairs = [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ];
        for (pickup_entity, player_entity) in pairs {
            let Ok(pickup) = pickup_query.get(pickup_entity) else {
                continue;
            };
            let Ok(mut abilities) = player_query.get_mut(player_entity) else {
                continue;
            };
            if abilities.has(pickup.kind) {
                debug!("Pickup {:?} already owned, despawning anyway", pickup.kind);
            } else {
                abilities.grant(pickup.kind);
            }
            collected_events.write(AbilityCollected { kind: pickup.kind });
            commands.entity(pickup_entity).despawn();
        }
    }
}

fn announce_collected(mut collected_events: MessageReader<AbilityCollected>) {
    for event in collected_events.read() {
        info!("Ability collected: {:?}", event.kind);
    }
}
