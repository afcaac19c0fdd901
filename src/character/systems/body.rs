//! Character domain: copying body state between physics entities and `CharacterBody`.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::character::{AnimationState, BodyPart, BodyParts, CharacterBody};
use crate::core::TICK_RATE;

/// Convert a physics velocity (units per second) to units per tick.
pub fn to_per_tick(velocity: Vec2) -> Vec2 {
    velocity / TICK_RATE as f32
}

pub fn to_per_second(velocity: Vec2) -> Vec2 {
    velocity * TICK_RATE as f32
}

/// Where the hands are for the current pose.
pub fn hand_positions(body: &CharacterBody) -> [Vec2; 2] {
    let center = body.primary.pos;
    match body.animation {
        AnimationState::ClimbOnBeam
        | AnimationState::GetUpToBeamTip
        | AnimationState::ZeroGPoleGrab
        | AnimationState::VineGrab => [
            center + Vec2::new(-3.0, 8.0),
            center + Vec2::new(3.0, 4.0),
        ],
        AnimationState::HangFromBeam => [
            center + Vec2::new(-5.0, 10.0),
            center + Vec2::new(5.0, 10.0),
        ],
        _ => [
            center + Vec2::new(-7.0, -3.0),
            center + Vec2::new(7.0, -3.0),
        ],
    }
}

pub(crate) fn load_bodies(
    parts: Query<(&Position, &LinearVelocity), With<BodyPart>>,
    mut characters: Query<(&BodyParts, &mut CharacterBody)>,
) {
    for (body_parts, mut body) in &mut characters {
        let (Ok((primary_pos, primary_vel)), Ok((secondary_pos, secondary_vel))) = (
            parts.get(body_parts.primary),
            parts.get(body_parts.secondary),
        ) else {
            continue;
        };

        body.primary.pos = primary_pos.0;
        body.primary.vel = to_per_tick(primary_vel.0);
        body.secondary.pos = secondary_pos.0;
        body.secondary.vel = to_per_tick(secondary_vel.0);
        body.hands = hand_positions(&body);
    }
}

pub(crate) fn store_bodies(
    mut parts: Query<(&mut Position, &mut LinearVelocity), With<BodyPart>>,
    characters: Query<(&BodyParts, &CharacterBody)>,
) {
    for (body_parts, body) in &characters {
        for (entity, chunk) in [
            (body_parts.primary, &body.primary),
            (body_parts.secondary, &body.secondary),
        ] {
            if let Ok((mut position, mut velocity)) = parts.get_mut(entity) {
                position.0 = chunk.pos;
                velocity.0 = to_per_second(chunk.vel);
            }
        }
    }
}

/// Remove body parts whose character has been despawned.
pub(crate) fn despawn_orphaned_parts(
    mut commands: Commands,
    parts: Query<(Entity, &BodyPart)>,
    owners: Query<(), With<BodyParts>>,
) {
    for (entity, part) in &parts {
        if owners.get(part.owner).is_err() {
            commands.entity(entity).despawn();
        }
    }
}
