//! Character domain: support detection and body mode.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::character::{AnimationState, BodyMode, CharacterBody, GameLayer, HostConfig};

/// Body mode from ground contact, current animation and gravity.
pub fn body_mode_for(grounded: bool, animation: AnimationState, weightless: bool) -> BodyMode {
    if grounded {
        BodyMode::Stand
    } else if animation.is_supported() {
        BodyMode::ClimbingOnBeam
    } else if weightless {
        BodyMode::ZeroG
    } else {
        BodyMode::Default
    }
}

pub(crate) fn detect_support(spatial_query: SpatialQuery, mut query: Query<&mut CharacterBody>) {
    // Filter to only hit terrain (not the character's own body parts)
    let terrain_filter = SpatialQueryFilter::from_mask(GameLayer::Terrain);

    for mut body in &mut query {
        // Cast a short ray downward from the lower body part
        let ray_distance = body.secondary.rad + 2.0;
        let hit = spatial_query.cast_ray(
            body.secondary.pos,
            Dir2::NEG_Y,
            ray_distance,
            true,
            &terrain_filter,
        );
        body.grounded = hit.is_some();
    }
}

/// Body mode from this tick's ground contact and the animation just chosen.
pub(crate) fn update_body_mode(config: Res<HostConfig>, mut query: Query<&mut CharacterBody>) {
    for mut body in &mut query {
        let was_mode = body.body_mode;
        let weightless = config.is_weightless(body.gravity);
        body.body_mode = body_mode_for(body.grounded, body.animation, weightless);

        if body.body_mode == BodyMode::Default {
            body.can_jump = body.can_jump.saturating_sub(1);
        } else {
            body.can_jump = config.jump_grace_ticks;
        }

        if body.body_mode != was_mode {
            debug!("Body mode: {:?} -> {:?}", was_mode, body.body_mode);
        }
    }
}
