//! Character domain: the host's animation driver.
//!
//! Picks the body's animation each tick from the tiles and vines around it,
//! the input and gravity. The grind core reads the result; it may also set
//! `StandOnBeam`, `Flip` and `HangFromBeam` itself.

use bevy::prelude::*;

use crate::character::tiles::TILE_SIZE;
use crate::character::{
    AnimationState, CharacterBody, CharacterInput, HostConfig, TileMap, VineNetwork, VinePosition,
};

/// Upward speed above which nothing is grabbed, so a jump can leave a pole or vine.
pub const GRAB_MAX_RISE_SPEED: f32 = 5.0;
/// Horizontal distance from a pole's axis within which it can be grabbed.
pub const POLE_GRAB_REACH: f32 = TILE_SIZE / 4.0;

fn is_pole_top(tiles: &TileMap, pos: Vec2) -> bool {
    tiles.tile_at(pos).has_vertical_beam()
        && !tiles.tile_at(pos + Vec2::new(0.0, TILE_SIZE)).has_vertical_beam()
}

/// The animation a body should be in this tick, and its vine attachment.
pub fn next_animation(
    body: &CharacterBody,
    input: &CharacterInput,
    tiles: &TileMap,
    vines: &VineNetwork,
    config: &HostConfig,
) -> (AnimationState, Option<VinePosition>) {
    let upper = tiles.tile_at(body.primary.pos);
    let lower = tiles.tile_at(body.secondary.pos);
    let weightless = config.is_weightless(body.gravity);

    let kept = match body.animation {
        AnimationState::StandOnBeam => {
            if input.y > 0 && upper.has_vertical_beam() {
                Some(AnimationState::ClimbOnBeam)
            } else if lower.has_horizontal_beam() && !input.pressing_down() {
                Some(AnimationState::StandOnBeam)
            } else {
                None
            }
        }
        AnimationState::ClimbOnBeam => {
            if body.grounded && input.pressing_down() {
                None
            } else if is_pole_top(tiles, body.primary.pos)
                && body.primary.pos.y >= tiles.middle_of_tile(body.primary.pos).y
                && (input.y > 0 || body.primary.vel.y > 0.0)
            {
                Some(AnimationState::GetUpToBeamTip)
            } else if upper.has_vertical_beam() {
                Some(AnimationState::ClimbOnBeam)
            } else {
                None
            }
        }
        AnimationState::GetUpToBeamTip => {
            if is_pole_top(tiles, body.secondary.pos)
                && body.secondary.pos.y >= tiles.middle_of_tile(body.secondary.pos).y
            {
                Some(AnimationState::BeamTip)
            } else if upper.has_vertical_beam() || lower.has_vertical_beam() {
                Some(AnimationState::GetUpToBeamTip)
            } else {
                None
            }
        }
        AnimationState::BeamTip => {
            if input.pressing_down() && lower.has_vertical_beam() {
                Some(AnimationState::ClimbOnBeam)
            } else if lower.has_vertical_beam() {
                Some(AnimationState::BeamTip)
            } else {
                None
            }
        }
        AnimationState::HangFromBeam => {
            (upper.has_horizontal_beam() && !input.pressing_down())
                .then_some(AnimationState::HangFromBeam)
        }
        AnimationState::ZeroGPoleGrab => {
            (weightless && upper.has_beam()).then_some(AnimationState::ZeroGPoleGrab)
        }
        AnimationState::VineGrab => body.vine_pos.map(|_| AnimationState::VineGrab),
        AnimationState::Flip => {
            (!body.grounded).then_some(AnimationState::Flip)
        }
        AnimationState::None => None,
    };

    if let Some(animation) = kept {
        let vine_pos = if animation == AnimationState::VineGrab {
            body.vine_pos
        } else {
            None
        };
        return (animation, vine_pos);
    }

    let fallback = if body.animation == AnimationState::Flip && !body.grounded {
        AnimationState::Flip
    } else {
        AnimationState::None
    };

    let wants_grab = input.x != 0 || input.y != 0;
    if !wants_grab || body.primary.vel.y > GRAB_MAX_RISE_SPEED {
        return (fallback, None);
    }

    if weightless && upper.has_beam() {
        return (AnimationState::ZeroGPoleGrab, None);
    }

    let pole_offset = (body.primary.pos.x - tiles.middle_of_tile(body.primary.pos).x).abs();
    if upper.has_vertical_beam() && input.y != 0 && pole_offset < POLE_GRAB_REACH {
        return (AnimationState::ClimbOnBeam, None);
    }

    if input.y > 0 && body.primary.vel.y <= 0.0 {
        if lower.has_horizontal_beam() {
            return (AnimationState::StandOnBeam, None);
        }
        if upper.has_horizontal_beam() {
            return (AnimationState::HangFromBeam, None);
        }
    }

    if !body.grounded {
        if let Some(vine_pos) = vines.nearest(body.primary.pos, config.vine_reach) {
            return (AnimationState::VineGrab, Some(vine_pos));
        }
    }

    (fallback, None)
}

pub(crate) fn drive_animation(
    tiles: Res<TileMap>,
    vines: Res<VineNetwork>,
    config: Res<HostConfig>,
    mut query: Query<(&CharacterInput, &mut CharacterBody)>,
) {
    for (input, mut body) in &mut query {
        let (animation, vine_pos) = next_animation(&body, input, &tiles, &vines, &config);

        if animation != body.animation {
            debug!("Animation: {:?} -> {:?}", body.animation, animation);
            if animation == AnimationState::VineGrab {
                body.vine_climb_cursor = Vec2::ZERO;
            }
        }

        body.animation = animation;
        body.vine_pos = vine_pos;
    }
}
