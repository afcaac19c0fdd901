//! Character domain: host locomotion, gravity and the body constraint.
//!
//! All values are per tick. A zero speed factor means the grind core owns
//! that axis this tick and the host leaves the velocity alone.

use bevy::prelude::*;

use crate::character::{
    AnimationState, BodyMode, CharacterBody, CharacterInput, HostConfig, JumpRequest, TileMap,
    VineNetwork,
};

/// Boost lost per tick while it lasts.
pub const JUMP_BOOST_DECAY: f32 = 1.5;
/// Extra lift per unit of boost while jump is held.
pub const JUMP_BOOST_LIFT: f32 = 0.3;
/// Factor the vine cursor decays by while the host drives the climb.
pub const VINE_CURSOR_DECAY: f32 = 0.9;
/// How far ahead of the body the host aims when climbing a vine.
pub const VINE_AIM_DISTANCE: f32 = 20.0;

/// Top-of-pole resting point for the lower body.
pub fn pole_top(tiles: &TileMap, pos: Vec2, config: &HostConfig) -> Vec2 {
    tiles.middle_of_tile(pos) + Vec2::new(0.0, config.beam_stand_offset)
}

/// Put the upper body straight above the lower one, moving with it.
fn stack_upright(body: &mut CharacterBody, config: &HostConfig) {
    body.primary.pos = body.secondary.pos + Vec2::new(0.0, config.chunk_separation);
    body.primary.vel = body.secondary.vel;
}

/// Hang the lower body straight below the upper one, moving with it.
fn hang_below(body: &mut CharacterBody, config: &HostConfig) {
    body.secondary.pos = body.primary.pos - Vec2::new(0.0, config.chunk_separation);
    body.secondary.vel = body.primary.vel;
}

pub fn locomote(
    body: &mut CharacterBody,
    input: &CharacterInput,
    tiles: &TileMap,
    vines: &VineNetwork,
    config: &HostConfig,
) {
    let factors = body.speed_factors;
    let dir = Vec2::new(input.x as f32, input.y as f32);

    match body.animation {
        AnimationState::StandOnBeam => {
            body.secondary.pos.y = pole_top(tiles, body.secondary.pos, config).y;
            body.secondary.vel.y = 0.0;
            if factors.run != 0.0 {
                body.secondary.vel.x = dir.x * config.run_speed * factors.run;
            }
            stack_upright(body, config);
        }
        AnimationState::ClimbOnBeam => {
            let axis = tiles.middle_of_tile(body.primary.pos).x;
            body.primary.pos.x = axis;
            body.primary.vel.x = 0.0;
            if factors.climb != 0.0 {
                body.primary.vel.y = dir.y * config.climb_speed * factors.climb;
            }
            hang_below(body, config);
        }
        AnimationState::GetUpToBeamTip => {
            body.primary.pos.x = tiles.middle_of_tile(body.primary.pos).x;
            body.primary.vel = Vec2::new(0.0, config.climb_speed);
            hang_below(body, config);
        }
        AnimationState::BeamTip => {
            body.secondary.pos = pole_top(tiles, body.secondary.pos, config);
            body.secondary.vel = Vec2::ZERO;
            stack_upright(body, config);
        }
        AnimationState::HangFromBeam => {
            let beam = tiles.middle_of_tile(body.primary.pos);
            body.primary.pos.y = beam.y - config.beam_stand_offset;
            body.primary.vel.y = 0.0;
            if factors.run != 0.0 {
                body.primary.vel.x = dir.x * config.climb_speed * factors.run;
            }
            hang_below(body, config);
        }
        AnimationState::ZeroGPoleGrab => {
            let tile = tiles.tile_at(body.primary.pos);
            let middle = tiles.middle_of_tile(body.primary.pos);
            if !tile.has_horizontal_beam() {
                body.primary.pos.x = middle.x;
            }
            if !tile.has_vertical_beam() {
                body.primary.pos.y = middle.y;
            }
            if factors.climb != 0.0 {
                let mut along = dir;
                if !tile.has_horizontal_beam() {
                    along.x = 0.0;
                }
                if !tile.has_vertical_beam() {
                    along.y = 0.0;
                }
                body.primary.vel = along * config.climb_speed * factors.climb;
            }
            body.secondary.vel = body.primary.vel;
        }
        AnimationState::VineGrab => {
            let Some(mut vine_pos) = body.vine_pos else {
                return;
            };
            if factors.climb != 0.0 {
                body.vine_climb_cursor *= VINE_CURSOR_DECAY;
                let length = vines.total_length(vine_pos.vine);
                if dir != Vec2::ZERO && length > 0.0 {
                    let goal = body.primary.pos + dir.normalize() * VINE_AIM_DISTANCE;
                    let step = vines.climb_on_vine_speed(vine_pos, goal)
                        * config.vine_climb_speed
                        * factors.climb
                        / length;
                    vine_pos.float_pos = (vine_pos.float_pos + step).clamp(0.0, 1.0);
                    body.vine_pos = Some(vine_pos);
                }
            }
            let target = vines.on_vine_pos(vine_pos);
            body.primary.vel = target - body.primary.pos;
            body.secondary.vel = body.primary.vel;
        }
        AnimationState::None | AnimationState::Flip => {
            if factors.run == 0.0 {
                return;
            }
            let control = if body.body_mode == BodyMode::Stand {
                1.0
            } else {
                config.air_control
            };
            let target = dir.x * config.run_speed * factors.run;
            for chunk in [&mut body.primary, &mut body.secondary] {
                chunk.vel.x += (target - chunk.vel.x) * control;
            }
        }
    }
}

pub(crate) fn apply_locomotion(
    tiles: Res<TileMap>,
    vines: Res<VineNetwork>,
    config: Res<HostConfig>,
    mut query: Query<(&CharacterInput, &mut CharacterBody)>,
) {
    for (input, mut body) in &mut query {
        locomote(&mut body, input, &tiles, &vines, &config);
    }
}

/// The host's own jump rule: a fresh press while a jump is allowed.
pub(crate) fn request_host_jumps(
    mut query: Query<(&CharacterInput, &CharacterBody, &mut JumpRequest)>,
) {
    for (input, body, mut request) in &mut query {
        if input.jump_pressed && body.can_jump > 0 {
            request.0 = true;
        }
    }
}

pub fn gravity_step(body: &mut CharacterBody, config: &HostConfig) {
    if body.animation.is_supported() {
        return;
    }
    let fall = config.gravity * body.gravity;
    body.primary.vel.y -= fall;
    body.secondary.vel.y -= fall;
}

pub(crate) fn apply_gravity(config: Res<HostConfig>, mut query: Query<&mut CharacterBody>) {
    for mut body in &mut query {
        gravity_step(&mut body, &config);
    }
}

pub fn jump_boost_step(body: &mut CharacterBody, input: &CharacterInput) {
    if body.jump_boost > 0.0 {
        if input.jump {
            let lift = (body.jump_boost + 1.0) * JUMP_BOOST_LIFT;
            body.primary.vel.y += lift;
            body.secondary.vel.y += lift;
        }
        body.jump_boost = (body.jump_boost - JUMP_BOOST_DECAY).max(0.0);
    }

    if body.animation == AnimationState::Flip {
        body.slide_counter += 1;
    }
}

pub(crate) fn apply_jump_boost(mut query: Query<(&CharacterInput, &mut CharacterBody)>) {
    for (input, mut body) in &mut query {
        jump_boost_step(&mut body, input);
    }
}

/// Pull free-moving body parts back to their rest separation.
pub fn constrain(body: &mut CharacterBody, config: &HostConfig) {
    if body.animation.is_supported() {
        return;
    }
    let delta = body.primary.pos - body.secondary.pos;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        body.primary.pos.y = body.secondary.pos.y + config.chunk_separation;
        return;
    }
    let correction = delta / distance * (distance - config.chunk_separation) * 0.5;
    body.primary.pos -= correction;
    body.secondary.pos += correction;
}

pub(crate) fn constrain_chunks(config: Res<HostConfig>, mut query: Query<&mut CharacterBody>) {
    for mut body in &mut query {
        constrain(&mut body, &config);
    }
}
