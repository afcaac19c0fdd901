//! Grind domain: applying grind modalities to the character body.
//!
//! Runs after the host's own locomotion each tick and overrides velocities and
//! speed factors while a grind is active.

use bevy::math::FloatExt;
use bevy::prelude::*;
use rand::Rng;

use crate::character::{AnimationState, BodyMode, CharacterBody, CharacterInput};
use crate::tuning::{GrindSpeeds, GrindTuning};

use super::classifier::{Modality, ModalityFlags, classify};
use super::effects::{GrindSound, SoundCue, emit_grind_sparks};
use super::host::GrindHost;
use super::session::GrindSession;

/// Height of the lower body above the tile center after a snap.
pub const POLE_TIP_OFFSET: f32 = 5.0;
pub const BEAM_CATCH_OFFSET: f32 = 5.0;
pub const POLE_TIP_MAX_SPEED: f32 = 9.0;
/// Distance behind the lower body of the second horizontal spark burst.
pub const SPARK_TRAIL_OFFSET: f32 = 10.0;
pub const VINE_CURSOR_MAX: f32 = 30.0;
pub const VINE_GRAB_DELAY: u32 = 10;
pub const VINE_PUSH: f32 = 0.05;
pub const FLIP_CANCEL_FALL_SPEED: f32 = -3.0;

/// What the controller decided this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrindTick {
    pub flags: ModalityFlags,
    /// The controller wants the character to jump this tick.
    pub jump_requested: bool,
    pub caught_beam: bool,
}

/// One controller tick for one character.
pub fn update_grind(
    session: &mut GrindSession,
    body: &mut CharacterBody,
    input: &CharacterInput,
    tuning: &GrindTuning,
    host: &mut impl GrindHost,
    rng: &mut impl Rng,
) -> GrindTick {
    session.note_facing(input);
    if body.animation == AnimationState::VineGrab {
        session.note_vine_direction(body.primary.vel);
    }
    session.history.record(body.animation);
    session.vine_grab_delay = session.vine_grab_delay.saturating_sub(1);

    let Some(speeds) = tuning.grind_speeds() else {
        session.modality = Modality::None;
        session.pending_top_of_pole_jump = false;
        return GrindTick::default();
    };

    let previous = session.modality;
    let mut tick = GrindTick::default();

    if input.grind_active()
        && body.animation == AnimationState::GetUpToBeamTip
        && previous == Modality::VerticalPole
    {
        tick.jump_requested = reach_pole_top(session, body, input, host);
    }

    if !input.grind_active() {
        if previous != Modality::None {
            debug!("Grind ended: {:?}", previous);
        }
        session.modality = Modality::None;
        session.pending_top_of_pole_jump = false;
        body.speed_factors = speeds.normal_factors();
        return tick;
    }

    let flags = classify(body, input, session.last_facing);
    debug_assert!(
        flags.active_count() <= 1,
        "grind modalities overlap: {:?}",
        flags
    );
    tick.flags = flags;

    let color = tuning.spark_color();
    let facing = session.last_facing.as_vec2();

    if flags.horizontal {
        body.speed_factors.run = 0.0;
        body.secondary.vel.x = speeds.grind_x * facing.x;

        let origin = body.secondary.pos;
        let trail = origin - Vec2::new(SPARK_TRAIL_OFFSET * facing.x, 0.0);
        emit_grind_sparks(host, rng, [origin, trail], Vec2::new(-facing.x, 1.0), color);
        session
            .grind_sound
            .keep_alive(host, SoundCue::grind_loop(origin));
    } else {
        body.speed_factors.run = speeds.normal_x;
    }

    if flags.any_vertical() {
        body.speed_factors.climb = 0.0;

        if flags.vine {
            grind_vine(session, body, &speeds, host);
        } else if flags.zero_gravity_pole
            && host.tiles().tile_at(body.primary.pos).has_horizontal_beam()
        {
            body.primary.vel.x = speeds.grind_y * facing.x;
        } else {
            body.primary.vel.y = speeds.grind_y * facing.y;
        }

        emit_grind_sparks(host, rng, body.hands, Vec2::new(facing.x, -facing.y), color);
        session
            .grind_sound
            .keep_alive(host, SoundCue::grind_loop(body.primary.pos));
    } else {
        body.speed_factors.climb = speeds.normal_y;
    }

    session.modality = flags.modality();
    if session.modality != previous {
        debug!("Grind modality: {:?} -> {:?}", previous, session.modality);
    }

    tick.caught_beam = catch_beam(body, input, host);
    cancel_falling_flip(body, input);

    tick
}

/// Top of a vertical pole reached while grinding up it. Returns true if a jump
/// should be triggered.
fn reach_pole_top(
    session: &mut GrindSession,
    body: &mut CharacterBody,
    input: &CharacterInput,
    host: &mut impl GrindHost,
) -> bool {
    if input.jump {
        session.pending_top_of_pole_jump = true;
        debug!("Pole top reached with jump held, launching");
        return true;
    }

    session.pending_top_of_pole_jump = false;
    body.secondary.pos =
        host.tiles().middle_of_tile(body.secondary.pos) + Vec2::new(0.0, POLE_TIP_OFFSET);
    body.secondary.vel = Vec2::ZERO;
    body.primary.vel = body.primary.vel.clamp_length_max(POLE_TIP_MAX_SPEED);
    false
}

fn grind_vine(
    session: &mut GrindSession,
    body: &mut CharacterBody,
    speeds: &GrindSpeeds,
    host: &mut impl GrindHost,
) {
    let Some(mut vine_pos) = body.vine_pos else {
        return;
    };

    let dir = session.last_vine_direction;
    let alignment = dir
        .dot(body.vine_climb_cursor.normalize_or_zero())
        .clamp(-1.0, 1.0);
    let gain = alignment.remap(-1.0, 1.0, 10.0, 3.0);
    body.vine_climb_cursor = (body.vine_climb_cursor + dir * gain).clamp_length_max(VINE_CURSOR_MAX);

    let goal = body.primary.pos + body.vine_climb_cursor;
    let gravity = body.gravity.clamp(0.0, 1.0);
    let vines = host.vines();
    let length = vines.total_length(vine_pos.vine);
    if length <= 0.0 {
        return;
    }

    let before = vines.on_vine_pos(vine_pos);
    let step = vines.climb_on_vine_speed(vine_pos, goal)
        * speeds.grind_vine
        * 2.1_f32.lerp(1.5, gravity)
        / length;
    vine_pos.float_pos = (vine_pos.float_pos + step).clamp(0.0, 1.0);
    debug_assert!((0.0..=1.0).contains(&vine_pos.float_pos));

    let after = vines.on_vine_pos(vine_pos);
    vines.push_at_vine(vine_pos, (before - after) * VINE_PUSH);

    if session.vine_grab_delay == 0 {
        if let Some(switched) = vines.vine_switch(vine_pos, goal, body.primary.rad) {
            debug!("Vine switch {} -> {}", vine_pos.vine, switched.vine);
            vine_pos = switched;
            session.vine_grab_delay = VINE_GRAB_DELAY;
        }
    }

    body.vine_pos = Some(vine_pos);
}

/// Catch a horizontal beam the lower body is falling through.
fn catch_beam(body: &mut CharacterBody, input: &CharacterInput, host: &mut impl GrindHost) -> bool {
    if body.body_mode != BodyMode::Default
        || input.pressing_down()
        || body.primary.vel.y >= 0.0
        || !host.tiles().tile_at(body.secondary.pos).has_horizontal_beam()
    {
        return false;
    }

    let middle = host.tiles().middle_of_tile(body.secondary.pos);
    body.animation = AnimationState::StandOnBeam;
    body.primary.vel.y = 0.0;
    body.secondary.vel.y = 0.0;
    body.secondary.pos.y = middle.y + BEAM_CATCH_OFFSET;
    host.play_sound(SoundCue::once(GrindSound::BeamCatch, body.secondary.pos));
    debug!("Caught beam at {:?}", middle);
    true
}

/// Stop a trick flip from turning into a falling flip once jump is released.
fn cancel_falling_flip(body: &mut CharacterBody, input: &CharacterInput) {
    if body.animation == AnimationState::Flip
        && body.primary.vel.y < FLIP_CANCEL_FALL_SPEED
        && !input.jump
    {
        body.animation = AnimationState::HangFromBeam;
    }
}
