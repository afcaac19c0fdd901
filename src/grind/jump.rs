//! Grind domain: the character's jump, with trick-jump augmentation.
//!
//! [`perform_jump`] is the only entry point for jumping. It runs the default
//! jump and then, when a grind or coyote window is active, turns it into a
//! trick flip.

use bevy::math::FloatExt;
use bevy::prelude::*;

use crate::character::{AnimationState, CharacterBody, CharacterInput, GrabbedKind, GrabbedObject};
use crate::tuning::GrindTuning;

use super::effects::{GrindSound, SoundCue};
use super::host::GrindHost;
use super::session::{GrindSession, is_coyote};

/// Default jump velocities for (primary, secondary) and the boost that decays over the ascent.
pub const DEFAULT_JUMP: (f32, f32) = (6.0, 5.0);
pub const DEFAULT_JUMP_BOOST: f32 = 6.0;
pub const TRICK_JUMP: (f32, f32) = (9.0, 7.0);
pub const PAIN_TRICK_JUMP: (f32, f32) = (4.0, 3.0);
pub const MAX_ADRENALINE_MULTIPLIER: f32 = 1.15;
/// Grabbed objects heavier than this add to the trick multiplier.
pub const HEAVY_MASS: f32 = 0.2;
pub const HEAVY_MASS_SCALE: f32 = 1.5;
pub const MAX_HEAVY_BONUS: f32 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpOutcome {
    /// Swallowed; nothing changed.
    Suppressed,
    /// Default jump only.
    Plain,
    Trick(TrickJump),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrickJump {
    pub coyote: bool,
    pub multiplier: f32,
}

/// The host's ordinary jump.
pub fn default_jump(body: &mut CharacterBody) {
    body.primary.vel.y = DEFAULT_JUMP.0;
    body.secondary.vel.y = DEFAULT_JUMP.1;
    body.jump_boost = DEFAULT_JUMP_BOOST;
    body.can_jump = 0;
    if body.animation.is_supported() {
        body.animation = AnimationState::None;
    }
    body.vine_pos = None;
}

/// Trick-jump strength from adrenaline and what the character is carrying.
pub fn trick_multiplier(adrenaline: f32, grabbed: Option<GrabbedObject>) -> f32 {
    let mut multiplier = 1.0_f32.lerp(MAX_ADRENALINE_MULTIPLIER, adrenaline.clamp(0.0, 1.0));

    if let Some(object) = grabbed {
        if object.kind != GrabbedKind::Pup && object.mass > HEAVY_MASS {
            multiplier += ((object.mass - HEAVY_MASS) * HEAVY_MASS_SCALE).min(MAX_HEAVY_BONUS);
        }
    }

    multiplier
}

/// Whether a jump right now should be swallowed: climbing a pole, aiming up,
/// no sideways intent and no launch pending from the pole top.
pub fn should_suppress(session: &GrindSession, input: &CharacterInput) -> bool {
    session.flags().vertical_pole
        && !session.pending_top_of_pole_jump
        && input.x == 0
        && session.last_facing.y > 0
}

pub fn perform_jump(
    session: &mut GrindSession,
    body: &mut CharacterBody,
    input: &CharacterInput,
    tuning: &GrindTuning,
    host: &mut impl GrindHost,
) -> JumpOutcome {
    let Some(trick) = tuning.trick() else {
        default_jump(body);
        return JumpOutcome::Plain;
    };

    if should_suppress(session, input) {
        debug!("Jump suppressed on pole");
        return JumpOutcome::Suppressed;
    }

    default_jump(body);

    let coyote = is_coyote(&session.history, body.body_mode);
    if !(coyote || session.flags().horizontal || session.pending_top_of_pole_jump)
    {
        return JumpOutcome::Plain;
    }

    let multiplier = trick_multiplier(body.adrenaline, body.grabbed);
    let (primary, secondary) = if body.pain_jump {
        PAIN_TRICK_JUMP
    } else {
        TRICK_JUMP
    };
    body.primary.vel.y = primary * multiplier;
    body.secondary.vel.y = secondary * multiplier;
    body.slide_direction = session.last_facing.x;

    if coyote {
        let boost = trick.coyote_boost * body.slide_direction as f32;
        body.primary.vel.x += boost;
        body.secondary.vel.x += boost;
        host.play_sound(SoundCue::once(GrindSound::BoostedJump, body.primary.pos));
    } else {
        host.play_sound(SoundCue::once(GrindSound::FlipJump, body.primary.pos));
    }

    body.jump_boost *= trick.super_jump;
    body.animation = AnimationState::Flip;
    body.slide_counter = 0;
    session.pending_top_of_pole_jump = false;

    debug!(
        "Trick jump: coyote={}, multiplier={:.2}, modality={:?}",
        coyote, multiplier, session.modality
    );

    JumpOutcome::Trick(TrickJump { coyote, multiplier })
}
