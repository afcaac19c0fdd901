//! Grind domain: rail, pole and vine grinding plus trick jumps.
//!
//! Each fixed tick, after the host has moved a character, the controller
//! classifies its locomotion and overrides velocities while grinding. Jump
//! requests then pass through the augmenter, which may turn them into flips.
//! The core only sees the world through [`GrindHost`].

use bevy::prelude::*;

mod classifier;
mod controller;
mod effects;
mod host;
mod jump;
mod session;
mod systems;

#[cfg(test)]
mod tests;

pub use classifier::{
    HORIZONTAL_MIN_SPEED, Modality, ModalityFlags, POLE_DOWN_MIN_SPEED, POLE_UP_MIN_SPEED,
    VINE_MIN_SPEED, ZERO_G_POLE_MIN_SPEED, classify,
};
pub use controller::{
    BEAM_CATCH_OFFSET, FLIP_CANCEL_FALL_SPEED, GrindTick, POLE_TIP_MAX_SPEED, POLE_TIP_OFFSET,
    SPARK_TRAIL_OFFSET, VINE_CURSOR_MAX, VINE_GRAB_DELAY, update_grind,
};
pub use effects::{
    GrindSound, LoopingSound, SPARK_SPEED_MAX, SPARK_SPEED_MIN, SPARKS_PER_ORIGIN, SoundCue,
    SoundEvent, SoundHandle, Spark, SparkEvent, emit_grind_sparks, random_unit_vector,
};
pub use host::GrindHost;
pub use jump::{
    DEFAULT_JUMP, JumpOutcome, PAIN_TRICK_JUMP, TRICK_JUMP, TrickJump, default_jump,
    perform_jump, should_suppress, trick_multiplier,
};
pub use session::{AnimationHistory, GrindSession, is_coyote};
pub use systems::WorldHost;

use crate::core::SimSet;
use systems::{run_grind_controller, run_jump_augmenter};

pub struct GrindPlugin;

impl Plugin for GrindPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SparkEvent>()
            .add_message::<SoundEvent>()
            .add_systems(FixedUpdate, run_grind_controller.in_set(SimSet::Grind))
            .add_systems(FixedUpdate, run_jump_augmenter.in_set(SimSet::Jump));
    }
}
