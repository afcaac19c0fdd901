//! Core domain: per-tick pipeline stages.

use bevy::prelude::*;

/// Simulation ticks per second. All per-tick velocities in the crate assume this rate.
pub const TICK_RATE: f64 = 40.0;

/// Ordered stages of one simulation tick, chained in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Sample input and copy physics state into character bodies.
    Input,
    /// Ground contact detection.
    Sense,
    /// Host animation state machine, then body mode from its result.
    Animate,
    /// Host locomotion driven by the speed factors.
    Locomotion,
    /// Grind classification and corrections.
    Grind,
    /// Jump requests and trick-jump augmentation.
    Jump,
    /// Gravity, jump boost, chunk constraint and write-back to physics.
    Integrate,
    /// Sparks, sound emitters and vine relaxation.
    Effects,
}
