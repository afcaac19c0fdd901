//! Grind domain: sparks and sound cues emitted toward the host.

use std::f32::consts::TAU;

use bevy::ecs::message::Message;
use bevy::prelude::*;
use rand::Rng;

use super::host::GrindHost;

/// Min/max spark speed in world units per tick.
pub const SPARK_SPEED_MIN: f32 = 4.0;
pub const SPARK_SPEED_MAX: f32 = 30.0;
pub const SPARK_SIZE: (f32, f32) = (2.0, 4.0);
/// Sparks per burst origin.
pub const SPARKS_PER_ORIGIN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrindSound {
    GrindLoop,
    BeamCatch,
    FlipJump,
    BoostedJump,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub sound: GrindSound,
    pub position: Vec2,
    pub volume: f32,
    pub pitch: f32,
    pub looping: bool,
}

impl SoundCue {
    pub fn once(sound: GrindSound, position: Vec2) -> Self {
        Self {
            sound,
            position,
            volume: 1.0,
            pitch: 1.0,
            looping: false,
        }
    }

    pub fn grind_loop(position: Vec2) -> Self {
        Self {
            sound: GrindSound::GrindLoop,
            position,
            volume: 0.6,
            pitch: 1.0,
            looping: true,
        }
    }
}

/// Host-issued identity of a playing sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u64);

/// A transient particle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Color,
    pub size: (f32, f32),
}

#[derive(Debug)]
pub struct SparkEvent(pub Spark);

impl Message for SparkEvent {}

#[derive(Debug)]
pub struct SoundEvent(pub SoundCue);

impl Message for SoundEvent {}

/// The one looping grind sound a session owns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopingSound {
    handle: Option<SoundHandle>,
}

impl LoopingSound {
    pub fn handle(&self) -> Option<SoundHandle> {
        self.handle
    }

    /// Refresh the current emitter, or start a new one if the host has let it go.
    pub fn keep_alive(&mut self, host: &mut impl GrindHost, cue: SoundCue) {
        match self.handle {
            Some(handle) if host.sound_alive(handle) => host.refresh_loop(handle, cue.position),
            _ => self.handle = Some(host.start_loop(cue)),
        }
    }
}

pub fn random_unit_vector(rng: &mut impl Rng) -> Vec2 {
    Vec2::from_angle(rng.random_range(0.0..TAU))
}

/// Emit [`SPARKS_PER_ORIGIN`] sparks at each origin. Directions are random unit
/// vectors folded into the quadrant given by the signs of `bias`.
pub fn emit_grind_sparks(
    host: &mut impl GrindHost,
    rng: &mut impl Rng,
    origins: [Vec2; 2],
    bias: Vec2,
    color: Color,
) {
    for origin in origins {
        for _ in 0..SPARKS_PER_ORIGIN {
            let dir = random_unit_vector(rng);
            let dir = Vec2::new(dir.x.abs() * bias.x.signum(), dir.y.abs() * bias.y.signum());
            host.spawn_spark(Spark {
                position: origin,
                velocity: dir * rng.random_range(SPARK_SPEED_MIN..=SPARK_SPEED_MAX),
                color,
                size: SPARK_SIZE,
            });
        }
    }
}
