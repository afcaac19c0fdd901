//! Character domain: host physics and locomotion constants.

use bevy::prelude::*;

/// Numbers the reference host uses for its own locomotion.
/// Speeds are world units per tick.
#[derive(Resource, Debug, Clone)]
pub struct HostConfig {
    pub gravity: f32,
    pub primary_radius: f32,
    pub secondary_radius: f32,
    /// Rest distance between the two body parts
    pub chunk_separation: f32,
    pub run_speed: f32,
    pub air_control: f32,
    pub climb_speed: f32,
    pub vine_climb_speed: f32,
    /// Ticks after losing support in which a jump is still accepted
    pub jump_grace_ticks: u32,
    pub vine_reach: f32,
    /// Height of the lower body above a beam's tile center while standing on it
    pub beam_stand_offset: f32,
    /// Gravity strength below which the body counts as weightless
    pub zero_g_threshold: f32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            gravity: 0.9,
            primary_radius: 9.0,
            secondary_radius: 8.0,
            chunk_separation: 17.0,
            run_speed: 4.2,
            air_control: 0.25,
            climb_speed: 3.0,
            vine_climb_speed: 2.0,
            jump_grace_ticks: 5,
            vine_reach: 14.0,
            beam_stand_offset: 5.0,
            zero_g_threshold: 0.1,
        }
    }
}

impl HostConfig {
    pub fn is_weightless(&self, gravity: f32) -> bool {
        gravity < self.zero_g_threshold
    }
}
