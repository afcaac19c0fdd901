//! Grind domain: what the grind core needs from the world around a character.

use bevy::prelude::*;

use crate::character::{TileMap, VineNetwork};

use super::effects::{SoundCue, SoundHandle, Spark};

pub trait GrindHost {
    fn tiles(&self) -> &TileMap;

    fn vines(&mut self) -> &mut VineNetwork;

    fn spawn_spark(&mut self, spark: Spark);

    /// Fire-and-forget sound.
    fn play_sound(&mut self, cue: SoundCue);

    /// Whether a looping sound is still playing and not marked for deletion.
    fn sound_alive(&self, handle: SoundHandle) -> bool;

    fn start_loop(&mut self, cue: SoundCue) -> SoundHandle;

    /// Keep a looping sound playing for another tick and move it.
    fn refresh_loop(&mut self, handle: SoundHandle, position: Vec2);
}
