//! Character domain: the reference host world the grind core runs in.
//!
//! Owns the tile course, vines, the two-part physics bodies, keyboard input,
//! the animation driver and the host's own locomotion.

use bevy::prelude::*;

mod bootstrap;
mod components;
mod effects;
mod resources;
mod systems;
pub mod tiles;
mod vines;


pub use bootstrap::{COURSE, SPAWNS, course_vines, spawn_character};
pub use components::{
    AnimationState, BodyMode, BodyPart, BodyParts, Character, CharacterBody, CharacterInput,
    Chunk, ChunkSlot, GameLayer, GrabbedKind, GrabbedObject, JumpRequest, PlayerControlled,
    SpeedFactors, VinePosition,
};
pub use effects::{EMITTER_FADE_TICKS, Emitter, SoundEmitters, SparkParticle};
pub use resources::HostConfig;
pub use systems::animation::next_animation;
pub use systems::body::{hand_positions, to_per_second, to_per_tick};
pub use systems::collisions::body_mode_for;
pub use systems::movement::{constrain, gravity_step, jump_boost_step, locomote, pole_top};
pub use tiles::{TILE_SIZE, TileKind, TileMap};
pub use vines::{Vine, VineNetwork};

use crate::core::SimSet;
use bootstrap::{spawn_characters, spawn_course};
use effects::{
    draw_vines, play_sounds, relax_vines, spawn_sparks, tick_sound_emitters, update_sparks,
};
use systems::{
    apply_gravity, apply_jump_boost, apply_locomotion, clear_pressed_input, constrain_chunks,
    despawn_orphaned_parts, detect_support, drive_animation, load_bodies, read_input,
    request_host_jumps, store_bodies, toggle_gravity, update_body_mode,
};

pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HostConfig>()
            .init_resource::<TileMap>()
            .init_resource::<VineNetwork>()
            .init_resource::<SoundEmitters>()
            .add_systems(Startup, (spawn_course, spawn_characters).chain())
            .add_systems(Update, (read_input, toggle_gravity, draw_vines))
            .add_systems(FixedUpdate, load_bodies.in_set(SimSet::Input))
            .add_systems(FixedUpdate, detect_support.in_set(SimSet::Sense))
            .add_systems(
                FixedUpdate,
                (drive_animation, update_body_mode)
                    .chain()
                    .in_set(SimSet::Animate),
            )
            .add_systems(
                FixedUpdate,
                (apply_locomotion, request_host_jumps)
                    .chain()
                    .in_set(SimSet::Locomotion),
            )
            .add_systems(
                FixedUpdate,
                (apply_jump_boost, apply_gravity, constrain_chunks, store_bodies)
                    .chain()
                    .in_set(SimSet::Integrate),
            )
            .add_systems(
                FixedUpdate,
                (
                    spawn_sparks,
                    update_sparks,
                    play_sounds,
                    tick_sound_emitters,
                    relax_vines,
                    clear_pressed_input,
                    despawn_orphaned_parts,
                )
                    .in_set(SimSet::Effects),
            );
    }
}
