//! Character domain: system modules for the reference host.

pub(crate) mod animation;
pub(crate) mod body;
pub(crate) mod collisions;
pub(crate) mod input;
pub(crate) mod movement;

pub(crate) use animation::drive_animation;
pub(crate) use body::{despawn_orphaned_parts, load_bodies, store_bodies};
pub(crate) use collisions::{detect_support, update_body_mode};
pub(crate) use input::{clear_pressed_input, read_input, toggle_gravity};
pub(crate) use movement::{
    apply_gravity, apply_jump_boost, apply_locomotion, constrain_chunks, request_host_jumps,
};
