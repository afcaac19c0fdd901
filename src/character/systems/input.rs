//! Character domain: keyboard sampling for the player-controlled character.

use bevy::prelude::*;

use crate::character::{CharacterBody, CharacterInput, PlayerControlled};

const GRIND_KEY: KeyCode = KeyCode::ShiftLeft;
const TOGGLE_GRIND_KEY: KeyCode = KeyCode::KeyG;
const TOGGLE_GRAVITY_KEY: KeyCode = KeyCode::KeyZ;

/// Runs every frame; the fixed-rate pipeline consumes the result.
pub(crate) fn read_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut CharacterInput, With<PlayerControlled>>,
) {
    // Horizontal axis
    let mut x = 0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1;
    }

    // Vertical axis (climbing, dropping through beams)
    let mut y = 0;
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        y -= 1;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        y += 1;
    }

    for mut input in &mut query {
        input.x = x;
        input.y = y;
        input.jump = keyboard.pressed(KeyCode::Space) || keyboard.pressed(KeyCode::KeyK);
        // Cleared once a simulation tick has seen it
        input.jump_pressed |=
            keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::KeyK);
        input.grind = keyboard.pressed(GRIND_KEY);

        if keyboard.just_pressed(TOGGLE_GRIND_KEY) {
            input.grind_latched = !input.grind_latched;
            info!("Grind toggle: {}", input.grind_latched);
        }
    }
}

/// Flip the player between normal gravity and weightlessness.
pub(crate) fn toggle_gravity(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut CharacterBody, With<PlayerControlled>>,
) {
    if !keyboard.just_pressed(TOGGLE_GRAVITY_KEY) {
        return;
    }

    for mut body in &mut query {
        body.gravity = if body.gravity > 0.5 { 0.0 } else { 1.0 };
        info!("Gravity set to {}", body.gravity);
    }
}

pub(crate) fn clear_pressed_input(mut query: Query<&mut CharacterInput>) {
    for mut input in &mut query {
        input.jump_pressed = false;
    }
}
