//! Debug domain: hotkeys, gizmo drawing and the info panel.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::character::{
    AnimationState, BodyParts, CharacterBody, CharacterInput, PlayerControlled, SPAWNS,
    TILE_SIZE, TileKind, TileMap, to_per_second,
};
use crate::core::SimRng;
use crate::debug::state::DebugState;
use crate::debug::ui::{DebugInfoOverlay, spawn_debug_info_overlay};
use crate::grind::GrindSession;

/// Toggle gizmo drawing with F1 or backtick key
pub(crate) fn toggle_debug_overlay(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
) {
    if keyboard.just_pressed(KeyCode::F1) || keyboard.just_pressed(KeyCode::Backquote) {
        debug_state.overlay_visible = !debug_state.overlay_visible;
        info!("[DEBUG] Overlay {}", debug_state.overlay_visible);
    }
}

/// Handle keyboard shortcuts for debug actions
pub(crate) fn handle_debug_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    mut sim_rng: ResMut<SimRng>,
    mut players: Query<(&BodyParts, &mut CharacterBody), With<PlayerControlled>>,
    mut parts: Query<(&mut Position, &mut LinearVelocity)>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl {
        return;
    }

    // Ctrl+D: Toggle info panel
    if keyboard.just_pressed(KeyCode::KeyD) {
        debug_state.show_info = !debug_state.show_info;
        info!("[DEBUG] Info panel {}", debug_state.show_info);
    }

    // Ctrl+S: Reseed the simulation rng
    if keyboard.just_pressed(KeyCode::KeyS) {
        let seed = rand::random::<u64>();
        *sim_rng = SimRng::from_seed(seed);
        debug_state.set_message(format!("Seed: {}", seed), 3.0);
        info!("[DEBUG] Seed set to {}", seed);
    }

    for (body_parts, mut body) in &mut players {
        // Ctrl+A: Max out or clear adrenaline
        if keyboard.just_pressed(KeyCode::KeyA) {
            body.adrenaline = if body.adrenaline > 0.5 { 0.0 } else { 1.0 };
            debug_state.set_message(format!("Adrenaline: {}", body.adrenaline), 2.0);
        }

        // Ctrl+P: Toggle pain jumps
        if keyboard.just_pressed(KeyCode::KeyP) {
            body.pain_jump = !body.pain_jump;
            debug_state.set_message(format!("Pain jump: {}", body.pain_jump), 2.0);
        }

        // Ctrl+R: Back to the spawn point
        if keyboard.just_pressed(KeyCode::KeyR) {
            let (_, spawn, _) = SPAWNS[0];
            let separation = body.primary.pos.distance(body.secondary.pos);
            body.animation = AnimationState::None;
            body.vine_pos = None;
            for (entity, pos) in [
                (body_parts.primary, spawn + Vec2::new(0.0, separation)),
                (body_parts.secondary, spawn),
            ] {
                if let Ok((mut position, mut velocity)) = parts.get_mut(entity) {
                    position.0 = pos;
                    velocity.0 = Vec2::ZERO;
                }
            }
            debug_state.set_message("Reset to spawn", 2.0);
            info!("[DEBUG] Player reset to {:?}", spawn);
        }
    }
}

/// Update status message timer and fade out
pub(crate) fn update_status_message(time: Res<Time>, mut debug_state: ResMut<DebugState>) {
    if let Some((_, ref mut duration)) = debug_state.status_message {
        *duration -= time.delta_secs();
        if *duration <= 0.0 {
            debug_state.status_message = None;
        }
    }
}

pub(crate) fn draw_tile_gizmos(tiles: Res<TileMap>, mut gizmos: Gizmos) {
    let beam = Color::srgba(1.0, 0.8, 0.3, 0.5);
    let solid = Color::srgba(0.5, 0.5, 0.6, 0.3);
    for (tile, kind) in tiles.iter() {
        let color = if kind.has_beam() {
            beam
        } else if kind == TileKind::Solid {
            solid
        } else {
            continue;
        };
        gizmos.rect_2d(tiles.tile_center(tile), Vec2::splat(TILE_SIZE), color);
    }
}

pub(crate) fn draw_body_gizmos(
    query: Query<(&CharacterBody, &GrindSession)>,
    mut gizmos: Gizmos,
) {
    for (body, session) in &query {
        let color = if session.is_grinding() {
            Color::srgb(1.0, 0.5, 0.1)
        } else {
            Color::srgb(0.3, 0.8, 1.0)
        };

        for chunk in [&body.primary, &body.secondary] {
            gizmos.circle_2d(chunk.pos, chunk.rad, color);
            gizmos.line_2d(chunk.pos, chunk.pos + chunk.vel * 4.0, Color::WHITE);
        }
        for hand in body.hands {
            gizmos.circle_2d(hand, 2.0, Color::srgb(0.9, 0.9, 0.2));
        }

        if body.animation == AnimationState::VineGrab {
            gizmos.line_2d(
                body.primary.pos,
                body.primary.pos + body.vine_climb_cursor,
                Color::srgb(0.4, 1.0, 0.4),
            );
        }
    }
}

/// Update the info panel with current player state
pub(crate) fn update_debug_info_overlay(
    mut commands: Commands,
    debug_state: Res<DebugState>,
    sim_rng: Res<SimRng>,
    player_query: Query<(&CharacterBody, &CharacterInput, &GrindSession), With<PlayerControlled>>,
    mut overlay_query: Query<&mut Text, With<DebugInfoOverlay>>,
    existing_overlay: Query<Entity, With<DebugInfoOverlay>>,
) {
    if !debug_state.show_info {
        // Cleanup overlay if it exists
        for entity in &existing_overlay {
            commands.entity(entity).despawn();
        }
        return;
    }

    // Ensure overlay exists
    if existing_overlay.is_empty() {
        spawn_debug_info_overlay(&mut commands);
        return;
    }

    if let (Some((body, input, session)), Ok(mut text)) =
        (player_query.iter().next(), overlay_query.single_mut())
    {
        let status = debug_state
            .status_message
            .as_ref()
            .map(|(message, _)| message.as_str())
            .unwrap_or("");
        let speed = to_per_second(body.primary.vel);
        **text = format!(
            "Pos: ({:.0}, {:.0})\nSpeed: {:.0} u/s\nAnim: {:?}\nMode: {:?}\nGrind: {:?} (latched={})\nFacing: {:?}\nPole jump pending: {}\nGrind loop: {:?}\nCan jump: {}\nSeed: {}\n{}",
            body.primary.pos.x,
            body.primary.pos.y,
            speed.length(),
            body.animation,
            body.body_mode,
            session.modality,
            input.grind_latched,
            session.last_facing,
            session.pending_top_of_pole_jump,
            session.grind_sound.handle(),
            body.can_jump,
            sim_rng.seed,
            status
        );
    }
}
