//! Debug overlay for tuning grind behaviour by eye.
//!
//! Features:
//! - F1 toggles gizmo drawing of tiles, body parts, hands and the vine cursor
//! - Ctrl+D toggles a player info panel
//! - Ctrl+S reseeds the simulation rng
//! - Ctrl+A / Ctrl+P toggle adrenaline and pain jumps
//! - Ctrl+R resets the player to its spawn point

use bevy::prelude::*;

mod state;
mod systems;
mod ui;

pub use state::DebugState;
pub use ui::DebugInfoOverlay;

use systems::{
    draw_body_gizmos, draw_tile_gizmos, handle_debug_hotkeys, toggle_debug_overlay,
    update_debug_info_overlay, update_status_message,
};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>()
            .add_systems(
                Update,
                (
                    toggle_debug_overlay,
                    handle_debug_hotkeys,
                    update_status_message,
                    update_debug_info_overlay,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (draw_tile_gizmos, draw_body_gizmos)
                    .run_if(|state: Res<DebugState>| state.overlay_visible),
            );
    }
}
