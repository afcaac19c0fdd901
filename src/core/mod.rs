//! Core domain: simulation clock, system ordering and shared resources.

use bevy::prelude::*;

mod resources;
mod state;
mod systems;

pub use resources::SimRng;
pub use state::{SimSet, TICK_RATE};

use systems::setup_camera;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(TICK_RATE))
            .init_resource::<SimRng>()
            .configure_sets(
                FixedUpdate,
                (
                    SimSet::Input,
                    SimSet::Sense,
                    SimSet::Animate,
                    SimSet::Locomotion,
                    SimSet::Grind,
                    SimSet::Jump,
                    SimSet::Integrate,
                    SimSet::Effects,
                )
                    .chain(),
            )
            .add_systems(Startup, setup_camera);
    }
}
