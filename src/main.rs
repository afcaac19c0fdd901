mod character;
mod core;
#[cfg(feature = "dev-tools")]
mod debug;
mod grind;
mod tuning;

use avian2d::prelude::*;
use bevy::prelude::*;

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Rail Grind".to_string(),
            resolution: (960, 640).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(PhysicsPlugins::default())
    .add_plugins((
        core::CorePlugin,
        tuning::TuningPlugin,
        character::CharacterPlugin,
        grind::GrindPlugin,
    ));

    #[cfg(feature = "dev-tools")]
    app.add_plugins(debug::DebugPlugin);

    app.run();
}
