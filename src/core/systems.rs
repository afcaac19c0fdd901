//! Core domain: startup systems.

use bevy::prelude::*;

/// World units per screen pixel; the course is small.
const CAMERA_SCALE: f32 = 0.5;

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: CAMERA_SCALE,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(200.0, 160.0, 0.0),
    ));
}
