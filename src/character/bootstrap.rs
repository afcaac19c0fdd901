//! Character domain: building the demo course and spawning characters.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::character::tiles::TILE_SIZE;
use crate::character::{
    BodyPart, BodyParts, Character, CharacterBody, CharacterInput, Chunk, ChunkSlot, GameLayer,
    HostConfig, JumpRequest, PlayerControlled, TileKind, TileMap, Vine, VineNetwork,
};
use crate::grind::GrindSession;
use crate::tuning::{GrindTuning, TuningRegistry};

/// The demo course, top row first.
pub const COURSE: [&str; 16] = [
    "....................",
    "....................",
    "..........|.........",
    "..--------+-------..",
    "..........|.........",
    "..........|.........",
    "...|......|.........",
    "...|......|.........",
    "...|...........|....",
    "...|..-------..|....",
    "...|...........|....",
    "...|...........|....",
    "...|...........|....",
    "...|...........|....",
    "....................",
    "####################",
];

/// Characters placed on the course: (id, lower body position, keyboard controlled).
pub const SPAWNS: [(&str, Vec2, bool); 3] = [
    ("grinder", Vec2::new(30.0, 40.0), true),
    ("sprinter", Vec2::new(130.0, 40.0), false),
    ("walker", Vec2::new(250.0, 40.0), false),
];

pub fn course_vines() -> Vec<Vine> {
    vec![
        Vine::new(vec![
            Vec2::new(350.0, 300.0),
            Vec2::new(352.0, 220.0),
            Vec2::new(348.0, 140.0),
        ]),
        Vine::new(vec![
            Vec2::new(366.0, 300.0),
            Vec2::new(368.0, 210.0),
            Vec2::new(364.0, 110.0),
        ]),
    ]
}

pub(crate) fn spawn_course(mut commands: Commands) {
    let tiles = TileMap::from_ascii(&COURSE);
    let mut vines = VineNetwork::default();
    for vine in course_vines() {
        vines.add(vine);
    }

    let terrain_layers = CollisionLayers::new(GameLayer::Terrain, [GameLayer::Character]);
    let ground_color = Color::srgb(0.3, 0.3, 0.35);
    let beam_color = Color::srgb(0.55, 0.5, 0.45);

    let runs = tiles.solid_runs();
    for (start, length) in &runs {
        let width = *length as f32 * TILE_SIZE;
        let center = tiles.tile_center(*start) + Vec2::new((width - TILE_SIZE) * 0.5, 0.0);
        commands.spawn((
            Sprite {
                color: ground_color,
                custom_size: Some(Vec2::new(width, TILE_SIZE)),
                ..default()
            },
            Transform::from_translation(center.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(width, TILE_SIZE),
            terrain_layers,
        ));
    }

    for (tile, kind) in tiles.iter() {
        let center = tiles.tile_center(tile).extend(-1.0);
        if kind.has_horizontal_beam() {
            commands.spawn((
                Sprite {
                    color: beam_color,
                    custom_size: Some(Vec2::new(TILE_SIZE, 3.0)),
                    ..default()
                },
                Transform::from_translation(center),
            ));
        }
        if kind.has_vertical_beam() {
            commands.spawn((
                Sprite {
                    color: beam_color,
                    custom_size: Some(Vec2::new(3.0, TILE_SIZE)),
                    ..default()
                },
                Transform::from_translation(center),
            ));
        }
    }

    let beams = tiles
        .iter()
        .filter(|(_, kind)| *kind != TileKind::Air && *kind != TileKind::Solid)
        .count();
    info!(
        "Course built: {}x{} tiles, {} terrain colliders, {} beam tiles, {} vines",
        tiles.width(),
        tiles.height(),
        runs.len(),
        beams,
        vines.vines().len()
    );

    commands.insert_resource(tiles);
    commands.insert_resource(vines);
}

pub(crate) fn spawn_characters(
    mut commands: Commands,
    config: Res<HostConfig>,
    registry: Option<Res<TuningRegistry>>,
) {
    for (id, position, player) in SPAWNS {
        let tuning = match &registry {
            Some(registry) => registry.tuning_for(id),
            None => {
                warn!("TuningRegistry not available, '{}' spawns untuned", id);
                GrindTuning::default()
            }
        };

        let entity = spawn_character(&mut commands, &config, id, position, tuning);
        if player {
            commands.entity(entity).insert(PlayerControlled);
        }
        info!("Spawned character '{}' at {:?} (player={})", id, position, player);
    }
}

/// Spawn a character root and its two physics body parts.
pub fn spawn_character(
    commands: &mut Commands,
    config: &HostConfig,
    id: &str,
    position: Vec2,
    tuning: GrindTuning,
) -> Entity {
    let primary = Chunk::new(
        position + Vec2::new(0.0, config.chunk_separation),
        config.primary_radius,
    );
    let secondary = Chunk::new(position, config.secondary_radius);

    let root = commands
        .spawn((
            Character { id: id.to_string() },
            CharacterBody::new(primary, secondary),
            CharacterInput::default(),
            JumpRequest::default(),
            GrindSession::default(),
            tuning,
        ))
        .id();

    let color = if id == "grinder" {
        Color::srgb(0.95, 0.9, 0.85)
    } else {
        Color::srgb(0.75, 0.8, 0.9)
    };

    let parts = [
        (ChunkSlot::Primary, primary),
        (ChunkSlot::Secondary, secondary),
    ]
    .map(|(slot, chunk)| {
        commands
            .spawn((
                BodyPart { owner: root, slot },
                Sprite {
                    color,
                    custom_size: Some(Vec2::splat(chunk.rad * 2.0)),
                    ..default()
                },
                Transform::from_translation(chunk.pos.extend(1.0)),
                RigidBody::Dynamic,
                Collider::circle(chunk.rad),
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::default(),
                GravityScale(0.0), // Gravity is applied by the character pipeline
                Friction::new(0.0),
                CollisionLayers::new(GameLayer::Character, [GameLayer::Terrain]),
            ))
            .id()
    });

    commands.entity(root).insert(BodyParts {
        primary: parts[0],
        secondary: parts[1],
    });

    root
}
