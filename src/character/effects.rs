//! Character domain: the host side of grind effects.
//!
//! Sparks become short-lived sprites. Sounds have no audio backend here; cues
//! are logged and looping emitters are tracked so the grind core can keep one
//! alive across ticks.

use std::collections::HashMap;

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::character::VineNetwork;
use crate::grind::{SoundCue, SoundEvent, SoundHandle, SparkEvent};

/// Ticks a looping emitter takes to fade out once it stops being refreshed.
pub const EMITTER_FADE_TICKS: u32 = 8;
pub const SPARK_LIFETIME_TICKS: u32 = 8;
pub const SPARK_DRAG: f32 = 0.85;
pub const SPARK_GRAVITY: f32 = 0.5;
/// Per-tick factor vine sway settles by.
pub const VINE_RELAX: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emitter {
    pub cue: SoundCue,
    pub ticks_since_refresh: u32,
    pub marked_for_deletion: bool,
    /// Fade multiplier on the cue volume, 1 while refreshed.
    pub fade: f32,
}

/// Looping sounds currently playing.
#[derive(Resource, Debug, Default)]
pub struct SoundEmitters {
    emitters: HashMap<SoundHandle, Emitter>,
    next_id: u64,
}

impl SoundEmitters {
    pub fn start(&mut self, cue: SoundCue) -> SoundHandle {
        let handle = SoundHandle(self.next_id);
        self.next_id += 1;
        self.emitters.insert(
            handle,
            Emitter {
                cue,
                ticks_since_refresh: 0,
                marked_for_deletion: false,
                fade: 1.0,
            },
        );
        debug!("Loop {:?} started as {:?}", cue.sound, handle);
        handle
    }

    /// Keep an emitter playing for another tick. Emitters already fading are left alone.
    pub fn refresh(&mut self, handle: SoundHandle, position: Vec2) {
        if let Some(emitter) = self.emitters.get_mut(&handle) {
            if !emitter.marked_for_deletion {
                emitter.ticks_since_refresh = 0;
                emitter.cue.position = position;
            }
        }
    }

    pub fn is_alive(&self, handle: SoundHandle) -> bool {
        self.emitters
            .get(&handle)
            .is_some_and(|emitter| !emitter.marked_for_deletion)
    }

    pub fn get(&self, handle: SoundHandle) -> Option<&Emitter> {
        self.emitters.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Advance one tick: unrefreshed emitters are marked and faded, silent ones
    /// removed. Returns the removed handles.
    pub fn tick(&mut self) -> Vec<SoundHandle> {
        for emitter in self.emitters.values_mut() {
            emitter.ticks_since_refresh += 1;
            if emitter.ticks_since_refresh > 1 {
                emitter.marked_for_deletion = true;
            }
            if emitter.marked_for_deletion {
                emitter.fade -= 1.0 / EMITTER_FADE_TICKS as f32;
            }
        }

        let removed: Vec<SoundHandle> = self
            .emitters
            .iter()
            .filter(|(_, emitter)| emitter.fade <= 0.0)
            .map(|(handle, _)| *handle)
            .collect();
        for handle in &removed {
            self.emitters.remove(handle);
        }
        removed
    }
}

/// A spark sprite in flight.
#[derive(Component, Debug)]
pub struct SparkParticle {
    /// World units per tick
    pub velocity: Vec2,
    pub ticks_left: u32,
}

pub(crate) fn spawn_sparks(mut commands: Commands, mut events: MessageReader<SparkEvent>) {
    for SparkEvent(spark) in events.read() {
        let (width, length) = spark.size;
        commands.spawn((
            SparkParticle {
                velocity: spark.velocity,
                ticks_left: SPARK_LIFETIME_TICKS,
            },
            Sprite {
                color: spark.color,
                custom_size: Some(Vec2::new(length, width)),
                ..default()
            },
            Transform::from_translation(spark.position.extend(5.0))
                .with_rotation(Quat::from_rotation_z(spark.velocity.to_angle())),
        ));
    }
}

pub(crate) fn update_sparks(
    mut commands: Commands,
    mut query: Query<(Entity, &mut SparkParticle, &mut Transform)>,
) {
    for (entity, mut spark, mut transform) in &mut query {
        spark.ticks_left = spark.ticks_left.saturating_sub(1);
        if spark.ticks_left == 0 {
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation += spark.velocity.extend(0.0);
        spark.velocity = spark.velocity * SPARK_DRAG - Vec2::new(0.0, SPARK_GRAVITY);
    }
}

pub(crate) fn play_sounds(mut events: MessageReader<SoundEvent>) {
    for SoundEvent(cue) in events.read() {
        debug!(
            "Sound {:?} at ({:.0}, {:.0}) volume={:.2} pitch={:.2}",
            cue.sound, cue.position.x, cue.position.y, cue.volume, cue.pitch
        );
    }
}

pub(crate) fn tick_sound_emitters(mut emitters: ResMut<SoundEmitters>) {
    for handle in emitters.tick() {
        debug!("Loop {:?} faded out", handle);
    }
}

pub(crate) fn relax_vines(mut vines: ResMut<VineNetwork>) {
    vines.relax(VINE_RELAX);
}

/// Samples per vine when drawing it.
const VINE_DRAW_SEGMENTS: usize = 16;

pub(crate) fn draw_vines(vines: Res<VineNetwork>, mut gizmos: Gizmos) {
    let color = Color::srgb(0.35, 0.6, 0.3);
    for vine in vines.vines() {
        let points = (0..=VINE_DRAW_SEGMENTS)
            .map(|i| vine.point_at(i as f32 / VINE_DRAW_SEGMENTS as f32));
        gizmos.linestrip_2d(points, color);
    }
}
