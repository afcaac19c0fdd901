//! Grind domain: running the grind core against the ECS world.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::character::{
    BodyMode, CharacterBody, CharacterInput, JumpRequest, SoundEmitters, TileMap, VineNetwork,
};
use crate::core::SimRng;
use crate::tuning::GrindTuning;

use super::controller::update_grind;
use super::effects::{SoundCue, SoundEvent, SoundHandle, Spark, SparkEvent};
use super::host::GrindHost;
use super::jump::{JumpOutcome, perform_jump};
use super::session::GrindSession;

/// [`GrindHost`] over the world resources. Sparks and one-shot sounds are
/// buffered and sent as messages by [`WorldHost::flush`].
pub struct WorldHost<'a> {
    tiles: &'a TileMap,
    vines: &'a mut VineNetwork,
    emitters: &'a mut SoundEmitters,
    sparks: Vec<Spark>,
    sounds: Vec<SoundCue>,
}

impl<'a> WorldHost<'a> {
    pub fn new(
        tiles: &'a TileMap,
        vines: &'a mut VineNetwork,
        emitters: &'a mut SoundEmitters,
    ) -> Self {
        Self {
            tiles,
            vines,
            emitters,
            sparks: Vec::new(),
            sounds: Vec::new(),
        }
    }

    pub fn flush(
        self,
        spark_events: &mut MessageWriter<SparkEvent>,
        sound_events: &mut MessageWriter<SoundEvent>,
    ) {
        for spark in self.sparks {
            spark_events.write(SparkEvent(spark));
        }
        for cue in self.sounds {
            sound_events.write(SoundEvent(cue));
        }
    }
}

impl GrindHost for WorldHost<'_> {
    fn tiles(&self) -> &TileMap {
        self.tiles
    }

    fn vines(&mut self) -> &mut VineNetwork {
        self.vines
    }

    fn spawn_spark(&mut self, spark: Spark) {
        self.sparks.push(spark);
    }

    fn play_sound(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }

    fn sound_alive(&self, handle: SoundHandle) -> bool {
        self.emitters.is_alive(handle)
    }

    fn start_loop(&mut self, cue: SoundCue) -> SoundHandle {
        self.emitters.start(cue)
    }

    fn refresh_loop(&mut self, handle: SoundHandle, position: Vec2) {
        self.emitters.refresh(handle, position);
    }
}

pub(crate) fn run_grind_controller(
    tiles: Res<TileMap>,
    mut vines: ResMut<VineNetwork>,
    mut emitters: ResMut<SoundEmitters>,
    mut rng: ResMut<SimRng>,
    mut spark_events: MessageWriter<SparkEvent>,
    mut sound_events: MessageWriter<SoundEvent>,
    mut query: Query<(
        &CharacterInput,
        &GrindTuning,
        &mut GrindSession,
        &mut CharacterBody,
        &mut JumpRequest,
    )>,
) {
    let mut host = WorldHost::new(&tiles, &mut vines, &mut emitters);

    for (input, tuning, mut session, mut body, mut request) in &mut query {
        let tick = update_grind(
            &mut session,
            &mut body,
            input,
            tuning,
            &mut host,
            &mut rng.rng,
        );
        if tick.jump_requested {
            request.0 = true;
        }
        // A caught beam supports the body for the rest of this tick
        if tick.caught_beam {
            body.body_mode = BodyMode::ClimbingOnBeam;
        }
    }

    host.flush(&mut spark_events, &mut sound_events);
}

/// Consume this tick's jump requests through the trick-jump augmenter.
pub(crate) fn run_jump_augmenter(
    tiles: Res<TileMap>,
    mut vines: ResMut<VineNetwork>,
    mut emitters: ResMut<SoundEmitters>,
    mut spark_events: MessageWriter<SparkEvent>,
    mut sound_events: MessageWriter<SoundEvent>,
    mut query: Query<(
        &CharacterInput,
        &GrindTuning,
        &mut GrindSession,
        &mut CharacterBody,
        &mut JumpRequest,
    )>,
) {
    let mut host = WorldHost::new(&tiles, &mut vines, &mut emitters);

    for (input, tuning, mut session, mut body, mut request) in &mut query {
        if !std::mem::take(&mut request.0) {
            continue;
        }
        let outcome = perform_jump(&mut session, &mut body, input, tuning, &mut host);
        if outcome == JumpOutcome::Plain {
            debug!("Jump at ({:.0}, {:.0})", body.primary.pos.x, body.primary.pos.y);
        }
    }

    host.flush(&mut spark_events, &mut sound_events);
}
