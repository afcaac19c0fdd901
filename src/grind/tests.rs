//! Grind domain: tests for classification, the controller and trick jumps.

use std::collections::HashSet;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::systems::run_grind_controller;
use super::*;
use crate::character::{
    AnimationState, BodyMode, CharacterBody, CharacterInput, Chunk, GrabbedKind, GrabbedObject,
    JumpRequest, SoundEmitters, SpeedFactors, TileKind, TileMap, Vine, VineNetwork, VinePosition,
};
use crate::core::SimRng;
use crate::tuning::{GrindTuning, TuningDef};

// -----------------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------------

/// Host that records everything the core asks of it.
#[derive(Default)]
struct RecordingHost {
    tiles: TileMap,
    vines: VineNetwork,
    sparks: Vec<Spark>,
    sounds: Vec<SoundCue>,
    loops_started: Vec<SoundCue>,
    loops_refreshed: Vec<(SoundHandle, Vec2)>,
    alive: HashSet<SoundHandle>,
    next_handle: u64,
}

impl RecordingHost {
    fn with_tiles(tiles: TileMap) -> Self {
        Self {
            tiles,
            ..Default::default()
        }
    }

    fn with_tile(tile: IVec2, kind: TileKind) -> Self {
        let mut tiles = TileMap::new(12, 12);
        tiles.set(tile, kind);
        Self::with_tiles(tiles)
    }

    fn played(&self) -> Vec<GrindSound> {
        self.sounds.iter().map(|cue| cue.sound).collect()
    }
}

impl GrindHost for RecordingHost {
    fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    fn vines(&mut self) -> &mut VineNetwork {
        &mut self.vines
    }

    fn spawn_spark(&mut self, spark: Spark) {
        self.sparks.push(spark);
    }

    fn play_sound(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }

    fn sound_alive(&self, handle: SoundHandle) -> bool {
        self.alive.contains(&handle)
    }

    fn start_loop(&mut self, cue: SoundCue) -> SoundHandle {
        self.next_handle += 1;
        let handle = SoundHandle(self.next_handle);
        self.alive.insert(handle);
        self.loops_started.push(cue);
        handle
    }

    fn refresh_loop(&mut self, handle: SoundHandle, position: Vec2) {
        self.loops_refreshed.push((handle, position));
    }
}

fn full_tuning() -> GrindTuning {
    GrindTuning::from(&TuningDef::builtin("test"))
}

/// Lower body at `pos`, upper body stacked above it.
fn body_at(pos: Vec2) -> CharacterBody {
    CharacterBody::new(
        Chunk::new(pos + Vec2::new(0.0, 17.0), 9.0),
        Chunk::new(pos, 8.0),
    )
}

fn grind_input() -> CharacterInput {
    CharacterInput {
        grind: true,
        ..Default::default()
    }
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

const ALL_ANIMATIONS: [AnimationState; 9] = [
    AnimationState::None,
    AnimationState::StandOnBeam,
    AnimationState::ClimbOnBeam,
    AnimationState::GetUpToBeamTip,
    AnimationState::BeamTip,
    AnimationState::HangFromBeam,
    AnimationState::ZeroGPoleGrab,
    AnimationState::VineGrab,
    AnimationState::Flip,
];

// -----------------------------------------------------------------------------
// Classifier
// -----------------------------------------------------------------------------

#[test]
fn test_classify_requires_grind_input() {
    let mut body = body_at(Vec2::new(50.0, 50.0));
    body.animation = AnimationState::StandOnBeam;
    body.primary.vel = Vec2::new(6.0, 0.0);

    let idle = CharacterInput::default();
    assert_eq!(classify(&body, &idle, IVec2::ONE), ModalityFlags::NONE);

    let latched = CharacterInput {
        grind_latched: true,
        ..Default::default()
    };
    assert!(classify(&body, &latched, IVec2::ONE).horizontal);
}

#[test]
fn test_classify_thresholds() {
    let mut body = body_at(Vec2::new(50.0, 50.0));
    let input = grind_input();

    body.animation = AnimationState::StandOnBeam;
    body.primary.vel = Vec2::new(3.0, 0.0);
    assert!(!classify(&body, &input, IVec2::ONE).horizontal);
    body.primary.vel = Vec2::new(3.1, 0.0);
    assert!(classify(&body, &input, IVec2::ONE).horizontal);

    // Poles are faster to trigger going down than up
    body.animation = AnimationState::ClimbOnBeam;
    body.secondary.vel = Vec2::new(0.0, 1.5);
    assert!(!classify(&body, &input, IVec2::new(1, 1)).vertical_pole);
    assert!(classify(&body, &input, IVec2::new(1, -1)).vertical_pole);
    body.secondary.vel = Vec2::new(0.0, 2.5);
    assert!(classify(&body, &input, IVec2::new(1, 1)).vertical_pole);

    body.animation = AnimationState::ZeroGPoleGrab;
    body.primary.vel = Vec2::new(1.2, 0.0);
    assert!(classify(&body, &input, IVec2::ONE).zero_gravity_pole);

    body.animation = AnimationState::VineGrab;
    assert!(classify(&body, &input, IVec2::ONE).vine);
    body.primary.vel = Vec2::new(0.5, 0.5);
    assert!(!classify(&body, &input, IVec2::ONE).vine);
}

#[test]
fn test_modalities_are_exclusive() {
    let input = grind_input();
    let speeds = [0.0, 0.5, 1.5, 2.5, 3.5, 12.0];

    for animation in ALL_ANIMATIONS {
        for primary in speeds {
            for secondary in speeds {
                for facing_y in [-1, 1] {
                    let mut body = body_at(Vec2::new(50.0, 50.0));
                    body.animation = animation;
                    body.primary.vel = Vec2::new(primary, 0.0);
                    body.secondary.vel = Vec2::new(0.0, secondary);

                    let flags = classify(&body, &input, IVec2::new(1, facing_y));
                    assert!(
                        flags.active_count() <= 1,
                        "{:?} produced {:?}",
                        animation,
                        flags
                    );
                    assert_eq!(ModalityFlags::from(flags.modality()), flags);
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Animation history and coyote window
// -----------------------------------------------------------------------------

#[test]
fn test_history_skips_repeated_states() {
    let mut history = AnimationHistory::default();
    assert!(history.record(AnimationState::StandOnBeam));
    assert!(history.record(AnimationState::None));
    assert!(!history.record(AnimationState::None));
    assert!(!history.record(AnimationState::None));

    assert_eq!(history.previous(), AnimationState::StandOnBeam);
    assert_eq!(history.current(), AnimationState::None);
}

#[test]
fn test_coyote_only_on_the_tick_the_beam_is_left() {
    let mut history = AnimationHistory::default();
    history.record(AnimationState::StandOnBeam);
    history.record(AnimationState::None);
    assert!(is_coyote(&history, BodyMode::Default));

    history.record(AnimationState::None);
    assert!(!is_coyote(&history, BodyMode::Default));
}

#[test]
fn test_coyote_needs_airborne_body() {
    let history = AnimationHistory::from_states(AnimationState::StandOnBeam, AnimationState::None);
    assert!(is_coyote(&history, BodyMode::Default));
    assert!(!is_coyote(&history, BodyMode::Stand));
    assert!(!is_coyote(&history, BodyMode::ZeroG));
}

#[test]
fn test_intervening_state_cancels_coyote() {
    let mut history = AnimationHistory::default();
    history.record(AnimationState::StandOnBeam);
    history.record(AnimationState::HangFromBeam);
    history.record(AnimationState::None);
    assert!(!is_coyote(&history, BodyMode::Default));

    let still_on_beam =
        AnimationHistory::from_states(AnimationState::None, AnimationState::StandOnBeam);
    assert!(!is_coyote(&still_on_beam, BodyMode::Default));
}

// -----------------------------------------------------------------------------
// Controller
// -----------------------------------------------------------------------------

#[test]
fn test_grind_released_restores_normal_factors() {
    let mut host = RecordingHost::default();
    let mut session = GrindSession {
        modality: Modality::Horizontal,
        pending_top_of_pole_jump: true,
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(50.0, 50.0));
    body.animation = AnimationState::StandOnBeam;
    body.primary.vel = Vec2::new(5.0, 0.0);
    body.speed_factors = SpeedFactors {
        run: 0.0,
        climb: 0.0,
    };

    let tick = update_grind(
        &mut session,
        &mut body,
        &CharacterInput::default(),
        &full_tuning(),
        &mut host,
        &mut rng(),
    );

    assert_eq!(tick.flags, ModalityFlags::NONE);
    assert_eq!(body.speed_factors, SpeedFactors::default());
    assert_eq!(session.modality, Modality::None);
    assert!(!session.pending_top_of_pole_jump);
    assert!(!session.is_grinding());
    assert!(host.sparks.is_empty());
}

#[test]
fn test_horizontal_grind_on_beam() {
    let mut host = RecordingHost::with_tile(IVec2::new(2, 2), TileKind::HorizontalBeam);
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(50.0, 55.0));
    body.animation = AnimationState::StandOnBeam;
    body.primary.vel = Vec2::new(5.0, 0.0);
    body.secondary.vel = Vec2::new(5.0, 0.0);
    let input = CharacterInput {
        x: 1,
        ..grind_input()
    };

    let tick = update_grind(
        &mut session,
        &mut body,
        &input,
        &full_tuning(),
        &mut host,
        &mut rng(),
    );

    assert!(tick.flags.horizontal);
    assert_eq!(tick.flags.active_count(), 1);
    assert_eq!(session.modality, Modality::Horizontal);
    assert!(session.is_grinding());
    assert_eq!(body.speed_factors.run, 0.0);
    assert_eq!(body.speed_factors.climb, 1.0);
    assert_close(body.secondary.vel.x, 10.0);

    let origin = body.secondary.pos;
    assert_eq!(host.sparks.len(), 4);
    assert_eq!(host.sparks[0].position, origin);
    assert_eq!(host.sparks[1].position, origin);
    assert_eq!(host.sparks[2].position, origin - Vec2::new(10.0, 0.0));
    assert_eq!(host.sparks[3].position, origin - Vec2::new(10.0, 0.0));
    for spark in &host.sparks {
        assert!(spark.velocity.x <= 0.0, "sparks trail behind: {:?}", spark);
        assert!(spark.velocity.y >= 0.0, "sparks fly up: {:?}", spark);
        let speed = spark.velocity.length();
        assert!((SPARK_SPEED_MIN - 1e-3..=SPARK_SPEED_MAX + 1e-3).contains(&speed));
    }

    assert_eq!(host.loops_started.len(), 1);
    assert_eq!(host.loops_started[0].sound, GrindSound::GrindLoop);
    assert!(host.loops_started[0].looping);
}

#[test]
fn test_grind_loop_is_reused_while_alive() {
    let mut host = RecordingHost::with_tile(IVec2::new(2, 2), TileKind::HorizontalBeam);
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(50.0, 55.0));
    body.animation = AnimationState::StandOnBeam;
    body.primary.vel = Vec2::new(5.0, 0.0);
    let input = CharacterInput {
        x: 1,
        ..grind_input()
    };
    let tuning = full_tuning();
    let mut rng = rng();

    update_grind(&mut session, &mut body, &input, &tuning, &mut host, &mut rng);
    update_grind(&mut session, &mut body, &input, &tuning, &mut host, &mut rng);
    assert_eq!(host.loops_started.len(), 1);
    assert_eq!(host.loops_refreshed.len(), 1);
    assert_eq!(session.grind_sound.handle(), Some(SoundHandle(1)));

    // Host let the emitter go; the next tick starts a fresh one
    host.alive.clear();
    update_grind(&mut session, &mut body, &input, &tuning, &mut host, &mut rng);
    assert_eq!(host.loops_started.len(), 2);
    assert_eq!(session.grind_sound.handle(), Some(SoundHandle(2)));
}

#[test]
fn test_vertical_pole_grind_drives_upper_body() {
    let mut host = RecordingHost::with_tile(IVec2::new(2, 3), TileKind::VerticalBeam);
    let tuning = full_tuning();

    // Climbing up
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(50.0, 50.0));
    body.animation = AnimationState::ClimbOnBeam;
    body.secondary.vel = Vec2::new(0.0, 3.0);
    let up = CharacterInput {
        y: 1,
        ..grind_input()
    };
    let tick = update_grind(&mut session, &mut body, &up, &tuning, &mut host, &mut rng());
    assert!(tick.flags.vertical_pole);
    assert_eq!(body.speed_factors.climb, 0.0);
    assert_eq!(body.speed_factors.run, 1.0);
    assert_close(body.primary.vel.y, 8.0);
    assert_eq!(host.sparks.len(), 4);

    // Sliding down only needs the lower threshold
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(50.0, 50.0));
    body.animation = AnimationState::ClimbOnBeam;
    body.secondary.vel = Vec2::new(0.0, -1.5);
    let down = CharacterInput {
        y: -1,
        ..grind_input()
    };
    let tick = update_grind(&mut session, &mut body, &down, &tuning, &mut host, &mut rng());
    assert!(tick.flags.vertical_pole);
    assert_close(body.primary.vel.y, -8.0);
}

#[test]
fn test_zero_gravity_pole_on_horizontal_beam_moves_sideways() {
    let mut host = RecordingHost::with_tile(IVec2::new(2, 3), TileKind::HorizontalBeam);
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(50.0, 50.0));
    body.gravity = 0.0;
    body.animation = AnimationState::ZeroGPoleGrab;
    body.primary.vel = Vec2::new(-2.0, 0.0);
    let input = CharacterInput {
        x: -1,
        ..grind_input()
    };

    let tick = update_grind(
        &mut session,
        &mut body,
        &input,
        &full_tuning(),
        &mut host,
        &mut rng(),
    );

    assert!(tick.flags.zero_gravity_pole);
    // The x speed comes from the y-axis grind speed
    assert_close(body.primary.vel.x, -8.0);
    assert_eq!(host.sparks.len(), 4);
    for spark in &host.sparks {
        assert_eq!(spark.position, body.hands[0]);
        assert!(spark.velocity.x <= 0.0);
        assert!(spark.velocity.y <= 0.0);
    }
}

#[test]
fn test_missing_speeds_leave_host_untouched() {
    let mut host = RecordingHost::with_tile(IVec2::new(2, 2), TileKind::HorizontalBeam);
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(50.0, 55.0));
    body.animation = AnimationState::StandOnBeam;
    body.primary.vel = Vec2::new(5.0, 0.0);
    body.speed_factors.run = 0.3;
    let before = body.clone();
    let input = CharacterInput {
        x: -1,
        ..grind_input()
    };
    let walker = GrindTuning {
        normal_x_speed: Some(1.0),
        normal_y_speed: Some(1.0),
        ..Default::default()
    };

    let tick = update_grind(&mut session, &mut body, &input, &walker, &mut host, &mut rng());

    assert_eq!(tick, GrindTick::default());
    assert_eq!(body, before);
    assert!(host.sparks.is_empty());
    // Bookkeeping still runs
    assert_eq!(session.last_facing, IVec2::new(-1, 1));
    assert_eq!(session.history.current(), AnimationState::StandOnBeam);
}

#[test]
fn test_last_facing_is_never_zero() {
    let mut host = RecordingHost::default();
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(50.0, 50.0));
    let tuning = full_tuning();
    let mut rng = rng();

    for _ in 0..200 {
        let input = CharacterInput {
            x: rng.random_range(-1..=1),
            y: rng.random_range(-1..=1),
            grind: rng.random_bool(0.5),
            ..Default::default()
        };
        update_grind(&mut session, &mut body, &input, &tuning, &mut host, &mut rng);

        assert!(session.last_facing.x == 1 || session.last_facing.x == -1);
        assert!(session.last_facing.y == 1 || session.last_facing.y == -1);
        if input.x != 0 {
            assert_eq!(session.last_facing.x, input.x);
        }
    }
}

#[test]
fn test_top_of_pole_with_jump_held_requests_launch() {
    let mut host = RecordingHost::with_tile(IVec2::new(2, 3), TileKind::VerticalBeam);
    let mut session = GrindSession {
        modality: Modality::VerticalPole,
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(50.0, 70.0));
    body.animation = AnimationState::GetUpToBeamTip;
    body.primary.vel = Vec2::new(0.0, 3.0);
    let input = CharacterInput {
        y: 1,
        jump: true,
        ..grind_input()
    };
    let tuning = full_tuning();

    let tick = update_grind(&mut session, &mut body, &input, &tuning, &mut host, &mut rng());
    assert!(tick.jump_requested);
    assert!(session.pending_top_of_pole_jump);
    assert_eq!(body.secondary.pos, Vec2::new(50.0, 70.0));

    // The pending launch turns the jump into a flip
    let outcome = perform_jump(&mut session, &mut body, &input, &tuning, &mut host);
    assert!(matches!(
        outcome,
        JumpOutcome::Trick(TrickJump { coyote: false, .. })
    ));
    assert_close(body.primary.vel.y, 9.0);
    assert_close(body.secondary.vel.y, 7.0);
    assert_eq!(body.animation, AnimationState::Flip);
    assert!(!session.pending_top_of_pole_jump);
    assert_eq!(host.played(), vec![GrindSound::FlipJump]);
}

#[test]
fn test_top_of_pole_ignored_once_grind_is_released() {
    let mut host = RecordingHost::with_tile(IVec2::new(2, 3), TileKind::VerticalBeam);
    let mut session = GrindSession {
        modality: Modality::VerticalPole,
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(50.0, 70.0));
    body.animation = AnimationState::GetUpToBeamTip;
    body.primary.vel = Vec2::new(0.0, 3.0);
    let input = CharacterInput {
        y: 1,
        jump: true,
        ..Default::default()
    };

    let tick = update_grind(&mut session, &mut body, &input, &full_tuning(), &mut host, &mut rng());

    assert!(!tick.jump_requested);
    assert!(!session.pending_top_of_pole_jump);
    assert_eq!(session.modality, Modality::None);
    assert_eq!(body.secondary.pos, Vec2::new(50.0, 70.0));
    assert_eq!(body.primary.vel, Vec2::new(0.0, 3.0));
}

#[test]
fn test_top_of_pole_without_jump_snaps_to_tip() {
    let mut host = RecordingHost::with_tile(IVec2::new(5, 5), TileKind::VerticalBeam);
    let mut session = GrindSession {
        modality: Modality::VerticalPole,
        pending_top_of_pole_jump: true,
        ..Default::default()
    };
    let mut body = CharacterBody::new(
        Chunk::new(Vec2::new(112.0, 120.0), 9.0),
        Chunk::new(Vec2::new(112.0, 103.0), 8.0),
    );
    body.animation = AnimationState::GetUpToBeamTip;
    body.primary.vel = Vec2::new(20.0, 5.0);
    body.secondary.vel = Vec2::new(0.0, 3.0);
    let input = CharacterInput {
        y: 1,
        ..grind_input()
    };

    let tick = update_grind(
        &mut session,
        &mut body,
        &input,
        &full_tuning(),
        &mut host,
        &mut rng(),
    );

    assert!(!tick.jump_requested);
    assert!(!session.pending_top_of_pole_jump);
    assert_eq!(body.secondary.pos, Vec2::new(110.0, 115.0));
    assert_eq!(body.secondary.vel, Vec2::ZERO);
    assert!(body.primary.vel.length() <= POLE_TIP_MAX_SPEED + 1e-4);
    assert!(!tick.caught_beam);
}

#[test]
fn test_beam_catch_while_falling() {
    let mut host = RecordingHost::with_tile(IVec2::new(3, 2), TileKind::HorizontalBeam);
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(72.0, 48.0));
    body.primary.vel = Vec2::new(1.0, -4.0);
    body.secondary.vel = Vec2::new(1.0, -4.0);

    let tick = update_grind(
        &mut session,
        &mut body,
        &grind_input(),
        &full_tuning(),
        &mut host,
        &mut rng(),
    );

    assert!(tick.caught_beam);
    assert_eq!(body.animation, AnimationState::StandOnBeam);
    assert_eq!(body.primary.vel.y, 0.0);
    assert_eq!(body.secondary.vel.y, 0.0);
    assert_close(body.secondary.pos.y, 55.0);
    assert_eq!(host.played(), vec![GrindSound::BeamCatch]);
}

#[test]
fn test_beam_catch_skipped_when_dropping_or_rising() {
    let tuning = full_tuning();

    let mut host = RecordingHost::with_tile(IVec2::new(3, 2), TileKind::HorizontalBeam);
    let mut body = body_at(Vec2::new(72.0, 48.0));
    body.primary.vel = Vec2::new(0.0, -4.0);
    let down = CharacterInput {
        y: -1,
        ..grind_input()
    };
    let tick = update_grind(
        &mut GrindSession::default(),
        &mut body,
        &down,
        &tuning,
        &mut host,
        &mut rng(),
    );
    assert!(!tick.caught_beam);
    assert_eq!(body.animation, AnimationState::None);

    let mut body = body_at(Vec2::new(72.0, 48.0));
    body.primary.vel = Vec2::new(0.0, 2.0);
    let tick = update_grind(
        &mut GrindSession::default(),
        &mut body,
        &grind_input(),
        &tuning,
        &mut host,
        &mut rng(),
    );
    assert!(!tick.caught_beam);
    assert!(host.sounds.is_empty());
}

#[test]
fn test_falling_flip_is_cancelled_on_release() {
    let mut host = RecordingHost::default();
    let tuning = full_tuning();

    let mut body = body_at(Vec2::new(50.0, 150.0));
    body.animation = AnimationState::Flip;
    body.primary.vel = Vec2::new(0.0, -4.0);
    update_grind(
        &mut GrindSession::default(),
        &mut body,
        &grind_input(),
        &tuning,
        &mut host,
        &mut rng(),
    );
    assert_eq!(body.animation, AnimationState::HangFromBeam);

    let mut body = body_at(Vec2::new(50.0, 150.0));
    body.animation = AnimationState::Flip;
    body.primary.vel = Vec2::new(0.0, -4.0);
    let held = CharacterInput {
        jump: true,
        ..grind_input()
    };
    update_grind(
        &mut GrindSession::default(),
        &mut body,
        &held,
        &tuning,
        &mut host,
        &mut rng(),
    );
    assert_eq!(body.animation, AnimationState::Flip);

    let mut body = body_at(Vec2::new(50.0, 150.0));
    body.animation = AnimationState::Flip;
    body.primary.vel = Vec2::new(0.0, -2.0);
    update_grind(
        &mut GrindSession::default(),
        &mut body,
        &grind_input(),
        &tuning,
        &mut host,
        &mut rng(),
    );
    assert_eq!(body.animation, AnimationState::Flip);
}

#[test]
fn test_sessions_do_not_share_state() {
    let mut host = RecordingHost::with_tile(IVec2::new(2, 2), TileKind::HorizontalBeam);
    let tuning = full_tuning();
    let mut rng = rng();

    let mut grinding = GrindSession::default();
    let mut grinder = body_at(Vec2::new(50.0, 55.0));
    grinder.animation = AnimationState::StandOnBeam;
    grinder.primary.vel = Vec2::new(5.0, 0.0);

    let mut idle = GrindSession::default();
    let mut walker = body_at(Vec2::new(150.0, 20.0));
    walker.body_mode = BodyMode::Stand;

    let input = CharacterInput {
        x: 1,
        ..grind_input()
    };
    update_grind(&mut grinding, &mut grinder, &input, &tuning, &mut host, &mut rng);
    update_grind(&mut idle, &mut walker, &input, &tuning, &mut host, &mut rng);

    assert_eq!(grinding.modality, Modality::Horizontal);
    assert_eq!(idle.modality, Modality::None);
    assert_eq!(idle.grind_sound.handle(), None);
    assert_eq!(walker.speed_factors, SpeedFactors::default());
}

// -----------------------------------------------------------------------------
// Vines
// -----------------------------------------------------------------------------

fn straight_vine(x: f32, bottom: f32, top: f32) -> Vine {
    Vine::new(vec![Vec2::new(x, bottom), Vec2::new(x, top)])
}

#[test]
fn test_vine_position_clamped_at_end() {
    let mut host = RecordingHost::default();
    host.vines.add(straight_vine(100.0, 100.0, 200.0));

    let start = VinePosition {
        vine: 0,
        float_pos: 0.99,
    };
    let mut body = body_at(Vec2::new(100.0, 182.0));
    body.animation = AnimationState::VineGrab;
    body.vine_pos = Some(start);
    body.primary.pos = host.vines.on_vine_pos(start);
    body.primary.vel = Vec2::new(0.0, 3.0);
    let mut session = GrindSession::default();

    let tick = update_grind(
        &mut session,
        &mut body,
        &grind_input(),
        &full_tuning(),
        &mut host,
        &mut rng(),
    );

    assert!(tick.flags.vine);
    assert_eq!(session.last_vine_direction, Vec2::Y);
    assert_eq!(body.speed_factors.climb, 0.0);
    assert_eq!(body.vine_pos.map(|p| p.float_pos), Some(1.0));
    assert!(body.vine_climb_cursor.length() <= VINE_CURSOR_MAX);
}

#[test]
fn test_vine_position_stays_in_range() {
    let mut host = RecordingHost::default();
    host.vines.add(Vine::new(vec![
        Vec2::new(100.0, 60.0),
        Vec2::new(104.0, 120.0),
        Vec2::new(98.0, 180.0),
    ]));
    let tuning = full_tuning();
    let mut rng = rng();
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(100.0, 100.0));
    body.animation = AnimationState::VineGrab;
    body.vine_pos = Some(VinePosition {
        vine: 0,
        float_pos: 0.5,
    });

    for _ in 0..300 {
        let vine_pos = body.vine_pos.unwrap_or(VinePosition {
            vine: 0,
            float_pos: 0.5,
        });
        body.animation = AnimationState::VineGrab;
        body.primary.pos = host.vines.on_vine_pos(vine_pos);
        body.primary.vel = random_unit_vector(&mut rng) * rng.random_range(1.5..6.0);

        update_grind(&mut session, &mut body, &grind_input(), &tuning, &mut host, &mut rng);

        let float_pos = body.vine_pos.map(|p| p.float_pos).unwrap_or(-1.0);
        assert!((0.0..=1.0).contains(&float_pos), "left the vine: {float_pos}");
        assert!(body.vine_climb_cursor.length() <= VINE_CURSOR_MAX + 1e-3);
    }
}

#[test]
fn test_vine_switch_toward_goal() {
    let mut host = RecordingHost::default();
    host.vines.add(straight_vine(100.0, 100.0, 200.0));
    host.vines.add(straight_vine(110.0, 100.0, 300.0));

    let start = VinePosition {
        vine: 0,
        float_pos: 0.5,
    };
    let mut body = body_at(Vec2::new(100.0, 133.0));
    body.animation = AnimationState::VineGrab;
    body.vine_pos = Some(start);
    body.primary.pos = host.vines.on_vine_pos(start);
    body.primary.vel = Vec2::new(3.0, 1.0);
    let mut session = GrindSession::default();
    let tuning = full_tuning();
    let mut rng = rng();

    update_grind(&mut session, &mut body, &grind_input(), &tuning, &mut host, &mut rng);
    assert_eq!(body.vine_pos.map(|p| p.vine), Some(1));
    assert_eq!(session.vine_grab_delay, VINE_GRAB_DELAY);

    // No switching back until the delay runs out
    body.primary.vel = Vec2::new(-3.0, 1.0);
    update_grind(&mut session, &mut body, &grind_input(), &tuning, &mut host, &mut rng);
    assert_eq!(body.vine_pos.map(|p| p.vine), Some(1));
    assert_eq!(session.vine_grab_delay, VINE_GRAB_DELAY - 1);
}

// -----------------------------------------------------------------------------
// Jumps
// -----------------------------------------------------------------------------

#[test]
fn test_coyote_jump_off_beam() {
    let mut host = RecordingHost::default();
    let mut session = GrindSession {
        history: AnimationHistory::from_states(AnimationState::StandOnBeam, AnimationState::None),
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(50.0, 80.0));
    body.primary.vel = Vec2::new(2.0, -1.0);
    body.secondary.vel = Vec2::new(2.0, -1.0);
    let input = CharacterInput {
        jump: true,
        jump_pressed: true,
        ..grind_input()
    };

    let outcome = perform_jump(&mut session, &mut body, &input, &full_tuning(), &mut host);

    assert_eq!(
        outcome,
        JumpOutcome::Trick(TrickJump {
            coyote: true,
            multiplier: 1.0
        })
    );
    assert_close(body.primary.vel.y, 9.0);
    assert_close(body.secondary.vel.y, 7.0);
    assert_close(body.primary.vel.x, 6.0);
    assert_close(body.secondary.vel.x, 6.0);
    assert_eq!(body.slide_direction, 1);
    assert_close(body.jump_boost, 7.5);
    assert_eq!(body.animation, AnimationState::Flip);
    assert_eq!(body.slide_counter, 0);
    assert_eq!(host.played(), vec![GrindSound::BoostedJump]);
}

#[test]
fn test_walking_off_a_ledge_after_a_beam_is_a_plain_jump() {
    let mut host = RecordingHost::default();
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(50.0, 80.0));
    let tuning = full_tuning();
    let idle = CharacterInput::default();

    body.animation = AnimationState::StandOnBeam;
    body.body_mode = BodyMode::ClimbingOnBeam;
    update_grind(&mut session, &mut body, &idle, &tuning, &mut host, &mut rng());

    // Off the beam and onto solid ground for a while
    body.animation = AnimationState::None;
    body.body_mode = BodyMode::Stand;
    for _ in 0..200 {
        update_grind(&mut session, &mut body, &idle, &tuning, &mut host, &mut rng());
    }

    // Then off a ground ledge
    body.body_mode = BodyMode::Default;
    update_grind(&mut session, &mut body, &idle, &tuning, &mut host, &mut rng());
    let jump = CharacterInput {
        jump: true,
        jump_pressed: true,
        ..idle
    };
    let outcome = perform_jump(&mut session, &mut body, &jump, &tuning, &mut host);

    assert_eq!(outcome, JumpOutcome::Plain);
    assert_close(body.primary.vel.x, 0.0);
    assert!(host.played().is_empty());
}

#[test]
fn test_coyote_jump_on_the_tick_after_the_beam() {
    let mut host = RecordingHost::default();
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(50.0, 80.0));
    let tuning = full_tuning();
    let idle = CharacterInput::default();

    body.animation = AnimationState::StandOnBeam;
    body.body_mode = BodyMode::ClimbingOnBeam;
    update_grind(&mut session, &mut body, &idle, &tuning, &mut host, &mut rng());

    body.animation = AnimationState::None;
    body.body_mode = BodyMode::Default;
    update_grind(&mut session, &mut body, &idle, &tuning, &mut host, &mut rng());
    let jump = CharacterInput {
        jump: true,
        jump_pressed: true,
        ..idle
    };
    let outcome = perform_jump(&mut session, &mut body, &jump, &tuning, &mut host);

    assert!(matches!(
        outcome,
        JumpOutcome::Trick(TrickJump { coyote: true, .. })
    ));
    assert_eq!(host.played(), vec![GrindSound::BoostedJump]);
}

#[test]
fn test_coyote_boost_follows_facing() {
    let mut host = RecordingHost::default();
    let mut session = GrindSession {
        history: AnimationHistory::from_states(AnimationState::StandOnBeam, AnimationState::None),
        last_facing: IVec2::new(-1, 1),
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(50.0, 80.0));

    perform_jump(
        &mut session,
        &mut body,
        &grind_input(),
        &full_tuning(),
        &mut host,
    );

    assert_eq!(body.slide_direction, -1);
    assert_close(body.primary.vel.x, -4.0);
    assert_close(body.secondary.vel.x, -4.0);
}

#[test]
fn test_horizontal_grind_jump_is_a_flip() {
    let mut host = RecordingHost::default();
    let mut session = GrindSession {
        modality: Modality::Horizontal,
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(50.0, 55.0));
    body.animation = AnimationState::StandOnBeam;
    body.body_mode = BodyMode::ClimbingOnBeam;
    body.primary.vel = Vec2::new(10.0, 0.0);

    let outcome = perform_jump(&mut session, &mut body, &grind_input(), &full_tuning(), &mut host);

    assert!(matches!(
        outcome,
        JumpOutcome::Trick(TrickJump { coyote: false, .. })
    ));
    assert_close(body.primary.vel.x, 10.0);
    assert_eq!(host.played(), vec![GrindSound::FlipJump]);
}

#[test]
fn test_plain_jump_without_trigger() {
    let mut host = RecordingHost::default();
    let mut session = GrindSession::default();
    let mut body = body_at(Vec2::new(50.0, 20.0));
    body.body_mode = BodyMode::Stand;

    let outcome = perform_jump(&mut session, &mut body, &grind_input(), &full_tuning(), &mut host);

    assert_eq!(outcome, JumpOutcome::Plain);
    assert_eq!(body.primary.vel.y, DEFAULT_JUMP.0);
    assert_eq!(body.secondary.vel.y, DEFAULT_JUMP.1);
    assert_eq!(body.animation, AnimationState::None);
    assert!(host.sounds.is_empty());
}

#[test]
fn test_missing_trick_tuning_passes_jump_through() {
    let tuning = GrindTuning {
        super_jump: None,
        ..full_tuning()
    };

    // Every grind state that would otherwise trick or suppress
    let sessions = [
        GrindSession {
            modality: Modality::Horizontal,
            ..Default::default()
        },
        GrindSession {
            history: AnimationHistory::from_states(
                AnimationState::StandOnBeam,
                AnimationState::None,
            ),
            ..Default::default()
        },
        GrindSession {
            modality: Modality::VerticalPole,
            ..Default::default()
        },
        GrindSession {
            pending_top_of_pole_jump: true,
            ..Default::default()
        },
    ];

    for mut session in sessions {
        let mut host = RecordingHost::default();
        let mut body = body_at(Vec2::new(50.0, 55.0));
        body.animation = AnimationState::StandOnBeam;
        body.adrenaline = 1.0;
        let mut expected = body.clone();
        default_jump(&mut expected);
        let before = session.clone();

        let outcome = perform_jump(&mut session, &mut body, &grind_input(), &tuning, &mut host);

        assert_eq!(outcome, JumpOutcome::Plain);
        assert_eq!(body, expected);
        assert_eq!(session, before);
        assert!(host.sounds.is_empty());
    }
}

#[test]
fn test_jump_suppressed_while_climbing_pole() {
    let mut host = RecordingHost::default();
    let mut session = GrindSession {
        modality: Modality::VerticalPole,
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(50.0, 55.0));
    body.animation = AnimationState::ClimbOnBeam;
    body.primary.vel = Vec2::new(0.0, 8.0);
    let before = body.clone();

    let outcome = perform_jump(&mut session, &mut body, &grind_input(), &full_tuning(), &mut host);
    assert_eq!(outcome, JumpOutcome::Suppressed);
    assert_eq!(body, before);

    // Sideways intent lets the jump through
    let sideways = CharacterInput {
        x: 1,
        ..grind_input()
    };
    let outcome = perform_jump(&mut session, &mut body, &sideways, &full_tuning(), &mut host);
    assert_ne!(outcome, JumpOutcome::Suppressed);
    assert_eq!(body.animation, AnimationState::None);
}

#[test]
fn test_trick_multiplier() {
    assert_close(trick_multiplier(0.0, None), 1.0);
    assert_close(trick_multiplier(1.0, None), 1.15);
    assert_close(trick_multiplier(5.0, None), 1.15);

    let item = |mass| {
        Some(GrabbedObject {
            mass,
            kind: GrabbedKind::Item,
        })
    };
    assert_close(trick_multiplier(0.0, item(0.1)), 1.0);
    assert_close(trick_multiplier(0.0, item(0.5)), 1.45);
    assert_close(trick_multiplier(0.0, item(3.0)), 2.3);

    let pup = Some(GrabbedObject {
        mass: 3.0,
        kind: GrabbedKind::Pup,
    });
    assert_close(trick_multiplier(0.0, pup), 1.0);
}

#[test]
fn test_pain_trick_jump_is_weaker() {
    let mut host = RecordingHost::default();
    let mut session = GrindSession {
        modality: Modality::Horizontal,
        ..Default::default()
    };
    let mut body = body_at(Vec2::new(50.0, 55.0));
    body.pain_jump = true;
    body.adrenaline = 1.0;

    perform_jump(&mut session, &mut body, &grind_input(), &full_tuning(), &mut host);

    assert_close(body.primary.vel.y, 4.0 * 1.15);
    assert_close(body.secondary.vel.y, 3.0 * 1.15);
}

// -----------------------------------------------------------------------------
// ECS systems
// -----------------------------------------------------------------------------

#[test]
fn test_controller_system_marks_caught_beam_as_support() {
    let mut tiles = TileMap::new(12, 12);
    tiles.set(IVec2::new(3, 2), TileKind::HorizontalBeam);

    let mut app = App::new();
    app.insert_resource(tiles)
        .init_resource::<VineNetwork>()
        .init_resource::<SoundEmitters>()
        .insert_resource(SimRng::from_seed(7))
        .add_message::<SparkEvent>()
        .add_message::<SoundEvent>()
        .add_systems(Update, run_grind_controller);

    let mut body = body_at(Vec2::new(72.0, 48.0));
    body.primary.vel = Vec2::new(1.0, -4.0);
    body.secondary.vel = Vec2::new(1.0, -4.0);
    let character = app
        .world_mut()
        .spawn((
            grind_input(),
            full_tuning(),
            GrindSession::default(),
            body,
            JumpRequest::default(),
        ))
        .id();

    app.update();

    let body = app.world().get::<CharacterBody>(character).unwrap();
    assert_eq!(body.animation, AnimationState::StandOnBeam);
    assert_eq!(body.body_mode, BodyMode::ClimbingOnBeam);
    assert!(!app.world().get::<JumpRequest>(character).unwrap().0);
}
