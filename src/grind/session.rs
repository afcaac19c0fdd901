//! Grind domain: per-character grind state.

use bevy::prelude::*;

use crate::character::{AnimationState, BodyMode, CharacterInput};

use super::classifier::{Modality, ModalityFlags};
use super::effects::LoopingSound;

/// The last two distinct animation states, oldest first.
///
/// Repeated states are not recorded, so `previous` is whatever the character
/// was doing before its current animation started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationHistory {
    entries: [AnimationState; 2],
    ticks_in_current: u32,
}

impl AnimationHistory {
    /// A history whose last change happened on the current tick.
    pub fn from_states(previous: AnimationState, current: AnimationState) -> Self {
        Self {
            entries: [previous, current],
            ticks_in_current: 0,
        }
    }

    /// Record this tick's animation. Returns true if it started a new state.
    pub fn record(&mut self, animation: AnimationState) -> bool {
        if animation == self.entries[1] {
            self.ticks_in_current = self.ticks_in_current.saturating_add(1);
            return false;
        }
        self.entries = [self.entries[1], animation];
        self.ticks_in_current = 0;
        true
    }

    pub fn previous(&self) -> AnimationState {
        self.entries[0]
    }

    pub fn current(&self) -> AnimationState {
        self.entries[1]
    }

    /// The character stepped or fell off a beam into free movement on the
    /// most recently recorded tick.
    pub fn left_beam(&self) -> bool {
        self.ticks_in_current == 0
            && self.previous() == AnimationState::StandOnBeam
            && self.current() == AnimationState::None
    }
}

/// Coyote window: left a beam this tick and nothing is supporting the body.
pub fn is_coyote(history: &AnimationHistory, body_mode: BodyMode) -> bool {
    history.left_beam() && body_mode == BodyMode::Default
}

/// Grind state owned by one character for its whole lifetime.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct GrindSession {
    pub modality: Modality,
    /// Last nonzero input per axis; each component is always ±1.
    pub last_facing: IVec2,
    /// Last nonzero movement direction while on a vine, unit length or zero.
    pub last_vine_direction: Vec2,
    pub pending_top_of_pole_jump: bool,
    pub grind_sound: LoopingSound,
    pub history: AnimationHistory,
    /// Ticks until another vine switch may be attempted.
    pub vine_grab_delay: u32,
}

impl Default for GrindSession {
    fn default() -> Self {
        Self {
            modality: Modality::None,
            last_facing: IVec2::ONE,
            last_vine_direction: Vec2::ZERO,
            pending_top_of_pole_jump: false,
            grind_sound: LoopingSound::default(),
            history: AnimationHistory::default(),
            vine_grab_delay: 0,
        }
    }
}

impl GrindSession {
    pub fn is_grinding(&self) -> bool {
        self.modality != Modality::None
    }

    pub fn flags(&self) -> ModalityFlags {
        ModalityFlags::from(self.modality)
    }

    pub fn note_facing(&mut self, input: &CharacterInput) {
        if input.x != 0 {
            self.last_facing.x = input.x.signum();
        }
        if input.y != 0 {
            self.last_facing.y = input.y.signum();
        }
    }

    pub fn note_vine_direction(&mut self, velocity: Vec2) {
        if let Some(dir) = velocity.try_normalize() {
            self.last_vine_direction = dir;
        }
    }
}
