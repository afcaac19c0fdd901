//! Grind domain: deciding each tick whether, and how, a character grinds.

use bevy::prelude::*;

use crate::character::{AnimationState, CharacterBody, CharacterInput};

pub const HORIZONTAL_MIN_SPEED: f32 = 3.0;
pub const POLE_UP_MIN_SPEED: f32 = 2.0;
pub const POLE_DOWN_MIN_SPEED: f32 = 1.0;
pub const ZERO_G_POLE_MIN_SPEED: f32 = 1.0;
pub const VINE_MIN_SPEED: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Modality {
    #[default]
    None,
    Horizontal,
    VerticalPole,
    ZeroGravityPole,
    Vine,
}

/// One flag per modality, as computed for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalityFlags {
    pub horizontal: bool,
    pub vertical_pole: bool,
    pub zero_gravity_pole: bool,
    pub vine: bool,
}

impl ModalityFlags {
    pub const NONE: Self = Self {
        horizontal: false,
        vertical_pole: false,
        zero_gravity_pole: false,
        vine: false,
    };

    /// Any of the pole or vine modalities.
    pub fn any_vertical(&self) -> bool {
        self.vertical_pole || self.zero_gravity_pole || self.vine
    }

    pub fn active_count(&self) -> usize {
        [
            self.horizontal,
            self.vertical_pole,
            self.zero_gravity_pole,
            self.vine,
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count()
    }

    pub fn modality(&self) -> Modality {
        if self.horizontal {
            Modality::Horizontal
        } else if self.vertical_pole {
            Modality::VerticalPole
        } else if self.zero_gravity_pole {
            Modality::ZeroGravityPole
        } else if self.vine {
            Modality::Vine
        } else {
            Modality::None
        }
    }
}

impl From<Modality> for ModalityFlags {
    fn from(modality: Modality) -> Self {
        Self {
            horizontal: modality == Modality::Horizontal,
            vertical_pole: modality == Modality::VerticalPole,
            zero_gravity_pole: modality == Modality::ZeroGravityPole,
            vine: modality == Modality::Vine,
        }
    }
}

/// Compute the grind flags for this tick. Every predicate is evaluated; the
/// animation each one requires keeps them exclusive.
pub fn classify(body: &CharacterBody, input: &CharacterInput, last_facing: IVec2) -> ModalityFlags {
    if !input.grind_active() {
        return ModalityFlags::NONE;
    }

    let primary_speed = body.primary.speed();
    let secondary_speed = body.secondary.speed();
    let animation = body.animation;

    let climbing_fast_enough = (last_facing.y > 0 && secondary_speed > POLE_UP_MIN_SPEED)
        || (last_facing.y < 0 && secondary_speed > POLE_DOWN_MIN_SPEED);

    ModalityFlags {
        horizontal: animation == AnimationState::StandOnBeam
            && primary_speed > HORIZONTAL_MIN_SPEED,
        vertical_pole: animation == AnimationState::ClimbOnBeam && climbing_fast_enough,
        zero_gravity_pole: animation == AnimationState::ZeroGPoleGrab
            && primary_speed > ZERO_G_POLE_MIN_SPEED,
        vine: animation == AnimationState::VineGrab && primary_speed > VINE_MIN_SPEED,
    }
}
