//! Character domain: host-owned body, animation and physics layer types.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Solid tiles
    Terrain,
    /// Character body parts
    Character,
}

/// Root entity of a simulated character. `id` selects its tuning entry.
#[derive(Component, Debug, Clone)]
pub struct Character {
    pub id: String,
}

/// Marker for the character driven by the keyboard
#[derive(Component, Debug)]
pub struct PlayerControlled;

/// The two physics entities that make up a character's body.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodyParts {
    pub primary: Entity,
    pub secondary: Entity,
}

/// Back-reference from a physics body part to its character.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodyPart {
    pub owner: Entity,
    pub slot: ChunkSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkSlot {
    /// Upper body
    Primary,
    /// Lower body
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Reflect)]
pub enum AnimationState {
    #[default]
    None,
    StandOnBeam,
    ClimbOnBeam,
    /// Pulling up past the last tile of a vertical pole
    GetUpToBeamTip,
    /// Balancing on top of a vertical pole
    BeamTip,
    HangFromBeam,
    ZeroGPoleGrab,
    VineGrab,
    /// Trick flip after a boosted jump
    Flip,
}

impl AnimationState {
    /// Animations during which the host holds the body against gravity.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            AnimationState::StandOnBeam
                | AnimationState::ClimbOnBeam
                | AnimationState::GetUpToBeamTip
                | AnimationState::BeamTip
                | AnimationState::HangFromBeam
                | AnimationState::ZeroGPoleGrab
                | AnimationState::VineGrab
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum BodyMode {
    /// Airborne or otherwise unsupported
    #[default]
    Default,
    /// Feet on solid ground
    Stand,
    ClimbingOnBeam,
    ZeroG,
}

/// One body part in per-tick units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rad: f32,
}

impl Chunk {
    pub fn new(pos: Vec2, rad: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rad,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Multipliers the host applies to its own run and climb movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedFactors {
    pub run: f32,
    pub climb: f32,
}

impl Default for SpeedFactors {
    fn default() -> Self {
        Self {
            run: 1.0,
            climb: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrabbedKind {
    #[default]
    Item,
    Creature,
    /// Small companion creature; never counts as encumbrance
    Pup,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabbedObject {
    pub mass: f32,
    pub kind: GrabbedKind,
}

/// Attachment point on a vine: vine index plus normalized arc position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VinePosition {
    pub vine: usize,
    pub float_pos: f32,
}

/// Per-tick view of a character's physics and animation state.
///
/// Positions are world units, velocities are world units per tick. The host
/// fills this from the physics entities at the start of a tick and writes it
/// back at the end.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct CharacterBody {
    pub primary: Chunk,
    pub secondary: Chunk,
    pub hands: [Vec2; 2],
    pub animation: AnimationState,
    pub body_mode: BodyMode,
    pub speed_factors: SpeedFactors,
    /// Effective gravity strength, 0 = weightless, 1 = normal.
    pub gravity: f32,
    pub vine_pos: Option<VinePosition>,
    pub vine_climb_cursor: Vec2,
    /// Adrenaline-like stat in [0, 1].
    pub adrenaline: f32,
    pub grabbed: Option<GrabbedObject>,
    pub slide_direction: i32,
    pub slide_counter: u32,
    pub jump_boost: f32,
    /// Jumping while hurt or exhausted.
    pub pain_jump: bool,
    /// Ticks left in which the host still allows a jump after losing support.
    pub can_jump: u32,
    /// Lower body touching terrain this tick.
    pub grounded: bool,
}

impl CharacterBody {
    pub fn new(primary: Chunk, secondary: Chunk) -> Self {
        Self {
            hands: [primary.pos; 2],
            primary,
            secondary,
            animation: AnimationState::None,
            body_mode: BodyMode::Default,
            speed_factors: SpeedFactors::default(),
            gravity: 1.0,
            vine_pos: None,
            vine_climb_cursor: Vec2::ZERO,
            adrenaline: 0.0,
            grabbed: None,
            slide_direction: 1,
            slide_counter: 0,
            jump_boost: 0.0,
            pain_jump: false,
            can_jump: 0,
            grounded: false,
        }
    }
}

/// Held/pressed input for one character this tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterInput {
    pub x: i32,
    pub y: i32,
    pub jump: bool,
    pub jump_pressed: bool,
    pub grind: bool,
    /// Latched by the toggle-grind key
    pub grind_latched: bool,
}

impl CharacterInput {
    pub fn grind_active(&self) -> bool {
        self.grind || self.grind_latched
    }

    pub fn pressing_down(&self) -> bool {
        self.y < 0
    }
}

/// Set when something asks the character to jump this tick.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct JumpRequest(pub bool);
