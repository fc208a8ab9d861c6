use rand::Rng;

pub type ActorId = usize;

/// Number of holes on the board
pub const ACTOR_COUNT: usize = 3;

/// Probability that a fresh appearance is hostile
pub const HOSTILE_CHANCE: f64 = 0.25;

/// Vertical anchor of every hole as a fraction of the board height
const HOLE_BASELINE: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Visibility {
    Hidden,
    Emerging,
    Visible,
    Retracting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ActorKind {
    Benign,
    Hostile,
}

impl ActorKind {
    /// Score change for a successful strike on this kind
    pub fn strike_points(&self) -> i64 {
        match self {
            ActorKind::Benign => 10,
            ActorKind::Hostile => -20,
        }
    }
}

/// Overlay shown after a successful strike, independent of visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum StrikeAnim {
    None,
    Phase1,
    Phase2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub base_y: f64,
}

/// Anchor of hole `index` on a board of the given size. Holes are spread
/// evenly across the width.
pub fn hole_anchor(index: ActorId, width: f64, height: f64) -> Position {
    Position {
        x: width * (index as f64 + 1.0) / (ACTOR_COUNT as f64 + 1.0),
        base_y: height * HOLE_BASELINE,
    }
}

pub fn sample_kind<R: Rng + ?Sized>(rng: &mut R, hostile_chance: f64) -> ActorKind {
    if rng.gen_bool(hostile_chance.clamp(0.0, 1.0)) {
        ActorKind::Hostile
    } else {
        ActorKind::Benign
    }
}

/// What a single animation frame did to an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStep {
    Idle,
    Moved,
    BecameVisible,
    BecameHidden,
}

/// One pop-up target bound to a hole.
///
/// The record only knows how to animate and validate itself; timers and
/// scoring belong to the owning [`crate::game::Game`].
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    pub position: Position,
    pub visibility: Visibility,
    pub kind: ActorKind,
    pub struck: bool,
    pub progress: f64,
    pub strike_anim: StrikeAnim,
    /// Clock time at which the current appearance became fully visible
    pub visible_since_ms: Option<u64>,
}

impl Actor {
    pub fn new(id: ActorId, position: Position) -> Self {
        Self {
            id,
            position,
            visibility: Visibility::Hidden,
            kind: ActorKind::Benign,
            struck: false,
            progress: 0.0,
            strike_anim: StrikeAnim::None,
            visible_since_ms: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.visibility == Visibility::Hidden
    }

    /// Hidden -> Emerging with a freshly chosen kind. Returns false if the
    /// actor is already mid-appearance.
    pub fn emerge(&mut self, kind: ActorKind) -> bool {
        if !self.is_hidden() {
            return false;
        }
        self.visibility = Visibility::Emerging;
        self.kind = kind;
        self.struck = false;
        self.progress = 0.0;
        self.visible_since_ms = None;
        true
    }

    /// Emerging/Visible -> Retracting. Anything else is left alone.
    pub fn retract(&mut self) -> bool {
        match self.visibility {
            Visibility::Emerging | Visibility::Visible => {
                self.visibility = Visibility::Retracting;
                true
            }
            Visibility::Hidden | Visibility::Retracting => false,
        }
    }

    /// Applies one frame of pop animation at `speed` progress per frame
    pub fn advance(&mut self, speed: f64) -> AnimationStep {
        match self.visibility {
            Visibility::Emerging => {
                self.progress += speed;
                if self.progress >= 1.0 {
                    self.progress = 1.0;
                    self.visibility = Visibility::Visible;
                    AnimationStep::BecameVisible
                } else {
                    AnimationStep::Moved
                }
            }
            Visibility::Retracting => {
                self.progress -= speed;
                if self.progress <= 0.0 {
                    self.progress = 0.0;
                    self.visibility = Visibility::Hidden;
                    AnimationStep::BecameHidden
                } else {
                    AnimationStep::Moved
                }
            }
            Visibility::Hidden | Visibility::Visible => AnimationStep::Idle,
        }
    }

    pub fn can_be_struck(&self) -> bool {
        self.visibility == Visibility::Visible && self.progress > 0.0 && !self.struck
    }

    /// Forces the actor back into its hole with nothing in flight
    pub fn hide(&mut self) {
        self.visibility = Visibility::Hidden;
        self.progress = 0.0;
        self.struck = false;
        self.strike_anim = StrikeAnim::None;
        self.visible_since_ms = None;
    }

    pub fn reposition(&mut self, width: f64, height: f64) {
        self.position = hole_anchor(self.id, width, height);
    }
}
