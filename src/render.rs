use rand::Rng;

use crate::actor::{ActorId, ActorKind, Position, StrikeAnim, Visibility};
use crate::game::Game;
use crate::session::Phase;

/// Everything needed to draw one actor
#[derive(Debug, Clone, PartialEq)]
pub struct ActorView {
    pub id: ActorId,
    pub position: Position,
    pub visibility: Visibility,
    pub progress: f64,
    /// Only meaningful once `progress > 0`
    pub kind: Option<ActorKind>,
    pub struck: bool,
    pub strike_anim: StrikeAnim,
}

impl ActorView {
    /// Visible height in board rows for a bunny that is `full_height` tall
    pub fn pop_height(&self, full_height: u16) -> u16 {
        (self.progress * full_height as f64).round() as u16
    }
}

/// Read-only snapshot of a game for one render frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub actors: Vec<ActorView>,
    pub score: i64,
    pub time_left: u32,
    pub difficulty_tier: u8,
    pub running: bool,
    pub paused: bool,
    pub ended: bool,
    pub phase: Phase,
}

impl FrameView {
    pub fn capture<R: Rng>(game: &Game<R>) -> Self {
        let session = game.session();
        let actors = game
            .actors()
            .iter()
            .map(|a| ActorView {
                id: a.id,
                position: a.position,
                visibility: a.visibility,
                progress: a.progress,
                kind: (a.progress > 0.0).then_some(a.kind),
                struck: a.struck,
                strike_anim: a.strike_anim,
            })
            .collect();

        Self {
            actors,
            score: session.score,
            time_left: session.time_left(),
            difficulty_tier: session.difficulty_tier,
            running: session.running,
            paused: session.paused,
            ended: session.ended,
            phase: session.phase(),
        }
    }

    /// Whether the frame loop should keep producing frames after this one
    pub fn wants_next_frame(&self) -> bool {
        self.running
    }
}
