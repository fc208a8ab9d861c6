use crate::difficulty::TOTAL_DURATION;
use crate::time_series::ScorePoint;
use crate::util::{mean, std_dev};

/// Coarse session lifecycle derived from the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub running: bool,
    pub paused: bool,
    /// Set only by a natural timeout, never by reset
    pub ended: bool,
    pub elapsed_seconds: u32,
    pub score: i64,
    pub difficulty_tier: u8,
    pub stats: SessionStats,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            running: false,
            paused: false,
            ended: false,
            elapsed_seconds: 0,
            score: 0,
            difficulty_tier: 0,
            stats: SessionStats::default(),
        }
    }
}

impl SessionState {
    pub fn time_left(&self) -> u32 {
        TOTAL_DURATION.saturating_sub(self.elapsed_seconds)
    }

    /// True while the game is live and accepting new scheduling decisions
    pub fn is_active(&self) -> bool {
        self.running && !self.paused
    }

    pub fn phase(&self) -> Phase {
        match (self.running, self.paused, self.ended) {
            (_, _, true) => Phase::Ended,
            (true, true, _) => Phase::Paused,
            (true, false, _) => Phase::Running,
            (false, _, _) => Phase::Idle,
        }
    }
}

/// Per-session bookkeeping that does not affect scoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub benign_hits: u32,
    pub hostile_hits: u32,
    /// Benign appearances that went back into their hole unstruck
    pub escaped: u32,
    pub appearances: u32,
    pub reaction_times_ms: Vec<f64>,
    pub score_series: Vec<ScorePoint>,
}

impl SessionStats {
    pub fn mean_reaction_ms(&self) -> Option<f64> {
        mean(&self.reaction_times_ms)
    }

    pub fn reaction_spread_ms(&self) -> Option<f64> {
        std_dev(&self.reaction_times_ms)
    }

    /// Share of benign appearances that were hit, in percent
    pub fn benign_hit_rate(&self) -> Option<f64> {
        let benign_total = self.benign_hits + self.escaped;
        match benign_total {
            0 => None,
            total => Some((self.benign_hits as f64 / total as f64 * 100.0).round()),
        }
    }
}
