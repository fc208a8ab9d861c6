/// Length of one session in clock ticks (seconds)
pub const TOTAL_DURATION: u32 = 60;

/// Seconds spent on each difficulty plateau
pub const TIER_LENGTH_SECS: u32 = 10;

pub const MAX_TIER: u8 = 5;

/// Timing parameters for one difficulty tier.
///
/// Durations are in milliseconds. `animation_speed` is the progress delta
/// applied to an emerging or retracting actor on every render frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub min_show_ms: u64,
    pub max_show_ms: u64,
    pub min_hide_ms: u64,
    pub max_hide_ms: u64,
    pub animation_speed: f64,
}

impl DifficultyProfile {
    /// Frames an actor needs to go from 0 to fully popped, counted with the
    /// same float accumulation the animation uses.
    pub fn pop_frames(&self) -> u64 {
        if self.animation_speed <= 0.0 {
            return 0;
        }
        let mut progress = 0.0;
        let mut frames = 0;
        while progress < 1.0 {
            progress += self.animation_speed;
            frames += 1;
        }
        frames
    }

    /// Shortest show or hide delay that still lets a full pop play out.
    ///
    /// One frame more than the pop itself: within a frame timers fire before
    /// the animation step, so a delay ending on the last pop frame would cut it.
    pub fn pop_duration_ms(&self, frame_ms: u64) -> u64 {
        (self.pop_frames() + 1).saturating_mul(frame_ms)
    }
}

const PROFILES: [DifficultyProfile; (MAX_TIER + 1) as usize] = [
    DifficultyProfile {
        min_show_ms: 1400,
        max_show_ms: 2200,
        min_hide_ms: 1200,
        max_hide_ms: 2600,
        animation_speed: 0.08,
    },
    DifficultyProfile {
        min_show_ms: 1200,
        max_show_ms: 1900,
        min_hide_ms: 1000,
        max_hide_ms: 2200,
        animation_speed: 0.10,
    },
    DifficultyProfile {
        min_show_ms: 1000,
        max_show_ms: 1600,
        min_hide_ms: 850,
        max_hide_ms: 1900,
        animation_speed: 0.12,
    },
    DifficultyProfile {
        min_show_ms: 850,
        max_show_ms: 1350,
        min_hide_ms: 700,
        max_hide_ms: 1600,
        animation_speed: 0.14,
    },
    DifficultyProfile {
        min_show_ms: 700,
        max_show_ms: 1100,
        min_hide_ms: 550,
        max_hide_ms: 1300,
        animation_speed: 0.17,
    },
    DifficultyProfile {
        min_show_ms: 550,
        max_show_ms: 900,
        min_hide_ms: 400,
        max_hide_ms: 1000,
        animation_speed: 0.20,
    },
];

/// Tier for the given elapsed session time: `min(floor(elapsed / 10), 5)`
pub fn tier_for(elapsed_secs: u32) -> u8 {
    (elapsed_secs / TIER_LENGTH_SECS).min(MAX_TIER as u32) as u8
}

/// Profile for a tier. Tiers above the maximum clamp to the hardest profile.
pub fn profile(tier: u8) -> DifficultyProfile {
    PROFILES[tier.min(MAX_TIER) as usize]
}
