use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::actor::{
    hole_anchor, sample_kind, Actor, ActorId, ActorKind, AnimationStep, StrikeAnim, ACTOR_COUNT,
    HOSTILE_CHANCE,
};
use crate::difficulty::{profile, tier_for, DifficultyProfile, TOTAL_DURATION};
use crate::session::SessionState;
use crate::time_series::ScorePoint;
use crate::timer::{sample_delay, Scheduler, TimerHandle};

/// Session clock period
pub const CLOCK_INTERVAL_MS: u64 = 1_000;
/// How long the first strike overlay frame is held
pub const STRIKE_PHASE1_MS: u64 = 120;
/// How long the second strike overlay frame is held
pub const STRIKE_PHASE2_MS: u64 = 120;
/// Delay between a strike and the forced retraction of the struck actor
pub const FORCED_RETRACT_MS: u64 = 250;

pub const DEFAULT_FRAME_MS: u64 = 33;
/// Slowest render frame interval the game accepts
pub const MAX_FRAME_MS: u64 = 1_000;

/// What pausing does to timers that are already counting down
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PauseMode {
    /// Freeze the timer clock and animation; remaining delays resume on unpause
    #[default]
    Suspend,
    /// Keep the timer clock running: pending timers may still fire once while
    /// paused and animation continues, only new scheduling checks the flag
    Legacy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub frame_ms: u64,
    pub pause_mode: PauseMode,
    pub hostile_chance: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            frame_ms: DEFAULT_FRAME_MS,
            pause_mode: PauseMode::default(),
            hostile_chance: HOSTILE_CHANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeOutcome {
    Hit(ActorKind),
    Miss,
}

/// Transient notifications for the presentation layer, consumed once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A hostile actor was hit
    Alert { actor: ActorId },
    SessionEnded { final_score: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    ClockTick,
    Show(ActorId),
    Hide(ActorId),
    ForceRetract(ActorId),
    StrikePhase2(ActorId),
    StrikeDone(ActorId),
}

/// Outstanding timer handles for one actor. At most one of each is live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorTimers {
    pub visibility: Option<TimerHandle>,
    pub strike_anim: Option<TimerHandle>,
}

/// The game controller: owns the session, every actor and every pending timer.
///
/// All mutation goes through `&mut self`, so each timer callback, command and
/// frame runs to completion before the next one is observed.
#[derive(Debug)]
pub struct Game<R: Rng = StdRng> {
    session: SessionState,
    actors: Vec<Actor>,
    actor_timers: Vec<ActorTimers>,
    clock_timer: Option<TimerHandle>,
    timers: Scheduler<TimerEvent>,
    settings: GameSettings,
    rng: R,
    events: Vec<GameEvent>,
    board: (f64, f64),
}

impl Game<StdRng> {
    /// Production constructor; a fixed seed makes a session reproducible
    pub fn with_seed(settings: GameSettings, seed: Option<u64>, width: f64, height: f64) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(settings, rng, width, height)
    }
}

impl<R: Rng> Game<R> {
    pub fn new(settings: GameSettings, rng: R, width: f64, height: f64) -> Self {
        let actors = (0..ACTOR_COUNT)
            .map(|id| Actor::new(id, hole_anchor(id, width, height)))
            .collect();

        Self {
            session: SessionState::default(),
            actors,
            actor_timers: vec![ActorTimers::default(); ACTOR_COUNT],
            clock_timer: None,
            timers: Scheduler::new(),
            settings,
            rng,
            events: Vec::new(),
            board: (width, height),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn board_size(&self) -> (f64, f64) {
        self.board
    }

    /// Current reading of the virtual timer clock, in ms
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    pub fn timers_for(&self, id: ActorId) -> Option<ActorTimers> {
        self.actor_timers.get(id).copied()
    }

    /// When the actor's pending show/hide timer will fire, if any
    pub fn visibility_due_at(&self, id: ActorId) -> Option<u64> {
        self.actor_timers
            .get(id)
            .and_then(|t| t.visibility)
            .and_then(|h| self.timers.due_at(h))
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recomputes the tier from elapsed time and returns its profile.
    /// This is the only place `difficulty_tier` changes.
    fn current_profile(&mut self) -> DifficultyProfile {
        let tier = tier_for(self.session.elapsed_seconds);
        if tier != self.session.difficulty_tier {
            debug!(tier, elapsed = self.session.elapsed_seconds, "difficulty tier changed");
            self.session.difficulty_tier = tier;
        }
        profile(tier)
    }

    pub fn start(&mut self) {
        if self.session.running && !self.session.paused {
            return;
        }
        if self.session.running {
            self.resume();
            return;
        }

        self.clear_all_timers();
        for actor in &mut self.actors {
            actor.hide();
        }
        self.events.clear();
        self.session = SessionState {
            running: true,
            ..SessionState::default()
        };

        let profile = self.current_profile();
        let floor = profile.pop_duration_ms(self.settings.frame_ms);
        self.clock_timer = Some(self.timers.schedule(CLOCK_INTERVAL_MS, TimerEvent::ClockTick));
        for id in 0..self.actors.len() {
            // staggered so the holes don't pop in lockstep
            let delay = sample_delay(&mut self.rng, profile.min_hide_ms, profile.max_hide_ms, floor);
            self.actor_timers[id].visibility = Some(self.timers.schedule(delay, TimerEvent::Show(id)));
        }

        info!(pause_mode = %self.settings.pause_mode, "session started");
    }

    /// Toggles pause. When nothing is running this starts a session instead.
    pub fn pause(&mut self) {
        if !self.session.running {
            self.start();
            return;
        }
        if self.session.paused {
            self.resume();
        } else {
            self.session.paused = true;
            info!(elapsed = self.session.elapsed_seconds, "session paused");
        }
    }

    fn resume(&mut self) {
        self.session.paused = false;
        if self.clock_timer.is_none() {
            self.clock_timer = Some(self.timers.schedule(CLOCK_INTERVAL_MS, TimerEvent::ClockTick));
        }
        for id in 0..self.actors.len() {
            let dormant = self.actors[id].is_hidden() && self.actor_timers[id].visibility.is_none();
            if dormant {
                self.schedule_next_appearance(id);
            }
        }
        info!(elapsed = self.session.elapsed_seconds, "session resumed");
    }

    /// Hard stop back to idle. Nothing is scheduled until the next `start`.
    pub fn reset(&mut self) {
        self.clear_all_timers();
        for actor in &mut self.actors {
            actor.hide();
        }
        self.events.clear();
        self.session = SessionState::default();
        info!("session reset");
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.board = (width, height);
        for actor in &mut self.actors {
            actor.reposition(width, height);
        }
    }

    /// Resolves a strike on one actor. Anything but a fresh, fully visible
    /// target is a miss with no side effects.
    pub fn strike(&mut self, id: ActorId) -> StrikeOutcome {
        if !self.session.is_active() {
            return StrikeOutcome::Miss;
        }
        let now = self.timers.now();
        let Some(actor) = self.actors.get_mut(id) else {
            return StrikeOutcome::Miss;
        };
        if !actor.can_be_struck() {
            return StrikeOutcome::Miss;
        }

        actor.struck = true;
        actor.strike_anim = StrikeAnim::Phase1;
        let kind = actor.kind;
        let reaction_ms = actor.visible_since_ms.map(|since| now.saturating_sub(since));

        self.session.score += kind.strike_points();
        let stats = &mut self.session.stats;
        match kind {
            ActorKind::Benign => stats.benign_hits += 1,
            ActorKind::Hostile => {
                stats.hostile_hits += 1;
                self.events.push(GameEvent::Alert { actor: id });
            }
        }
        if let Some(ms) = reaction_ms {
            stats.reaction_times_ms.push(ms as f64);
        }

        let timers = &mut self.actor_timers[id];
        if let Some(h) = timers.strike_anim.take() {
            self.timers.cancel(h);
        }
        timers.strike_anim = Some(
            self.timers
                .schedule(STRIKE_PHASE1_MS, TimerEvent::StrikePhase2(id)),
        );
        // pre-empts whatever hide was originally sampled
        if let Some(h) = timers.visibility.take() {
            self.timers.cancel(h);
        }
        timers.visibility = Some(
            self.timers
                .schedule(FORCED_RETRACT_MS, TimerEvent::ForceRetract(id)),
        );

        debug!(actor = id, %kind, score = self.session.score, "strike");
        StrikeOutcome::Hit(kind)
    }

    /// Starts an appearance right away instead of waiting for the idle timer.
    /// Only hidden actors in a live session can be revealed.
    pub fn reveal(&mut self, id: ActorId, kind: ActorKind) -> bool {
        if !self.session.is_active() || !self.actors.get(id).is_some_and(Actor::is_hidden) {
            return false;
        }
        if let Some(h) = self.actor_timers[id].visibility.take() {
            self.timers.cancel(h);
        }
        let profile = self.current_profile();
        self.begin_appearance(id, kind, profile)
    }

    /// Advances the timer clock by `dt_ms`, firing every timer that comes due
    pub fn advance(&mut self, dt_ms: u64) {
        if !self.clock_is_running() {
            return;
        }
        let until = self.timers.now().saturating_add(dt_ms);
        while let Some((handle, event)) = self.timers.pop_due(until) {
            self.dispatch(handle, event);
        }
        self.timers.advance_to(until);
    }

    /// Applies one render frame of pop animation to every actor
    pub fn animate_frame(&mut self) {
        if !self.clock_is_running() {
            return;
        }
        let speed = self.current_profile().animation_speed;
        let now = self.timers.now();

        for id in 0..self.actors.len() {
            match self.actors[id].advance(speed) {
                AnimationStep::BecameVisible => {
                    self.actors[id].visible_since_ms = Some(now);
                }
                AnimationStep::BecameHidden => {
                    let actor = &self.actors[id];
                    if actor.kind == ActorKind::Benign && !actor.struck {
                        self.session.stats.escaped += 1;
                    }
                    trace!(actor = id, "actor hidden");
                    if self.session.is_active() {
                        self.schedule_next_appearance(id);
                    }
                }
                AnimationStep::Moved | AnimationStep::Idle => {}
            }
        }
    }

    /// One full frame: timers first, then animation
    pub fn frame(&mut self, dt_ms: u64) {
        self.advance(dt_ms);
        self.animate_frame();
    }

    fn clock_is_running(&self) -> bool {
        self.session.running
            && !(self.session.paused && self.settings.pause_mode == PauseMode::Suspend)
    }

    fn dispatch(&mut self, handle: TimerHandle, event: TimerEvent) {
        match event {
            TimerEvent::ClockTick => {
                if self.clock_timer != Some(handle) {
                    return;
                }
                self.clock_timer = None;
                self.on_clock_tick();
            }
            TimerEvent::Show(id) => {
                if self.take_visibility_timer(id, handle) {
                    self.on_show(id);
                }
            }
            TimerEvent::Hide(id) | TimerEvent::ForceRetract(id) => {
                if self.take_visibility_timer(id, handle) {
                    self.on_hide(id);
                }
            }
            TimerEvent::StrikePhase2(id) => {
                if self.take_strike_timer(id, handle) {
                    self.actors[id].strike_anim = StrikeAnim::Phase2;
                    self.actor_timers[id].strike_anim = Some(
                        self.timers
                            .schedule(STRIKE_PHASE2_MS, TimerEvent::StrikeDone(id)),
                    );
                }
            }
            TimerEvent::StrikeDone(id) => {
                if self.take_strike_timer(id, handle) {
                    self.actors[id].strike_anim = StrikeAnim::None;
                }
            }
        }
    }

    /// Clears the actor's visibility slot if `handle` is the live one.
    /// Anything else is a stale callback and must be ignored.
    fn take_visibility_timer(&mut self, id: ActorId, handle: TimerHandle) -> bool {
        match self.actor_timers.get_mut(id) {
            Some(t) if t.visibility == Some(handle) => {
                t.visibility = None;
                true
            }
            _ => false,
        }
    }

    fn take_strike_timer(&mut self, id: ActorId, handle: TimerHandle) -> bool {
        match self.actor_timers.get_mut(id) {
            Some(t) if t.strike_anim == Some(handle) => {
                t.strike_anim = None;
                true
            }
            _ => false,
        }
    }

    fn on_clock_tick(&mut self) {
        if !self.session.running {
            return;
        }
        if !self.session.paused {
            self.session.elapsed_seconds += 1;
            let point = ScorePoint::new(
                self.session.elapsed_seconds as f64,
                self.session.score as f64,
            );
            self.session.stats.score_series.push(point);
            self.current_profile();

            if self.session.elapsed_seconds >= TOTAL_DURATION {
                self.end_session();
                return;
            }
        }
        self.clock_timer = Some(self.timers.schedule(CLOCK_INTERVAL_MS, TimerEvent::ClockTick));
    }

    fn on_show(&mut self, id: ActorId) {
        if !self.session.is_active() {
            trace!(actor = id, "show timer fired while inactive, actor stays dormant");
            return;
        }
        let profile = self.current_profile();
        let kind = sample_kind(&mut self.rng, self.settings.hostile_chance);
        self.begin_appearance(id, kind, profile);
    }

    fn on_hide(&mut self, id: ActorId) {
        if self.actors[id].retract() {
            trace!(actor = id, "actor retracting");
        } else if self.actors[id].is_hidden() && self.session.is_active() {
            self.schedule_next_appearance(id);
        }
    }

    fn begin_appearance(&mut self, id: ActorId, kind: ActorKind, profile: DifficultyProfile) -> bool {
        if !self.actors[id].emerge(kind) {
            return false;
        }
        self.session.stats.appearances += 1;

        // sampled once; a tier change while waiting does not shorten it
        let floor = profile.pop_duration_ms(self.settings.frame_ms);
        let show = sample_delay(&mut self.rng, profile.min_show_ms, profile.max_show_ms, floor);
        self.actor_timers[id].visibility = Some(self.timers.schedule(show, TimerEvent::Hide(id)));

        debug!(actor = id, %kind, show_ms = show, "actor emerging");
        true
    }

    fn schedule_next_appearance(&mut self, id: ActorId) {
        if let Some(h) = self.actor_timers[id].visibility.take() {
            self.timers.cancel(h);
        }
        let profile = self.current_profile();
        let floor = profile.pop_duration_ms(self.settings.frame_ms);
        let delay = sample_delay(&mut self.rng, profile.min_hide_ms, profile.max_hide_ms, floor);
        self.actor_timers[id].visibility = Some(self.timers.schedule(delay, TimerEvent::Show(id)));
    }

    fn end_session(&mut self) {
        self.clear_all_timers();
        for actor in &mut self.actors {
            actor.hide();
        }
        self.session.running = false;
        self.session.paused = false;
        self.session.ended = true;
        self.events.push(GameEvent::SessionEnded {
            final_score: self.session.score,
        });
        info!(score = self.session.score, "session ended");
    }

    fn clear_all_timers(&mut self) {
        self.timers.cancel_all();
        self.clock_timer = None;
        for t in &mut self.actor_timers {
            *t = ActorTimers::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Visibility;
    use crate::difficulty::MAX_TIER;
    use assert_matches::assert_matches;

    const FRAME: u64 = 10;

    fn settings(pause_mode: PauseMode) -> GameSettings {
        GameSettings {
            frame_ms: FRAME,
            pause_mode,
            hostile_chance: HOSTILE_CHANCE,
        }
    }

    fn game() -> Game {
        Game::new(settings(PauseMode::Suspend), StdRng::seed_from_u64(1234), 80.0, 24.0)
    }

    fn run_ms(game: &mut Game, ms: u64) {
        for _ in 0..ms / FRAME {
            game.frame(FRAME);
        }
    }

    fn run_until_visible(game: &mut Game, id: ActorId) {
        for _ in 0..1_000 {
            if game.actor(id).unwrap().visibility == Visibility::Visible {
                return;
            }
            game.frame(FRAME);
        }
        panic!("actor {id} never became visible");
    }

    #[test]
    fn test_slow_frames_still_let_the_actor_fully_pop() {
        let slow = GameSettings {
            frame_ms: 250,
            ..settings(PauseMode::Suspend)
        };
        let mut g = Game::new(slow, StdRng::seed_from_u64(1234), 80.0, 24.0);
        g.start();
        g.session.elapsed_seconds = 10;
        assert!(g.reveal(0, ActorKind::Benign));
        assert_eq!(g.session().difficulty_tier, 1);

        let mut saw_visible = false;
        for _ in 0..40 {
            g.frame(250);
            match g.actor(0).unwrap().visibility {
                Visibility::Visible => saw_visible = true,
                Visibility::Retracting => break,
                Visibility::Hidden | Visibility::Emerging => {}
            }
        }
        assert!(saw_visible, "actor retracted before it could be struck");
    }

    #[test]
    fn test_new_game_is_idle() {
        let g = game();
        assert_eq!(g.actors().len(), ACTOR_COUNT);
        assert!(!g.session().running);
        assert!(!g.has_pending_timers());
        assert!(g.actors().iter().all(Actor::is_hidden));
    }

    #[test]
    fn test_start_arms_clock_and_every_actor() {
        let mut g = game();
        g.start();

        assert!(g.session().running);
        assert_eq!(g.session().score, 0);
        assert_eq!(g.session().time_left(), TOTAL_DURATION);
        for id in 0..ACTOR_COUNT {
            let due = g.visibility_due_at(id).expect("show timer armed");
            let p = profile(0);
            assert!(due >= p.min_hide_ms && due < p.max_hide_ms);
        }
    }

    #[test]
    fn test_initial_delays_are_staggered() {
        let mut g = game();
        g.start();
        let mut dues: Vec<u64> = (0..ACTOR_COUNT)
            .filter_map(|id| g.visibility_due_at(id))
            .collect();
        dues.sort_unstable();
        dues.dedup();
        assert_eq!(dues.len(), ACTOR_COUNT);
    }

    #[test]
    fn test_start_is_idempotent_while_running() {
        let mut g = game();
        g.start();
        let before: Vec<_> = (0..ACTOR_COUNT).map(|id| g.timers_for(id)).collect();
        run_ms(&mut g, 100);
        g.start();
        let after: Vec<_> = (0..ACTOR_COUNT).map(|id| g.timers_for(id)).collect();
        assert_eq!(before, after);
        assert_eq!(g.now(), 100);
    }

    #[test]
    fn test_clock_counts_down() {
        let mut g = game();
        g.start();
        run_ms(&mut g, 990);
        assert_eq!(g.session().time_left(), 60);
        run_ms(&mut g, 10);
        assert_eq!(g.session().time_left(), 59);
        run_ms(&mut g, 2_000);
        assert_eq!(g.session().time_left(), 57);
        assert_eq!(g.session().stats.score_series.len(), 3);
    }

    #[test]
    fn test_session_ends_after_sixty_ticks() {
        let mut g = game();
        g.start();
        run_ms(&mut g, 59_990);
        assert!(g.session().running);
        run_ms(&mut g, 10);

        let s = g.session();
        assert!(s.ended);
        assert!(!s.running);
        assert_eq!(s.time_left(), 0);
        assert!(!g.has_pending_timers());
        assert!(g.actors().iter().all(Actor::is_hidden));

        let final_score = s.score;
        assert_eq!(
            g.drain_events().last(),
            Some(&GameEvent::SessionEnded { final_score })
        );

        // frozen afterwards
        run_ms(&mut g, 5_000);
        assert_eq!(g.session().score, final_score);
        assert_eq!(g.session().elapsed_seconds, TOTAL_DURATION);
    }

    #[test]
    fn test_tier_follows_elapsed_time() {
        let mut g = game();
        g.start();
        run_ms(&mut g, 9_990);
        assert_eq!(g.session().difficulty_tier, 0);
        run_ms(&mut g, 10);
        assert_eq!(g.session().difficulty_tier, 1);
        run_ms(&mut g, 40_000);
        assert_eq!(g.session().difficulty_tier, MAX_TIER);
    }

    #[test]
    fn test_progress_never_leaves_unit_range() {
        let mut g = game();
        g.start();
        for _ in 0..(TOTAL_DURATION as u64 * 1_000 / FRAME) {
            g.frame(FRAME);
            for a in g.actors() {
                assert!((0.0..=1.0).contains(&a.progress));
            }
        }
        assert!(g.session().ended);
        assert!(g.session().stats.appearances > 0);
    }

    #[test]
    fn test_pending_hide_keeps_sampled_duration_across_tier_change() {
        let mut g = game();
        g.start();
        run_ms(&mut g, 9_990);
        let pending: Vec<_> = (0..ACTOR_COUNT)
            .filter_map(|id| g.visibility_due_at(id).map(|due| (id, due)))
            .filter(|(_, due)| *due > 10_100)
            .collect();

        run_ms(&mut g, 20);
        assert_eq!(g.session().difficulty_tier, 1);
        for (id, due) in pending {
            assert_eq!(g.visibility_due_at(id), Some(due));
        }
    }

    #[test]
    fn test_pause_toggles_and_starts_when_idle() {
        let mut g = game();
        g.pause();
        assert!(g.session().running);
        assert!(!g.session().paused);

        g.pause();
        assert!(g.session().paused);
        g.pause();
        assert!(!g.session().paused);
    }

    #[test]
    fn test_start_resumes_from_pause_preserving_state() {
        let mut g = game();
        g.start();
        run_ms(&mut g, 3_000);
        g.session.score = 30;
        g.pause();
        g.start();
        assert!(!g.session().paused);
        assert_eq!(g.session().score, 30);
        assert_eq!(g.session().elapsed_seconds, 3);
    }

    #[test]
    fn test_suspended_pause_freezes_everything() {
        let mut g = game();
        g.start();
        assert!(g.reveal(0, ActorKind::Benign));
        run_ms(&mut g, 50);
        let progress = g.actor(0).unwrap().progress;
        let due = g.visibility_due_at(0);
        let now = g.now();

        g.pause();
        run_ms(&mut g, 10_000);
        assert_eq!(g.now(), now);
        assert_eq!(g.session().elapsed_seconds, 0);
        assert_eq!(g.actor(0).unwrap().progress, progress);
        assert_eq!(g.visibility_due_at(0), due);

        g.pause();
        run_ms(&mut g, 1_000);
        assert_eq!(g.session().elapsed_seconds, 1);
    }

    #[test]
    fn test_legacy_pause_lets_pending_timers_fire_once() {
        let mut g = Game::new(settings(PauseMode::Legacy), StdRng::seed_from_u64(9), 80.0, 24.0);
        g.start();
        g.reveal(0, ActorKind::Benign);
        run_until_visible(&mut g, 0);
        g.pause();

        // the hide timer sampled before pausing still fires and the actor animates away
        run_ms(&mut g, 5_000);
        assert!(g.actor(0).unwrap().is_hidden());
        assert_eq!(g.visibility_due_at(0), None, "no new appearance while paused");
        assert_eq!(g.session().elapsed_seconds, 0, "clock gates on pause");

        g.pause();
        assert!(g.visibility_due_at(0).is_some(), "dormant actor re-armed on resume");
    }

    #[test]
    fn test_reset_from_running() {
        let mut g = game();
        g.start();
        g.reveal(1, ActorKind::Benign);
        run_until_visible(&mut g, 1);
        g.strike(1);
        run_ms(&mut g, 2_000);

        g.reset();
        let s = g.session();
        assert_eq!(s.score, 0);
        assert_eq!(s.time_left(), TOTAL_DURATION);
        assert!(!s.running && !s.paused && !s.ended);
        assert!(!g.has_pending_timers());
        for id in 0..ACTOR_COUNT {
            assert_eq!(g.timers_for(id), Some(ActorTimers::default()));
            assert!(g.actor(id).unwrap().is_hidden());
            assert_eq!(g.actor(id).unwrap().strike_anim, StrikeAnim::None);
        }

        // stays idle until explicitly started
        run_ms(&mut g, 5_000);
        assert!(g.actors().iter().all(Actor::is_hidden));
        assert_eq!(g.session().elapsed_seconds, 0);
    }

    #[test]
    fn test_reset_from_paused_and_ended() {
        let mut g = game();
        g.start();
        g.pause();
        g.reset();
        assert!(!g.session().paused);
        assert!(!g.has_pending_timers());

        g.start();
        run_ms(&mut g, 60_000);
        assert!(g.session().ended);
        g.reset();
        assert!(!g.session().ended);
        assert_eq!(g.session().time_left(), TOTAL_DURATION);
    }

    #[test]
    fn test_start_after_end_is_fresh() {
        let mut g = game();
        g.start();
        run_ms(&mut g, 60_000);
        assert!(g.session().ended);
        g.pause();
        assert!(g.session().running);
        assert!(!g.session().ended);
        assert_eq!(g.session().score, 0);
        assert_eq!(g.session().elapsed_seconds, 0);
    }

    #[test]
    fn test_strike_misses() {
        let mut g = game();
        assert_eq!(g.strike(0), StrikeOutcome::Miss, "idle session");

        g.start();
        assert_eq!(g.strike(0), StrikeOutcome::Miss, "hidden actor");
        assert_eq!(g.strike(99), StrikeOutcome::Miss, "no such actor");

        g.reveal(0, ActorKind::Benign);
        g.frame(FRAME);
        assert_eq!(g.actor(0).unwrap().visibility, Visibility::Emerging);
        assert_eq!(g.strike(0), StrikeOutcome::Miss, "still emerging");
        assert_eq!(g.session().score, 0);
    }

    #[test]
    fn test_benign_hit_scores_ten_once() {
        let mut g = game();
        g.start();
        g.reveal(2, ActorKind::Benign);
        run_until_visible(&mut g, 2);

        assert_matches!(g.strike(2), StrikeOutcome::Hit(ActorKind::Benign));
        assert_eq!(g.session().score, 10);
        assert!(g.actor(2).unwrap().struck);

        assert_eq!(g.strike(2), StrikeOutcome::Miss);
        assert_eq!(g.session().score, 10);
        assert!(g.drain_events().is_empty());
        assert_eq!(g.session().stats.benign_hits, 1);
        assert_eq!(g.session().stats.reaction_times_ms.len(), 1);
    }

    #[test]
    fn test_hit_points_do_not_depend_on_tier() {
        let mut g = game();
        g.start();
        g.session.elapsed_seconds = 55;

        assert!(g.reveal(0, ActorKind::Hostile));
        assert_eq!(g.session().difficulty_tier, MAX_TIER);
        run_until_visible(&mut g, 0);
        assert_eq!(g.strike(0), StrikeOutcome::Hit(ActorKind::Hostile));
        assert_eq!(g.session().score, -20);

        assert!(g.reveal(1, ActorKind::Benign));
        run_until_visible(&mut g, 1);
        assert_eq!(g.strike(1), StrikeOutcome::Hit(ActorKind::Benign));
        assert_eq!(g.session().score, -10);
    }

    #[test]
    fn test_hostile_hit_scenario() {
        let mut g = game();
        g.start();
        assert!(g.reveal(0, ActorKind::Hostile));
        let original_hide_due = g.visibility_due_at(0).expect("hide scheduled");
        run_until_visible(&mut g, 0);

        assert_eq!(g.strike(0), StrikeOutcome::Hit(ActorKind::Hostile));
        assert_eq!(g.session().score, -20);
        assert_eq!(g.drain_events(), vec![GameEvent::Alert { actor: 0 }]);
        assert!(g.drain_events().is_empty(), "alert is consumed once");

        let struck_at = g.now();
        assert_eq!(g.actor(0).unwrap().strike_anim, StrikeAnim::Phase1);
        run_ms(&mut g, STRIKE_PHASE1_MS - FRAME);
        assert_eq!(g.actor(0).unwrap().strike_anim, StrikeAnim::Phase1);
        run_ms(&mut g, FRAME);
        assert_eq!(g.actor(0).unwrap().strike_anim, StrikeAnim::Phase2);
        run_ms(&mut g, STRIKE_PHASE2_MS);
        assert_eq!(g.actor(0).unwrap().strike_anim, StrikeAnim::None);
        assert_eq!(g.now(), struck_at + STRIKE_PHASE1_MS + STRIKE_PHASE2_MS);

        while !g.actor(0).unwrap().is_hidden() {
            g.frame(FRAME);
        }
        assert!(g.now() < original_hide_due);
    }

    #[test]
    fn test_strike_while_paused_is_a_miss() {
        let mut g = game();
        g.start();
        g.reveal(0, ActorKind::Benign);
        run_until_visible(&mut g, 0);
        g.pause();
        assert_eq!(g.strike(0), StrikeOutcome::Miss);
        assert_eq!(g.session().score, 0);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut g = game();
        g.start();
        g.reveal(0, ActorKind::Benign);
        run_until_visible(&mut g, 0);

        let stale = g.timers.schedule(0, TimerEvent::Hide(0));
        g.timers.cancel(stale);
        g.dispatch(stale, TimerEvent::Hide(0));
        assert_eq!(g.actor(0).unwrap().visibility, Visibility::Visible);

        g.dispatch(stale, TimerEvent::ClockTick);
        assert_eq!(g.session().elapsed_seconds, 0);
    }

    #[test]
    fn test_unstruck_benign_counts_as_escaped() {
        let mut g = game();
        g.start();
        g.reveal(0, ActorKind::Benign);
        run_until_visible(&mut g, 0);
        while !g.actor(0).unwrap().is_hidden() {
            g.frame(FRAME);
        }
        assert_eq!(g.session().stats.escaped, 1);
        assert!(g.visibility_due_at(0).is_some(), "next appearance scheduled");
    }

    #[test]
    fn test_reveal_requires_hidden_actor_and_live_session() {
        let mut g = game();
        assert!(!g.reveal(0, ActorKind::Benign));
        g.start();
        assert!(g.reveal(0, ActorKind::Benign));
        assert!(!g.reveal(0, ActorKind::Hostile));
        assert!(!g.reveal(7, ActorKind::Hostile));
    }

    #[test]
    fn test_resize_repositions_without_touching_state() {
        let mut g = game();
        g.start();
        g.reveal(1, ActorKind::Benign);
        run_ms(&mut g, 50);
        let before = g.actor(1).unwrap().clone();

        g.resize(160.0, 48.0);
        let after = g.actor(1).unwrap();
        assert_eq!(after.position, hole_anchor(1, 160.0, 48.0));
        assert_eq!(after.visibility, before.visibility);
        assert_eq!(after.progress, before.progress);
        assert_eq!(g.board_size(), (160.0, 48.0));
    }
}
