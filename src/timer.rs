use rand::Rng;

/// Identifies one scheduled timer. Handles are never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Pending<E> {
    handle: TimerHandle,
    due_ms: u64,
    event: E,
}

/// One-shot delayed actions on a virtual millisecond clock.
///
/// Nothing fires on its own: the owner advances the clock and drains due
/// timers with [`Scheduler::pop_due`]. Timers due at the same instant come
/// out in scheduling order, but callers must not rely on that.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            due_ms: self.now_ms.saturating_add(delay_ms),
            event,
        });
        handle
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|p| p.handle == handle) {
            Some(idx) => {
                self.pending.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Absolute clock time at which the timer will fire, if still pending
    pub fn due_at(&self, handle: TimerHandle) -> Option<u64> {
        self.pending
            .iter()
            .find(|p| p.handle == handle)
            .map(|p| p.due_ms)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns the earliest timer due at or before `until_ms`,
    /// moving the clock to its due time. The clock never moves backwards.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerHandle, E)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.handle.0))
            .map(|(idx, _)| idx)?;

        let fired = self.pending.remove(idx);
        self.now_ms = self.now_ms.max(fired.due_ms);
        Some((fired.handle, fired.event))
    }

    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform sample from `[min_ms, max_ms)`, raised to at least `floor_ms`
pub fn sample_delay<R: Rng + ?Sized>(rng: &mut R, min_ms: u64, max_ms: u64, floor_ms: u64) -> u64 {
    let sampled = if min_ms < max_ms {
        rng.gen_range(min_ms..max_ms)
    } else {
        min_ms
    };
    sampled.max(floor_ms)
}
