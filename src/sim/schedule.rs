//! Interval scheduling on a virtual clock
//!
//! The game loop, round timer and spawner are repeating intervals. The
//! scheduler keeps them on one clock and hands out due firings one at a
//! time, so callbacks never overlap and may freely start or stop intervals
//! (including their own) between firings.

/// Handle to a scheduled interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntervalId(u32);

/// What a firing interval drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    GameLoop,
    RoundTimer,
    Spawner,
}

#[derive(Debug, Clone)]
struct Interval {
    id: IntervalId,
    task: Task,
    period_ms: u64,
    next_due_ms: u64,
}

/// Single-threaded interval queue
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    intervals: Vec<Interval>,
    next_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Start a repeating interval; the first firing is one period from now
    pub fn set_interval(&mut self, task: Task, period_ms: u64) -> IntervalId {
        let id = IntervalId(self.next_id);
        self.next_id += 1;
        let period_ms = period_ms.max(1);
        self.intervals.push(Interval {
            id,
            task,
            period_ms,
            next_due_ms: self.now_ms + period_ms,
        });
        id
    }

    /// Cancel an interval. Returns false if it was not active.
    pub fn clear_interval(&mut self, id: IntervalId) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|i| i.id != id);
        self.intervals.len() != before
    }

    /// Number of active intervals driving `task`
    pub fn active_count(&self, task: Task) -> usize {
        self.intervals.iter().filter(|i| i.task == task).count()
    }

    /// Period of an active interval
    pub fn period_of(&self, id: IntervalId) -> Option<u64> {
        self.intervals.iter().find(|i| i.id == id).map(|i| i.period_ms)
    }

    /// Pop the earliest firing due at or before `until_ms`.
    ///
    /// Advances the clock to the firing time and reschedules the interval one
    /// period later. Ties fire in creation order.
    pub fn next_due(&mut self, until_ms: u64) -> Option<Task> {
        let interval = self
            .intervals
            .iter_mut()
            .filter(|i| i.next_due_ms <= until_ms)
            .min_by_key(|i| (i.next_due_ms, i.id))?;

        self.now_ms = interval.next_due_ms;
        interval.next_due_ms += interval.period_ms;
        Some(interval.task)
    }

    /// Move the clock to `until_ms` once nothing more is due
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

/// An on/off facility backed by at most one interval
#[derive(Debug, Clone)]
pub struct Facility {
    task: Task,
    handle: Option<IntervalId>,
}

impl Facility {
    pub fn new(task: Task) -> Self {
        Self { task, handle: None }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<IntervalId> {
        self.handle
    }

    /// Switch on at `period_ms`. No-op (returns false) if already running.
    pub fn start(&mut self, scheduler: &mut Scheduler, period_ms: u64) -> bool {
        if self.handle.is_some() {
            return false;
        }
        self.handle = Some(scheduler.set_interval(self.task, period_ms));
        true
    }

    /// Switch off. No-op (returns false) if already off.
    pub fn stop(&mut self, scheduler: &mut Scheduler) -> bool {
        match self.handle.take() {
            Some(id) => {
                scheduler.clear_interval(id);
                true
            }
            None => false,
        }
    }

    /// Off then on again at a new period
    pub fn restart(&mut self, scheduler: &mut Scheduler, period_ms: u64) {
        self.stop(scheduler);
        self.start(scheduler, period_ms);
    }
}
