//! Cancelable periodic timers
//!
//! The game clock and the entity producers are all periodic tasks registered
//! with a `Scheduler`. Execution is single-threaded: the owner repeatedly pops
//! the next due firing and runs it to completion before asking for the next
//! one, so a timer cancelled by one firing can never fire afterwards.
//!
//! `VirtualScheduler` runs on a virtual clock that only moves when the owner
//! advances it, which keeps runs reproducible.

use std::collections::BTreeMap;
use std::time::Duration;

/// Shortest accepted period (zero would fire forever without advancing time)
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Opaque handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Periodic task scheduling capability
pub trait Scheduler<T> {
    /// Current clock time
    fn now(&self) -> Duration;

    /// Register `task` to fire every `interval`, first firing one interval from now
    fn schedule(&mut self, interval: Duration, task: T) -> TimerHandle;

    /// Stop a timer. Returns false if it was not active (already cancelled or unknown).
    fn cancel(&mut self, handle: TimerHandle) -> bool;

    fn is_active(&self, handle: TimerHandle) -> bool;

    /// Number of active timers
    fn active_count(&self) -> usize;

    /// Pop the earliest firing due at or before `deadline`, moving the clock to
    /// its fire time and re-arming the timer for its next period.
    ///
    /// Firings due at the same instant come back in an unspecified order.
    fn next_due(&mut self, deadline: Duration) -> Option<(TimerHandle, T)>;

    /// Move the clock forward to `deadline` (never backwards)
    fn advance_to(&mut self, deadline: Duration);
}

#[derive(Debug, Clone)]
struct Timer<T> {
    interval: Duration,
    next_fire: Duration,
    task: T,
}

/// Deterministic scheduler on a virtual clock
#[derive(Debug, Clone)]
pub struct VirtualScheduler<T> {
    now: Duration,
    timers: BTreeMap<TimerHandle, Timer<T>>,
    next_handle: u64,
}

impl<T> Default for VirtualScheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            timers: BTreeMap::new(),
            next_handle: 1,
        }
    }
}

impl<T> VirtualScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Period of an active timer
    pub fn interval_of(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers.get(&handle).map(|t| t.interval)
    }
}

impl<T: Clone> Scheduler<T> for VirtualScheduler<T> {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, interval: Duration, task: T) -> TimerHandle {
        debug_assert!(!interval.is_zero(), "zero-period timer");
        let interval = interval.max(MIN_INTERVAL);
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.insert(
            handle,
            Timer {
                interval,
                next_fire: self.now + interval,
                task,
            },
        );
        log::trace!("Timer {:?} scheduled every {:?}", handle, interval);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let removed = self.timers.remove(&handle).is_some();
        if removed {
            log::trace!("Timer {:?} cancelled", handle);
        }
        removed
    }

    fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    fn active_count(&self) -> usize {
        self.timers.len()
    }

    fn next_due(&mut self, deadline: Duration) -> Option<(TimerHandle, T)> {
        let (&handle, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.next_fire <= deadline)
            .min_by_key(|(h, t)| (t.next_fire, **h))?;

        let timer = self.timers.get_mut(&handle)?;
        self.now = self.now.max(timer.next_fire);
        timer.next_fire += timer.interval;
        Some((handle, timer.task.clone()))
    }

    fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}
