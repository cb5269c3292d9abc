// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

//! Delayed and periodic callbacks.
//!
//! Timers never invoke code directly. Instead a typed event is scheduled
//! and handed back to its owner when the timer fires. The owner stores
//! the [`TimerHandle`] and compares it when the event arrives, i.e. an
//! event for a handle that has been replaced in the meantime is stale
//! and must be ignored.

use std::{collections::HashMap, time::Duration};

/// Opaque reference to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRepeat {
    /// Fire once
    Once,
    /// Fire periodically until canceled
    Periodic,
}

pub trait Timers<E> {
    /// Schedule `event` to be delivered after `delay`.
    ///
    /// Periodic timers are delivered repeatedly with `delay` as the period.
    fn schedule(&mut self, delay: Duration, event: E, repeat: TimerRepeat) -> TimerHandle;

    /// Cancel a timer.
    ///
    /// Canceling a timer that has already fired or has already been
    /// canceled is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Cancel the timer in `slot` (if any) and store the new one.
///
/// Ensures that at most one timer per slot is pending.
pub fn replace_timer<E, T>(
    timers: &mut T,
    slot: &mut Option<TimerHandle>,
    delay: Duration,
    event: E,
    repeat: TimerRepeat,
) -> TimerHandle
where
    T: Timers<E> + ?Sized,
{
    cancel_timer(timers, slot);
    let handle = timers.schedule(delay, event, repeat);
    *slot = Some(handle);
    handle
}

/// Cancel the timer in `slot` (if any) and clear it.
///
/// Returns `true` if a timer has been canceled.
pub fn cancel_timer<E, T>(timers: &mut T, slot: &mut Option<TimerHandle>) -> bool
where
    T: Timers<E> + ?Sized,
{
    let Some(handle) = slot.take() else {
        return false;
    };
    timers.cancel(handle);
    true
}

#[derive(Debug, Clone)]
struct Entry<E> {
    deadline: Duration,
    period: Option<Duration>,
    event: E,
}

/// Single-threaded timer queue driven by an external clock.
///
/// Time is measured as the offset from an arbitrary origin, e.g. the
/// start of the session. The clock only moves forward when polled.
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    now: Duration,
    next_handle: u64,
    entries: HashMap<TimerHandle, Entry<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            entries: HashMap::new(),
        }
    }
}

impl<E> TimerQueue<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current time of the queue
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Deadline of the next timer that is due, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.values().map(|entry| entry.deadline).min()
    }

    /// Move the clock forward without firing any timers.
    ///
    /// The clock never moves backward.
    pub fn advance(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl<E: Clone> TimerQueue<E> {
    /// Pop the next timer that is due at `now`.
    ///
    /// Timers are fired in the order of their deadlines and then in
    /// the order in which they have been scheduled. The clock is moved
    /// to the deadline of the fired timer, i.e. timers that are scheduled
    /// while handling the event are relative to this point in time.
    ///
    /// Periodic timers are rescheduled before being returned. Periods
    /// that have been missed entirely are skipped and the next deadline
    /// is delayed relative to `now`, i.e. a late poll fires a periodic
    /// timer only once.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, E)> {
        let (handle, deadline) = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(handle, entry)| (*handle, entry.deadline))
            .min_by_key(|(handle, deadline)| (*deadline, *handle))?;
        self.advance(deadline);
        let period = self.entries.get(&handle)?.period;
        let event = if let Some(period) = period {
            let entry = self.entries.get_mut(&handle)?;
            let next_deadline = deadline + period;
            entry.deadline = if next_deadline < now {
                log::debug!("Delaying timer {handle:?} after missed deadline {next_deadline:?}");
                now + period
            } else {
                next_deadline
            };
            entry.event.clone()
        } else {
            self.entries.remove(&handle)?.event
        };
        Some((handle, event))
    }
}

impl<E> Timers<E> for TimerQueue<E> {
    fn schedule(&mut self, delay: Duration, event: E, repeat: TimerRepeat) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let period = match repeat {
            TimerRepeat::Once => None,
            // A zero period would never let the clock advance.
            TimerRepeat::Periodic => Some(delay.max(Duration::from_millis(1))),
        };
        let entry = Entry {
            deadline: self.now + delay,
            period,
            event,
        };
        log::trace!("Scheduling timer {handle:?} at {deadline:?}", deadline = entry.deadline);
        self.entries.insert(handle, entry);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.entries.remove(&handle).is_some() {
            log::trace!("Canceled timer {handle:?}");
        }
    }
}

#[cfg(feature = "tokio")]
pub mod tokio;
#[cfg(feature = "tokio")]
pub use self::tokio::{TimerEventReceiver, TokioTimers};

#[cfg(test)]
mod tests;
