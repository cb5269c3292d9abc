// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

//! Timers running on a Tokio runtime.

use std::{collections::HashMap, time::Duration};

use tokio::{
    runtime::Handle,
    sync::mpsc,
    task::AbortHandle,
    time::{Instant, MissedTickBehavior},
};

use super::{TimerHandle, TimerRepeat, Timers};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Receives the events of fired timers.
pub type TimerEventReceiver<E> = mpsc::UnboundedReceiver<(TimerHandle, E)>;

/// Spawns a task per timer onto a Tokio runtime.
///
/// Fired events are delivered through a channel and must be passed
/// back to their owner by the caller, e.g. from the same loop that
/// receives MIDI input.
#[derive(Debug)]
pub struct TokioTimers<E> {
    runtime: Handle,
    tx: mpsc::UnboundedSender<(TimerHandle, E)>,
    next_handle: u64,
    tasks: HashMap<TimerHandle, AbortHandle>,
}

impl<E> TokioTimers<E> {
    #[must_use]
    pub fn new(runtime: Handle) -> (Self, TimerEventReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timers = Self {
            runtime,
            tx,
            next_handle: 0,
            tasks: HashMap::new(),
        };
        (timers, rx)
    }

    /// Number of timers that have neither fired nor been canceled.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks
            .values()
            .filter(|task| !task.is_finished())
            .count()
    }
}

impl<E> Timers<E> for TokioTimers<E>
where
    E: Clone + Send + 'static,
{
    fn schedule(&mut self, delay: Duration, event: E, repeat: TimerRepeat) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let tx = self.tx.clone();
        let task = match repeat {
            TimerRepeat::Once => self.runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                if tx.send((handle, event)).is_err() {
                    log::debug!("Dropping event of timer {handle:?} without receiver");
                }
            }),
            TimerRepeat::Periodic => {
                let period = delay.max(MIN_PERIOD);
                let start = Instant::now() + period;
                self.runtime.spawn(async move {
                    let mut interval = tokio::time::interval_at(start, period);
                    // Missed ticks are not replayed. The next tick is delayed instead.
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    loop {
                        interval.tick().await;
                        if tx.send((handle, event.clone())).is_err() {
                            log::debug!("Stopping timer {handle:?} without receiver");
                            break;
                        }
                    }
                })
            }
        };
        log::trace!("Spawned timer {handle:?} after {delay:?}");
        self.tasks.insert(handle, task.abort_handle());
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            log::trace!("Canceled timer {handle:?}");
            task.abort();
        }
    }
}

impl<E> Drop for TokioTimers<E> {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
