// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

use std::time::Duration;

use super::*;

const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn one_shot_fires_once_at_deadline() {
    let mut queue = TimerQueue::new();
    let handle = queue.schedule(ms(40), "reset", TimerRepeat::Once);
    assert!(queue.is_pending(handle));
    assert_eq!(None, queue.pop_due(ms(39)));
    assert_eq!(Some((handle, "reset")), queue.pop_due(ms(40)));
    assert!(!queue.is_pending(handle));
    assert_eq!(None, queue.pop_due(ms(1000)));
}

#[test]
fn periodic_fires_repeatedly() {
    let mut queue = TimerQueue::new();
    let handle = queue.schedule(ms(300), "flash", TimerRepeat::Periodic);
    let mut fired = 0;
    for now in [ms(300), ms(600), ms(900), ms(1000)] {
        while let Some((fired_handle, _)) = queue.pop_due(now) {
            assert_eq!(handle, fired_handle);
            fired += 1;
        }
    }
    assert_eq!(3, fired);
    assert_eq!(Some(ms(1200)), queue.next_deadline());
    assert!(queue.is_pending(handle));
}

#[test]
fn periodic_skips_missed_periods() {
    let mut queue = TimerQueue::new();
    let handle = queue.schedule(ms(300), "flash", TimerRepeat::Periodic);
    assert_eq!(Some((handle, "flash")), queue.pop_due(ms(60_000)));
    assert_eq!(None, queue.pop_due(ms(60_000)));
    assert_eq!(Some(ms(60_300)), queue.next_deadline());
    assert_eq!(None, queue.pop_due(ms(60_299)));
    assert_eq!(Some((handle, "flash")), queue.pop_due(ms(60_300)));
    assert_eq!(Some(ms(60_600)), queue.next_deadline());
}

#[test]
fn cancel_is_idempotent() {
    let mut queue = TimerQueue::new();
    let handle = queue.schedule(ms(10), (), TimerRepeat::Once);
    queue.cancel(handle);
    queue.cancel(handle);
    assert_eq!(0, queue.pending_count());
    assert_eq!(None, queue.pop_due(ms(10)));
}

#[test]
fn fires_in_deadline_order() {
    let mut queue = TimerQueue::new();
    queue.schedule(ms(30), 'c', TimerRepeat::Once);
    queue.schedule(ms(10), 'a', TimerRepeat::Once);
    queue.schedule(ms(20), 'b', TimerRepeat::Once);
    queue.schedule(ms(20), 'x', TimerRepeat::Once);
    let events = std::iter::from_fn(|| queue.pop_due(ms(30)))
        .map(|(_, event)| event)
        .collect::<String>();
    assert_eq!("abxc", events);
}

#[test]
fn schedule_relative_to_fired_deadline() {
    let mut queue = TimerQueue::new();
    queue.schedule(ms(20), 1, TimerRepeat::Once);
    let (_, event) = queue.pop_due(ms(100)).unwrap();
    assert_eq!(1, event);
    assert_eq!(ms(20), queue.now());
    let handle = queue.schedule(ms(20), 2, TimerRepeat::Once);
    assert_eq!(Some(ms(40)), queue.next_deadline());
    assert_eq!(Some((handle, 2)), queue.pop_due(ms(100)));
}

#[test]
fn replace_timer_keeps_a_single_timer() {
    let mut queue = TimerQueue::new();
    let mut slot = None;
    let first = replace_timer(&mut queue, &mut slot, ms(40), (), TimerRepeat::Once);
    let second = replace_timer(&mut queue, &mut slot, ms(40), (), TimerRepeat::Once);
    assert_ne!(first, second);
    assert_eq!(Some(second), slot);
    assert_eq!(1, queue.pending_count());
    assert!(!queue.is_pending(first));
    assert!(cancel_timer(&mut queue, &mut slot));
    assert!(!cancel_timer(&mut queue, &mut slot));
    assert_eq!(0, queue.pending_count());
}

#[test]
fn clock_never_moves_backward() {
    let mut queue = TimerQueue::<()>::new();
    queue.advance(ms(100));
    queue.advance(ms(50));
    assert_eq!(ms(100), queue.now());
}
