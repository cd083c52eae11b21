// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Predicate-gated parking for actor threads.
//!
//! An `Alarm` bundles a mutex, a condvar, and a wake-up predicate set at
//! construction. A parked actor wakes only when notified AND the predicate
//! holds; spurious wakeups fall back into the wait loop.

use std::sync::{Condvar, Mutex};

/// Wait/notify primitive with a level-triggered wake condition.
///
/// The predicate typically reads queue emptiness through the queue's own
/// mutex. That lock is never taken while a producer holds the alarm mutex,
/// so the ordering alarm-then-queue on the waiter side and queue-then-alarm
/// on the producer side cannot deadlock.
///
/// `notify` takes the alarm mutex before signalling. A producer that
/// enqueues and then notifies therefore cannot have its signal fall into
/// the gap between a waiter's predicate check and its park: either the
/// waiter re-checks after the enqueue and sees the work, or it is already
/// parked and the signal lands.
pub struct Alarm {
    mutex: Mutex<()>,
    cvar: Condvar,
    wakeup: Box<dyn Fn() -> bool + Send + Sync>,
}

impl Alarm {
    /// Build an alarm around a wake-up predicate.
    pub fn new(wakeup: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            mutex: Mutex::new(()),
            cvar: Condvar::new(),
            wakeup: Box::new(wakeup),
        }
    }

    /// Block until the predicate returns true.
    ///
    /// The predicate is evaluated on entry, so a notify that arrived
    /// before the wait is never required: if the work is already there,
    /// this returns immediately.
    pub fn wait(&self) {
        let mut guard = self.mutex.lock().unwrap();
        while !(self.wakeup)() {
            guard = self.cvar.wait(guard).unwrap();
        }
    }

    /// Wake at most one waiter. No-op when nobody is parked.
    pub fn notify(&self) {
        let _guard = self.mutex.lock().unwrap();
        self.cvar.notify_one();
    }
}
