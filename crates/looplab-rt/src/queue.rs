// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Typed inter-actor message queues.
//!
//! Mutex-protected VecDeque. Consumers pop from the front; producers
//! append, or prepend when a message must overtake queued work (promise
//! responses at the scheduler input). No operation blocks on contents:
//! an empty pop is `None`, and waiting is the `Alarm`'s job.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Unbounded FIFO with a priority front door.
///
/// All methods take `&self`; the queue is shared between actors behind an
/// `Arc`. The mutex is held only for the queue operation itself, so a
/// producer and a consumer never wait on each other beyond that.
pub struct TaskQueue<T> {
    deque: Mutex<VecDeque<T>>,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            deque: Mutex::new(VecDeque::new()),
        }
    }

    /// Append in FIFO order.
    pub fn push_back(&self, item: T) {
        self.deque.lock().unwrap().push_back(item);
    }

    /// Prepend, overtaking everything already queued.
    pub fn push_front(&self, item: T) {
        self.deque.lock().unwrap().push_front(item);
    }

    /// Remove and return the front element. `None` when empty.
    pub fn pop(&self) -> Option<T> {
        self.deque.lock().unwrap().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.deque.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.deque.lock().unwrap().len()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn fifo_order() {
        let q = TaskQueue::new();
        q.push_back(1);
        q.push_back(2);
        q.push_back(3);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
    }

    #[test]
    fn push_front_overtakes() {
        let q = TaskQueue::new();
        q.push_back("a");
        q.push_front("b");
        assert_eq!(q.pop(), Some("b"));
        assert_eq!(q.pop(), Some("a"));
    }

    #[test]
    fn pop_empty_is_none() {
        let q = TaskQueue::<i32>::new();
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn len_tracks_contents() {
        let q = TaskQueue::new();
        assert_eq!(q.len(), 0);
        q.push_back(0);
        q.push_back(1);
        assert_eq!(q.len(), 2);
        q.pop();
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn cross_thread_fifo() {
        let q = Arc::new(TaskQueue::new());
        let producer = {
            let q = q.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    q.push_back(i);
                }
            })
        };
        producer.join().unwrap();
        let mut seen = Vec::new();
        while let Some(v) = q.pop() {
            seen.push(v);
        }
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }
}
