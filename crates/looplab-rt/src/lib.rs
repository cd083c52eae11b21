// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime primitives for the looplab actor threads.
//!
//! OS threads, mutex-protected deques, condvar parking. Each actor owns
//! one `Alarm` and drains one or more `TaskQueue`s; blocking lives only
//! in the alarm, never in the queues.

pub mod alarm;
pub mod queue;

pub use alarm::Alarm;
pub use queue::TaskQueue;
