// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The event loop actor: the single JavaScript thread.
//!
//! Per tick: at most one macrotask, then the microtask queue drained to
//! empty, then park. Between any two macrotasks the microtask queue is
//! therefore observed empty at least once.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use looplab_rt::{Alarm, TaskQueue};

use crate::heap::ClosureHeap;
use crate::interp::{self, StackCtx};
use crate::task::Task;
use crate::trace::Trace;

const TAG: &str = "EventLoop";

pub(crate) struct EventLoopCtx {
    pub macrotasks: Arc<TaskQueue<Task>>,
    pub microtasks: Arc<TaskQueue<Task>>,
    pub scheduler_queue: Arc<TaskQueue<Task>>,
    pub scheduler_alarm: Arc<Alarm>,
    pub alarm: Arc<Alarm>,
    pub heap: Arc<ClosureHeap>,
    pub trace: Trace,
}

pub(crate) fn spawn(ctx: EventLoopCtx) -> JoinHandle<()> {
    thread::Builder::new()
        .name("looplab-event-loop".to_string())
        .spawn(move || run(ctx))
        .expect("failed to spawn event loop thread")
}

fn run(ctx: EventLoopCtx) {
    ctx.trace.actor(TAG, "thread started");
    loop {
        tick(&ctx);
        if ctx.macrotasks.is_empty() && ctx.microtasks.is_empty() {
            ctx.trace.actor(TAG, "no more tasks; parking");
            ctx.alarm.wait();
            ctx.trace.actor(TAG, "woken");
        }
    }
}

/// One turn of the loop: at most one macrotask, then drain microtasks.
fn tick(ctx: &EventLoopCtx) {
    if let Some(task) = ctx.macrotasks.pop() {
        ctx.trace
            .actor(TAG, &format!("tick: macrotask {}", task.id));
        run_task(ctx, task);
    }

    // Runs to quiescence: microtasks enqueued while draining are taken
    // by this same drain if they land before it observes empty.
    while let Some(task) = ctx.microtasks.pop() {
        ctx.trace
            .actor(TAG, &format!("tick: microtask {}", task.id));
        run_task(ctx, task);
    }
}

/// Resolve and interpret one task's callback.
///
/// A task without a continuation is consumed as a no-op. A dangling
/// callback id is logged and dropped; the loop never dies over it.
fn run_task(ctx: &EventLoopCtx, task: Task) {
    let Some(callback_id) = task.callback else {
        return;
    };

    match ctx.heap.get(callback_id) {
        Ok(callback) => {
            let stack = StackCtx {
                scheduler_queue: &ctx.scheduler_queue,
                scheduler_alarm: &ctx.scheduler_alarm,
                trace: &ctx.trace,
            };
            interp::execute(&callback, task.data.as_ref(), &stack);
        }
        Err(err) => ctx.trace.error(TAG, &err),
    }
}
