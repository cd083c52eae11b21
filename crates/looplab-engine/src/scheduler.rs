// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The scheduler actor: a pure router.
//!
//! Worker-origin tasks go to the event loop's micro or macro queue by
//! `is_promise`; event-loop-origin tasks go to the api manager. Tasks are
//! relocated, never transformed, and `action`/`class` are not consulted.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use looplab_rt::{Alarm, TaskQueue};

use crate::error::EngineError;
use crate::task::{Task, TaskSource};
use crate::trace::Trace;

const TAG: &str = "Scheduler";

pub(crate) struct SchedulerCtx {
    pub input: Arc<TaskQueue<Task>>,
    pub macrotasks: Arc<TaskQueue<Task>>,
    pub microtasks: Arc<TaskQueue<Task>>,
    pub api_requests: Arc<TaskQueue<Task>>,
    pub alarm: Arc<Alarm>,
    pub event_loop_alarm: Arc<Alarm>,
    pub api_alarm: Arc<Alarm>,
    pub trace: Trace,
}

pub(crate) fn spawn(ctx: SchedulerCtx) -> JoinHandle<()> {
    thread::Builder::new()
        .name("looplab-scheduler".to_string())
        .spawn(move || run(ctx))
        .expect("failed to spawn scheduler thread")
}

fn run(ctx: SchedulerCtx) {
    ctx.trace.actor(TAG, "thread started");
    loop {
        while let Some(task) = ctx.input.pop() {
            route(&ctx, task);
        }
        ctx.trace.actor(TAG, "queue empty; parking");
        ctx.alarm.wait();
        ctx.trace.actor(TAG, "woken");
    }
}

fn route(ctx: &SchedulerCtx, task: Task) {
    match task.source {
        TaskSource::ApiWorker => {
            if task.is_promise {
                ctx.trace.actor(
                    TAG,
                    &format!("task {} is a promise; routing to microtask queue", task.id),
                );
                ctx.microtasks.push_back(task);
            } else {
                ctx.trace.actor(
                    TAG,
                    &format!("task {} is standard; routing to macrotask queue", task.id),
                );
                ctx.macrotasks.push_back(task);
            }
            ctx.event_loop_alarm.notify();
        }
        TaskSource::EventLoop => {
            ctx.trace.actor(
                TAG,
                &format!("task {} is an outbound request; routing to api manager", task.id),
            );
            ctx.api_requests.push_back(task);
            ctx.api_alarm.notify();
        }
        TaskSource::Scheduler => {
            // No route originates here today; drop loudly.
            ctx.trace.warn(
                TAG,
                &EngineError::UnroutableTask {
                    id: task.id,
                    origin: task.source,
                }
                .to_string(),
            );
        }
    }
}
