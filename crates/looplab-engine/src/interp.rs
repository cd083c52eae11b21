// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The instruction interpreter, i.e. the simulated call stack.
//!
//! Runs on the event loop thread only. Interprets one callback snapshot
//! straight through; `ApiRequest` instructions turn into outbound tasks
//! for the scheduler.

use looplab_rt::{Alarm, TaskQueue};

use crate::callback::{Callback, OpKind};
use crate::error::EngineError;
use crate::task::{next_task_id, Payload, Task, TaskAction, TaskClass, TaskSource};
use crate::trace::Trace;

const TAG: &str = "EventLoop::stack";

/// Handles the interpreter needs to emit work back into the engine.
pub(crate) struct StackCtx<'a> {
    pub scheduler_queue: &'a TaskQueue<Task>,
    pub scheduler_alarm: &'a Alarm,
    pub trace: &'a Trace,
}

/// Interpret `callback` with `data` as its input value.
pub(crate) fn execute(callback: &Callback, data: Option<&Payload>, ctx: &StackCtx<'_>) {
    ctx.trace
        .actor(TAG, &format!("executing callback {}", callback.id));

    if let Some(data) = data {
        match data.as_text() {
            Some(text) => ctx
                .trace
                .actor(TAG, &format!("data received: \"{}\"", text)),
            // Logged and carried on; the callback body may not need it.
            None => ctx.trace.error(TAG, &EngineError::PayloadType),
        }
    }

    for instruction in &callback.instructions {
        match instruction.kind {
            OpKind::Log => ctx.trace.script(&instruction.payload),
            OpKind::ApiRequest => emit_request(instruction, ctx),
            OpKind::DomUpdate => {
                // Reserved opcode.
                ctx.trace.actor(
                    TAG,
                    &format!("dom update (no-op): {}", instruction.payload),
                );
            }
        }
    }

    ctx.trace
        .actor(TAG, &format!("finished callback {}", callback.id));
}

fn emit_request(instruction: &crate::callback::Instruction, ctx: &StackCtx<'_>) {
    if instruction.then_callback.is_none() {
        ctx.trace.warn(
            TAG,
            "api request has no then-continuation; its response will be discarded",
        );
    }

    let task = Task {
        id: next_task_id(),
        source: TaskSource::EventLoop,
        action: TaskAction::Request,
        class: if instruction.is_promise {
            TaskClass::Microtask
        } else {
            TaskClass::Macrotask
        },
        callback: instruction.then_callback,
        is_promise: instruction.is_promise,
        data: Some(Payload::RequestUrl(instruction.payload.clone())),
    };

    ctx.trace.actor(
        TAG,
        &format!("api request; dispatching task {} to scheduler", task.id),
    );
    ctx.scheduler_queue.push_back(task);
    ctx.scheduler_alarm.notify();
}
