// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Simulation scenarios: external producers of initial tasks.
//!
//! Each scenario registers its callbacks, injects one task shaped like
//! the outside world would shape it, and returns the callback ids so
//! callers (menu, tests) can refer to them.

use crate::callback::{CallbackId, Instruction};
use crate::engine::Engine;
use crate::task::{next_task_id, Payload, Task, TaskAction, TaskClass, TaskSource};

const TAG: &str = "Main";

/// Log text of the first link in the promise chain.
pub const CHAINED_PROMISE_FIRST: &str =
    "first promise resolved; dispatching a follow-up api request";
/// Log text of the chain's terminal callback.
pub const CHAINED_PROMISE_DONE: &str =
    "SUCCESS: chained promise resolved; final callback executed";
/// Log text of the dom click handler.
pub const DOM_CLICK_DONE: &str = "SUCCESS: dom click handled by the onclick callback";

/// A `fetch(...).then(...).then(...)` chain.
///
/// Registers the terminal callback, then the initial one (which logs and
/// fires a promise-classified api request at the terminal), and injects
/// a task simulating the first promise's resolution. Both links travel
/// the microtask path.
pub fn chained_promise(engine: &Engine) -> (CallbackId, CallbackId) {
    let trace = engine.trace();
    trace.actor(TAG, "=== simulation: chained promise (fetch().then()) ===");

    let final_id = engine
        .heap()
        .register(vec![Instruction::log(CHAINED_PROMISE_DONE)]);

    let initial_id = engine.heap().register(vec![
        Instruction::log(CHAINED_PROMISE_FIRST),
        Instruction::api_request("api/user/details", true, Some(final_id)),
    ]);

    trace.actor(TAG, "injecting initial api response to start the chain");
    engine.inject(Task {
        id: next_task_id(),
        source: TaskSource::ApiWorker,
        action: TaskAction::Response,
        class: TaskClass::Microtask,
        callback: Some(initial_id),
        is_promise: true,
        data: Some(Payload::ResponseBody("initial api response data".into())),
    });

    (initial_id, final_id)
}

/// A user click: one macrotask, no promises involved.
pub fn dom_click(engine: &Engine) -> CallbackId {
    let trace = engine.trace();
    trace.actor(TAG, "=== simulation: dom click event (macrotask) ===");

    let onclick_id = engine
        .heap()
        .register(vec![Instruction::log(DOM_CLICK_DONE)]);

    trace.actor(TAG, "injecting dom event task");
    engine.inject(Task {
        id: next_task_id(),
        source: TaskSource::ApiWorker,
        action: TaskAction::Response,
        class: TaskClass::Macrotask,
        callback: Some(onclick_id),
        is_promise: false,
        data: Some(Payload::DomEvent(
            "{\"type\":\"click\",\"target\":\"#submit-btn\"}".into(),
        )),
    });

    onclick_id
}
