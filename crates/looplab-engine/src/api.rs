// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The api manager actor and its detached workers.
//!
//! Requests are contexted in an actor-local pending map keyed by task id,
//! then handed to a fire-and-forget worker thread that only ever sees the
//! task id and the payload. Completions re-hydrate the original task and
//! send it back to the scheduler, front of the queue for promises.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use looplab_rt::{Alarm, TaskQueue};

use crate::error::EngineError;
use crate::task::{ApiRequest, ApiResponse, Payload, Task, TaskId, TaskSource};
use crate::trace::Trace;

const TAG: &str = "ApiManager";

pub(crate) struct ApiManagerCtx {
    pub requests: Arc<TaskQueue<Task>>,
    pub responses: Arc<TaskQueue<ApiResponse>>,
    pub scheduler_queue: Arc<TaskQueue<Task>>,
    pub scheduler_alarm: Arc<Alarm>,
    pub alarm: Arc<Alarm>,
    pub worker_latency: Duration,
    pub trace: Trace,
}

pub(crate) fn spawn(ctx: ApiManagerCtx) -> JoinHandle<()> {
    thread::Builder::new()
        .name("looplab-api-manager".to_string())
        .spawn(move || run(ctx))
        .expect("failed to spawn api manager thread")
}

fn run(ctx: ApiManagerCtx) {
    ctx.trace.actor(TAG, "thread started");
    // In-flight request context. Only this thread touches it.
    let mut pending: HashMap<TaskId, Task> = HashMap::new();

    loop {
        // Phase R: context new requests, launch workers.
        while let Some(task) = ctx.requests.pop() {
            ctx.trace.actor(
                TAG,
                &format!("request received for task {}; storing context", task.id),
            );
            let request = ApiRequest {
                task_id: task.id,
                data: task.data.clone(),
            };
            // Context must be stored before the worker exists, so a
            // response can never beat its own bookkeeping.
            pending.insert(task.id, task);
            spawn_worker(
                request,
                ctx.responses.clone(),
                ctx.alarm.clone(),
                ctx.worker_latency,
                ctx.trace.clone(),
            );
        }

        // Phase C: re-attach completions to their context.
        while let Some(response) = ctx.responses.pop() {
            match pending.remove(&response.task_id) {
                Some(mut task) => {
                    ctx.trace.actor(
                        TAG,
                        &format!(
                            "response for task {}; re-hydrating and dispatching",
                            task.id
                        ),
                    );
                    task.source = TaskSource::ApiWorker;
                    task.data = response.data;
                    if task.is_promise {
                        // Promise continuations overtake queued work.
                        ctx.scheduler_queue.push_front(task);
                    } else {
                        ctx.scheduler_queue.push_back(task);
                    }
                    ctx.scheduler_alarm.notify();
                }
                None => {
                    ctx.trace
                        .error(TAG, &EngineError::OrphanResponse(response.task_id));
                }
            }
        }

        ctx.trace.actor(TAG, "no pending activity; parking");
        ctx.alarm.wait();
        ctx.trace.actor(TAG, "woken");
    }
}

/// Launch a detached worker for one request.
///
/// The worker sleeps to model network latency, enqueues its response, and
/// notifies the manager. It is never joined; its lifetime is its own.
fn spawn_worker(
    request: ApiRequest,
    responses: Arc<TaskQueue<ApiResponse>>,
    alarm: Arc<Alarm>,
    latency: Duration,
    trace: Trace,
) {
    let tag = format!("ApiWorker {}", request.task_id);
    thread::Builder::new()
        .name(format!("looplab-worker-{}", request.task_id))
        .spawn(move || {
            trace.actor(&tag, "request received; starting simulated work");
            thread::sleep(latency);

            let body = match request.data.as_ref().and_then(Payload::as_text) {
                Some(url) => format!("{{\"message\":\"ok\",\"request\":\"{}\"}}", url),
                None => "{\"message\":\"ok\"}".to_string(),
            };
            let response = ApiResponse {
                task_id: request.task_id,
                data: Some(Payload::ResponseBody(body)),
            };

            trace.actor(&tag, "work complete; enqueuing response");
            responses.push_back(response);
            alarm.notify();
        })
        .expect("failed to spawn api worker thread");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn worker_produces_one_response_and_notifies() {
        let responses = Arc::new(TaskQueue::new());
        let alarm = {
            let responses = responses.clone();
            Arc::new(Alarm::new(move || !responses.is_empty()))
        };
        let (trace, _buf) = Trace::captured();

        spawn_worker(
            ApiRequest {
                task_id: 17,
                data: Some(Payload::RequestUrl("api/user/details".into())),
            },
            responses.clone(),
            alarm.clone(),
            Duration::from_millis(10),
            trace,
        );

        // The alarm predicate gates on the enqueue, so this wait is the
        // whole synchronization story.
        alarm.wait();
        let response = responses.pop().expect("worker response");
        assert_eq!(response.task_id, 17);
        let body = response.data.unwrap();
        assert!(body.as_text().unwrap().contains("api/user/details"));
        assert!(responses.is_empty());
    }

    #[test]
    fn worker_latency_is_respected() {
        let responses = Arc::new(TaskQueue::new());
        let alarm = {
            let responses = responses.clone();
            Arc::new(Alarm::new(move || !responses.is_empty()))
        };
        let (trace, _buf) = Trace::captured();

        let started = Instant::now();
        spawn_worker(
            ApiRequest {
                task_id: 1,
                data: None,
            },
            responses,
            alarm.clone(),
            Duration::from_millis(40),
            trace,
        );
        alarm.wait();
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
