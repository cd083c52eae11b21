// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Engine wiring: queues, alarms, heap, and the three actor threads.
//!
//! `Engine::start` builds the shared state, spawns the scheduler, api
//! manager, and event loop, and hands back the injection surface the
//! outside world (menu, scenarios, tests) talks to. Actor threads run
//! for the life of the process; exiting the process is the shutdown
//! story.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use looplab_rt::{Alarm, TaskQueue};

use crate::api::{self, ApiManagerCtx};
use crate::event_loop::{self, EventLoopCtx};
use crate::heap::ClosureHeap;
use crate::scheduler::{self, SchedulerCtx};
use crate::task::{ApiResponse, Task};
use crate::trace::Trace;

/// Knobs the embedder controls.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Simulated network latency for api workers.
    pub worker_latency: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_latency: Duration::from_secs(2),
        }
    }
}

/// A running engine. Cheap handles to the shared state; the actors own
/// their threads.
pub struct Engine {
    heap: Arc<ClosureHeap>,
    scheduler_queue: Arc<TaskQueue<Task>>,
    scheduler_alarm: Arc<Alarm>,
    /// Direct line to the api manager's response queue. Test hook.
    #[allow(dead_code)]
    pub(crate) api_responses: Arc<TaskQueue<ApiResponse>>,
    #[allow(dead_code)]
    pub(crate) api_alarm: Arc<Alarm>,
    trace: Trace,
}

impl Engine {
    /// Start an engine that narrates to stdout.
    pub fn start(config: EngineConfig) -> Self {
        Self::start_with_trace(config, Trace::stdout())
    }

    /// Start an engine whose narration is captured into a buffer.
    pub fn start_captured(config: EngineConfig) -> (Self, Arc<Mutex<String>>) {
        let (trace, buffer) = Trace::captured();
        (Self::start_with_trace(config, trace), buffer)
    }

    fn start_with_trace(config: EngineConfig, trace: Trace) -> Self {
        let heap = Arc::new(ClosureHeap::new());

        let scheduler_queue = Arc::new(TaskQueue::<Task>::new());
        let api_requests = Arc::new(TaskQueue::<Task>::new());
        let api_responses = Arc::new(TaskQueue::<ApiResponse>::new());
        let macrotasks = Arc::new(TaskQueue::<Task>::new());
        let microtasks = Arc::new(TaskQueue::<Task>::new());

        // Each actor's wake condition reads its own input queues.
        let scheduler_alarm = Arc::new(Alarm::new({
            let q = scheduler_queue.clone();
            move || !q.is_empty()
        }));
        let api_alarm = Arc::new(Alarm::new({
            let requests = api_requests.clone();
            let responses = api_responses.clone();
            move || !requests.is_empty() || !responses.is_empty()
        }));
        let event_loop_alarm = Arc::new(Alarm::new({
            let mac = macrotasks.clone();
            let mic = microtasks.clone();
            move || !mac.is_empty() || !mic.is_empty()
        }));

        // Handles are dropped: actors are never joined.
        let _ = scheduler::spawn(SchedulerCtx {
            input: scheduler_queue.clone(),
            macrotasks: macrotasks.clone(),
            microtasks: microtasks.clone(),
            api_requests: api_requests.clone(),
            alarm: scheduler_alarm.clone(),
            event_loop_alarm: event_loop_alarm.clone(),
            api_alarm: api_alarm.clone(),
            trace: trace.clone(),
        });
        let _ = api::spawn(ApiManagerCtx {
            requests: api_requests,
            responses: api_responses.clone(),
            scheduler_queue: scheduler_queue.clone(),
            scheduler_alarm: scheduler_alarm.clone(),
            alarm: api_alarm.clone(),
            worker_latency: config.worker_latency,
            trace: trace.clone(),
        });
        let _ = event_loop::spawn(EventLoopCtx {
            macrotasks,
            microtasks,
            scheduler_queue: scheduler_queue.clone(),
            scheduler_alarm: scheduler_alarm.clone(),
            alarm: event_loop_alarm,
            heap: heap.clone(),
            trace: trace.clone(),
        });

        Self {
            heap,
            scheduler_queue,
            scheduler_alarm,
            api_responses,
            api_alarm,
            trace,
        }
    }

    /// The callback registry.
    pub fn heap(&self) -> &ClosureHeap {
        &self.heap
    }

    /// The engine's diagnostic stream.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Hand a task to the scheduler and wake it.
    pub fn inject(&self, task: Task) {
        self.scheduler_queue.push_back(task);
        self.scheduler_alarm.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario;
    use crate::task::{next_task_id, TaskAction, TaskClass, TaskSource};
    use std::time::Instant;

    fn wait_for(buffer: &Arc<Mutex<String>>, needle: &str) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if buffer.lock().unwrap().contains(needle) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    fn test_config() -> EngineConfig {
        EngineConfig {
            worker_latency: Duration::from_millis(15),
        }
    }

    #[test]
    fn orphan_response_is_logged_and_engine_survives() {
        let (engine, buffer) = Engine::start_captured(test_config());

        // Bypass the request phase entirely: a response nobody asked for.
        engine.api_responses.push_back(ApiResponse {
            task_id: 424_242,
            data: None,
        });
        engine.api_alarm.notify();

        assert!(wait_for(&buffer, "no pending context for task id 424242"));

        // The manager keeps serving afterwards.
        scenario::dom_click(&engine);
        assert!(wait_for(&buffer, scenario::DOM_CLICK_DONE));
    }

    #[test]
    fn injected_task_with_no_continuation_is_consumed_silently() {
        let (engine, buffer) = Engine::start_captured(test_config());

        engine.inject(Task {
            id: next_task_id(),
            source: TaskSource::ApiWorker,
            action: TaskAction::Response,
            class: TaskClass::Macrotask,
            callback: None,
            is_promise: false,
            data: None,
        });

        // The task flows through to the event loop and vanishes; the
        // engine still serves real work.
        scenario::dom_click(&engine);
        assert!(wait_for(&buffer, scenario::DOM_CLICK_DONE));
        assert_eq!(
            buffer.lock().unwrap().matches("[js]").count(),
            1,
            "only the click handler may produce script output"
        );
    }
}
