// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Engine errors. All of them are local: the owning actor logs the error,
//! drops the offending message, and keeps running.

use crate::callback::CallbackId;
use crate::task::{TaskId, TaskSource};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A task named a callback id the heap has never issued.
    #[error("no callback registered under id {0}; dropping task")]
    CallbackNotFound(CallbackId),

    /// A worker response arrived for a task id with no pending context.
    /// Protocol violation or duplicate delivery; no actor state is harmed.
    #[error("no pending context for task id {0}; discarding response")]
    OrphanResponse(TaskId),

    /// The scheduler saw a source tag it has no route for.
    #[error("task {id} carries unroutable source tag {origin:?}; discarding")]
    UnroutableTask { id: TaskId, origin: TaskSource },

    /// Task data has no printable form. Interpretation proceeds without it.
    #[error("task data is not printable text")]
    PayloadType,
}
