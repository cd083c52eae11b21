// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Callbacks: the persistent execution recipes tasks refer to by id.
//!
//! A callback is a straight-line sequence of instructions, immutable once
//! registered in the heap. Instructions are the simulated "lines of code"
//! the event loop interprets.

/// Index into the closure heap.
pub type CallbackId = u64;

/// The operations the interpreter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// A `console.log(...)` stand-in.
    Log,
    /// A `fetch(...)` stand-in; spawns asynchronous work.
    ApiRequest,
    /// Reserved. Interpreted as a log-only no-op.
    DomUpdate,
}

/// One simulated line of code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub kind: OpKind,
    /// Log text, request target, or DOM descriptor.
    pub payload: String,
    /// When this instruction spawns a request, classify its eventual
    /// response as a microtask (promise continuation).
    pub is_promise: bool,
    /// Continuation to run on the response. `None` drops the response.
    pub then_callback: Option<CallbackId>,
}

impl Instruction {
    pub fn log(text: impl Into<String>) -> Self {
        Self {
            kind: OpKind::Log,
            payload: text.into(),
            is_promise: false,
            then_callback: None,
        }
    }

    pub fn api_request(
        url: impl Into<String>,
        is_promise: bool,
        then_callback: Option<CallbackId>,
    ) -> Self {
        Self {
            kind: OpKind::ApiRequest,
            payload: url.into(),
            is_promise,
            then_callback,
        }
    }

    pub fn dom_update(descriptor: impl Into<String>) -> Self {
        Self {
            kind: OpKind::DomUpdate,
            payload: descriptor.into(),
            is_promise: false,
            then_callback: None,
        }
    }

    /// Derived flag: does this instruction initiate asynchronous work?
    pub fn is_api_request(&self) -> bool {
        self.kind == OpKind::ApiRequest
    }
}

/// A registered function body. Immutable after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    /// Heap id, assigned monotonically at registration.
    pub id: CallbackId,
    /// Random token standing in for the closure environment's identity.
    /// Informational; never consulted for dispatch.
    pub associated_closure: u64,
    pub instructions: Vec<Instruction>,
}
