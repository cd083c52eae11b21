// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The closure heap: shared store of registered callbacks.
//!
//! Decouples transient tasks (which carry only a callback id) from the
//! persistent execution recipes. Registration assigns monotonically
//! increasing ids; lookup hands out owned snapshots so the event loop
//! never interprets under the heap lock.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::callback::{Callback, CallbackId, Instruction};
use crate::error::EngineError;

/// Thread-safe id → Callback registry. No eviction, no mutation; an id,
/// once issued, resolves to the same callback forever.
pub struct ClosureHeap {
    inner: Mutex<HeapInner>,
}

struct HeapInner {
    callbacks: BTreeMap<CallbackId, Callback>,
    next_id: CallbackId,
    rng: TokenRng,
}

impl ClosureHeap {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HeapInner {
                callbacks: BTreeMap::new(),
                next_id: 0,
                rng: TokenRng::seeded(),
            }),
        }
    }

    /// Register a callback body, returning its id.
    ///
    /// The closure token stands in for the memory address of a fresh
    /// closure environment; it is informational only.
    pub fn register(&self, instructions: Vec<Instruction>) -> CallbackId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let associated_closure = inner.rng.next_token();
        inner.callbacks.insert(
            id,
            Callback {
                id,
                associated_closure,
                instructions,
            },
        );
        id
    }

    /// Owned snapshot of the callback under `id`.
    pub fn get(&self, id: CallbackId) -> Result<Callback, EngineError> {
        let inner = self.inner.lock().unwrap();
        inner
            .callbacks
            .get(&id)
            .cloned()
            .ok_or(EngineError::CallbackNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ClosureHeap {
    fn default() -> Self {
        Self::new()
    }
}

/// xorshift64 over a time/thread-seeded state. Tokens land in
/// [1, i64::MAX]; zero is reserved so a token always reads as "present".
struct TokenRng {
    state: u64,
}

impl TokenRng {
    fn seeded() -> Self {
        let mut hasher = DefaultHasher::new();
        std::time::SystemTime::now().hash(&mut hasher);
        std::thread::current().id().hash(&mut hasher);
        let seed = hasher.finish();
        Self {
            // xorshift has a fixed point at zero.
            state: if seed == 0 { 0x9E3779B97F4A7C15 } else { seed },
        }
    }

    fn next_token(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x % (i64::MAX as u64)) + 1
    }
}
