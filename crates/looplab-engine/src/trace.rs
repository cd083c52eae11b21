// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Actor-tagged diagnostic output.
//!
//! Every significant actor event becomes one line. A `Trace` either
//! prints to stdout (colored) or appends to a shared capture buffer,
//! which is how tests observe execution order without scraping stdout.

use std::sync::{Arc, Mutex};

use colored::Colorize;

use crate::error::EngineError;

/// Cloneable handle to the engine's diagnostic stream.
#[derive(Clone)]
pub struct Trace {
    /// When set, lines go here (uncolored) instead of stdout.
    buffer: Option<Arc<Mutex<String>>>,
}

impl Trace {
    /// Print to stdout.
    pub fn stdout() -> Self {
        Self { buffer: None }
    }

    /// Capture into a shared buffer; returns the trace and the buffer.
    pub fn captured() -> (Self, Arc<Mutex<String>>) {
        let buffer = Arc::new(Mutex::new(String::new()));
        (
            Self {
                buffer: Some(buffer.clone()),
            },
            buffer,
        )
    }

    /// Narration line for an actor event.
    pub fn actor(&self, tag: &str, msg: &str) {
        match &self.buffer {
            Some(buf) => {
                let mut buf = buf.lock().unwrap();
                buf.push_str(&format!("[{}] {}\n", tag, msg));
            }
            None => println!("{} {}", format!("[{}]", tag).cyan(), msg),
        }
    }

    /// Output of an interpreted `Log` instruction, the simulated
    /// `console.log`.
    pub fn script(&self, msg: &str) {
        match &self.buffer {
            Some(buf) => {
                let mut buf = buf.lock().unwrap();
                buf.push_str(&format!("[js] {}\n", msg));
            }
            None => println!("{} {}", "[js]".green().bold(), msg.bold()),
        }
    }

    pub fn warn(&self, tag: &str, msg: &str) {
        match &self.buffer {
            Some(buf) => {
                let mut buf = buf.lock().unwrap();
                buf.push_str(&format!("[{}] warning: {}\n", tag, msg));
            }
            None => println!(
                "{} {} {}",
                format!("[{}]", tag).cyan(),
                "warning:".yellow().bold(),
                msg
            ),
        }
    }

    pub fn error(&self, tag: &str, err: &EngineError) {
        match &self.buffer {
            Some(buf) => {
                let mut buf = buf.lock().unwrap();
                buf.push_str(&format!("[{}] error: {}\n", tag, err));
            }
            None => println!(
                "{} {} {}",
                format!("[{}]", tag).cyan(),
                "error:".red().bold(),
                err
            ),
        }
    }
}
