//! Diagnostics sinks handed to every pipeline component.
//!
//! Components never talk to a process-wide logger on their own. Each one is
//! given a [`Diagnostics`] at construction and reports through it, so callers
//! decide whether messages go to the `log` facade or are collected in memory.

use log::Level;
use std::cell::RefCell;

/// Receiver of non-fatal messages produced while processing rules and data.
pub trait Diagnostics {
    fn log(&self, level: Level, message: &str);

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }
}

/// Forwards messages to the `log` facade under a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct LogDiagnostics {
    target: &'static str,
}

impl LogDiagnostics {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogDiagnostics {
    fn default() -> Self {
        Self::new("lrules")
    }
}

impl Diagnostics for LogDiagnostics {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: self.target, level, "{}", message);
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: RefCell<Vec<(Level, String)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn log(&self, level: Level, message: &str) {
        self.records.borrow_mut().push((level, message.to_string()));
    }
}
