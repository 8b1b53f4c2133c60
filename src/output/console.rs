//! Reporter implementations
//!
//! - `ConsoleReporter` prints every message to stdout
//! - `MemoryReporter` keeps events and messages for later inspection

use crate::output::traits::{CrawlEvent, Reporter};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Prints progress messages to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    /// Also print per-entry additions
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }

    fn report(&self, event: &CrawlEvent) {
        if matches!(event, CrawlEvent::EntryAdded { .. }) && !self.verbose {
            return;
        }
        self.notify(&event.to_string());
    }
}

/// Collects everything it is told
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<CrawlEvent>>,
    messages: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events reported so far, in order
    pub fn events(&self) -> Vec<CrawlEvent> {
        lock(&self.events).clone()
    }

    /// Every message, including rendered events, in order
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }
}

impl Reporter for MemoryReporter {
    fn notify(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }

    fn report(&self, event: &CrawlEvent) {
        lock(&self.events).push(event.clone());
        self.notify(&event.to_string());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
