//! Operation scheduler - collapsing priority queue for piece operations
//!
//! Input and the fall timer both produce operations; this queue serializes
//! them so exactly one transform is evaluated and applied at a time.
//!
//! Enqueue rules:
//! - `Stop` discards everything else and becomes the sole entry.
//! - Any other operation drops queued operations of strictly lower priority,
//!   keeps those of equal or higher priority, and is not added if an operation
//!   of the same kind is still queued.
//! - While a `Stop` is pending the piece is terminal and nothing else is added.
//!
//! Together these keep the queue ordered by non-increasing priority, so the
//! head is always the most urgent intent.

use std::collections::VecDeque;

use crate::types::Operation;

/// Result of an enqueue attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    Added,
    /// Collapsed into an already-pending operation of the same kind
    Duplicate,
    /// Dropped because the piece is already stopping
    Terminal,
}

#[derive(Debug, Clone, Default)]
pub struct OperationQueue {
    queue: VecDeque<Operation>,
    processing: bool,
}

impl OperationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, op: Operation) -> Enqueued {
        if op == Operation::Stop {
            self.queue.clear();
            self.queue.push_back(Operation::Stop);
            return Enqueued::Added;
        }

        if self.stop_pending() {
            return Enqueued::Terminal;
        }

        let priority = op.priority();
        self.queue.retain(|queued| queued.priority() >= priority);

        if self.queue.iter().any(|queued| queued.same_kind(&op)) {
            return Enqueued::Duplicate;
        }

        self.queue.push_back(op);
        Enqueued::Added
    }

    /// Next operation to run, unless one is already in flight
    pub fn pop(&mut self) -> Option<Operation> {
        if self.processing {
            return None;
        }
        self.queue.pop_front()
    }

    /// Mark an operation as in flight; false if one already is
    pub fn begin(&mut self) -> bool {
        if self.processing {
            return false;
        }
        self.processing = true;
        true
    }

    pub fn finish(&mut self) {
        self.processing = false;
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn stop_pending(&self) -> bool {
        self.queue.front() == Some(&Operation::Stop)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending operations, head first
    pub fn pending(&self) -> impl Iterator<Item = &Operation> {
        self.queue.iter()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.processing = false;
    }
}
