use crate::core::node::NodeId;
use crate::core::value::Value;
use std::sync::{Mutex, PoisonError};

/// A single process invocation recorded during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub timestamp: u64,
    pub node: NodeId,
    pub process: String,
    /// Positional arguments the process was constructed with.
    pub inputs: Vec<Value>,
    pub output: String,
    pub value: Value,
}

/// Trait for recording evaluation traces.
pub trait Telemetry: Send + Sync {
    fn record(&self, entry: TraceEntry);
    fn flush(&self) {}
}

/// Simple in-memory collector for traces.
#[derive(Default)]
pub struct MemoryTelemetry {
    traces: Mutex<Vec<TraceEntry>>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<TraceEntry> {
        self.traces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times process `id` was run.
    pub fn invocations(&self, id: &str) -> usize {
        self.traces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|t| t.process == id)
            .count()
    }

    pub fn clear(&self) {
        self.traces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Telemetry for MemoryTelemetry {
    fn record(&self, entry: TraceEntry) {
        self.traces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

pub(crate) fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
