//! Comparison trace capture for ranking runs.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use super::types::{Decision, Verdict};

/// One bias-mitigated comparison: both oracle presentations and the
/// reconciled decision.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonTrace {
    pub timestamp_ms: i64,
    pub comparison_index: usize,
    pub unit_a_id: String,
    pub unit_b_id: String,
    /// Answer with `a` shown as Line A.
    pub forward_response: String,
    pub forward_verdict: Verdict,
    /// Answer with `b` shown as Line A.
    pub reverse_response: String,
    pub reverse_verdict: Verdict,
    pub decision: Decision,
}

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("trace writer poisoned")]
    Poisoned,
}

pub trait TraceSink: Send + Sync {
    fn record(&self, event: ComparisonTrace) -> Result<(), TraceError>;
}

/// Appends traces to a file as JSON lines. Call `finish` to flush.
pub struct JsonlTraceSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonlTraceSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn finish(&self) -> Result<(), TraceError> {
        let mut writer = self.writer.lock().map_err(|_| TraceError::Poisoned)?;
        writer.flush()?;
        Ok(())
    }
}

impl TraceSink for JsonlTraceSink {
    fn record(&self, event: ComparisonTrace) -> Result<(), TraceError> {
        let line = serde_json::to_string(&event)?;
        let mut writer = self.writer.lock().map_err(|_| TraceError::Poisoned)?;
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
