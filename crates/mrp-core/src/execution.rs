use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Pending,
    Running,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Running,
    Completed,
    Failed,
}

/// The names of the eight pipeline stages in their fixed execution order
/// (§2, §4.11).
pub const STEP_NAMES: [&str; 8] = [
    "MPS",
    "STOCK_PARAMS",
    "BOM_EXPLODE_NET",
    "LOT_SIZE",
    "ORDER_GENERATE",
    "ACTION_MESSAGES",
    "CRP",
    "STORAGE_VALIDATE",
];

/// An MRP run (§3). Invariant 6: `COMPLETED` iff all eight steps logged
/// `COMPLETED`; any `FAILED` step halts the pipeline and sets `ERROR`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub id: String,
    pub kind: String,
    pub status: ExecutionStatus,
    pub parameters: serde_json::Value,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub summary: Option<serde_json::Value>,
}

impl Execution {
    pub fn new(id: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            kind: "MRP".to_string(),
            status: ExecutionStatus::Pending,
            parameters,
            started_at: None,
            completed_at: None,
            summary: None,
        }
    }

    pub fn start(&mut self, at: DateTime<Utc>) {
        self.status = ExecutionStatus::Running;
        self.started_at = Some(at);
    }

    pub fn complete(&mut self, at: DateTime<Utc>, summary: serde_json::Value) {
        self.status = ExecutionStatus::Completed;
        self.completed_at = Some(at);
        self.summary = Some(summary);
    }

    pub fn fail(&mut self, at: DateTime<Utc>, summary: serde_json::Value) {
        self.status = ExecutionStatus::Error;
        self.completed_at = Some(at);
        self.summary = Some(summary);
    }
}

/// An append-only record of one pipeline step's run (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepLog {
    pub execution_id: String,
    pub step_name: String,
    pub order: u8,
    pub status: StepStatus,
    pub records_processed: u64,
    pub duration_ms: u64,
    pub details: Option<serde_json::Value>,
}

impl StepLog {
    pub fn running(execution_id: impl Into<String>, step_name: impl Into<String>, order: u8) -> Self {
        Self {
            execution_id: execution_id.into(),
            step_name: step_name.into(),
            order,
            status: StepStatus::Running,
            records_processed: 0,
            duration_ms: 0,
            details: None,
        }
    }

    pub fn complete(mut self, records_processed: u64, duration_ms: u64, details: Option<serde_json::Value>) -> Self {
        self.status = StepStatus::Completed;
        self.records_processed = records_processed;
        self.duration_ms = duration_ms;
        self.details = details;
        self
    }

    pub fn fail(mut self, duration_ms: u64, details: Option<serde_json::Value>) -> Self {
        self.status = StepStatus::Failed;
        self.duration_ms = duration_ms;
        self.details = details;
        self
    }
}

/// Invariant 6: an execution is `COMPLETED` iff every one of the eight
/// expected steps logged `COMPLETED`.
pub fn all_steps_completed(logs: &[StepLog]) -> bool {
    STEP_NAMES.iter().all(|name| {
        logs.iter()
            .any(|log| log.step_name == *name && log.status == StepStatus::Completed)
    })
}
