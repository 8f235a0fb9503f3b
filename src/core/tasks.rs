//! Task listing and normalization.
//!
//! The backend returns task nodes of varying completeness. Each record is
//! flattened on its own; a record that cannot be flattened is skipped and
//! reported instead of failing the whole listing.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{json_kind, task_records};
use crate::core::constants::REQUEST_TIMEOUT;
use crate::core::errors::{BackendError, Endpoint, ErrorClassifier};
use crate::utils::url::construct_api_url;

/// Shown for any field the backend left out.
pub const MISSING_FIELD: &str = "N/A";
/// Status assumed for records that do not carry one.
pub const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub task: String,
    pub date: String,
    pub time: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the backend's list.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Decoded(Task),
    Skipped(String),
}

/// The flattened tasks of one listing plus the records that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBatch {
    pub tasks: Vec<Task>,
    pub skipped: Vec<SkippedRecord>,
}

impl TaskBatch {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when the backend reported no records at all.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.skipped.is_empty()
    }
}

/// Flattens one `{ id, context: { task, date, time, status } }` record.
pub fn flatten_record(raw: &Value) -> RecordOutcome {
    let Some(record) = raw.as_object() else {
        return RecordOutcome::Skipped(format!("expected an object, found {}", json_kind(raw)));
    };

    // A missing context means "all defaults"; a present one must be an object.
    let context = match record.get("context") {
        None => None,
        Some(Value::Object(context)) => Some(context),
        Some(other) => {
            return RecordOutcome::Skipped(format!(
                "context should be an object, found {}",
                json_kind(other)
            ))
        }
    };

    // Only the record and its context have a required shape; field values
    // of any other JSON type are shown as their JSON text.
    let field = |source: Option<&serde_json::Map<String, Value>>, name: &str, default: &str| {
        match source.and_then(|map| map.get(name)) {
            None | Some(Value::Null) => default.to_string(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    };

    RecordOutcome::Decoded(Task {
        id: field(Some(record), "id", MISSING_FIELD),
        task: field(context, "task", MISSING_FIELD),
        date: field(context, "date", MISSING_FIELD),
        time: field(context, "time", MISSING_FIELD),
        status: field(context, "status", DEFAULT_STATUS),
    })
}

/// Flattens every record, keeping the ones that decode.
pub fn normalize_records(records: &[Value]) -> TaskBatch {
    let mut batch = TaskBatch::default();
    for (index, raw) in records.iter().enumerate() {
        match flatten_record(raw) {
            RecordOutcome::Decoded(task) => batch.tasks.push(task),
            RecordOutcome::Skipped(reason) => {
                warn!(index, %reason, "skipped malformed task record");
                batch.skipped.push(SkippedRecord { index, reason });
            }
        }
    }
    batch
}

#[derive(Clone, Debug)]
pub struct TaskClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl TaskClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches and flattens the full task list.
    ///
    /// Malformed records are skipped. The call fails with a malformed-response
    /// error only when records were present and none of them decoded.
    pub async fn fetch_all_tasks(&self) -> Result<TaskBatch, BackendError> {
        let classifier = ErrorClassifier::new(Endpoint::TaskList, &self.base_url, self.timeout);
        let url = construct_api_url(&self.base_url, Endpoint::TaskList.path());
        debug!(%url, "fetching task list");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| classifier.transport(&err))?;

        let status = response.status();
        if let Some(err) = classifier.status(status) {
            debug!(%status, kind = %err.kind(), "task listing rejected by backend");
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|err| classifier.transport(&err))?;
        let envelope: Value = serde_json::from_str(&body)
            .map_err(|err| classifier.malformed(format!("Invalid JSON. {err}")))?;

        let batch = normalize_records(task_records(&envelope));
        if batch.tasks.is_empty() && !batch.skipped.is_empty() {
            return Err(classifier.malformed(format!(
                "No valid tasks to display. Skipped {} malformed record(s).",
                batch.skipped_count()
            )));
        }

        debug!(
            tasks = batch.tasks.len(),
            skipped = batch.skipped_count(),
            "task list loaded"
        );
        Ok(batch)
    }
}
