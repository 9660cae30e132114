//! Job status extraction and the terminal-status predicate.

use crate::envelope::Envelope;
use crate::fields::first_non_empty;

/// Field names that may carry the job status, highest priority first.
pub const STATUS_FIELDS: [&str; 2] = ["status", "state"];

/// Statuses meaning the job will not change any further.
pub const DONE_STATUSES: [&str; 5] = ["succeeded", "completed", "finished", "done", "success"];

/// Whether `status` names a finished job.
///
/// Comparison ignores case and surrounding whitespace.
pub fn is_done_status(status: &str) -> bool {
    let normalized = status.trim().to_lowercase();
    DONE_STATUSES.contains(&normalized.as_str())
}

/// Extract the job status from a status response.
///
/// Falls back to the raw response text when neither status field holds a
/// non-empty string.
pub fn extract_status(envelope: &Envelope) -> String {
    first_non_empty(envelope.json_or_null(), &STATUS_FIELDS)
        .map(str::to_owned)
        .unwrap_or_else(|| envelope.text.clone())
}
