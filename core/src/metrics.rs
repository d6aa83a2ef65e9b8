//! Metric names.
//!
//! Counters are recorded through the `metrics` facade; the server binary
//! installs the Prometheus recorder and calls [`describe_metrics`] once.

/// Codes sent and marked as consumed.
pub const SPECIAL_CODES_SENT_TOTAL: &str = "eventadmin_special_codes_sent_total";

/// Dispatch invocations aborted by an error.
pub const SPECIAL_CODES_DISPATCH_FAILURES_TOTAL: &str =
    "eventadmin_special_codes_dispatch_failures_total";

/// Codes reset to unsent.
pub const SPECIAL_CODES_CLEARED_TOTAL: &str = "eventadmin_special_codes_cleared_total";

/// Subscriber status transitions applied.
pub const WAITING_QUEUE_STATUS_CHANGES_TOTAL: &str = "eventadmin_waiting_queue_status_changes_total";

/// Waiting-queue exports produced, labelled by `format`.
pub const WAITING_QUEUE_EXPORTS_TOTAL: &str = "eventadmin_waiting_queue_exports_total";

/// Register descriptions for every metric.
pub fn describe_metrics() {
    metrics::describe_counter!(
        SPECIAL_CODES_SENT_TOTAL,
        "Special codes sent to their assignees"
    );
    metrics::describe_counter!(
        SPECIAL_CODES_DISPATCH_FAILURES_TOTAL,
        "Special code dispatches aborted by an error"
    );
    metrics::describe_counter!(
        SPECIAL_CODES_CLEARED_TOTAL,
        "Special codes reset to unsent"
    );
    metrics::describe_counter!(
        WAITING_QUEUE_STATUS_CHANGES_TOTAL,
        "Waiting-queue subscriber status changes"
    );
    metrics::describe_counter!(
        WAITING_QUEUE_EXPORTS_TOTAL,
        "Waiting-queue exports by format"
    );
}
