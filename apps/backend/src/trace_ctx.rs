//! Task-local trace id of the request being served.
//!
//! `TraceSpan` establishes the scope; error rendering reads it so problem
//! details and the `x-trace-id` header carry the same id as the logs.

use tokio::task_local;

/// Placeholder reported outside any request scope.
pub const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Run `future` with `trace_id` as the current trace id.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
