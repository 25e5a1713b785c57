//! Request middleware.
//!
//! actix runs the last `.wrap` first, so `main.rs` registers
//! `StructuredLogger`, then `TraceSpan`, then `RequestTrace`. The trace id
//! is assigned before the span opens and the logger sees both.

pub mod request_trace;
pub mod structured_logger;
pub mod trace_span;

pub use request_trace::{RequestTrace, TraceId};
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
