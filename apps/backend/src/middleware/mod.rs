//! Request middleware. Wire order in `App::new()` (outermost last):
//! `.wrap(StructuredLogger).wrap(TraceSpan).wrap(RequestTrace)`, so the trace
//! id exists before the span and the completion log read it.

pub mod request_trace;
pub mod structured_logger;
pub mod trace_span;

pub use request_trace::{RequestTrace, TraceId};
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
