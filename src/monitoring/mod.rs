/*!
 * Monitoring Module
 * Tracing subscriber setup
 */

pub mod tracer;

pub use tracer::{init_tracing, TRACE_JSON_ENV};
