/*!
 * Error Types
 * Centralized error handling with thiserror and miette support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common result type for toolkit operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Unified error type with miette diagnostics
///
/// Delivery failures to individual consumers are never reported here; they
/// are absorbed by the probation protocol. These variants cover misuse and
/// endpoint lifecycle only.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SyncError {
    #[error("Invalid argument: {0}")]
    #[diagnostic(
        code(gensync::invalid_argument),
        help("Consumers accept either no buffering argument (rendezvous) or exactly one capacity.")
    )]
    InvalidArgument(String),

    #[error("No async runtime available to host the dispatch task")]
    #[diagnostic(
        code(gensync::no_runtime),
        help("Call `ingress()` from within a Tokio runtime, or use `ingress_on` with an explicit handle.")
    )]
    NoRuntime,

    #[error("Ingress closed: {0}")]
    #[diagnostic(
        code(gensync::closed),
        help("The dispatch task has stopped. Create a new ingress to resume broadcasting.")
    )]
    Closed(String),

    #[error("Consumer {0} disconnected")]
    #[diagnostic(
        code(gensync::disconnected),
        help("The consumer was evicted or its broadcaster was dropped.")
    )]
    Disconnected(u64),

    #[error("Operation timed out")]
    #[diagnostic(
        code(gensync::timeout),
        help("No value arrived within the requested duration.")
    )]
    Timeout,
}
