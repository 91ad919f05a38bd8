//! Component layer errors.
//!
//! All variants use the `COMPONENT_` code prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`InitFailed`](ComponentError::InitFailed) | `COMPONENT_INIT_FAILED` | Yes |
//! | [`ShutdownFailed`](ComponentError::ShutdownFailed) | `COMPONENT_SHUTDOWN_FAILED` | No |
//! | [`Unavailable`](ComponentError::Unavailable) | `COMPONENT_UNAVAILABLE` | Yes |

use hearth_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error signaled by a component's own lifecycle methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ComponentError {
    /// The component could not start.
    ///
    /// Recoverable: a retry with different configuration or after a
    /// dependency comes up may succeed.
    #[error("initialization failed: {0}")]
    InitFailed(String),

    /// The component could not shut down cleanly.
    ///
    /// Teardown continues regardless; the error is reported for logging.
    #[error("shutdown failed: {0}")]
    ShutdownFailed(String),

    /// A peripheral or peer the component needs is not present.
    ///
    /// Recoverable: the resource may appear later.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl ErrorCode for ComponentError {
    fn code(&self) -> &'static str {
        match self {
            Self::InitFailed(_) => "COMPONENT_INIT_FAILED",
            Self::ShutdownFailed(_) => "COMPONENT_SHUTDOWN_FAILED",
            Self::Unavailable(_) => "COMPONENT_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::InitFailed(_) => true,
            Self::Unavailable(_) => true,
            Self::ShutdownFailed(_) => false,
        }
    }
}
