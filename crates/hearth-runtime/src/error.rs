//! Runtime layer errors.
//!
//! Startup failures reported by the registry and the core facade.
//! All variants use the `RUNTIME_` code prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`DuplicateName`](RuntimeError::DuplicateName) | `RUNTIME_DUPLICATE_NAME` | No |
//! | [`CycleDetected`](RuntimeError::CycleDetected) | `RUNTIME_CYCLE_DETECTED` | No |
//! | [`MissingDependency`](RuntimeError::MissingDependency) | `RUNTIME_MISSING_DEPENDENCY` | No |
//! | [`ComponentInit`](RuntimeError::ComponentInit) | `RUNTIME_COMPONENT_INIT` | Yes |
//!
//! A cycle or a missing required dependency is a whole-system startup
//! failure: resolution aborts before any component runs. A single
//! component's init failure aborts the remaining sequence only.

use hearth_component::ComponentError;
use hearth_types::ErrorCode;
use thiserror::Error;

/// Error from registry and core operations.
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    /// A component with this name is already registered.
    ///
    /// The registry is left unchanged.
    #[error("component already registered: {0}")]
    DuplicateName(String),

    /// Required dependencies form a cycle; no order exists.
    ///
    /// Carries the names of the components stuck in the cycle.
    #[error("dependency cycle detected among: {0}")]
    CycleDetected(String),

    /// A component requires a name that is not registered at all.
    #[error("component '{dependent}' requires unregistered component '{dependency}'")]
    MissingDependency {
        /// The component declaring the dependency.
        dependent: String,
        /// The unregistered name it requires.
        dependency: String,
    },

    /// A component's startup method signaled failure.
    ///
    /// Components earlier in the order keep running; later ones never
    /// started.
    #[error("component '{name}' failed to initialize")]
    ComponentInit {
        /// The failing component.
        name: String,
        /// The error it reported.
        #[source]
        source: ComponentError,
    },
}

impl ErrorCode for RuntimeError {
    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateName(_) => "RUNTIME_DUPLICATE_NAME",
            Self::CycleDetected(_) => "RUNTIME_CYCLE_DETECTED",
            Self::MissingDependency { .. } => "RUNTIME_MISSING_DEPENDENCY",
            Self::ComponentInit { .. } => "RUNTIME_COMPONENT_INIT",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::ComponentInit { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_types::assert_error_codes;

    fn all_variants() -> Vec<RuntimeError> {
        vec![
            RuntimeError::DuplicateName("x".into()),
            RuntimeError::CycleDetected("x, y".into()),
            RuntimeError::MissingDependency {
                dependent: "x".into(),
                dependency: "y".into(),
            },
            RuntimeError::ComponentInit {
                name: "x".into(),
                source: ComponentError::InitFailed("boom".into()),
            },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "RUNTIME_");
    }

    #[test]
    fn only_component_init_is_recoverable() {
        for err in all_variants() {
            let expected = matches!(err, RuntimeError::ComponentInit { .. });
            assert_eq!(err.is_recoverable(), expected, "{}", err.code());
        }
    }

    #[test]
    fn component_init_carries_source() {
        let err = RuntimeError::ComponentInit {
            name: "wifi".into(),
            source: ComponentError::InitFailed("no antenna".into()),
        };
        assert!(err.to_string().contains("wifi"));
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("no antenna"));
    }
}
