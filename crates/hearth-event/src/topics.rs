//! Core lifecycle topics.
//!
//! Component-specific topics are defined by the components that publish
//! them; only the runtime's own lifecycle transitions live here.

/// A component completed its startup. Payload: the component name.
pub const COMPONENT_READY: &str = "component/ready";

/// A component's startup failed. Payload: `{ "component": .., "error": .. }`.
pub const COMPONENT_ERROR: &str = "component/error";

/// Every component completed both startup phases. Payload: null.
pub const SYSTEM_READY: &str = "system/ready";

/// Teardown is about to begin; components are still alive. Payload: null.
pub const SHUTDOWN_START: &str = "shutdown/start";
