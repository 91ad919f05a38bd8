//! Dependency declarations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared dependency on another component, by registry name.
///
/// Required dependencies must be registered and acyclic for startup to
/// proceed; optional dependencies are best-effort and only influence
/// initialization order when the named component happens to exist.
///
/// # Example
///
/// ```
/// use hearth_component::Dependency;
///
/// let wifi = Dependency::required("wifi");
/// let display = Dependency::optional("display");
/// assert!(wifi.required);
/// assert!(!display.required);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Registry name of the component depended on.
    pub name: String,
    /// Whether startup must fail if the name is unregistered.
    pub required: bool,
}

impl Dependency {
    /// Declares a required dependency.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    /// Declares an optional dependency.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required {
            f.write_str(&self.name)
        } else {
            write!(f, "{} (optional)", self.name)
        }
    }
}
