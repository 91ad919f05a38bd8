//! Topic pattern parsing and matching.

use std::fmt;

/// The wildcard character, only meaningful as a pattern suffix.
pub const WILDCARD: char = '*';

/// A subscription's topic pattern.
///
/// A pattern is either an exact topic string, matched byte-for-byte, or a
/// prefix pattern written with a trailing `*` (`"sensor.*"` matches every
/// topic that starts with `"sensor."`). A `*` anywhere but the end is not a
/// wildcard; the pattern is then an exact match containing a literal `*`.
///
/// # Example
///
/// ```
/// use hearth_event::TopicPattern;
///
/// let exact = TopicPattern::parse("wifi/connected");
/// assert!(exact.matches("wifi/connected"));
/// assert!(!exact.matches("wifi/connecting"));
///
/// let prefix = TopicPattern::parse("sensor.*");
/// assert!(prefix.matches("sensor.temp"));
/// assert!(prefix.matches("sensor.update"));
/// assert!(!prefix.matches("actuator.update"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TopicPattern {
    /// Byte-for-byte topic match.
    Exact(String),
    /// Matches any topic starting with the stored prefix.
    Prefix(String),
}

impl TopicPattern {
    /// Parses a pattern string.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix(WILDCARD) {
            Some(prefix) => Self::Prefix(prefix.to_string()),
            None => Self::Exact(pattern.to_string()),
        }
    }

    /// Returns whether `topic` matches this pattern.
    #[must_use]
    pub fn matches(&self, topic: &str) -> bool {
        match self {
            Self::Exact(t) => t == topic,
            Self::Prefix(p) => topic.starts_with(p.as_str()),
        }
    }

    /// Returns whether this is a prefix (wildcard) pattern.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Prefix(_))
    }
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(t) => f.write_str(t),
            Self::Prefix(p) => write!(f, "{p}{WILDCARD}"),
        }
    }
}
