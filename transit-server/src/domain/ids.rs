//! Identifier types for feed entities.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an empty or blank identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} identifier: must not be blank")]
pub struct InvalidId {
    kind: &'static str,
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, trimming surrounding whitespace.
            ///
            /// Blank input is rejected.
            pub fn parse(s: &str) -> Result<Self, InvalidId> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(InvalidId { kind: $kind });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// A stop identifier as it appears in the feed (`stop_id` or `id`).
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::StopId;
    ///
    /// let stop = StopId::parse(" 42 ").unwrap();
    /// assert_eq!(stop.as_str(), "42");
    ///
    /// assert!(StopId::parse("   ").is_err());
    /// ```
    StopId,
    "stop"
);

string_id!(
    /// A route identifier as it appears in the feed (`route_id` or `id`).
    RouteId,
    "route"
);

/// Direction tag of a route pattern, e.g. `0` (outbound) or `1` (inbound).
///
/// Taken from the trailing segment of a shape identifier, or from a trip's
/// `direction_id` when the shape identifier carries no separator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Direction(String);

impl Direction {
    /// Create a direction tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Derive the direction from the segment after the last `separator` of a
    /// shape identifier.
    ///
    /// Returns `None` when the shape identifier has no separator or the
    /// trailing segment is empty.
    pub fn from_shape_id(shape_id: &str, separator: char) -> Option<Self> {
        let (_, tail) = shape_id.rsplit_once(separator)?;
        let tail = tail.trim();
        if tail.is_empty() {
            return None;
        }
        Some(Self(tail.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Direction({})", self.0)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one directional pattern of a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PatternId {
    pub route: RouteId,
    pub direction: Direction,
}

impl PatternId {
    pub fn new(route: RouteId, direction: Direction) -> Self {
        Self { route, direction }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.route, self.direction)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any non-blank identifier survives a parse/as_str roundtrip once trimmed
        #[test]
        fn roundtrip(s in "[A-Za-z0-9_]{1,12}") {
            let id = StopId::parse(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        /// Whitespace-only input never parses
        #[test]
        fn blank_rejected(s in "[ \t\n]{0,6}") {
            prop_assert!(StopId::parse(&s).is_err());
        }
    }
}
