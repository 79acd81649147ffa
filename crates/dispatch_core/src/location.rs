//! Grid locations and the Manhattan metric used for every travel-time estimate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// A point on the service grid. Immutable; compared structurally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i64,
    pub y: i64,
}

impl Location {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Location) -> u64 {
        manhattan_distance(*self, *other)
    }
}

/// `|a.x - b.x| + |a.y - b.y|`.
///
/// Saturates instead of overflowing for coordinates at the far ends of `i64`.
pub fn manhattan_distance(a: Location, b: Location) -> u64 {
    a.x.abs_diff(b.x).saturating_add(a.y.abs_diff(b.y))
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses `"x,y"`. Surrounding whitespace and parentheses are tolerated.
impl FromStr for Location {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DispatchError::InvalidLocation {
            input: s.to_string(),
        };

        let trimmed = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')');
        let (x, y) = trimmed.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse::<i64>().map_err(|_| invalid())?;
        let y = y.trim().parse::<i64>().map_err(|_| invalid())?;

        Ok(Location::new(x, y))
    }
}
