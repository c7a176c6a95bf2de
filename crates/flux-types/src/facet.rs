use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A logical access point of a container.
///
/// The six directional facets correspond to the faces of a cube. `Unsided`
/// is the distinguished "no specific facet" identifier used by callers that
/// do not act through a particular face.
///
/// Indices are stable: `Down = 0` through `East = 5`, `Unsided = 6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Down,
    Up,
    North,
    South,
    West,
    East,
    Unsided,
}

impl Facet {
    /// Number of facets, including `Unsided`.
    pub const COUNT: usize = 7;

    /// Every facet in index order.
    pub const ALL: [Facet; Self::COUNT] = [
        Facet::Down,
        Facet::Up,
        Facet::North,
        Facet::South,
        Facet::West,
        Facet::East,
        Facet::Unsided,
    ];

    /// The six directional facets in index order.
    pub const DIRECTIONS: [Facet; 6] = [
        Facet::Down,
        Facet::Up,
        Facet::North,
        Facet::South,
        Facet::West,
        Facet::East,
    ];

    /// Stable index of this facet in `0..Facet::COUNT`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a facet by its stable index.
    pub fn from_index(index: usize) -> Result<Self, TypeError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(TypeError::FacetIndexOutOfRange {
                expected: Self::COUNT,
                actual: index,
            })
    }

    /// Returns `true` for the six directional facets.
    pub const fn is_directional(self) -> bool {
        !matches!(self, Facet::Unsided)
    }

    /// The facet on the other side of the cube. `Unsided` is its own opposite.
    pub const fn opposite(self) -> Self {
        match self {
            Facet::Down => Facet::Up,
            Facet::Up => Facet::Down,
            Facet::North => Facet::South,
            Facet::South => Facet::North,
            Facet::West => Facet::East,
            Facet::East => Facet::West,
            Facet::Unsided => Facet::Unsided,
        }
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Facet::Down => "down",
            Facet::Up => "up",
            Facet::North => "north",
            Facet::South => "south",
            Facet::West => "west",
            Facet::East => "east",
            Facet::Unsided => "unsided",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Facet {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|facet| facet.name() == lowered)
            .ok_or_else(|| TypeError::UnknownFacet(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_stable() {
        for (i, facet) in Facet::ALL.iter().enumerate() {
            assert_eq!(facet.index(), i);
            assert_eq!(Facet::from_index(i).unwrap(), *facet);
        }
        assert_eq!(Facet::Unsided.index(), 6);
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        let err = Facet::from_index(7).unwrap_err();
        assert_eq!(
            err,
            TypeError::FacetIndexOutOfRange {
                expected: 7,
                actual: 7
            }
        );
    }

    #[test]
    fn opposite_is_an_involution() {
        for facet in Facet::ALL {
            assert_eq!(facet.opposite().opposite(), facet);
        }
        assert_eq!(Facet::North.opposite(), Facet::South);
        assert_eq!(Facet::Unsided.opposite(), Facet::Unsided);
    }

    #[test]
    fn directions_exclude_unsided() {
        assert!(Facet::DIRECTIONS.iter().all(|f| f.is_directional()));
        assert!(!Facet::Unsided.is_directional());
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("west".parse::<Facet>().unwrap(), Facet::West);
        assert_eq!(" UP ".parse::<Facet>().unwrap(), Facet::Up);
        assert_eq!(Facet::Unsided.to_string(), "unsided");
        assert_eq!(
            "sideways".parse::<Facet>().unwrap_err(),
            TypeError::UnknownFacet("sideways".into())
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Facet::South).unwrap();
        assert_eq!(json, "\"south\"");
        let back: Facet = serde_json::from_str("\"unsided\"").unwrap();
        assert_eq!(back, Facet::Unsided);
    }
}
