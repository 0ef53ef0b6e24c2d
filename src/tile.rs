//! Tile model: what a single board cell holds.
//!
//! - `TileType`: the five base types a tile can carry.
//! - `SpecialKind`: the bonus variants created by large matches.
//! - `Tile`: a concrete tile with its identity, type, special flag, position
//!   and transient presentation flags.

use crate::error::{Error, Result};
use crate::grid::Position;
use std::fmt;
use std::str::FromStr;

/// Base type of a tile. Two tiles match when their base types are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileType {
    Manna,
    Water,
    Fire,
    Stone,
    Quail,
}

impl TileType {
    /// Every base type, in canonical order.
    pub const ALL: [TileType; 5] = [
        TileType::Manna,
        TileType::Water,
        TileType::Fire,
        TileType::Stone,
        TileType::Quail,
    ];

    /// Converts the type to its single-character fixture representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use manna_match::tile::TileType;
    /// assert_eq!(TileType::Manna.to_char(), 'M');
    /// assert_eq!(TileType::Quail.to_char(), 'Q');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            TileType::Manna => 'M',
            TileType::Water => 'W',
            TileType::Fire => 'F',
            TileType::Stone => 'S',
            TileType::Quail => 'Q',
        }
    }

    /// Inverse of [`TileType::to_char`].
    pub fn from_char(c: char) -> Option<TileType> {
        match c {
            'M' => Some(TileType::Manna),
            'W' => Some(TileType::Water),
            'F' => Some(TileType::Fire),
            'S' => Some(TileType::Stone),
            'Q' => Some(TileType::Quail),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TileType::Manna => "manna",
            TileType::Water => "water",
            TileType::Fire => "fire",
            TileType::Stone => "stone",
            TileType::Quail => "quail",
        }
    }

    /// Returns the ANSI background colour code used for terminal output.
    pub(crate) fn to_ansi_color_code(&self) -> &'static str {
        match self {
            TileType::Manna => "43",
            TileType::Water => "44",
            TileType::Fire => "41",
            TileType::Stone => "47",
            TileType::Quail => "45",
        }
    }
}

impl FromStr for TileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TileType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidTileType(s.to_string()))
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bonus variant carried by a special tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecialKind {
    /// Clears its whole row when consumed.
    Staff,
    /// Clears its whole column when consumed.
    Pillar,
    /// Clears the 3x3 neighbourhood when consumed.
    Tablets,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 3] = [SpecialKind::Staff, SpecialKind::Pillar, SpecialKind::Tablets];

    pub fn name(&self) -> &'static str {
        match self {
            SpecialKind::Staff => "staff",
            SpecialKind::Pillar => "pillar",
            SpecialKind::Tablets => "tablets",
        }
    }

    /// Marker used when rendering a special tile in a terminal cell.
    pub(crate) fn marker(&self) -> &'static str {
        match self {
            SpecialKind::Staff => "==",
            SpecialKind::Pillar => "||",
            SpecialKind::Tablets => "##",
        }
    }
}

impl FromStr for SpecialKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SpecialKind::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidTileType(s.to_string()))
    }
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque tile identity. Presentation layers key animations off it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// Transient presentation flags. Only `moving` and `matched` affect matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileFlags {
    pub selected: bool,
    pub matched: bool,
    pub hinted: bool,
    pub moving: bool,
}

/// A tile sitting in one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub base_type: TileType,
    pub special: Option<SpecialKind>,
    /// Always equal to the coordinate of the cell holding the tile.
    pub position: Position,
    pub flags: TileFlags,
}

impl Tile {
    /// Creates a plain tile with cleared flags.
    pub fn new(id: TileId, base_type: TileType, position: Position) -> Self {
        Tile {
            id,
            base_type,
            special: None,
            position,
            flags: TileFlags::default(),
        }
    }

    pub fn with_special(mut self, kind: SpecialKind) -> Self {
        self.special = Some(kind);
        self
    }

    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }

    /// True while the tile is neither animating nor earmarked for removal.
    pub fn is_available(&self) -> bool {
        !self.flags.moving && !self.flags.matched
    }
}

/// Builds a tile from textual type names, validating the vocabulary.
///
/// # Examples
///
/// ```
/// use manna_match::grid::Position;
/// use manna_match::tile::{create_tile, SpecialKind, TileId, TileType};
///
/// let tile = create_tile(TileId(1), "fire", Position::new(2, 3), Some("pillar")).unwrap();
/// assert_eq!(tile.base_type, TileType::Fire);
/// assert_eq!(tile.special, Some(SpecialKind::Pillar));
///
/// assert!(create_tile(TileId(2), "lava", Position::new(0, 0), None).is_err());
/// ```
pub fn create_tile(
    id: TileId,
    base_type: &str,
    position: Position,
    special: Option<&str>,
) -> Result<Tile> {
    let base_type = base_type.parse::<TileType>()?;
    let special = special.map(str::parse::<SpecialKind>).transpose()?;
    Ok(Tile {
        special,
        ..Tile::new(id, base_type, position)
    })
}

/// Two tiles match iff they share a base type and neither is moving or
/// already consumed by a match this cycle.
pub fn can_match(a: &Tile, b: &Tile) -> bool {
    a.base_type == b.base_type && a.is_available() && b.is_available()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(t: TileType) -> Tile {
        Tile::new(TileId(0), t, Position::new(0, 0))
    }

    #[test]
    fn test_tile_type_parse_accepts_every_name() {
        for t in TileType::ALL {
            assert_eq!(t.name().parse::<TileType>().unwrap(), t);
        }
        assert_eq!("Water".parse::<TileType>().unwrap(), TileType::Water);
    }

    #[test]
    fn test_tile_type_parse_rejects_unknown() {
        let err = "lava".parse::<TileType>().unwrap_err();
        assert_eq!(err, Error::InvalidTileType("lava".to_string()));
    }

    #[test]
    fn test_char_round_trip() {
        for t in TileType::ALL {
            assert_eq!(TileType::from_char(t.to_char()), Some(t));
        }
        assert_eq!(TileType::from_char('.'), None);
    }

    #[test]
    fn test_create_tile_validates_special_kind() {
        let err = create_tile(TileId(7), "stone", Position::new(1, 1), Some("sword")).unwrap_err();
        assert_eq!(err, Error::InvalidTileType("sword".to_string()));

        let ok = create_tile(TileId(7), "stone", Position::new(1, 1), None).unwrap();
        assert!(!ok.is_special());
        assert_eq!(ok.position, Position::new(1, 1));
    }

    #[test]
    fn test_can_match_same_type() {
        assert!(can_match(&tile(TileType::Fire), &tile(TileType::Fire)));
        assert!(!can_match(&tile(TileType::Fire), &tile(TileType::Water)));
    }

    #[test]
    fn test_can_match_ignores_moving_or_matched() {
        let a = tile(TileType::Quail);
        let mut b = tile(TileType::Quail);
        b.flags.matched = true;
        assert!(!can_match(&a, &b));

        let mut c = tile(TileType::Quail);
        c.flags.moving = true;
        assert!(!can_match(&c, &a));

        // Selection and hints are purely visual.
        let mut d = tile(TileType::Quail);
        d.flags.selected = true;
        d.flags.hinted = true;
        assert!(can_match(&a, &d));
    }

    #[test]
    fn test_special_tiles_match_by_base_type() {
        let a = tile(TileType::Manna).with_special(SpecialKind::Staff);
        let b = tile(TileType::Manna);
        assert!(a.is_special());
        assert!(can_match(&a, &b));
    }
}
