//! The board grid: a fixed `width x height` array of optional tiles.
//!
//! Cells are `Option<Tile>` so that emptiness (which only exists while a
//! cascade is in flight) is explicit. The grid keeps every tile's `position`
//! in sync with its cell and hands out fresh tile ids.

use crate::error::{Error, Result};
use crate::tile::{SpecialKind, Tile, TileId, TileType};
use std::fmt;

/// A grid coordinate. `x` is the column, `y` the row; row 0 is the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// True when the two positions share an edge.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Type and special kind of one cell, used for identity-free comparisons.
pub type CellKind = Option<(TileType, Option<SpecialKind>)>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Tile>>,
    next_id: u64,
}

impl Grid {
    /// Creates a grid whose cells are all empty.
    ///
    /// # Errors
    /// `Error::InvalidGridShape` if either dimension is zero.
    pub fn new_empty(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGridShape(format!(
                "grid must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        Ok(Grid {
            width,
            height,
            cells: vec![None; width * height],
            next_id: 1,
        })
    }

    /// Builds a grid from rows of optional tile types (row 0 on top).
    ///
    /// # Errors
    /// `Error::InvalidGridShape` if there are no rows, a row is empty, or the
    /// rows differ in length.
    pub fn from_types(rows: &[Vec<Option<TileType>>]) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((y, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(Error::InvalidGridShape(format!(
                "row {} has {} cells, expected {}",
                y,
                row.len(),
                width
            )));
        }
        let mut grid = Grid::new_empty(width, rows.len())?;
        for (y, row) in rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(t) = cell {
                    grid.spawn(Position::new(x, y), *t);
                }
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// # Panics
    /// Panics if `pos` is outside the grid.
    fn index(&self, pos: Position) -> usize {
        assert!(self.in_bounds(pos), "position {} outside {}x{} grid", pos, self.width, self.height);
        pos.y * self.width + pos.x
    }

    /// Returns the tile at `pos`, or `None` for empty or out-of-bounds cells.
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells[self.index(pos)].as_ref()
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        let i = self.index(pos);
        self.cells[i].as_mut()
    }

    pub fn tile_type(&self, pos: Position) -> Option<TileType> {
        self.get(pos).map(|t| t.base_type)
    }

    /// Places a freshly identified plain tile of `base_type` at `pos`,
    /// replacing whatever was there.
    ///
    /// # Panics
    /// Panics if `pos` is outside the grid.
    pub fn spawn(&mut self, pos: Position, base_type: TileType) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        self.put(pos, Tile::new(id, base_type, pos));
        id
    }

    /// Writes `tile` into `pos`, rewriting its `position`.
    ///
    /// # Panics
    /// Panics if `pos` is outside the grid.
    pub fn put(&mut self, pos: Position, mut tile: Tile) {
        let i = self.index(pos);
        tile.position = pos;
        self.cells[i] = Some(tile);
    }

    /// Empties the cell at `pos`, returning its previous tile.
    ///
    /// # Panics
    /// Panics if `pos` is outside the grid.
    pub fn take(&mut self, pos: Position) -> Option<Tile> {
        let i = self.index(pos);
        self.cells[i].take()
    }

    /// Exchanges type and special kind between two occupied cells. Tile ids
    /// stay where they are. Returns false (and changes nothing) when either
    /// cell is empty or out of bounds.
    pub fn swap_contents(&mut self, a: Position, b: Position) -> bool {
        let (Some(ta), Some(tb)) = (self.get(a).copied(), self.get(b).copied()) else {
            return false;
        };
        if let Some(t) = self.get_mut(a) {
            t.base_type = tb.base_type;
            t.special = tb.special;
        }
        if let Some(t) = self.get_mut(b) {
            t.base_type = ta.base_type;
            t.special = ta.special;
        }
        true
    }

    /// All coordinates in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.cells.iter_mut().flatten()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Row-major snapshot of every cell's type and special kind.
    pub fn kinds(&self) -> Vec<CellKind> {
        self.cells
            .iter()
            .map(|c| c.map(|t| (t.base_type, t.special)))
            .collect()
    }

    /// Compacts every column downward, preserving the relative order of the
    /// surviving tiles. Tiles that fall are flagged `moving`.
    ///
    /// Returns the cells left empty at the top of each column, row-major.
    pub fn apply_gravity(&mut self) -> Vec<Position> {
        for x in 0..self.width {
            let mut write_y = self.height;
            for read_y in (0..self.height).rev() {
                let from = Position::new(x, read_y);
                if let Some(mut tile) = self.take(from) {
                    write_y -= 1;
                    if write_y != read_y {
                        tile.flags.moving = true;
                    }
                    self.put(Position::new(x, write_y), tile);
                }
            }
        }
        self.positions().filter(|&p| self.get(p).is_none()).collect()
    }

    /// Generates a string representation of the grid with an optional
    /// highlighted position, using ANSI colours for terminal output.
    ///
    /// Special tiles show their marker (`==` staff, `||` pillar, `##`
    /// tablets); the highlighted cell shows `..`.
    pub fn to_string_with_highlight(&self, pos: Option<Position>) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for x in 0..self.width {
            output.push_str(&format!("{:<2}", x));
        }
        output.push('\n');

        for y in 0..self.height {
            output.push_str(&format!("{:<2}", y));
            for x in 0..self.width {
                let p = Position::new(x, y);
                match self.get(p) {
                    Some(tile) => {
                        let content = if pos == Some(p) {
                            ".."
                        } else if let Some(kind) = tile.special {
                            kind.marker()
                        } else if tile.flags.hinted {
                            "<>"
                        } else {
                            "  "
                        };
                        output.push_str(&format!(
                            "\x1b[1;{};m{}\x1b[m",
                            tile.base_type.to_ansi_color_code(),
                            content
                        ));
                    }
                    None => output.push_str("  "),
                }
            }
            if y < self.height - 1 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Grid {
    /// Plain character rendering, one row per line (`.` for empty cells).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            let row: String = (0..self.width)
                .map(|x| self.tile_type(Position::new(x, y)).map_or('.', |t| t.to_char()))
                .collect();
            if y + 1 < self.height {
                writeln!(f, "{}", row)?;
            } else {
                write!(f, "{}", row)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_str_array;

    #[test]
    fn test_new_empty_rejects_zero_dimension() {
        assert!(matches!(Grid::new_empty(0, 7), Err(Error::InvalidGridShape(_))));
        assert!(matches!(Grid::new_empty(7, 0), Err(Error::InvalidGridShape(_))));
        let grid = Grid::new_empty(3, 2).unwrap();
        assert_eq!(grid.cell_count(), 6);
        assert!(grid.tiles().next().is_none());
    }

    #[test]
    fn test_from_types_rejects_ragged_rows() {
        let rows = vec![
            vec![Some(TileType::Fire), Some(TileType::Water)],
            vec![Some(TileType::Fire)],
        ];
        let err = Grid::from_types(&rows).unwrap_err();
        assert!(matches!(err, Error::InvalidGridShape(msg) if msg.contains("row 1")));
    }

    #[test]
    fn test_adjacency() {
        let p = Position::new(2, 3);
        assert!(p.is_adjacent(&Position::new(2, 4)));
        assert!(p.is_adjacent(&Position::new(1, 3)));
        assert!(!p.is_adjacent(&Position::new(3, 4)));
        assert!(!p.is_adjacent(&p));
        assert!(!p.is_adjacent(&Position::new(2, 5)));
    }

    #[test]
    fn test_put_rewrites_position_and_ids_are_unique() {
        let mut grid = Grid::new_empty(2, 2).unwrap();
        let a = grid.spawn(Position::new(0, 0), TileType::Fire);
        let b = grid.spawn(Position::new(1, 1), TileType::Fire);
        assert_ne!(a, b);

        let tile = grid.take(Position::new(0, 0)).unwrap();
        grid.put(Position::new(1, 0), tile);
        assert_eq!(grid.get(Position::new(1, 0)).unwrap().position, Position::new(1, 0));
        assert_eq!(grid.get(Position::new(1, 0)).unwrap().id, a);
    }

    #[test]
    fn test_swap_contents_keeps_ids() {
        let mut grid = grid_from_str_array(&["MW"]).unwrap();
        let id_a = grid.get(Position::new(0, 0)).unwrap().id;
        grid.get_mut(Position::new(1, 0)).unwrap().special = Some(SpecialKind::Staff);

        assert!(grid.swap_contents(Position::new(0, 0), Position::new(1, 0)));
        let a = grid.get(Position::new(0, 0)).unwrap();
        assert_eq!(a.id, id_a);
        assert_eq!(a.base_type, TileType::Water);
        assert_eq!(a.special, Some(SpecialKind::Staff));
        assert_eq!(grid.get(Position::new(1, 0)).unwrap().special, None);
    }

    #[test]
    fn test_swap_contents_with_empty_cell_is_noop() {
        let mut grid = grid_from_str_array(&["M."]).unwrap();
        let before = grid.clone();
        assert!(!grid.swap_contents(Position::new(0, 0), Position::new(1, 0)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_apply_gravity_preserves_column_order() {
        let mut grid = grid_from_str_array(&[
            "MW", //
            "..", //
            "F.", //
            "S.", //
        ])
        .unwrap();
        grid.take(Position::new(0, 3));
        let empties = grid.apply_gravity();

        assert_eq!(grid.to_string(), "..\n..\nM.\nFW");
        assert_eq!(grid.tile_type(Position::new(0, 2)), Some(TileType::Manna));
        assert_eq!(grid.tile_type(Position::new(0, 3)), Some(TileType::Fire));
        assert_eq!(grid.tile_type(Position::new(1, 3)), Some(TileType::Water));
        assert!(grid.get(Position::new(0, 3)).unwrap().flags.moving);
        assert_eq!(empties.len(), 5);
        assert!(empties.contains(&Position::new(0, 0)));
        assert!(empties.contains(&Position::new(1, 2)));
    }

    #[test]
    fn test_display_plain_chars() {
        let grid = grid_from_str_array(&["MWF", "SQ."]).unwrap();
        assert_eq!(grid.to_string(), "MWF\nSQ.");
    }

    #[test]
    fn test_highlight_marks_cell() {
        let grid = grid_from_str_array(&["MW"]).unwrap();
        let s = grid.to_string_with_highlight(Some(Position::new(1, 0)));
        assert!(s.contains(".."));
        assert!(s.starts_with("  0 1 \n0 "));
    }
}
