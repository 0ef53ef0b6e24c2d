//! Match detection over a grid snapshot.
//!
//! Everything here is a pure function of the grid: scanning the same grid
//! twice yields identical results in identical order.

use crate::grid::{Grid, Position};
use crate::tile::{can_match, SpecialKind, TileType};
use std::collections::BTreeSet;

/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
    Composite,
}

/// Shape of a composite match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pattern {
    None,
    L,
    T,
}

/// A group of same-type tiles found by a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub matched_type: TileType,
    pub direction: Direction,
    pub tiles: BTreeSet<Position>,
    pub pattern: Pattern,
    /// Intersection cell of a composite; `None` for straight runs.
    pub pivot: Option<Position>,
}

impl Match {
    fn run(matched_type: TileType, direction: Direction, tiles: &[Position]) -> Self {
        Match {
            matched_type,
            direction,
            tiles: tiles.iter().copied().collect(),
            pattern: Pattern::None,
            pivot: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.tiles.contains(&pos)
    }

    /// Cell where a special tile created by this match is placed: the pivot
    /// of a composite, otherwise the middle tile of the run.
    pub fn centroid(&self) -> Position {
        if let Some(pivot) = self.pivot {
            return pivot;
        }
        self.tiles
            .iter()
            .nth(self.tiles.len() / 2)
            .copied()
            .unwrap_or(Position::new(0, 0))
    }

    /// Special tile this match earns, if any.
    ///
    /// # Examples
    /// ```
    /// use manna_match::matcher::find_matches;
    /// use manna_match::tile::SpecialKind;
    /// use manna_match::utils::grid_from_str_array;
    ///
    /// let grid = grid_from_str_array(&["WWWWS"]).unwrap();
    /// let matches = find_matches(&grid);
    /// assert_eq!(matches[0].special_reward(), Some(SpecialKind::Pillar));
    /// ```
    pub fn special_reward(&self) -> Option<SpecialKind> {
        match (self.pattern, self.len()) {
            (Pattern::L | Pattern::T, _) => Some(SpecialKind::Tablets),
            (Pattern::None, n) if n >= 5 => Some(SpecialKind::Staff),
            (Pattern::None, 4) => Some(SpecialKind::Pillar),
            _ => None,
        }
    }
}

/// Scans one line of cells, appending every run of `MIN_RUN` or more.
fn scan_line(
    grid: &Grid,
    cells: impl Iterator<Item = Position>,
    direction: Direction,
    out: &mut Vec<Match>,
) {
    let mut run: Vec<Position> = Vec::new();
    let flush = |run: &mut Vec<Position>, out: &mut Vec<Match>| {
        if run.len() >= MIN_RUN {
            if let Some(t) = grid.tile_type(run[0]) {
                out.push(Match::run(t, direction, run));
            }
        }
        run.clear();
    };

    for pos in cells {
        let current = grid.get(pos);
        let extends = match (run.last().and_then(|p| grid.get(*p)), current) {
            (Some(prev), Some(cur)) => can_match(prev, cur),
            _ => false,
        };
        if extends {
            run.push(pos);
            continue;
        }
        flush(&mut run, out);
        // Empty cells and tiles already earmarked never start a run.
        if current.is_some_and(|t| t.is_available()) {
            run.push(pos);
        }
    }
    flush(&mut run, out);
}

/// Finds every horizontal and vertical run, returned as
/// `(horizontal, vertical)`.
pub fn find_runs(grid: &Grid) -> (Vec<Match>, Vec<Match>) {
    let mut horizontal = Vec::new();
    for y in 0..grid.height() {
        let cells = (0..grid.width()).map(move |x| Position::new(x, y));
        scan_line(grid, cells, Direction::Horizontal, &mut horizontal);
    }

    let mut vertical = Vec::new();
    for x in 0..grid.width() {
        let cells = (0..grid.height()).map(move |y| Position::new(x, y));
        scan_line(grid, cells, Direction::Vertical, &mut vertical);
    }

    (horizontal, vertical)
}

/// Derives L and T composites from intersecting same-type runs.
///
/// Every intersecting pair yields an `L`; a pair whose intersection lies
/// strictly inside either run additionally yields one `T`.
pub fn find_composites(horizontal: &[Match], vertical: &[Match]) -> Vec<Match> {
    let mut composites = Vec::new();
    for h in horizontal {
        for v in vertical {
            if h.matched_type != v.matched_type {
                continue;
            }
            let Some(&pivot) = h.tiles.intersection(&v.tiles).next() else {
                continue;
            };
            let union: BTreeSet<Position> = h.tiles.union(&v.tiles).copied().collect();
            let make = |pattern| Match {
                matched_type: h.matched_type,
                direction: Direction::Composite,
                tiles: union.clone(),
                pattern,
                pivot: Some(pivot),
            };

            composites.push(make(Pattern::L));
            if is_interior(&h.tiles, pivot) || is_interior(&v.tiles, pivot) {
                composites.push(make(Pattern::T));
            }
        }
    }
    composites
}

fn is_interior(run: &BTreeSet<Position>, pos: Position) -> bool {
    match (run.first(), run.last()) {
        (Some(&first), Some(&last)) => pos != first && pos != last && run.contains(&pos),
        _ => false,
    }
}

/// Finds all matches on the grid: horizontal runs (row-major), vertical runs
/// (column-major), then composites.
///
/// # Examples
/// ```
/// use manna_match::matcher::{find_matches, Direction};
/// use manna_match::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&[
///     "WWWS",
///     "FSQM",
/// ]).unwrap();
/// let matches = find_matches(&grid);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].direction, Direction::Horizontal);
/// assert_eq!(matches[0].len(), 3);
/// ```
pub fn find_matches(grid: &Grid) -> Vec<Match> {
    let (horizontal, vertical) = find_runs(grid);
    let composites = find_composites(&horizontal, &vertical);
    let mut all = horizontal;
    all.extend(vertical);
    all.extend(composites);
    all
}

/// True if the grid holds at least one run.
pub fn has_matches(grid: &Grid) -> bool {
    let (horizontal, vertical) = find_runs(grid);
    !horizontal.is_empty() || !vertical.is_empty()
}

/// Finds every adjacent pair whose swap would produce at least one match.
///
/// Each pair is reported once, as `(pos, right_or_down_neighbour)`, in
/// row-major order of the first position.
pub fn find_potential_matches(grid: &Grid) -> Vec<(Position, Position)> {
    let mut scratch = grid.clone();
    let mut pairs = Vec::new();
    for pos in grid.positions() {
        let neighbours = [
            Position::new(pos.x + 1, pos.y),
            Position::new(pos.x, pos.y + 1),
        ];
        for other in neighbours {
            if !scratch.in_bounds(other) {
                continue;
            }
            if !scratch.swap_contents(pos, other) {
                continue;
            }
            if has_matches(&scratch) {
                pairs.push((pos, other));
            }
            scratch.swap_contents(pos, other);
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_str_array;

    fn positions(coords: &[(usize, usize)]) -> BTreeSet<Position> {
        coords.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn test_no_matches_on_checkerboard() {
        let grid = grid_from_str_array(&["MWMW", "WMWM", "MWMW"]).unwrap();
        assert!(find_matches(&grid).is_empty());
        assert!(!has_matches(&grid));
    }

    #[test]
    fn test_horizontal_run() {
        let grid = grid_from_str_array(&["SWWWF", "QMSFQ"]).unwrap();
        let matches = find_matches(&grid);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.matched_type, TileType::Water);
        assert_eq!(m.direction, Direction::Horizontal);
        assert_eq!(m.pattern, Pattern::None);
        assert_eq!(m.tiles, positions(&[(1, 0), (2, 0), (3, 0)]));
        assert_eq!(m.centroid(), Position::new(2, 0));
        assert_eq!(m.special_reward(), None);
    }

    #[test]
    fn test_vertical_run_spanning_full_height() {
        let grid = grid_from_str_array(&["MQ", "MS", "MQ", "MS"]).unwrap();
        let matches = find_matches(&grid);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].direction, Direction::Vertical);
        assert_eq!(matches[0].len(), 4);
        assert_eq!(matches[0].centroid(), Position::new(0, 2));
        assert_eq!(matches[0].special_reward(), Some(SpecialKind::Pillar));
    }

    #[test]
    fn test_empty_cell_breaks_run() {
        let grid = grid_from_str_array(&["FF.FF", "FF.FS"]).unwrap();
        assert!(find_runs(&grid).0.is_empty());
    }

    #[test]
    fn test_two_in_a_row_is_not_a_match() {
        let grid = grid_from_str_array(&["QQSQQ"]).unwrap();
        assert!(find_matches(&grid).is_empty());
    }

    #[test]
    fn test_flagged_tiles_break_runs() {
        let mut grid = grid_from_str_array(&["FFFF"]).unwrap();
        grid.get_mut(Position::new(1, 0)).unwrap().flags.matched = true;
        assert!(find_matches(&grid).is_empty());

        grid.get_mut(Position::new(1, 0)).unwrap().flags.matched = false;
        grid.get_mut(Position::new(0, 0)).unwrap().flags.moving = true;
        let matches = find_matches(&grid);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tiles, positions(&[(1, 0), (2, 0), (3, 0)]));
    }

    #[test]
    fn test_two_runs_in_one_row() {
        let grid = grid_from_str_array(&["MMMWWWS"]).unwrap();
        let (h, v) = find_runs(&grid);
        assert_eq!(h.len(), 2);
        assert!(v.is_empty());
        assert_eq!(h[0].matched_type, TileType::Manna);
        assert_eq!(h[1].matched_type, TileType::Water);
    }

    #[test]
    fn test_l_shape_at_shared_endpoint() {
        let grid = grid_from_str_array(&[
            "FFFS", //
            "FSQM", //
            "FQMS", //
        ])
        .unwrap();
        let matches = find_matches(&grid);
        // Horizontal run, vertical run, one L composite.
        assert_eq!(matches.len(), 3);
        let l = &matches[2];
        assert_eq!(l.direction, Direction::Composite);
        assert_eq!(l.pattern, Pattern::L);
        assert_eq!(l.len(), 5);
        assert_eq!(l.centroid(), Position::new(0, 0));
        assert_eq!(l.special_reward(), Some(SpecialKind::Tablets));
    }

    #[test]
    fn test_t_shape_emits_l_and_t() {
        let grid = grid_from_str_array(&[
            "QQQS", //
            "SQFM", //
            "MQSF", //
        ])
        .unwrap();
        let matches = find_matches(&grid);
        let patterns: Vec<Pattern> = matches.iter().map(|m| m.pattern).collect();
        assert_eq!(patterns, vec![Pattern::None, Pattern::None, Pattern::L, Pattern::T]);
        assert_eq!(matches[3].pivot, Some(Position::new(1, 0)));
        assert_eq!(matches[3].len(), 5);
    }

    #[test]
    fn test_cross_emits_single_t() {
        let grid = grid_from_str_array(&[
            "SMS", //
            "MMM", //
            "QMQ", //
        ])
        .unwrap();
        let matches = find_matches(&grid);
        let t_count = matches.iter().filter(|m| m.pattern == Pattern::T).count();
        assert_eq!(t_count, 1);
        assert_eq!(matches.len(), 4);
    }

    #[test]
    fn test_different_types_do_not_compose() {
        let grid = grid_from_str_array(&[
            "WFFF", //
            "WSQM", //
            "WQMS", //
        ])
        .unwrap();
        let matches = find_matches(&grid);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.pattern == Pattern::None));
    }

    #[test]
    fn test_find_matches_is_deterministic() {
        let grid = grid_from_str_array(&[
            "QQQS", //
            "SQFM", //
            "MQFF", //
            "FFFS", //
        ])
        .unwrap();
        assert_eq!(find_matches(&grid), find_matches(&grid));
    }

    #[test]
    fn test_find_potential_matches() {
        let grid = grid_from_str_array(&[
            "MMWS", //
            "QSMF", //
        ])
        .unwrap();
        let moves = find_potential_matches(&grid);
        assert_eq!(moves, vec![(Position::new(2, 0), Position::new(2, 1))]);
    }

    #[test]
    fn test_find_potential_matches_leaves_grid_untouched() {
        let grid = grid_from_str_array(&["MWMW", "WMWM", "MWMW"]).unwrap();
        let before = grid.clone();
        let _ = find_potential_matches(&grid);
        assert_eq!(grid, before);
    }
}
