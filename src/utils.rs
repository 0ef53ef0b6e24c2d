use crate::grid::{Grid, Position};
use crate::tile::TileType;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Parses an array of string slices into a `Grid`.
///
/// Each string slice represents a row, starting from the top (row 0). All
/// rows must have the same number of characters; the grid is
/// `row_len x rows.len()`.
///
/// Valid characters are:
/// - 'M': `TileType::Manna`
/// - 'W': `TileType::Water`
/// - 'F': `TileType::Fire`
/// - 'S': `TileType::Stone`
/// - 'Q': `TileType::Quail`
/// - '.': empty cell
///
/// # Returns
/// * `Ok(Grid)` if parsing is successful.
/// * `Err(String)` if there are no rows, rows differ in length, or an
///   unrecognized character is encountered.
///
/// # Examples
/// ```
/// use manna_match::grid::Position;
/// use manna_match::tile::TileType;
/// use manna_match::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&["MWF", "S.Q"]).unwrap();
/// assert_eq!(grid.width(), 3);
/// assert_eq!(grid.height(), 2);
/// assert_eq!(grid.tile_type(Position::new(2, 0)), Some(TileType::Fire));
/// assert_eq!(grid.tile_type(Position::new(1, 1)), None);
///
/// assert!(grid_from_str_array(&["MXW"]).is_err());
/// assert!(grid_from_str_array(&["MW", "M"]).is_err());
/// ```
pub fn grid_from_str_array(s: &[&str]) -> Result<Grid, String> {
    let width = s.first().map_or(0, |row| row.chars().count());
    if s.is_empty() || width == 0 {
        return Err("Grid must have at least one non-empty row".to_string());
    }

    let mut rows = Vec::with_capacity(s.len());
    for (y, row_str) in s.iter().enumerate() {
        if row_str.chars().count() != width {
            return Err(format!(
                "Row {} has {} characters, expected {}",
                y,
                row_str.chars().count(),
                width
            ));
        }

        let mut row = Vec::with_capacity(width);
        for (x, c) in row_str.chars().enumerate() {
            let cell = match c {
                '.' => None,
                _ => match TileType::from_char(c) {
                    Some(t) => Some(t),
                    None => {
                        return Err(format!(
                            "Unrecognized character '{}' in row {} col {}",
                            c, y, x
                        ))
                    }
                },
            };
            row.push(cell);
        }
        rows.push(row);
    }

    Grid::from_types(&rows).map_err(|e| e.to_string())
}

/// Renders each grid row back into the character format accepted by
/// [`grid_from_str_array`].
pub fn grid_to_strings(grid: &Grid) -> Vec<String> {
    (0..grid.height())
        .map(|y| {
            (0..grid.width())
                .map(|x| grid.tile_type(Position::new(x, y)).map_or('.', |t| t.to_char()))
                .collect()
        })
        .collect()
}

/// Installs the global `tracing` subscriber for the binaries.
///
/// `RUST_LOG` wins when set; otherwise `filter` is used (`EnvFilter`
/// syntax, e.g. `warn` or `manna_match=debug`). Output goes to stderr so it
/// does not interleave with the board printout. Calling it again after a
/// subscriber is installed does nothing.
pub fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
