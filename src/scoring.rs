//! Score and faith-meter arithmetic.
//!
//! A scan reports overlapping matches (an L and a T over the same cross, a
//! composite and the runs it was built from, two composites sharing a run).
//! [`group_matches`] merges them so that every matched tile is consumed and
//! no tile is scored twice.

use crate::grid::Position;
use crate::matcher::{Match, Pattern};
use crate::tile::{SpecialKind, TileType};
use std::cmp::Reverse;
use std::collections::BTreeSet;

pub const BASE_MATCH_SCORE: f64 = 100.0;

/// Upper bound of the faith meter.
pub const FAITH_METER_MAX: f32 = 100.0;

/// Faith gained by a pass that consumes exactly three tiles.
pub const BASE_FAITH_GAIN: f32 = 5.0;

/// Unrounded score of a straight group of `len` tiles.
pub fn run_score(len: usize) -> f64 {
    match len {
        0..=2 => 0.0,
        3 => BASE_MATCH_SCORE,
        4 => BASE_MATCH_SCORE * 1.5,
        5 => BASE_MATCH_SCORE * 2.5,
        n => BASE_MATCH_SCORE * n as f64 * 0.6,
    }
}

pub fn pattern_multiplier(pattern: Pattern) -> f64 {
    match pattern {
        Pattern::None => 1.0,
        Pattern::L => 1.2,
        Pattern::T => 1.3,
    }
}

/// Score of a single match, rounded to the nearest point.
///
/// # Examples
/// ```
/// use manna_match::matcher::find_matches;
/// use manna_match::scoring::match_score;
/// use manna_match::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&["WWWS"]).unwrap();
/// assert_eq!(match_score(&find_matches(&grid)[0]), 100);
/// ```
pub fn match_score(m: &Match) -> u32 {
    (run_score(m.len()) * pattern_multiplier(m.pattern)).round() as u32
}

/// Score of a synthetic clear (power effects) of `len` tiles.
pub fn synthetic_score(len: usize) -> u32 {
    run_score(len).round() as u32
}

/// Priority used when overlapping matches compete for the same tiles:
/// T before L before plain runs, larger before smaller.
fn priority(m: &Match) -> (u8, Reverse<usize>) {
    let rank = match m.pattern {
        Pattern::T => 0,
        Pattern::L => 1,
        Pattern::None => 2,
    };
    (rank, Reverse(m.len()))
}

/// Overlapping matches of one pass merged into a single scored unit.
///
/// `lead` is the highest-priority match of the group; it decides the
/// pattern multiplier, the special tile reward and where that tile goes.
/// `tiles` is the union of every member's tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchGroup<'a> {
    pub lead: &'a Match,
    pub tiles: BTreeSet<Position>,
}

impl MatchGroup<'_> {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn matched_type(&self) -> TileType {
        self.lead.matched_type
    }

    /// Each tile counts once, at the lead's pattern multiplier.
    pub fn score(&self) -> u32 {
        (run_score(self.len()) * pattern_multiplier(self.lead.pattern)).round() as u32
    }

    pub fn special_reward(&self) -> Option<SpecialKind> {
        self.lead.special_reward()
    }

    pub fn centroid(&self) -> Position {
        self.lead.centroid()
    }
}

/// Merges the matches of one pass into disjoint groups.
///
/// Matches are visited in priority order (ties keep scan order). A match
/// that shares a tile with existing groups joins them (bridging groups are
/// merged); otherwise it starts a new group with itself as lead. Every tile
/// of every match ends up in exactly one group.
///
/// # Examples
/// ```
/// use manna_match::matcher::find_matches;
/// use manna_match::scoring::group_matches;
/// use manna_match::utils::grid_from_str_array;
///
/// // Two fire rows joined by a fire column: one group of seven tiles.
/// let grid = grid_from_str_array(&["FFFS", "FSQM", "FFFW"]).unwrap();
/// let matches = find_matches(&grid);
/// let groups = group_matches(&matches);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].len(), 7);
/// ```
pub fn group_matches(matches: &[Match]) -> Vec<MatchGroup<'_>> {
    let mut ordered: Vec<&Match> = matches.iter().collect();
    ordered.sort_by_key(|m| priority(m));

    let mut groups: Vec<MatchGroup<'_>> = Vec::new();
    for m in ordered {
        let touching: Vec<usize> = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| !g.tiles.is_disjoint(&m.tiles))
            .map(|(i, _)| i)
            .collect();

        let Some((&first, rest)) = touching.split_first() else {
            groups.push(MatchGroup {
                lead: m,
                tiles: m.tiles.clone(),
            });
            continue;
        };
        // Later groups have lower-priority leads; fold them into the first.
        for &i in rest.iter().rev() {
            let absorbed = groups.remove(i);
            groups[first].tiles.extend(absorbed.tiles);
        }
        groups[first].tiles.extend(m.tiles.iter().copied());
    }
    groups
}

/// Total score of one pass over `matches`.
pub fn score_matches(matches: &[Match]) -> u32 {
    group_matches(matches).iter().map(MatchGroup::score).sum()
}

/// Faith gained by a resolution pass that consumed `consumed` tiles.
pub fn faith_gain(consumed: usize) -> f32 {
    let gain = BASE_FAITH_GAIN * (1.0 + (consumed as f32 - 3.0) * 0.5);
    gain.max(0.0)
}

/// Adds `gain` to `meter`, clamping to `[0, FAITH_METER_MAX]`.
pub fn charge_meter(meter: f32, gain: f32) -> f32 {
    (meter + gain).clamp(0.0, FAITH_METER_MAX)
}
