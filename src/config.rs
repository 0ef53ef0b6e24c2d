//! Per-level configuration: board size, move budget, tile mix, star
//! thresholds, phase timings and the RNG seed.

use crate::generator::TileDistribution;

/// Seed used when none is supplied, so default sessions are reproducible.
pub const DEFAULT_SEED: u64 = 514514;

/// How long each phase of the resolution cycle is held, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Swap-in animation before the exchange is committed.
    pub swap_ms: u32,
    /// Swap-back animation after a swap that made no match.
    pub revert_ms: u32,
    /// How long matched tiles are displayed before removal starts.
    pub match_hold_ms: u32,
    /// Removal animation.
    pub removal_ms: u32,
    /// Fall and refill animation.
    pub cascade_ms: u32,
    pub shuffle_ms: u32,
    pub power_ms: u32,
    /// Lifetime of a hint highlight.
    pub hint_ms: u32,
}

impl Timings {
    /// Zero-length holds everywhere: a whole cascade settles in one tick.
    pub fn instant() -> Self {
        Timings {
            swap_ms: 0,
            revert_ms: 0,
            match_hold_ms: 0,
            removal_ms: 0,
            cascade_ms: 0,
            shuffle_ms: 0,
            power_ms: 0,
            hint_ms: 0,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            swap_ms: 200,
            revert_ms: 200,
            match_hold_ms: 250,
            removal_ms: 200,
            cascade_ms: 300,
            shuffle_ms: 500,
            power_ms: 400,
            hint_ms: 3000,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    /// Swaps available before the level ends.
    pub moves: u32,
    pub distribution: TileDistribution,
    /// Scores needed for one, two and three stars.
    pub star_thresholds: [u32; 3],
    pub timings: Timings,
    pub seed: u64,
}

impl LevelConfig {
    /// Number of stars earned by `score`.
    ///
    /// # Examples
    /// ```
    /// use manna_match::config::LevelConfig;
    ///
    /// let config = LevelConfig::default();
    /// assert_eq!(config.stars_for(0), 0);
    /// assert_eq!(config.stars_for(1000), 1);
    /// assert_eq!(config.stars_for(99_999), 3);
    /// ```
    pub fn stars_for(&self, score: u32) -> u8 {
        self.star_thresholds.iter().filter(|&&t| score >= t).count() as u8
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_moves(mut self, moves: u32) -> Self {
        self.moves = moves;
        self
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        LevelConfig {
            width: 7,
            height: 7,
            moves: 20,
            distribution: TileDistribution::uniform(),
            star_thresholds: [1000, 2500, 5000],
            timings: Timings::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Level options shared by the command-line tools.
#[derive(clap::Args, Clone, Debug)]
pub struct LevelArgs {
    /// Board width in cells
    #[clap(long, default_value_t = 7)]
    pub width: usize,

    /// Board height in cells
    #[clap(long, default_value_t = 7)]
    pub height: usize,

    /// Swaps available before the level ends
    #[clap(short, long, default_value_t = 20)]
    pub moves: u32,

    /// Seed for board generation and refills
    #[clap(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Resolve whole cascades in a single tick
    #[clap(long)]
    pub instant: bool,
}

impl LevelArgs {
    pub fn to_config(&self) -> LevelConfig {
        let timings = if self.instant {
            Timings::instant()
        } else {
            Timings::default()
        };
        LevelConfig {
            width: self.width,
            height: self.height,
            ..LevelConfig::default()
        }
        .with_moves(self.moves)
        .with_seed(self.seed)
        .with_timings(timings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[clap(flatten)]
        level: LevelArgs,
    }

    #[test]
    fn test_default_level() {
        let config = LevelConfig::default();
        assert_eq!((config.width, config.height), (7, 7));
        assert_eq!(config.moves, 20);
        assert_eq!(config.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_stars_for_thresholds() {
        let config = LevelConfig {
            star_thresholds: [100, 200, 300],
            ..LevelConfig::default()
        };
        assert_eq!(config.stars_for(99), 0);
        assert_eq!(config.stars_for(100), 1);
        assert_eq!(config.stars_for(250), 2);
        assert_eq!(config.stars_for(300), 3);
    }

    #[test]
    fn test_builders() {
        let config = LevelConfig::default()
            .with_seed(9)
            .with_moves(3)
            .with_timings(Timings::instant());
        assert_eq!(config.seed, 9);
        assert_eq!(config.moves, 3);
        assert_eq!(config.timings.swap_ms, 0);
    }

    #[test]
    fn test_level_args_to_config() {
        let cli = Cli::parse_from(["prog", "--width", "9", "-s", "42", "--instant"]);
        let config = cli.level.to_config();
        assert_eq!(config.width, 9);
        assert_eq!(config.height, 7);
        assert_eq!(config.seed, 42);
        assert_eq!(config.moves, 20);
        assert_eq!(config.timings, Timings::instant());

        let cli = Cli::parse_from(["prog"]);
        assert_eq!(cli.level.to_config(), LevelConfig::default());
    }
}
