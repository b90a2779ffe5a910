//! Driver configuration from environment variables.
//!
//! - `BLOCKFALL_SEED`: piece sequence seed (u32). Defaults to a clock-derived value.
//! - `BLOCKFALL_SCORE_LOG`: append a JSON line per finished game to this path.
//! - `BLOCKFALL_FRAME_MS`: render and input poll period, default 16.
//!
//! Unparsable values fall back to the defaults.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default render/input period (~60 FPS)
pub const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub seed: u32,
    pub score_log: Option<PathBuf>,
    pub frame_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            seed: clock_seed(),
            score_log: None,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

impl DriverConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("BLOCKFALL_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let score_log = lookup("BLOCKFALL_SCORE_LOG")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let frame_ms = lookup("BLOCKFALL_FRAME_MS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_FRAME_MS);

        Self {
            seed,
            score_log,
            frame_ms,
        }
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}
