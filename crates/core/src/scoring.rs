//! Scoring module - line clear points, level curve and gravity speed
//!
//! Only line clears score. Points scale with the level the piece locked at,
//! and the level rises by one every 10 cumulative lines, starting at 1.

use crate::types::{BASE_TICK_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_TICK_MS, TICK_STEP_MS};

/// Points for clearing `lines` rows at `level`
/// lines: rows removed by a single lock (1-4)
/// level: level before the lock (1-based)
pub fn line_score(lines: usize, level: u32) -> u32 {
    LINE_SCORES
        .get(lines)
        .copied()
        .unwrap_or(0)
        .saturating_mul(level)
}

/// Level for a cumulative line count
pub fn level_for(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level (in milliseconds)
/// 1000ms at level 1, 100ms faster per level, never below 100ms
pub fn tick_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(TICK_STEP_MS);
    BASE_TICK_MS.saturating_sub(speedup).max(MIN_TICK_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(line_score(1, 1), 100);
        assert_eq!(line_score(2, 1), 300);
        assert_eq!(line_score(3, 1), 500);
        assert_eq!(line_score(4, 1), 800);

        assert_eq!(line_score(1, 3), 300);
        assert_eq!(line_score(4, 1), 800);
        assert_eq!(line_score(0, 5), 0);
    }

    #[test]
    fn test_out_of_table_clears_score_nothing() {
        assert_eq!(line_score(5, 1), 0);
        assert_eq!(line_score(20, 9), 0);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(9), 1);
        assert_eq!(level_for(10), 2);
        assert_eq!(level_for(25), 3);
        assert_eq!(level_for(100), 11);
    }

    #[test]
    fn test_tick_intervals() {
        assert_eq!(tick_interval_ms(1), 1000);
        assert_eq!(tick_interval_ms(2), 900);
        assert_eq!(tick_interval_ms(5), 600);
        assert_eq!(tick_interval_ms(10), 100);
        assert_eq!(tick_interval_ms(11), 100);
        assert_eq!(tick_interval_ms(500), 100);
    }

    #[test]
    fn test_tick_interval_level_zero_is_base() {
        assert_eq!(tick_interval_ms(0), 1000);
    }
}
