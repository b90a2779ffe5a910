//! Game driver: the single writer of the live [`GameState`].
//!
//! The driver feeds player actions and gravity ticks into the pure engine
//! and keeps the gravity timer in step with the resulting state:
//!
//! - stopped while paused or after game over
//! - restarted on resume, restart, and level change
//!
//! It also reports the transition into game over exactly once per game.

pub mod config;
pub mod notifier;
pub mod timer;

use std::time::Duration;

use tokio::runtime::Handle;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use config::DriverConfig;
pub use notifier::{GameOverNotice, ScoreLog};
pub use timer::TickTimer;

use crate::core::{tick_interval_ms, GameState};
use crate::types::GameAction;

/// Gravity period for a level.
pub fn interval_for(level: u32) -> Duration {
    Duration::from_millis(u64::from(tick_interval_ms(level)))
}

pub struct Driver {
    state: GameState,
    timer: TickTimer,
    score_log: Option<ScoreLog>,
    last_notice: Option<GameOverNotice>,
}

impl Driver {
    /// Start a new game seeded from `config`. Tasks run on `handle`.
    pub fn new(config: &DriverConfig, handle: Handle) -> Self {
        Self::with_state(GameState::new(config.seed), config, handle)
    }

    /// Drive an existing state.
    pub fn with_state(state: GameState, config: &DriverConfig, handle: Handle) -> Self {
        let score_log = config
            .score_log
            .clone()
            .map(|path| ScoreLog::spawn(&handle, path));

        let mut driver = Self {
            state,
            timer: TickTimer::new(handle),
            score_log,
            last_notice: None,
        };
        if driver.state.playable() {
            driver.timer.start(interval_for(driver.state.level()));
        }
        driver
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Gravity period currently scheduled, `None` while the timer is stopped.
    pub fn tick_interval(&self) -> Option<Duration> {
        self.timer.period()
    }

    /// Result of the most recent finished game, cleared on restart.
    pub fn last_notice(&self) -> Option<GameOverNotice> {
        self.last_notice
    }

    /// Apply one player action. Returns a notice if this action ended the game.
    pub fn dispatch(&mut self, action: GameAction) -> Option<GameOverNotice> {
        let next = self.state.apply(action);
        self.advance(next, action == GameAction::Restart)
    }

    /// Apply every gravity tick that has fired since the last call.
    pub fn pump_ticks(&mut self) -> Option<GameOverNotice> {
        let mut notice = None;
        while self.timer.try_next() {
            let next = self.state.tick();
            if let Some(n) = self.advance(next, false) {
                notice = Some(n);
            }
        }
        notice
    }

    /// Stop the timer and flush the score log.
    pub async fn shutdown(mut self) {
        self.timer.stop();
        if let Some(log) = self.score_log.take() {
            log.close().await;
        }
    }

    fn advance(&mut self, next: GameState, restarted: bool) -> Option<GameOverNotice> {
        let prev = std::mem::replace(&mut self.state, next);
        self.sync_timer(&prev, restarted);

        if restarted {
            self.last_notice = None;
        }

        if prev.game_over() || !self.state.game_over() {
            return None;
        }

        let notice = GameOverNotice::from_state(&self.state);
        if let Some(log) = &self.score_log {
            log.record(notice);
        }
        self.last_notice = Some(notice);
        Some(notice)
    }

    fn sync_timer(&mut self, prev: &GameState, restarted: bool) {
        if !self.state.playable() {
            self.timer.stop();
            return;
        }

        let resumed = !prev.playable();
        let level_changed = prev.level() != self.state.level();
        if restarted || resumed || level_changed || !self.timer.is_running() {
            self.timer.start(interval_for(self.state.level()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, Piece, Position};
    use crate::types::PieceKind;
    use tokio::time::sleep;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn config() -> DriverConfig {
        DriverConfig {
            seed: 12345,
            score_log: None,
            frame_ms: 16,
        }
    }

    fn piece(kind: PieceKind, x: i8, y: i8) -> Option<Piece> {
        Some(Piece::spawn(kind).at(Position::new(x, y)))
    }

    /// O at the spawn row over a full row 2: the next Down locks out.
    fn about_to_top_out() -> GameState {
        let mut board = Board::new();
        board.fill_row(2, PieceKind::Z);
        GameState::new(7)
            .with_board(board)
            .with_current_piece(piece(PieceKind::O, 3, 0))
    }

    /// O resting in the bottom-left gap of a row that completes the 10th line.
    fn about_to_level_up() -> GameState {
        let mut board = Board::new();
        board.fill_row(19, PieceKind::J);
        board.set(0, 19, None);
        board.set(1, 19, None);
        GameState::new(7)
            .with_board(board)
            .with_lines_cleared(9)
            .with_current_piece(piece(PieceKind::O, 0, 18))
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_driver_runs_level_one_gravity() {
        let driver = Driver::new(&config(), Handle::current());
        assert_eq!(driver.tick_interval(), Some(ms(1000)));
        assert!(driver.last_notice().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_move_piece_down() {
        let mut driver = Driver::new(&config(), Handle::current());
        let start_y = driver.state().current_piece().unwrap().position.y;

        sleep(ms(999)).await;
        assert!(driver.pump_ticks().is_none());
        assert_eq!(driver.state().current_piece().unwrap().position.y, start_y);

        sleep(ms(2500)).await;
        driver.pump_ticks();
        assert_eq!(driver.state().current_piece().unwrap().position.y, start_y + 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_gravity_and_resume_restarts_it() {
        let mut driver = Driver::new(&config(), Handle::current());
        let start_y = driver.state().current_piece().unwrap().position.y;

        driver.dispatch(GameAction::Pause);
        assert!(driver.state().paused());
        assert_eq!(driver.tick_interval(), None);

        sleep(ms(5000)).await;
        driver.pump_ticks();
        assert_eq!(driver.state().current_piece().unwrap().position.y, start_y);

        driver.dispatch(GameAction::Pause);
        assert_eq!(driver.tick_interval(), Some(ms(1000)));
        sleep(ms(1001)).await;
        driver.pump_ticks();
        assert_eq!(driver.state().current_piece().unwrap().position.y, start_y + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_moves_do_not_reset_gravity() {
        let mut driver = Driver::new(&config(), Handle::current());
        let start_y = driver.state().current_piece().unwrap().position.y;

        sleep(ms(600)).await;
        driver.dispatch(GameAction::Left);
        sleep(ms(401)).await;
        driver.pump_ticks();
        assert_eq!(driver.state().current_piece().unwrap().position.y, start_y + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_level_up_speeds_up_gravity() {
        let mut driver = Driver::with_state(about_to_level_up(), &config(), Handle::current());
        assert_eq!(driver.tick_interval(), Some(ms(1000)));

        driver.dispatch(GameAction::Down);
        assert_eq!(driver.state().lines_cleared(), 10);
        assert_eq!(driver.state().level(), 2);
        assert_eq!(driver.state().score(), 100);
        assert_eq!(driver.tick_interval(), Some(ms(900)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_is_reported_once() {
        let mut driver = Driver::with_state(about_to_top_out(), &config(), Handle::current());

        let notice = driver.dispatch(GameAction::Down).expect("game over notice");
        assert_eq!(
            notice,
            GameOverNotice {
                score: 0,
                level: 1,
                lines_cleared: 0
            }
        );
        assert!(driver.state().game_over());
        assert_eq!(driver.tick_interval(), None);
        assert_eq!(driver.last_notice(), Some(notice));

        assert!(driver.dispatch(GameAction::Down).is_none());
        assert!(driver.dispatch(GameAction::Pause).is_none());
        sleep(ms(5000)).await;
        assert!(driver.pump_ticks().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_game_over() {
        let mut driver = Driver::with_state(about_to_top_out(), &config(), Handle::current());
        driver.dispatch(GameAction::Down);
        assert!(driver.state().game_over());

        assert!(driver.dispatch(GameAction::Restart).is_none());
        assert!(!driver.state().game_over());
        assert_eq!(driver.state().board().filled_count(), 0);
        assert_eq!(driver.tick_interval(), Some(ms(1000)));
        assert!(driver.last_notice().is_none());
    }
}
