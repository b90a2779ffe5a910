//! Terminal runner (default binary).
//!
//! Gravity ticks come from the driver's timer task on a tokio runtime; the
//! main thread polls keys, feeds the driver and redraws once per frame.

use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tokio::runtime::Runtime;

use blockfall::driver::{Driver, DriverConfig, GameOverNotice};
use blockfall::input::{handle_key_event, should_quit};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

fn main() -> Result<()> {
    let config = DriverConfig::from_env();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .enable_io()
        .build()
        .context("build tokio runtime")?;

    let mut driver = Driver::new(&config, runtime.handle().clone());

    let (result, restored) = match TerminalRenderer::enter() {
        Ok(mut term) => {
            let result = run(&mut term, &mut driver, &config);
            let restored = term.leave();
            (result, restored)
        }
        Err(e) => (Err(e), Ok(())),
    };

    finish(&runtime, driver, result, restored)
}

/// Flush the driver, then report the loop error ahead of any restore error.
fn finish(runtime: &Runtime, driver: Driver, result: Result<()>, restored: Result<()>) -> Result<()> {
    let last = driver.last_notice();
    runtime.block_on(driver.shutdown());

    if let Some(notice) = last {
        println!("{}", summary(&notice));
    }
    result.and(restored)
}

fn run(term: &mut TerminalRenderer, driver: &mut Driver, config: &DriverConfig) -> Result<()> {
    let view = GameView::default();
    let frame = Duration::from_millis(config.frame_ms);
    let (w, h) = TerminalRenderer::size().unwrap_or((80, 24));
    let mut fb = FrameBuffer::new(w, h);

    loop {
        driver.pump_ticks();

        let (w, h) = TerminalRenderer::size().unwrap_or((80, 24));
        view.render_into(&driver.state().snapshot(), Viewport::new(w, h), &mut fb);
        term.present(&fb)?;

        if !event::poll(frame)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    driver.dispatch(action);
                }
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}

fn summary(notice: &GameOverNotice) -> String {
    format!(
        "{} (level {}, {} lines)",
        notice.message(),
        notice.level,
        notice.lines_cleared
    )
}
