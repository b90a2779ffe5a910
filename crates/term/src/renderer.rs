//! TerminalRenderer: owns the terminal session and presents framebuffers.
//!
//! Only cells that changed since the previous frame are written. The
//! terminal is put back into cooked mode when the renderer is dropped, even
//! if the game loop bailed out with an error.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{FrameBuffer, Glyph, Rgb, Style};

pub struct TerminalRenderer {
    out: io::Stdout,
    active: bool,
    /// What the terminal currently shows; `None` forces a full redraw.
    shown: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    /// Enter raw mode and the alternate screen.
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;

        let mut renderer = Self {
            out: io::stdout(),
            active: true,
            shown: None,
            buf: Vec::with_capacity(32 * 1024),
        };
        renderer.buf.queue(terminal::EnterAlternateScreen)?;
        renderer.buf.queue(cursor::Hide)?;
        renderer.buf.queue(terminal::DisableLineWrap)?;
        renderer.flush()?;
        Ok(renderer)
    }

    /// Current terminal size as (columns, rows).
    pub fn size() -> Result<(u16, u16)> {
        terminal::size().context("query terminal size")
    }

    /// Force the next `present` to redraw everything (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    pub fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        match &self.shown {
            Some(shown) if same_size(shown, frame) => encode_diff(shown, frame, &mut self.buf)?,
            _ => encode_full(frame, &mut self.buf)?,
        }
        self.flush()?;

        match &mut self.shown {
            Some(shown) => shown.clone_from(frame),
            None => self.shown = Some(frame.clone()),
        }
        Ok(())
    }

    /// Leave the alternate screen and restore the cursor and line mode.
    pub fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush()?;
        terminal::disable_raw_mode().context("disable raw mode")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            eprintln!("[Term] failed to restore terminal: {:#}", e);
        }
    }
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// Commands that repaint the whole screen with `frame`.
pub fn encode_full(frame: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut pen = None;
    for y in 0..frame.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..frame.width() {
            put_glyph(out, &mut pen, frame.get(x, y).unwrap_or_default())?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Commands that turn `shown` into `next`; both must have the same size.
pub fn encode_diff(shown: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = None;
    let mut wrote = false;

    for (x, y, len) in changed_runs(shown, next) {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            put_glyph(out, &mut pen, next.get(x + dx, y).unwrap_or_default())?;
        }
        wrote = true;
    }

    if wrote {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

/// Print one glyph, switching style only when it differs from `pen`.
fn put_glyph(out: &mut Vec<u8>, pen: &mut Option<Style>, glyph: Glyph) -> Result<()> {
    if *pen != Some(glyph.style) {
        let style = glyph.style;
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(SetForegroundColor(color(style.fg)))?;
        out.queue(SetBackgroundColor(color(style.bg)))?;
        if style.bold {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        *pen = Some(style);
    }
    out.queue(Print(glyph.ch))?;
    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Horizontal runs `(x, y, len)` of cells that differ between two frames.
fn changed_runs<'a>(
    shown: &'a FrameBuffer,
    next: &'a FrameBuffer,
) -> impl Iterator<Item = (u16, u16, u16)> + 'a {
    (0..next.height()).flat_map(move |y| {
        let old = shown.row(y).unwrap_or(&[]);
        let new = next.row(y).unwrap_or(&[]);
        let mut runs = Vec::new();
        let mut x = 0;
        while x < new.len() {
            if old.get(x) == Some(&new[x]) {
                x += 1;
                continue;
            }
            let start = x;
            while x < new.len() && old.get(x) != Some(&new[x]) {
                x += 1;
            }
            runs.push((start as u16, y, (x - start) as u16));
        }
        runs
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_changes_form_one_run() {
        let shown = FrameBuffer::new(6, 2);
        let mut next = shown.clone();
        for x in 1..=3 {
            next.put(x, 0, 'X', Style::default());
        }
        next.put(5, 1, 'Y', Style::default());

        let runs: Vec<_> = changed_runs(&shown, &next).collect();
        assert_eq!(runs, vec![(1, 0, 3), (5, 1, 1)]);
    }

    #[test]
    fn identical_frames_encode_nothing() {
        let frame = FrameBuffer::new(4, 4);
        let mut out = Vec::new();
        encode_diff(&frame, &frame, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn full_redraw_contains_every_glyph() {
        let mut frame = FrameBuffer::new(3, 1);
        frame.put_str(0, 0, "abc", Style::default());
        let mut out = Vec::new();
        encode_full(&frame, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("abc"));
    }

    #[test]
    fn diff_prints_only_changed_text() {
        let shown = FrameBuffer::new(10, 1);
        let mut next = shown.clone();
        next.put_str(4, 0, "hi", Style::default());

        let mut out = Vec::new();
        encode_diff(&shown, &next, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("hi"));
        // Cursor moves to column 5, row 1 (1-based).
        assert!(text.contains("\u{1b}[1;5H"));
    }
}
