//! GameView: draws a [`GameSnapshot`] into a framebuffer.
//!
//! Pure (no I/O), so layouts can be checked in unit tests.

use crate::core::{GameSnapshot, PieceSnapshot};
use crate::fb::{piece_color, FrameBuffer, Glyph, Rgb, Style};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, MAX_SHAPE_SIZE};

/// Columns reserved right of the board for the side panel.
pub const PANEL_WIDTH: u16 = 18;

const BLOCK: char = '█';
const GHOST: char = '░';

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const TEXT: Rgb = Rgb::new(220, 220, 220);
const BLACK: Rgb = Rgb::new(0, 0, 0);

const CONTROLS: [&str; 7] = [
    "<- -> move",
    "Up    rotate",
    "Down  soft drop",
    "Space hard drop",
    "P     pause",
    "R     restart",
    "Q     quit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Screen positions of the board frame and side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub frame_x: u16,
    pub frame_y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
    pub panel_x: u16,
    cell_w: u16,
}

impl Layout {
    /// Top-left terminal position of board cell `(x, y)`.
    pub fn cell_origin(&self, x: u16, y: u16) -> (u16, u16) {
        (
            self.frame_x + 1 + x * self.cell_w,
            self.frame_y + 1 + y,
        )
    }
}

pub struct GameView {
    /// Terminal columns per board cell.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell keeps blocks roughly square.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Board and panel centered in the viewport.
    pub fn layout(&self, viewport: Viewport) -> Layout {
        let frame_w = u16::from(BOARD_WIDTH) * self.cell_w + 2;
        let frame_h = u16::from(BOARD_HEIGHT) + 2;
        let total_w = frame_w + 2 + PANEL_WIDTH;

        let frame_x = viewport.width.saturating_sub(total_w) / 2;
        let frame_y = viewport.height.saturating_sub(frame_h) / 2;

        Layout {
            frame_x,
            frame_y,
            frame_w,
            frame_h,
            panel_x: frame_x + frame_w + 2,
            cell_w: self.cell_w,
        }
    }

    /// Draw a full frame, reusing `fb` (resized to the viewport if needed).
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        if fb.width() != viewport.width || fb.height() != viewport.height {
            fb.resize(viewport.width, viewport.height);
        }
        fb.fill(Glyph::default());

        let layout = self.layout(viewport);
        self.draw_frame(fb, &layout);
        self.draw_board(fb, &layout, snap);

        if let Some(current) = snap.current {
            if let Some(ghost_y) = snap.ghost_y.filter(|&y| y != current.y && snap.playable()) {
                let ghost = Style::plain(piece_color(current.kind), BOARD_BG).dim();
                for (x, y) in current.cells_at(ghost_y) {
                    self.draw_cell(fb, &layout, x, y, GHOST, ghost);
                }
            }

            let style = Style::plain(piece_color(current.kind), BOARD_BG).bold();
            for (x, y) in current.cells() {
                self.draw_cell(fb, &layout, x, y, BLOCK, style);
            }
        }

        self.draw_panel(fb, &layout, snap);

        if snap.game_over {
            self.draw_game_over(fb, &layout, snap.score);
        } else if snap.paused {
            self.draw_banner(fb, &layout, &["PAUSED", "P to resume"]);
        }
    }

    /// Allocate a framebuffer and draw into it.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_frame(&self, fb: &mut FrameBuffer, layout: &Layout) {
        let style = Style::plain(Rgb::new(200, 200, 200), BLACK);
        let (x, y, w, h) = (layout.frame_x, layout.frame_y, layout.frame_w, layout.frame_h);

        fb.put(x, y, '┌', style);
        fb.put(x + w - 1, y, '┐', style);
        fb.put(x, y + h - 1, '└', style);
        fb.put(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put(x + dx, y, '─', style);
            fb.put(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put(x, y + dy, '│', style);
            fb.put(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_board(&self, fb: &mut FrameBuffer, layout: &Layout, snap: &GameSnapshot) {
        let empty = Style::plain(Rgb::new(90, 90, 100), BOARD_BG).dim();
        for (y, row) in snap.board.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let (x, y) = (x as i8, y as i8);
                match PieceKind::from_code(code) {
                    Some(kind) => {
                        let style = Style::plain(piece_color(kind), BOARD_BG);
                        self.draw_cell(fb, layout, x, y, BLOCK, style);
                    }
                    None => {
                        self.draw_cell(fb, layout, x, y, ' ', empty);
                        let (px, py) = layout.cell_origin(x as u16, y as u16);
                        fb.put(px, py, '·', empty);
                    }
                }
            }
        }
    }

    /// Fill one board cell; cells off the board (e.g. above row 0) are skipped.
    fn draw_cell(&self, fb: &mut FrameBuffer, layout: &Layout, x: i8, y: i8, ch: char, style: Style) {
        if !(0..BOARD_WIDTH as i8).contains(&x) || !(0..BOARD_HEIGHT as i8).contains(&y) {
            return;
        }
        let (px, py) = layout.cell_origin(x as u16, y as u16);
        fb.fill_rect(px, py, self.cell_w, 1, ch, style);
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, layout: &Layout, snap: &GameSnapshot) {
        let label = Style::plain(Rgb::new(150, 150, 160), BLACK).bold();
        let value = Style::plain(TEXT, BLACK);
        let x = layout.panel_x;
        let mut y = layout.frame_y;

        fb.put_str(x, y, "NEXT", label);
        y += 1;
        if let Some(next) = snap.next {
            self.draw_preview(fb, x, y, &next);
        }
        y += MAX_SHAPE_SIZE as u16 + 1;

        for (name, n) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines_cleared),
        ] {
            fb.put_str(x, y, name, label);
            fb.put_u32(x, y + 1, n, value.bold());
            y += 3;
        }

        let hint = value.dim();
        for line in CONTROLS {
            fb.put_str(x, y, line, hint);
            y += 1;
        }
    }

    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, next: &PieceSnapshot) {
        let style = Style::plain(piece_color(next.kind), BLACK);
        for (dx, dy) in next.shape.cells() {
            let px = x + dx as u16 * self.cell_w;
            fb.fill_rect(px, y + dy as u16, self.cell_w, 1, BLOCK, style);
        }
    }

    fn draw_game_over(&self, fb: &mut FrameBuffer, layout: &Layout, score: u32) {
        self.draw_banner(fb, layout, &["GAME OVER", "", "R to restart"]);

        // Score goes on the blank banner line.
        let style = Style::plain(Rgb::new(255, 255, 255), Rgb::new(150, 30, 30)).bold();
        let digits = decimal_width(score);
        let text_w = 7 + digits;
        let mid = layout.frame_y + layout.frame_h / 2;
        let x = layout.frame_x + layout.frame_w.saturating_sub(text_w) / 2;
        fb.put_str(x, mid, "Score: ", style);
        fb.put_u32(x + 7, mid, score, style);
    }

    /// Centered block of lines over the board.
    fn draw_banner(&self, fb: &mut FrameBuffer, layout: &Layout, lines: &[&str]) {
        let style = Style::plain(Rgb::new(255, 255, 255), Rgb::new(150, 30, 30)).bold();
        let inner_w = layout.frame_w - 2;
        let top = (layout.frame_y + layout.frame_h / 2).saturating_sub(lines.len() as u16 / 2);

        fb.fill_rect(layout.frame_x + 1, top.saturating_sub(1), inner_w, lines.len() as u16 + 2, ' ', style);
        for (i, line) in lines.iter().enumerate() {
            let w = line.chars().count() as u16;
            let x = layout.frame_x + 1 + inner_w.saturating_sub(w) / 2;
            fb.put_str(x, top + i as u16, line, style);
        }
    }
}

fn decimal_width(mut n: u32) -> u16 {
    let mut w = 1;
    while n >= 10 {
        n /= 10;
        w += 1;
    }
    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, GameState, Piece, Position};

    fn find(fb: &FrameBuffer, needle: &str) -> Option<(u16, u16)> {
        (0..fb.height()).find_map(|y| {
            let text: String = fb.row(y)?.iter().map(|g| g.ch).collect();
            text.find(needle)
                .map(|byte| (text[..byte].chars().count() as u16, y))
        })
    }

    fn viewport() -> Viewport {
        Viewport::new(80, 30)
    }

    #[test]
    fn layout_fits_board_and_panel() {
        let layout = GameView::default().layout(viewport());
        assert_eq!(layout.frame_w, 22);
        assert_eq!(layout.frame_h, 22);
        assert!(layout.panel_x + PANEL_WIDTH <= 80);
        assert_eq!(layout.cell_origin(0, 0), (layout.frame_x + 1, layout.frame_y + 1));
        assert_eq!(layout.cell_origin(9, 19), (layout.frame_x + 19, layout.frame_y + 20));
    }

    #[test]
    fn locked_cells_use_piece_color() {
        let mut board = Board::new();
        board.set(0, 19, Some(PieceKind::L));
        let state = GameState::new(1).with_board(board).with_current_piece(None);

        let view = GameView::default();
        let fb = view.render(&state.snapshot(), viewport());
        let (px, py) = view.layout(viewport()).cell_origin(0, 19);

        for dx in 0..2 {
            let glyph = fb.get(px + dx, py).unwrap();
            assert_eq!(glyph.ch, BLOCK);
            assert_eq!(glyph.style.fg, piece_color(PieceKind::L));
        }
        let (ex, ey) = view.layout(viewport()).cell_origin(1, 19);
        assert_eq!(fb.get(ex, ey).unwrap().ch, '·');
    }

    #[test]
    fn current_piece_and_ghost_are_drawn() {
        let state = GameState::new(1)
            .with_current_piece(Some(Piece::spawn(PieceKind::O).at(Position::new(4, 0))));
        let view = GameView::default();
        let layout = view.layout(viewport());
        let fb = view.render(&state.snapshot(), viewport());

        let (px, py) = layout.cell_origin(4, 0);
        assert_eq!(fb.get(px, py).unwrap().ch, BLOCK);
        let (gx, gy) = layout.cell_origin(4, 19);
        assert_eq!(fb.get(gx, gy).unwrap().ch, GHOST);
    }

    #[test]
    fn panel_shows_counters_and_next() {
        let state = GameState::new(1)
            .with_lines_cleared(23)
            .with_next_piece(Some(Piece::spawn(PieceKind::I)));
        let view = GameView::default();
        let layout = view.layout(viewport());
        let fb = view.render(&state.snapshot(), viewport());

        let (sx, sy) = find(&fb, "SCORE").unwrap();
        assert_eq!(sx, layout.panel_x);
        assert_eq!(fb.row_text(sy + 1).trim_start().split_whitespace().last(), Some("0"));

        let (_, ly) = find(&fb, "LEVEL").unwrap();
        assert!(fb.row_text(ly + 1).ends_with('3'));
        let (_, ny) = find(&fb, "LINES").unwrap();
        assert!(fb.row_text(ny + 1).ends_with("23"));

        // I preview: one row of four blocks under NEXT.
        let (_, next_y) = find(&fb, "NEXT").unwrap();
        let preview = fb.row_text(next_y + 2);
        assert!(preview.ends_with(&BLOCK.to_string().repeat(8)));
    }

    #[test]
    fn pause_and_game_over_overlays() {
        let view = GameView::default();

        let paused = GameState::new(1).apply(crate::types::GameAction::Pause);
        let fb = view.render(&paused.snapshot(), viewport());
        assert!(find(&fb, "PAUSED").is_some());
        assert!(find(&fb, "GAME OVER").is_none());

        let mut board = Board::new();
        board.fill_row(2, PieceKind::S);
        let over = GameState::new(1)
            .with_board(board)
            .with_lines_cleared(4)
            .with_current_piece(Some(Piece::spawn(PieceKind::O)))
            .tick();
        assert!(over.game_over());

        let fb = view.render(&over.snapshot(), viewport());
        assert!(find(&fb, "GAME OVER").is_some());
        assert!(find(&fb, "Score: 0").is_some());
        assert!(find(&fb, "PAUSED").is_none());
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let view = GameView::default();
        let fb = view.render(&GameSnapshot::default(), Viewport::new(5, 3));
        assert_eq!(fb.width(), 5);
        assert_eq!(fb.height(), 3);
    }
}
