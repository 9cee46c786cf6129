/// Double-buffered, diff-based terminal renderer.
///
/// Each frame the board is composed into the `front` buffer, compared
/// cell by cell against `back` (the previous frame on screen), and only
/// the cells that differ are written, batched with `queue!` and flushed
/// once. The buffers then swap. With a full page of tiles flapping
/// several times a second, redrawing the whole screen every frame would
/// flicker badly; the diff keeps a frame down to the handful of tiles
/// that actually moved.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::board::state::BoardState;
use crate::domain::flight;
use crate::domain::roller::Roller;

// ── Palette ──

/// Background of the room behind the sign, used for every empty cell.
///
/// VTE-based terminals paint inter-row gap pixels with the color of the
/// last Clear, so Clear and every cell background must use the same
/// explicit RGB or faint horizontal lines show between rows.
const BASE_BG: Color = Color::Rgb { r: 12, g: 12, b: 14 };

/// Face of a resting flap tile.
const TILE_BG: Color = Color::Rgb { r: 30, g: 30, b: 34 };
/// Face of a tile that is mid-flap or settling; slightly lit.
const TILE_LIVE_BG: Color = Color::Rgb { r: 56, g: 56, b: 64 };
/// Painted-letter ivory of the flap faces.
const TILE_FG: Color = Color::Rgb { r: 232, g: 227, b: 210 };

const TITLE_BG: Color = Color::Rgb { r: 22, g: 26, b: 44 };
const HEADER_FG: Color = Color::Rgb { r: 140, g: 140, b: 152 };
const HELP_FG: Color = Color::DarkGrey;
const MESSAGE_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

const STATUS_GOOD: Color = Color::Rgb { r: 110, g: 205, b: 130 };
const STATUS_WARN: Color = Color::Rgb { r: 235, g: 195, b: 90 };
const STATUS_BAD: Color = Color::Rgb { r: 230, g: 95, b: 95 };
const STATUS_BOARD: Color = Color::Rgb { r: 100, g: 200, b: 220 };

// ── Vertical layout ──

const TITLE_ROW: usize = 0;
const HEADER_ROW: usize = 2;
const BOARD_ROW: usize = 4;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BASE_BG };

    /// Sentinel used to invalidate the back buffer: different from any
    /// real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '\u{0}', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string starting at (x, y), one column per char.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell { ch, fg, bg });
            cx += 1;
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, board: &BoardState) -> io::Result<()> {
        // Pick up a terminal resize before composing
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Invalidate so the next diff repaints every cell.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose(board);
        self.flush_diff()?;

        // This frame is the comparison base for the next one
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame. Not ResetColor: that
        // restores the terminal's native default, which may differ from
        // BASE_BG and bring back the line artifacts.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                // Position cursor only when the run of changes breaks
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, board: &BoardState) {
        // one blank column between adjacent columns of tiles
        let board_w = flight::ROW_CHARS + flight::column_spans().len() - 1;
        let x0 = self.front.width.saturating_sub(board_w) / 2;

        self.compose_title(board, x0, board_w);
        self.compose_headers(board, x0);
        self.compose_rows(board, x0);
        self.compose_pager(board, x0, board_w);
        self.compose_message(board);
        self.compose_help(board, x0);
    }

    fn compose_title(&mut self, board: &BoardState, x0: usize, board_w: usize) {
        let buf_w = self.front.width;
        for x in 0..buf_w {
            self.front.set(x, TITLE_ROW, Cell { ch: ' ', fg: Color::White, bg: TITLE_BG });
        }

        let left = format!("◈ {} · {}", board.mode().title(), board.airport());
        self.front.put_str(x0, TITLE_ROW, &left, Color::White, TITLE_BG);

        let mut right = format!("{} FLIGHTS · {}", board.flights().len(), board.feed.label());
        if !board.auto_rotate {
            right.push_str(" · HOLD");
        }
        if board.muted {
            right.push_str(" · MUTED");
        }
        let rx = (x0 + board_w).saturating_sub(right.chars().count());
        self.front.put_str(rx, TITLE_ROW, &right, Color::White, TITLE_BG);
    }

    fn compose_headers(&mut self, board: &BoardState, x0: usize) {
        let titles = flight::column_titles(board.mode());
        for (ci, (start, _)) in flight::column_spans().iter().enumerate() {
            self.front.put_str(x0 + start + ci, HEADER_ROW, titles[ci], HEADER_FG, BASE_BG);
        }
    }

    fn compose_rows(&mut self, board: &BoardState, x0: usize) {
        let spans = flight::column_spans();
        for (ri, row) in board.rows().iter().enumerate() {
            let y = BOARD_ROW + ri;
            if y >= self.front.height {
                break;
            }

            let status_fg = status_color(&span_text(row, spans[4]));
            for (ci, &(start, width)) in spans.iter().enumerate() {
                let fg = if ci == 4 { status_fg } else { TILE_FG };
                for k in 0..width {
                    let cell = &row[start + k];
                    let bg = if cell.is_animating() { TILE_LIVE_BG } else { TILE_BG };
                    self.front.set(x0 + start + ci + k, y, Cell { ch: cell.current(), fg, bg });
                }
            }
        }
    }

    fn compose_pager(&mut self, board: &BoardState, x0: usize, board_w: usize) {
        let count = board.page_count();
        let y = BOARD_ROW + board.rows().len() + 1;
        if count <= 1 || y >= self.front.height {
            return;
        }

        for i in 0..count {
            let dot = if i == board.page() { '●' } else { '○' };
            self.front.set(x0 + i * 2, y, Cell { ch: dot, fg: HEADER_FG, bg: BASE_BG });
        }

        let label = format!("PAGE {}/{}", board.page() + 1, count);
        let lx = (x0 + board_w).saturating_sub(label.len());
        self.front.put_str(lx, y, &label, HEADER_FG, BASE_BG);
    }

    fn compose_message(&mut self, board: &BoardState) {
        let y = BOARD_ROW + board.rows().len() + 2;
        if y >= self.front.height {
            return;
        }
        if let Some(message) = board.message() {
            let buf_w = self.front.width;
            for x in 0..buf_w {
                self.front.set(x, y, Cell { ch: ' ', fg: Color::Black, bg: MESSAGE_BG });
            }
            let text = format!(" ◈ {} ", message);
            self.front.put_str(0, y, &text, Color::Black, MESSAGE_BG);
        }
    }

    fn compose_help(&mut self, board: &BoardState, x0: usize) {
        let y = BOARD_ROW + board.rows().len() + 3;
        if y >= self.front.height {
            return;
        }
        let help = "A:ARRIVALS  D:DEPARTURES  ◀/▶:PAGE  1-9:JUMP  R:ROTATE  M:MUTE  Q:QUIT";
        self.front.put_str(x0, y, help, HELP_FG, BASE_BG);
    }
}

/// Text a column is rolling toward, used to pick the status tint.
fn span_text(row: &[Roller], (start, width): (usize, usize)) -> String {
    row[start..start + width].iter().map(|c| c.target()).collect()
}

fn status_color(status: &str) -> Color {
    match status.trim_end() {
        "ON TIME" | "ARRIVED" | "LANDED" => STATUS_GOOD,
        "DELAYED" => STATUS_WARN,
        "CANCELED" | "CANCELLED" => STATUS_BAD,
        "BOARDING" => STATUS_BOARD,
        _ => TILE_FG,
    }
}
