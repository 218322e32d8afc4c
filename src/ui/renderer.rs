/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only reads session state; it never mutates it.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::Turn;
use crate::domain::grid::Cell as GridCell;
use crate::domain::rules::Outcome;
use crate::domain::tile::Terrain;
use crate::sim::world::WorldState;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
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

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }
}

// ── What to draw ──

/// Everything the renderer shows besides the session itself.
pub struct Hud<'a> {
    pub level_name: &'a str,
    pub outcome: Outcome,
    pub moves: u64,
    pub message: &'a str,
}

// ── Renderer ──

/// Each game cell = 2 terminal columns, so the grid looks square.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const MAP_COL: usize = 2;

const HELP: &str = "Use WASD to move, Q to quit";

const WALL_FG: Color = Color::Rgb { r: 120, g: 120, b: 120 };
const WALL_BG: Color = Color::Rgb { r: 70, g: 70, b: 70 };
const PLAYER_FG: Color = Color::Rgb { r: 80, g: 140, b: 255 };
const PURSUER_FG: Color = Color::Rgb { r: 255, g: 60, b: 60 };
const COLLISION_FG: Color = Color::Rgb { r: 255, g: 150, b: 200 };
const GOAL_FG: Color = Color::Rgb { r: 255, g: 220, b: 50 };

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
            writer: BufWriter::with_capacity(8192, io::stdout()),
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
            SetBackgroundColor(Cell::BASE_BG),
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
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Force a full repaint on the next frame (new session).
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, world: &WorldState, hud: &Hud) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        compose(&mut self.front, world, hud);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
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
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

fn compose(buf: &mut FrameBuffer, world: &WorldState, hud: &Hud) {
    let (rows, cols) = world.map().dimensions();

    let turn = match (hud.outcome, world.turn()) {
        (Outcome::InProgress, Turn::Player) => "your move",
        (Outcome::InProgress, Turn::Pursuer) => "bot moving",
        _ => "game over",
    };
    let header = format!(" ◆ Diamond Chase · {}   Moves: {:<4}  {} ", hud.level_name, hud.moves, turn);
    buf.put_str(0, HUD_ROW, &header, Color::White, Color::Rgb { r: 40, g: 40, b: 70 });

    for r in 0..rows {
        for c in 0..cols {
            let cell = GridCell::new(r as i32, c as i32);
            let (glyph, fg, bg) = glyph_for(world, cell);
            let x = MAP_COL + c * CELL_W;
            let y = MAP_ROW + r;
            buf.set(x, y, Cell::new(glyph, fg, bg));
            let filler = if glyph == '█' { '█' } else { ' ' };
            buf.set(x + 1, y, Cell::new(filler, fg, bg));
        }
    }

    let below = MAP_ROW + rows + 1;
    if !hud.message.is_empty() {
        buf.put_str(MAP_COL, below, hud.message, Color::Rgb { r: 180, g: 180, b: 200 }, Color::Reset);
    }
    buf.put_str(MAP_COL, below + 1, HELP, Color::DarkGrey, Color::Reset);

    if hud.outcome.is_terminal() {
        compose_banner(buf, hud.outcome, MAP_ROW + rows / 2, MAP_COL + cols * CELL_W / 2);
    }
}

/// Draw order: actors over goal over terrain. Player and pursuer sharing a
/// cell get their own colour.
fn glyph_for(world: &WorldState, cell: GridCell) -> (char, Color, Color) {
    let on_player = world.player() == cell;
    let on_pursuer = world.pursuer() == cell;

    if on_player && on_pursuer {
        return ('●', COLLISION_FG, Color::Reset);
    }
    if on_player {
        return ('●', PLAYER_FG, Color::Reset);
    }
    if on_pursuer {
        return ('●', PURSUER_FG, Color::Reset);
    }
    if world.goal() == cell {
        return ('◆', GOAL_FG, Color::Reset);
    }
    match world.map().terrain(cell) {
        Some(Terrain::Wall) | None => ('█', WALL_FG, WALL_BG),
        Some(Terrain::Open) => (' ', Color::Reset, Color::Reset),
    }
}

fn compose_banner(buf: &mut FrameBuffer, outcome: Outcome, center_y: usize, center_x: usize) {
    let (title, fg) = match outcome {
        Outcome::PlayerWins => ("You won!!", Color::Rgb { r: 80, g: 255, b: 80 }),
        Outcome::PursuerWins => ("Bot won!!", PURSUER_FG),
        Outcome::InProgress => return,
    };
    let lines = [
        "╔═══════════════════════╗".to_string(),
        format!("║{:^23}║", title),
        format!("║{:^23}║", "R: again   Q: quit"),
        "╚═══════════════════════╝".to_string(),
    ];
    let width = lines[0].chars().count();
    let x = center_x.saturating_sub(width / 2);
    let y = center_y.saturating_sub(lines.len() / 2);
    for (i, line) in lines.iter().enumerate() {
        buf.put_str(x, y + i, line, fg, Color::Rgb { r: 10, g: 10, b: 20 });
    }
}
