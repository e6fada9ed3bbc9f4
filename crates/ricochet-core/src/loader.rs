//! Text board format.
//!
//! ```text
//! 3 4
//! .|. . .
//! -+.+.+.
//! . . .|X
//! .+.+-+.
//! A . . B
//! A Red #ff0000
//! B Blue
//! ```
//!
//! The first line holds the number of rows and columns. The next
//! `2*rows-1` lines hold the grid, each at least `2*cols-1` characters
//! long:
//!
//! - even line, even column: a cell. `X` marks a target, any other ASCII
//!   letter a robot symbol, anything else an empty cell;
//! - even line, odd column: `|` is a wall between horizontal neighbours;
//! - odd line, even column: `-` is a wall between vertical neighbours;
//! - odd line, odd column: ignored.
//!
//! Any lines after the grid form the optional robot definition block, one
//! robot per non-empty line: `<symbol> <label> [<colour>]`. Robots keep
//! block order; the first one is the default target robot.

use std::fmt;
use std::path::Path;

use crate::board::{Board, BoardError};
use crate::color::{Color, ParseColorError};
use crate::geom::{Direction, Point};
use crate::robot::{Robot, RobotError};

const TARGET: char = 'X';

/// A parsed board file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFile {
    pub board: Board,
    /// `None` when the file has no robot block, or when the block names a
    /// symbol that does not appear on the grid.
    pub robots: Option<Vec<Robot>>,
}

/// Read and parse a board file.
pub fn load_board_file(path: impl AsRef<Path>) -> Result<BoardFile, LoadError> {
    let text = std::fs::read_to_string(path.as_ref()).map_err(LoadError::Io)?;
    load_board(&text)
}

/// Parse a board from its text form.
pub fn load_board(text: &str) -> Result<BoardFile, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .skip_while(|(_, l)| l.trim().is_empty());

    let (dim_line, dims) = lines.next().ok_or(LoadError::Empty)?;
    let (rows, cols) = parse_dimensions(dims).ok_or_else(|| LoadError::Dimensions {
        line: dim_line,
        content: dims.to_string(),
    })?;

    let (grid_rows, grid_cols, cells) =
        grid_size(rows, cols).ok_or_else(|| LoadError::Dimensions {
            line: dim_line,
            content: dims.to_string(),
        })?;
    // Grows with the input; the header alone is not trusted for sizing.
    let mut grid: Vec<Vec<char>> = Vec::new();
    let mut last_line = dim_line;
    for found in 0..grid_rows {
        let Some((line, content)) = lines.next() else {
            return Err(LoadError::MissingRows {
                line: last_line,
                expected: grid_rows,
                found,
            });
        };
        last_line = line;
        let chars: Vec<char> = content.chars().collect();
        if chars.len() < grid_cols {
            return Err(LoadError::ShortRow {
                line,
                expected: grid_cols,
                found: chars.len(),
            });
        }
        grid.push(chars);
    }
    let grid_start = dim_line + 1;

    let mut masks = Vec::with_capacity(cells);
    let mut targets = Vec::new();
    let mut symbols: Vec<(char, Point)> = Vec::new();
    for r in 0..rows as usize {
        for c in 0..cols as usize {
            let mut mask = 0u8;
            if c + 1 < cols as usize && grid[2 * r][2 * c + 1] != '|' {
                mask |= Direction::Right.bit();
            }
            if r > 0 && grid[2 * r - 1][2 * c] != '-' {
                mask |= Direction::Up.bit();
            }
            if c > 0 && grid[2 * r][2 * c - 1] != '|' {
                mask |= Direction::Left.bit();
            }
            if r + 1 < rows as usize && grid[2 * r + 1][2 * c] != '-' {
                mask |= Direction::Down.bit();
            }
            masks.push(mask);

            let p = Point::new(r as i32, c as i32);
            let ch = grid[2 * r][2 * c];
            if ch == TARGET {
                targets.push(p);
            } else if ch.is_ascii_alphabetic() {
                if symbols.iter().any(|&(s, _)| s == ch) {
                    return Err(LoadError::DuplicateSymbol {
                        line: grid_start + 2 * r,
                        symbol: ch,
                    });
                }
                symbols.push((ch, p));
            }
        }
    }
    let board = Board::new(cols, rows, masks, targets).map_err(LoadError::Board)?;

    let mut robots = Vec::new();
    let mut unresolved = false;
    for (line, content) in lines {
        let mut tokens = content.split_whitespace();
        let Some(symbol) = tokens.next() else {
            continue;
        };
        let mut symbol_chars = symbol.chars();
        let (Some(symbol), None, Some(label)) =
            (symbol_chars.next(), symbol_chars.next(), tokens.next())
        else {
            return Err(LoadError::MalformedRobot {
                line,
                content: content.to_string(),
            });
        };
        let color = match tokens.next() {
            Some(tok) => tok
                .parse::<Color>()
                .map_err(|source| LoadError::Color { line, source })?,
            None => Color::CLASSIC[robots.len() % Color::CLASSIC.len()],
        };
        match symbols.iter().find(|&&(s, _)| s == symbol) {
            Some(&(_, pos)) => robots.push(Robot::new(label, color, pos).map_err(LoadError::Robot)?),
            None => {
                log::warn!("line {line}: robot symbol \u{201c}{symbol}\u{201d} is not on the board");
                unresolved = true;
            }
        }
    }

    let robots = if robots.is_empty() || unresolved {
        None
    } else {
        Some(robots)
    };
    Ok(BoardFile { board, robots })
}

/// Grid lines, grid columns and cell count for a `rows` x `cols` board, or
/// `None` if any of them overflows.
fn grid_size(rows: i32, cols: i32) -> Option<(usize, usize, usize)> {
    let rows = usize::try_from(rows).ok()?;
    let cols = usize::try_from(cols).ok()?;
    Some((
        rows.checked_mul(2)?.checked_sub(1)?,
        cols.checked_mul(2)?.checked_sub(1)?,
        rows.checked_mul(cols)?,
    ))
}

fn parse_dimensions(line: &str) -> Option<(i32, i32)> {
    let mut it = line.split_whitespace();
    let rows: i32 = it.next()?.parse().ok()?;
    let cols: i32 = it.next()?.parse().ok()?;
    if it.next().is_some() || rows <= 0 || cols <= 0 {
        return None;
    }
    Some((rows, cols))
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

impl BoardFile {
    /// Text form of the board and robots. One-way passages are written as
    /// walls.
    pub fn to_text(&self) -> String {
        let board = &self.board;
        let robots = self.robots.as_deref().unwrap_or(&[]);

        // Use the robot's marker as its symbol unless it is unusable.
        let mut symbols: Vec<char> = Vec::with_capacity(robots.len());
        for robot in robots {
            let m = robot.marker();
            let sym = if m.is_ascii_alphabetic() && m != TARGET && !symbols.contains(&m) {
                m
            } else {
                ('A'..='Z')
                    .chain('a'..='z')
                    .find(|c| *c != TARGET && !symbols.contains(c))
                    .unwrap_or('?')
            };
            symbols.push(sym);
        }

        let mut out = format!("{} {}\n", board.height(), board.width());
        for r in 0..board.height() {
            for c in 0..board.width() {
                let p = Point::new(r, c);
                let cell = match robots.iter().position(|rb| rb.position() == p) {
                    Some(i) => symbols[i],
                    None if board.is_target(p) => TARGET,
                    None => '.',
                };
                out.push(cell);
                if c + 1 < board.width() {
                    out.push(if board.is_connected(p, Direction::Right) { ' ' } else { '|' });
                }
            }
            out.push('\n');
            if r + 1 < board.height() {
                for c in 0..board.width() {
                    let p = Point::new(r, c);
                    out.push(if board.is_connected(p, Direction::Down) { ' ' } else { '-' });
                    if c + 1 < board.width() {
                        out.push('+');
                    }
                }
                out.push('\n');
            }
        }
        for (robot, sym) in robots.iter().zip(&symbols) {
            out.push_str(&format!("{sym} {} {}\n", robot.label(), robot.color()));
        }
        out
    }
}

impl Board {
    /// Text form of the board alone.
    pub fn to_text(&self) -> String {
        BoardFile {
            board: self.clone(),
            robots: None,
        }
        .to_text()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that stop a board from loading. Line numbers are 1-based.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    /// The input has no dimension line.
    Empty,
    /// The dimension line is not two positive integers.
    Dimensions { line: usize, content: String },
    /// The input ends before the grid does. `line` is the last line read.
    MissingRows {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A grid line is shorter than `2*cols-1` characters.
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// Two grid cells carry the same robot symbol.
    DuplicateSymbol { line: usize, symbol: char },
    /// A robot definition is not `<symbol> <label> [<colour>]`.
    MalformedRobot { line: usize, content: String },
    Color {
        line: usize,
        source: ParseColorError,
    },
    Board(BoardError),
    Robot(RobotError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "load: {e}"),
            Self::Empty => f.write_str("load: empty board file"),
            Self::Dimensions { line, content } => {
                write!(f, "load: line {line}: expected \u{201c}<rows> <cols>\u{201d}, got \u{201c}{content}\u{201d}")
            }
            Self::MissingRows {
                line,
                expected,
                found,
            } => write!(f, "load: line {line}: input ends after {found} of {expected} grid lines"),
            Self::ShortRow {
                line,
                expected,
                found,
            } => write!(f, "load: line {line}: expected {expected} characters, found {found}"),
            Self::DuplicateSymbol { line, symbol } => {
                write!(f, "load: line {line}: robot symbol \u{201c}{symbol}\u{201d} appears twice")
            }
            Self::MalformedRobot { line, content } => {
                write!(f, "load: line {line}: malformed robot definition \u{201c}{content}\u{201d}")
            }
            Self::Color { line, source } => write!(f, "load: line {line}: {source}"),
            Self::Board(e) => write!(f, "load: {e}"),
            Self::Robot(e) => write!(f, "load: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Color { source, .. } => Some(source),
            Self::Board(e) => Some(e),
            Self::Robot(e) => Some(e),
            _ => None,
        }
    }
}
