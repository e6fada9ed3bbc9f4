//! Terminal picture of a board with robots on it.

use std::fmt;

use crate::board::Board;
use crate::geom::{Direction, Point};
use crate::robot::Robot;

const BLOCK: char = '\u{2588}';
const TARGET: char = 'X';

/// Borrowed view of a board, its robots and the highlighted targets.
///
/// Walls are drawn as solid blocks between cells, robots by their marker
/// and targets as `X`.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    board: &'a Board,
    robots: &'a [Robot],
    targets: &'a [Point],
}

impl<'a> BoardView<'a> {
    pub fn new(board: &'a Board, robots: &'a [Robot], targets: &'a [Point]) -> Self {
        Self {
            board,
            robots,
            targets,
        }
    }

    fn cell_char(&self, p: Point) -> char {
        if let Some(r) = self.robots.iter().find(|r| r.position() == p) {
            r.marker()
        } else if self.targets.contains(&p) {
            TARGET
        } else {
            ' '
        }
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.board;
        let border: String = std::iter::repeat_n(BLOCK, 2 * b.width() as usize + 1).collect();
        writeln!(f, "{border}")?;
        for row in 0..b.height() {
            let mut line = String::with_capacity(2 * b.width() as usize + 1);
            line.push(BLOCK);
            for col in 0..b.width() {
                let p = Point::new(row, col);
                line.push(self.cell_char(p));
                line.push(if b.is_connected(p, Direction::Right) { ' ' } else { BLOCK });
            }
            writeln!(f, "{line}")?;
            if row + 1 < b.height() {
                line.clear();
                line.push(BLOCK);
                for col in 0..b.width() {
                    let p = Point::new(row, col);
                    line.push(if b.is_connected(p, Direction::Down) { ' ' } else { BLOCK });
                    line.push(if col + 1 < b.width() { ' ' } else { BLOCK });
                }
                writeln!(f, "{line}")?;
            }
        }
        write!(f, "{border}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn draws_walls_robots_and_target() {
        let board = Board::open(2, 2).with_wall(Point::new(0, 0), Direction::Right);
        let robots = [Robot::new("Red", Color::RED, Point::new(1, 0)).unwrap()];
        let targets = [Point::new(1, 1)];
        let text = BoardView::new(&board, &robots, &targets).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "\u{2588}\u{2588}\u{2588}\u{2588}\u{2588}");
        assert_eq!(lines[1], "\u{2588} \u{2588} \u{2588}");
        assert_eq!(lines[2], "\u{2588}   \u{2588}");
        assert_eq!(lines[3], "\u{2588}R X\u{2588}");
    }
}
