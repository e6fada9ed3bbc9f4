//! The static board: per-cell wall masks and target cells.
//!
//! A [`Board`] never changes once built. Robots are not part of it; the
//! movement queries that care about robots take their positions as an
//! obstacle slice.

use std::fmt;

use smallvec::SmallVec;

use crate::geom::{Direction, Point};

/// Destinations of one robot, at most one per direction, duplicates removed.
pub type Reachable = SmallVec<[Point; 4]>;

/// A rectangular grid of 4-bit connectivity masks plus a set of targets.
///
/// Bit `d.bit()` set on cell `p` means a robot on `p` may pass into
/// `p.step(d)`. Masks need not be symmetric: a bit set on one side only
/// makes a one-way passage.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BoardParts"))]
pub struct Board {
    width: i32,
    height: i32,
    masks: Vec<u8>,
    targets: Vec<Point>,
}

impl Board {
    /// Build a board from raw masks (row-major) and targets.
    ///
    /// Fails if a dimension is zero, the mask count does not match, a mask
    /// uses more than four bits or opens a passage off the grid, or a
    /// target lies outside the grid.
    pub fn new(
        width: i32,
        height: i32,
        masks: Vec<u8>,
        targets: impl IntoIterator<Item = Point>,
    ) -> Result<Self, BoardError> {
        if width <= 0 || height <= 0 {
            return Err(BoardError::ZeroSize { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if masks.len() != expected {
            return Err(BoardError::MaskCount {
                expected,
                found: masks.len(),
            });
        }
        let mut board = Self {
            width,
            height,
            masks,
            targets: Vec::new(),
        };
        for row in 0..height {
            for col in 0..width {
                let p = Point::new(row, col);
                let mask = board.mask(p);
                if mask & !0b1111 != 0 {
                    return Err(BoardError::InvalidMask { pos: p, mask });
                }
                for dir in Direction::ALL {
                    if mask & dir.bit() != 0 && !board.contains(p.step(dir)) {
                        return Err(BoardError::OpenEdge { pos: p, dir });
                    }
                }
            }
        }
        for t in targets {
            if !board.contains(t) {
                return Err(BoardError::TargetOutOfBounds(t));
            }
            board.targets.push(t);
        }
        board.targets.sort();
        board.targets.dedup();
        Ok(board)
    }

    /// A board with no internal walls and no targets.
    pub fn open(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut masks = Vec::with_capacity((width as usize) * (height as usize));
        for row in 0..height {
            for col in 0..width {
                let mut mask = 0;
                if col + 1 < width {
                    mask |= Direction::Right.bit();
                }
                if row > 0 {
                    mask |= Direction::Up.bit();
                }
                if col > 0 {
                    mask |= Direction::Left.bit();
                }
                if row + 1 < height {
                    mask |= Direction::Down.bit();
                }
                masks.push(mask);
            }
        }
        Self {
            width,
            height,
            masks,
            targets: Vec::new(),
        }
    }

    /// Close the passage between `p` and its neighbour in `dir`, on both
    /// sides. Does nothing for cells outside the board.
    pub fn with_wall(mut self, p: Point, dir: Direction) -> Self {
        if let Some(i) = self.index(p) {
            self.masks[i] &= !dir.bit();
        }
        if let Some(i) = self.index(p.step(dir)) {
            self.masks[i] &= !dir.opposite().bit();
        }
        self
    }

    /// Add a target cell. Does nothing for cells outside the board.
    pub fn with_target(mut self, p: Point) -> Self {
        if self.contains(p) {
            if let Err(i) = self.targets.binary_search(&p) {
                self.targets.insert(i, p);
            }
        }
        self
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Always false for a constructed board.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.row >= 0 && p.row < self.height && p.col >= 0 && p.col < self.width
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(p.row as usize * self.width as usize + p.col as usize)
    }

    /// Connectivity mask of `p`, `0` outside the board.
    #[inline]
    pub fn mask(&self, p: Point) -> u8 {
        self.index(p).map_or(0, |i| self.masks[i])
    }

    /// Target cells in row-major order.
    pub fn targets(&self) -> &[Point] {
        &self.targets
    }

    pub fn is_target(&self, p: Point) -> bool {
        self.targets.binary_search(&p).is_ok()
    }

    /// Row-major iterator over every cell of the board.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Point::new(row, col)))
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    /// Whether a robot on `p` may pass into `p.step(dir)`. False for `p`
    /// outside the board.
    #[inline]
    pub fn is_connected(&self, p: Point, dir: Direction) -> bool {
        self.mask(p) & dir.bit() != 0
    }

    /// As [`is_connected`](Self::is_connected), and the neighbour is not one
    /// of `obstacles`.
    #[inline]
    pub fn is_connected_avoiding(&self, p: Point, dir: Direction, obstacles: &[Point]) -> bool {
        self.is_connected(p, dir) && !obstacles.contains(&p.step(dir))
    }

    /// Where a robot on `p` stops when sliding in `dir` on the empty board.
    pub fn dest(&self, p: Point, dir: Direction) -> Point {
        let mut cur = p;
        while self.is_connected(cur, dir) {
            cur = cur.step(dir);
        }
        cur
    }

    /// Where a robot on `p` stops when sliding in `dir`, halting in front
    /// of any cell in `obstacles`.
    ///
    /// The moving robot's own cell may appear in `obstacles`; a slide never
    /// re-enters its starting cell.
    pub fn dest_avoiding(&self, p: Point, dir: Direction, obstacles: &[Point]) -> Point {
        let mut cur = p;
        while self.is_connected_avoiding(cur, dir, obstacles) {
            cur = cur.step(dir);
        }
        cur
    }

    /// Slide destinations of `p` in the four directions, in
    /// [`Direction::ALL`] order. A blocked direction contributes `p` itself.
    pub fn reachable(&self, p: Point, obstacles: &[Point]) -> Reachable {
        let mut out = Reachable::new();
        for dir in Direction::ALL {
            let d = self.dest_avoiding(p, dir, obstacles);
            if !out.contains(&d) {
                out.push(d);
            }
        }
        out
    }

    /// [`reachable`](Self::reachable) without obstacles.
    pub fn reachable_free(&self, p: Point) -> Reachable {
        self.reachable(p, &[])
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a [`Board`] cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Width or height is not positive.
    ZeroSize { width: i32, height: i32 },
    /// The mask vector does not hold one entry per cell.
    MaskCount { expected: usize, found: usize },
    /// A mask uses bits beyond the four direction bits.
    InvalidMask { pos: Point, mask: u8 },
    /// A mask opens a passage leading off the board.
    OpenEdge { pos: Point, dir: Direction },
    /// A target lies outside the board.
    TargetOutOfBounds(Point),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize { width, height } => {
                write!(f, "board: invalid size {width}x{height}")
            }
            Self::MaskCount { expected, found } => {
                write!(f, "board: expected {expected} cell masks, found {found}")
            }
            Self::InvalidMask { pos, mask } => {
                write!(f, "board: invalid mask {mask:#06b} at {pos}")
            }
            Self::OpenEdge { pos, dir } => {
                write!(f, "board: cell {pos} is open to the {dir} edge")
            }
            Self::TargetOutOfBounds(p) => write!(f, "board: target {p} is outside the board"),
        }
    }
}

impl std::error::Error for BoardError {}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct BoardParts {
    width: i32,
    height: i32,
    masks: Vec<u8>,
    targets: Vec<Point>,
}

#[cfg(feature = "serde")]
impl TryFrom<BoardParts> for Board {
    type Error = BoardError;

    fn try_from(parts: BoardParts) -> Result<Self, BoardError> {
        Board::new(parts.width, parts.height, parts.masks, parts.targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn walls_at_the_coordinate_limits_are_ignored() {
        let board = Board::open(3, 2);
        let far = Point::new(i32::MAX, i32::MAX);
        assert_eq!(board.clone().with_wall(far, Direction::Down), board);
        assert_eq!(board.clone().with_wall(far, Direction::Right), board);
        let near = Point::new(i32::MIN, 0);
        assert_eq!(board.clone().with_wall(near, Direction::Up), board);
        assert_eq!(board.mask(far), 0);
        assert!(!board.is_connected(far, Direction::Right));
    }

    #[test]
    fn open_board_edges_are_closed() {
        let b = Board::open(3, 2);
        assert_eq!(b.mask(Point::new(0, 0)), Direction::Right.bit() | Direction::Down.bit());
        assert_eq!(
            b.mask(Point::new(1, 1)),
            Direction::Right.bit() | Direction::Up.bit() | Direction::Left.bit()
        );
        assert!(!b.is_connected(Point::new(0, 2), Direction::Right));
        // Outside the board is never connected.
        assert!(!b.is_connected(Point::new(5, 5), Direction::Left));
        assert!(Board::new(3, 2, b.masks.clone(), []).is_ok());
    }

    #[test]
    fn new_rejects_bad_input() {
        assert_eq!(
            Board::new(0, 3, vec![], []),
            Err(BoardError::ZeroSize { width: 0, height: 3 })
        );
        assert_eq!(
            Board::new(2, 2, vec![0; 3], []),
            Err(BoardError::MaskCount { expected: 4, found: 3 })
        );
        assert_eq!(
            Board::new(1, 1, vec![0b1_0000], []),
            Err(BoardError::InvalidMask { pos: Point::ZERO, mask: 0b1_0000 })
        );
        assert_eq!(
            Board::new(1, 1, vec![Direction::Up.bit()], []),
            Err(BoardError::OpenEdge { pos: Point::ZERO, dir: Direction::Up })
        );
        assert_eq!(
            Board::new(1, 1, vec![0], [Point::new(1, 0)]),
            Err(BoardError::TargetOutOfBounds(Point::new(1, 0)))
        );
    }

    #[test]
    fn targets_are_sorted_and_unique() {
        let b = Board::new(2, 2, vec![0; 4], [Point::new(1, 1), Point::new(0, 1), Point::new(1, 1)])
            .unwrap();
        assert_eq!(b.targets(), &[Point::new(0, 1), Point::new(1, 1)]);
        assert!(b.is_target(Point::new(0, 1)));
        assert!(!b.is_target(Point::new(0, 0)));
        let b = b.with_target(Point::new(0, 0)).with_target(Point::new(9, 9));
        assert_eq!(b.targets().len(), 3);
    }

    #[test]
    fn slide_stops_at_outer_wall() {
        let b = Board::open(5, 5);
        let p = Point::new(2, 2);
        assert_eq!(b.dest(p, Direction::Right), Point::new(2, 4));
        assert_eq!(b.dest(p, Direction::Up), Point::new(0, 2));
        assert_eq!(b.dest(p, Direction::Left), Point::new(2, 0));
        assert_eq!(b.dest(p, Direction::Down), Point::new(4, 2));
    }

    #[test]
    fn slide_stops_at_internal_wall() {
        let b = Board::open(5, 5).with_wall(Point::new(2, 2), Direction::Right);
        assert_eq!(b.dest(Point::new(2, 0), Direction::Right), Point::new(2, 2));
        assert_eq!(b.dest(Point::new(2, 4), Direction::Left), Point::new(2, 3));
        // Blocked immediately: stays put.
        assert_eq!(b.dest(Point::new(2, 2), Direction::Right), Point::new(2, 2));
    }

    #[test]
    fn one_way_wall_is_kept() {
        let mut b = Board::open(3, 1);
        // Remove only the LEFT bit of the middle cell.
        b.masks[1] &= !Direction::Left.bit();
        assert_eq!(b.dest(Point::new(0, 0), Direction::Right), Point::new(0, 2));
        assert_eq!(b.dest(Point::new(0, 2), Direction::Left), Point::new(0, 1));
    }

    #[test]
    fn slide_stops_in_front_of_robot() {
        let b = Board::open(5, 5);
        let a = Point::new(0, 0);
        let blocker = Point::new(0, 2);
        assert_eq!(b.dest_avoiding(a, Direction::Right, &[a, blocker]), Point::new(0, 1));
        assert!(!b.is_connected_avoiding(Point::new(0, 1), Direction::Right, &[blocker]));
        assert!(b.is_connected_avoiding(Point::new(0, 1), Direction::Down, &[blocker]));
    }

    #[test]
    fn reachable_deduplicates() {
        let b = Board::open(3, 3);
        let r = b.reachable_free(Point::ZERO);
        // Right, up (blocked -> self), left (blocked -> self), down.
        assert_eq!(r.as_slice(), &[Point::new(0, 2), Point::ZERO, Point::new(2, 0)]);
    }

    fn random_board(rng: &mut impl Rng, w: i32, h: i32) -> Board {
        let mut b = Board::open(w, h);
        for _ in 0..(w * h / 3) {
            let p = Point::new(rng.random_range(0..h), rng.random_range(0..w));
            let d = Direction::ALL[rng.random_range(0..4)];
            b = b.with_wall(p, d);
        }
        b
    }

    #[test]
    fn dest_is_a_fixed_point() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let b = random_board(&mut rng, 8, 6);
            for p in b.cells() {
                for d in Direction::ALL {
                    let q = b.dest(p, d);
                    assert_eq!(b.dest(q, d), q);
                }
            }
        }
    }

    #[test]
    fn dest_never_lands_on_obstacle() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let b = random_board(&mut rng, 7, 7);
            let obstacles: Vec<Point> = (0..4)
                .map(|_| Point::new(rng.random_range(0..7), rng.random_range(0..7)))
                .collect();
            for p in b.cells().filter(|p| !obstacles.contains(p)) {
                for d in Direction::ALL {
                    assert!(!obstacles.contains(&b.dest_avoiding(p, d, &obstacles)));
                }
                let free = b.reachable_free(p);
                for q in b.reachable(p, &obstacles) {
                    let Some(d) = p.direction_to(q) else {
                        assert_eq!(q, p);
                        continue;
                    };
                    // An obstructed slide stops on the way to the free one.
                    let far = b.dest(p, d);
                    assert!(free.contains(&far));
                    assert!(q == far || q.direction_to(far) == Some(d));
                }
            }
        }
    }
}
