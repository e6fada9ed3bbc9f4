//! Geometry primitives: [`Point`] and [`Direction`].
//!
//! Rows grow downwards and columns grow to the right, so `Direction::Up`
//! decreases the row and `Direction::Right` increases the column.

use std::fmt;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the four compass directions a robot can slide in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Right,
    Up,
    Left,
    Down,
}

impl Direction {
    /// All directions, in mask-bit order.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ];

    /// Connectivity bit of this direction in a cell mask.
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Direction::Right => 0b0001,
            Direction::Up => 0b0010,
            Direction::Left => 0b0100,
            Direction::Down => 0b1000,
        }
    }

    /// `(d_row, d_col)` of a single step.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Down => (1, 0),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Left => "left",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A board coordinate. Plain value: equality, hashing and ordering are
/// component-wise (row-major order).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { row: 0, col: 0 };

    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The adjacent point in direction `dir`. No bounds check; coordinates
    /// wrap at the `i32` limits.
    #[inline]
    pub const fn step(self, dir: Direction) -> Self {
        let (dr, dc) = dir.offset();
        Self {
            row: self.row.wrapping_add(dr),
            col: self.col.wrapping_add(dc),
        }
    }

    /// Direction from `self` towards `other` when both share a row or a
    /// column and differ.
    pub fn direction_to(self, other: Point) -> Option<Direction> {
        if self == other {
            return None;
        }
        if self.row == other.row {
            Some(if other.col > self.col {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if self.col == other.col {
            Some(if other.row > self.row {
                Direction::Down
            } else {
                Direction::Up
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn step_follows_offsets() {
        let p = Point::new(3, 3);
        assert_eq!(p.step(Direction::Right), Point::new(3, 4));
        assert_eq!(p.step(Direction::Up), Point::new(2, 3));
        assert_eq!(p.step(Direction::Left), Point::new(3, 2));
        assert_eq!(p.step(Direction::Down), Point::new(4, 3));
    }

    #[test]
    fn step_wraps_at_the_limits() {
        assert_eq!(Point::new(0, i32::MAX).step(Direction::Right), Point::new(0, i32::MIN));
        assert_eq!(Point::new(i32::MIN, 0).step(Direction::Up), Point::new(i32::MAX, 0));
    }

    #[test]
    fn opposite_undoes_step() {
        let p = Point::new(5, 2);
        for d in Direction::ALL {
            assert_eq!(p.step(d).step(d.opposite()), p);
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn bits_are_distinct() {
        let all = Direction::ALL.iter().fold(0u8, |acc, d| acc | d.bit());
        assert_eq!(all, 0b1111);
    }

    #[test]
    fn direction_to_collinear_only() {
        let p = Point::new(2, 2);
        assert_eq!(p.direction_to(Point::new(2, 7)), Some(Direction::Right));
        assert_eq!(p.direction_to(Point::new(0, 2)), Some(Direction::Up));
        assert_eq!(p.direction_to(Point::new(2, 0)), Some(Direction::Left));
        assert_eq!(p.direction_to(Point::new(9, 2)), Some(Direction::Down));
        assert_eq!(p.direction_to(Point::new(3, 3)), None);
        assert_eq!(p.direction_to(p), None);
    }

    #[test]
    fn points_hash_by_value() {
        let mut set = HashSet::new();
        set.insert(Point::new(1, 2));
        assert!(set.contains(&Point::new(1, 2)));
        assert!(!set.contains(&Point::new(2, 1)));
    }

    #[test]
    fn ordering_is_row_major() {
        let mut pts = vec![Point::new(1, 0), Point::new(0, 5), Point::new(0, 1)];
        pts.sort();
        assert_eq!(pts, vec![Point::new(0, 1), Point::new(0, 5), Point::new(1, 0)]);
    }

    #[test]
    fn names_are_lowercase() {
        let names: Vec<String> = Direction::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["right", "up", "left", "down"]);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn direction_serializes_lowercase() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"left\"");
        let p: Point = serde_json::from_str(r#"{"row":4,"col":1}"#).unwrap();
        assert_eq!(p, Point::new(4, 1));
    }
}
