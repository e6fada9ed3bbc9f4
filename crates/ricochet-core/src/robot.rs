//! Robots and configurations.
//!
//! A [`Robot`] is an identity (label, colour) bound to a position. A
//! [`Configuration`] is just the ordered positions of every robot, which is
//! what the solver searches over.

use std::fmt;
use std::ops::Deref;

use rand::Rng;

use crate::board::Board;
use crate::color::Color;
use crate::geom::Point;

/// Labels used when no robot definitions are available.
pub const DEFAULT_LABELS: [&str; 4] = ["Red", "Yellow", "Green", "Blue"];

// ---------------------------------------------------------------------------
// Robot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Robot {
    label: String,
    color: Color,
    position: Point,
}

impl Robot {
    /// Create a robot. The label must not be empty: its first character is
    /// the robot's marker on text boards.
    pub fn new(label: impl Into<String>, color: Color, position: Point) -> Result<Self, RobotError> {
        let label = label.into();
        if label.is_empty() {
            return Err(RobotError::EmptyLabel);
        }
        Ok(Self {
            label,
            color,
            position,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// First character of the label.
    pub fn marker(&self) -> char {
        self.label.chars().next().unwrap_or('?')
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, p: Point) {
        self.position = p;
    }
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.label, self.color, self.position)
    }
}

/// Place one robot per label on distinct random cells of `board`.
///
/// Colours are taken from `colors` in order; robots beyond the end of the
/// list get random colours, unique within the set.
pub fn random_robots(
    board: &Board,
    labels: &[&str],
    colors: &[Color],
    rng: &mut impl Rng,
) -> Result<Vec<Robot>, RobotError> {
    if labels.len() > board.len() {
        return Err(RobotError::TooManyRobots {
            robots: labels.len(),
            cells: board.len(),
        });
    }
    let mut robots: Vec<Robot> = Vec::with_capacity(labels.len());
    let mut used_colors: Vec<Color> = colors.iter().take(labels.len()).copied().collect();
    for (i, label) in labels.iter().enumerate() {
        let color = match colors.get(i) {
            Some(&c) => c,
            None => loop {
                let c = Color(rng.random_range(0..0x100_0000));
                if !used_colors.contains(&c) {
                    used_colors.push(c);
                    break c;
                }
            },
        };
        let position = loop {
            let p = Point::new(
                rng.random_range(0..board.height()),
                rng.random_range(0..board.width()),
            );
            if robots.iter().all(|r| r.position != p) {
                break p;
            }
        };
        robots.push(Robot::new(*label, color, position)?);
    }
    Ok(robots)
}

/// Move every robot to its position in `cfg`. This is how a driver replays a
/// solution step by step.
pub fn apply_configuration(robots: &mut [Robot], cfg: &Configuration) {
    for (robot, &p) in robots.iter_mut().zip(cfg.iter()) {
        robot.set_position(p);
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Positions of all robots, indexed by robot index. Immutable: successor
/// states are new values built with [`with`](Self::with).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Configuration(Box<[Point]>);

impl Configuration {
    pub fn new(positions: impl Into<Box<[Point]>>) -> Self {
        Self(positions.into())
    }

    /// Current positions of `robots`, in order.
    pub fn of(robots: &[Robot]) -> Self {
        Self(robots.iter().map(Robot::position).collect())
    }

    /// A copy with robot `index` moved to `p`.
    pub fn with(&self, index: usize, p: Point) -> Self {
        let mut next = self.0.clone();
        next[index] = p;
        Self(next)
    }

    /// Every position except robot `index`'s, order preserved.
    pub fn without(&self, index: usize) -> Vec<Point> {
        self.0
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, &p)| p)
            .collect()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.0
    }
}

impl Deref for Configuration {
    type Target = [Point];

    fn deref(&self) -> &[Point] {
        &self.0
    }
}

impl From<Vec<Point>> for Configuration {
    fn from(v: Vec<Point>) -> Self {
        Self(v.into_boxed_slice())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        f.write_str("]")
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotError {
    /// A robot label was empty.
    EmptyLabel,
    /// More robots were requested than the board has cells.
    TooManyRobots { robots: usize, cells: usize },
}

impl fmt::Display for RobotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLabel => f.write_str("robot: empty label"),
            Self::TooManyRobots { robots, cells } => {
                write!(f, "robot: cannot place {robots} robots on {cells} cells")
            }
        }
    }
}

impl std::error::Error for RobotError {}
