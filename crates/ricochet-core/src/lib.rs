//! **ricochet-core**: boards, robots and movement for sliding-robot
//! puzzles.
//!
//! Robots slide in a straight line until a wall or another robot stops
//! them. This crate holds the static side of the puzzle: geometry, the wall
//! model and its slide queries, robot identities and configurations, the
//! text board format and a terminal picture. Searching lives in
//! `ricochet-solver`.

pub mod board;
pub mod color;
pub mod geom;
pub mod loader;
pub mod render;
pub mod robot;

pub use board::{Board, BoardError, Reachable};
pub use color::{Color, ParseColorError};
pub use geom::{Direction, Point};
pub use loader::{BoardFile, LoadError, load_board, load_board_file};
pub use render::BoardView;
pub use robot::{
    Configuration, DEFAULT_LABELS, Robot, RobotError, apply_configuration, random_robots,
};
