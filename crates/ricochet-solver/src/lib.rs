//! Shortest-move search for sliding-robot puzzles.
//!
//! - **Bounded BFS** over robot configurations ([`Solver`])
//! - **Proximity maps** giving exact single-robot distances to the target
//!   under a fixed layout of the other robots ([`ProximityMap`])
//!
//! The solver expands configurations breadth-first and, at every node, asks
//! the proximity map whether the target robot can finish on its own while
//! the others stay put. When it can, the remaining slides are appended and
//! the search ends. Bounds on moves and wall-clock time keep the tree finite;
//! running out of either is an ordinary `None` result.
//!
//! ```
//! use ricochet_core::{Board, Configuration, Point};
//! use ricochet_solver::Solver;
//!
//! let board = Board::open(3, 3);
//! let start = Configuration::new(vec![Point::new(0, 0)]);
//! let solver = Solver::with_defaults(&board, start, Point::new(2, 2), 0).unwrap();
//! assert_eq!(solver.moves(), Some(2));
//! ```

mod proximity;
mod solver;

pub use proximity::{ProximityEntry, ProximityMap};
pub use solver::{
    DEFAULT_MAX_MOVES, DEFAULT_MAX_TIME, SearchStats, Solver, SolverConfig, SolverError,
    StopReason, is_legal_move,
};
