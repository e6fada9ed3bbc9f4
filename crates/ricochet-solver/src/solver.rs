use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

use ricochet_core::{Board, Configuration, Point};

use crate::proximity::ProximityMap;

/// Default move ceiling.
pub const DEFAULT_MAX_MOVES: usize = 20;
/// Default wall-clock budget.
pub const DEFAULT_MAX_TIME: Duration = Duration::from_secs(120);

/// Search bounds and options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Longest solution, in moves, the search will return.
    pub max_moves: usize,
    /// Wall-clock budget, checked once per expanded node.
    pub max_time: Duration,
    /// Skip configurations already queued anywhere in the tree. Off by
    /// default: only the immediate reversal of the previous move is skipped.
    pub visited_set: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_moves: DEFAULT_MAX_MOVES,
            max_time: DEFAULT_MAX_TIME,
            visited_set: false,
        }
    }
}

/// Why the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// A configuration with the target robot on the target was dequeued.
    Goal,
    /// The proximity map supplied the final approach.
    Shortcut,
    /// Every configuration within the move ceiling was expanded.
    Exhausted,
    /// The time budget ran out.
    Deadline,
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes taken off the queue.
    pub expanded: usize,
    /// Nodes put on the queue.
    pub generated: usize,
    /// Proximity maps built.
    pub map_builds: usize,
    pub elapsed: Duration,
    pub stop: StopReason,
}

/// A search tree node. Parents are arena indices.
#[derive(Debug, Clone)]
struct Node {
    config: Configuration,
    moves: usize,
    parent: Option<usize>,
}

/// Bounded breadth-first solver.
///
/// The search runs in [`Solver::new`]; afterwards the solver only answers
/// queries. Not finding a solution within the bounds is an ordinary result
/// (`moves() == None`), not an error.
#[derive(Debug, Clone)]
pub struct Solver {
    target: Point,
    target_robot: usize,
    config: SolverConfig,
    solution: Option<Vec<Configuration>>,
    stats: SearchStats,
}

impl Solver {
    /// Search for the fewest moves bringing robot `target_robot` of
    /// `initial` onto `target`.
    ///
    /// Fails only on caller errors: an empty configuration, a robot index
    /// out of range, or a robot or target off the board.
    pub fn new(
        board: &Board,
        initial: Configuration,
        target: Point,
        target_robot: usize,
        config: SolverConfig,
    ) -> Result<Self, SolverError> {
        if initial.is_empty() {
            return Err(SolverError::NoRobots);
        }
        if target_robot >= initial.len() {
            return Err(SolverError::TargetRobotOutOfRange {
                index: target_robot,
                robots: initial.len(),
            });
        }
        if let Some((index, &pos)) = initial.iter().enumerate().find(|(_, p)| !board.contains(**p)) {
            return Err(SolverError::RobotOutOfBounds { index, pos });
        }
        if !board.contains(target) {
            return Err(SolverError::TargetOutOfBounds(target));
        }

        log::debug!(
            "solver: robot {target_robot} from {} to {target}, at most {} moves within {:?}",
            initial[target_robot],
            config.max_moves,
            config.max_time
        );
        let mut search = Search::new(board, target, target_robot, config);
        let solution = search.run(initial);
        log::debug!(
            "solver: {:?} after {} nodes ({} generated, {} maps) in {:?}",
            search.stats.stop,
            search.stats.expanded,
            search.stats.generated,
            search.stats.map_builds,
            search.stats.elapsed
        );

        Ok(Self {
            target,
            target_robot,
            config,
            solution,
            stats: search.stats,
        })
    }

    /// [`new`](Self::new) with [`SolverConfig::default`].
    pub fn with_defaults(
        board: &Board,
        initial: Configuration,
        target: Point,
        target_robot: usize,
    ) -> Result<Self, SolverError> {
        Self::new(board, initial, target, target_robot, SolverConfig::default())
    }

    /// Number of moves in the solution, or `None` if none was found.
    pub fn moves(&self) -> Option<usize> {
        self.solution.as_ref().map(|s| s.len() - 1)
    }

    /// Configurations from the initial one to the solved one, inclusive.
    pub fn solution(&self) -> Option<&[Configuration]> {
        self.solution.as_deref()
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn target_robot(&self) -> usize {
        self.target_robot
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

struct Search<'a> {
    board: &'a Board,
    target: Point,
    target_robot: usize,
    config: SolverConfig,
    nodes: Vec<Node>,
    queue: VecDeque<usize>,
    visited: Option<FxHashSet<Configuration>>,
    // Reused while the other robots keep still.
    proximity: Option<ProximityMap>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    fn new(board: &'a Board, target: Point, target_robot: usize, config: SolverConfig) -> Self {
        Self {
            board,
            target,
            target_robot,
            config,
            nodes: Vec::new(),
            queue: VecDeque::new(),
            visited: config.visited_set.then(FxHashSet::default),
            proximity: None,
            stats: SearchStats {
                expanded: 0,
                generated: 0,
                map_builds: 0,
                elapsed: Duration::ZERO,
                stop: StopReason::Exhausted,
            },
        }
    }

    fn push_node(&mut self, config: Configuration, moves: usize, parent: Option<usize>) -> usize {
        self.nodes.push(Node {
            config,
            moves,
            parent,
        });
        self.nodes.len() - 1
    }

    fn run(&mut self, initial: Configuration) -> Option<Vec<Configuration>> {
        let start = Instant::now();
        // An unrepresentable deadline means no time limit.
        let deadline = start.checked_add(self.config.max_time);

        if let Some(visited) = &mut self.visited {
            visited.insert(initial.clone());
        }
        let root = self.push_node(initial, 0, None);
        self.queue.push_back(root);

        let mut found = None;
        while let Some(idx) = self.queue.pop_front() {
            self.stats.expanded += 1;
            if self.nodes[idx].config[self.target_robot] == self.target {
                self.stats.stop = StopReason::Goal;
                found = Some(idx);
                break;
            }
            if let Some(end) = self.shortcut(idx) {
                self.stats.stop = StopReason::Shortcut;
                found = Some(end);
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                log::warn!(
                    "solver: time limit of {:?} reached after {} nodes",
                    self.config.max_time,
                    self.stats.expanded
                );
                self.stats.stop = StopReason::Deadline;
                break;
            }
            if self.nodes[idx].moves >= self.config.max_moves {
                continue;
            }
            self.expand(idx);
        }
        self.stats.elapsed = start.elapsed();

        if found.is_none() && self.stats.stop == StopReason::Exhausted {
            log::warn!(
                "solver: no solution within {} moves ({} nodes)",
                self.config.max_moves,
                self.stats.expanded
            );
        }
        found.map(|end| self.path_to(end))
    }

    /// Try to finish from node `idx` by sliding the target robot along the
    /// proximity map. On success the whole approach is appended to the tree
    /// and the index of its last node is returned.
    fn shortcut(&mut self, idx: usize) -> Option<usize> {
        let cfg = self.nodes[idx].config.clone();
        let moves = self.nodes[idx].moves;
        let obstacles = cfg.without(self.target_robot);
        if self
            .proximity
            .as_ref()
            .is_none_or(|m| m.obstacles() != obstacles.as_slice())
        {
            self.proximity = Some(ProximityMap::build(self.board, self.target, &obstacles));
            self.stats.map_builds += 1;
        }
        let map = self.proximity.as_ref()?;

        let current = cfg[self.target_robot];
        let mut best: Option<(Point, usize)> = None;
        for dest in self.board.reachable(current, &cfg) {
            if dest == current {
                continue;
            }
            if let Some(entry) = map.get(dest) {
                if best.is_none_or(|(_, m)| entry.moves < m) {
                    best = Some((dest, entry.moves));
                }
            }
        }
        let (dest, remaining) = best?;
        // The slide onto `dest`, then `remaining` more.
        if moves + remaining + 1 > self.config.max_moves {
            return None;
        }
        let chain = map.chain(dest);

        let mut parent = idx;
        for p in chain {
            let next = self.nodes[parent].config.with(self.target_robot, p);
            let m = self.nodes[parent].moves + 1;
            parent = self.push_node(next, m, Some(parent));
        }
        Some(parent)
    }

    /// Queue every single-slide successor of node `idx`.
    fn expand(&mut self, idx: usize) {
        let cfg = self.nodes[idx].config.clone();
        let moves = self.nodes[idx].moves;
        let parent = self.nodes[idx].parent;

        for (i, &pos) in cfg.iter().enumerate() {
            for dest in self.board.reachable(pos, &cfg) {
                if dest == pos {
                    continue;
                }
                let next = cfg.with(i, dest);
                // Undoing the previous move.
                if parent.is_some_and(|p| self.nodes[p].config == next) {
                    continue;
                }
                if let Some(visited) = &mut self.visited {
                    if !visited.insert(next.clone()) {
                        continue;
                    }
                }
                let n = self.push_node(next, moves + 1, Some(idx));
                self.queue.push_back(n);
                self.stats.generated += 1;
            }
        }
    }

    fn path_to(&self, end: usize) -> Vec<Configuration> {
        let mut path = Vec::with_capacity(self.nodes[end].moves + 1);
        let mut cur = Some(end);
        while let Some(i) = cur {
            let node = &self.nodes[i];
            debug_assert!(
                node.parent
                    .is_none_or(|p| is_legal_move(self.board, &self.nodes[p].config, &node.config)),
                "illegal transition into {}",
                node.config
            );
            path.push(node.config.clone());
            cur = node.parent;
        }
        path.reverse();
        path
    }
}

/// Whether `next` follows from `prev` by one slide: exactly one robot moved,
/// to a cell it can slide to with the others in their `prev` places.
pub fn is_legal_move(board: &Board, prev: &[Point], next: &[Point]) -> bool {
    if prev.len() != next.len() {
        return false;
    }
    let mut moved = None;
    for (i, (a, b)) in prev.iter().zip(next).enumerate() {
        if a != b {
            if moved.is_some() {
                return false;
            }
            moved = Some(i);
        }
    }
    match moved {
        Some(i) => board.reachable(prev[i], prev).contains(&next[i]),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Caller errors rejected before searching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The initial configuration has no robots.
    NoRobots,
    TargetRobotOutOfRange { index: usize, robots: usize },
    RobotOutOfBounds { index: usize, pos: Point },
    TargetOutOfBounds(Point),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRobots => f.write_str("solver: no robots"),
            Self::TargetRobotOutOfRange { index, robots } => {
                write!(f, "solver: target robot {index} out of range for {robots} robots")
            }
            Self::RobotOutOfBounds { index, pos } => {
                write!(f, "solver: robot {index} at {pos} is off the board")
            }
            Self::TargetOutOfBounds(p) => write!(f, "solver: target {p} is off the board"),
        }
    }
}

impl std::error::Error for SolverError {}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_and_stats_serialize() {
        let config = SolverConfig {
            max_moves: 7,
            max_time: Duration::from_millis(1500),
            visited_set: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<SolverConfig>(&json).unwrap(), config);

        let board = Board::open(3, 3);
        let solver = Solver::with_defaults(&board, Configuration::new(vec![Point::ZERO]), Point::new(2, 2), 0).unwrap();
        let value = serde_json::to_value(solver.stats()).unwrap();
        assert_eq!(value["stop"], "Shortcut");
        let path = serde_json::to_value(solver.solution()).unwrap();
        assert_eq!(path[2][0], serde_json::json!({ "row": 2, "col": 2 }));
    }
}
