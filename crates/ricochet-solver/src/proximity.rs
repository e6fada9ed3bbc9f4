//! Target-proximity map: exact single-robot distances to the target for one
//! fixed layout of the other robots.
//!
//! The map is a reverse breadth-first search over slides. A cell `S` is a
//! *stop* when a robot sliding in some direction `d` halts on it. Every cell
//! from which a slide in `d` ends on `S` is then one move further from the
//! target than `S`. All of those cells lie on one line: a single slide
//! covers the whole line, so they share a distance and all point at `S`.
//! Turning at a stop costs one more move.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use ricochet_core::{Board, Direction, Point};

/// Distance to the target and the next stop on the way there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProximityEntry {
    /// Number of slides from this cell to the target.
    pub moves: usize,
    /// Where the first of those slides ends. `None` only on the target.
    pub next: Option<Point>,
}

/// Distances to one target under a fixed obstacle layout.
///
/// Only valid for the obstacles it was built with; rebuild it whenever any
/// of them moves.
#[derive(Debug, Clone, Default)]
pub struct ProximityMap {
    obstacles: Vec<Point>,
    entries: FxHashMap<Point, ProximityEntry>,
}

impl ProximityMap {
    /// Build the map for a robot heading to `target` while the robots in
    /// `obstacles` stay put.
    ///
    /// If an obstacle already sits on the target the map is empty.
    pub fn build(board: &Board, target: Point, obstacles: &[Point]) -> Self {
        let mut map = Self {
            obstacles: obstacles.to_vec(),
            entries: FxHashMap::default(),
        };
        if obstacles.contains(&target) || !board.contains(target) {
            return map;
        }

        map.entries.insert(
            target,
            ProximityEntry {
                moves: 0,
                next: None,
            },
        );
        let mut queue: VecDeque<(Point, usize)> = VecDeque::new();
        queue.push_back((target, 0));

        while let Some((stop, moves)) = queue.pop_front() {
            if map.entries.get(&stop).is_some_and(|e| e.moves < moves) {
                continue;
            }
            for dir in Direction::ALL {
                // A robot sliding in `dir` must halt here.
                if board.is_connected_avoiding(stop, dir, obstacles) {
                    continue;
                }
                let back = dir.opposite();
                let mut cur = stop;
                loop {
                    let prev = cur.step(back);
                    if !board.is_connected(prev, dir) || obstacles.contains(&prev) {
                        break;
                    }
                    if map.relax(prev, moves + 1, stop) {
                        queue.push_back((prev, moves + 1));
                    }
                    cur = prev;
                }
            }
        }
        map
    }

    /// Record `p` at `moves` unless it already has an equal or better entry.
    fn relax(&mut self, p: Point, moves: usize, next: Point) -> bool {
        if self.entries.get(&p).is_some_and(|e| e.moves <= moves) {
            return false;
        }
        self.entries.insert(
            p,
            ProximityEntry {
                moves,
                next: Some(next),
            },
        );
        true
    }

    /// The obstacle layout this map was built for.
    #[inline]
    pub fn obstacles(&self) -> &[Point] {
        &self.obstacles
    }

    #[inline]
    pub fn get(&self, p: Point) -> Option<ProximityEntry> {
        self.entries.get(&p).copied()
    }

    #[inline]
    pub fn moves(&self, p: Point) -> Option<usize> {
        self.entries.get(&p).map(|e| e.moves)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stops visited from `from` to the target, both included. Empty when
    /// `from` is not in the map.
    pub fn chain(&self, from: Point) -> Vec<Point> {
        let mut out = Vec::new();
        let mut cur = Some(from);
        while let Some(p) = cur {
            let Some(entry) = self.entries.get(&p) else {
                break;
            };
            out.push(p);
            cur = entry.next;
        }
        out
    }
}
