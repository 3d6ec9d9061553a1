//! C5: the best-first search core.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use fxhash::FxHashSet;
use log::{debug, trace};

use crate::error::PlanError;
use crate::grid::Grid;
use crate::heuristic::Heuristic;
use crate::node::{NodeId, NodeRecord};
use crate::successors::successors;
use crate::time::Time;

/// Statistics gathered during a search (`spec.md` §6).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlannerStats {
    pub expanded: usize,
    pub generated: usize,
    pub open_duplicates: usize,
}

/// The returned trajectory: `(i, j, t)` with strictly increasing `t`.
#[derive(Debug, Clone)]
pub struct Solution {
    pub steps: Vec<(usize, usize, Time)>,
    pub stats: PlannerStats,
}

/// Composite priority-queue key: ascending `f`, tie-break preferring higher
/// `g` (deeper nodes). Built as an explicit tuple rather than an overloaded
/// comparator, so the ordering is total and easy to read off the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Key(Time, Reverse<Time>);

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.0, self.1).cmp(&(other.0, other.1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapEntry {
    key: Key,
    arena_idx: usize,
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Safe-Interval Path Planning search over a [`Grid`].
pub struct Planner {
    grid: Grid,
}

impl Planner {
    pub fn new(grid: Grid) -> Self {
        Planner { grid }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Runs the search. The start cell is assumed safe at `t = 0`; if it
    /// isn't, the search fails immediately (`spec.md` §4.5, §7.2).
    pub fn solve(&mut self, heuristic: &dyn Heuristic) -> Result<Solution, PlanError> {
        let (si, sj) = self.grid.start();
        let goal = self.grid.goal();

        self.grid.ensure_intervals(si, sj);
        if !self.grid.is_traversable(si, sj) {
            return Err(PlanError::NoPath);
        }

        let mut arena: Vec<NodeRecord> = Vec::new();
        let mut open: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
        let mut closed: FxHashSet<NodeId> = FxHashSet::default();
        let mut stats = PlannerStats::default();

        let start_id: NodeId = (si, sj, 0);
        let start_h = heuristic.estimate(si, sj, goal);
        arena.push(NodeRecord {
            id: start_id,
            g: crate::time::time(0.0),
            h: start_h,
            parent: None,
        });
        push(&mut open, &arena, 0);
        stats.generated += 1;

        while let Some(Reverse(entry)) = open.pop() {
            if closed.contains(&arena[entry.arena_idx].id) {
                stats.open_duplicates += 1;
                continue;
            }

            let current_idx = entry.arena_idx;
            let current = arena[current_idx];
            trace!(
                "expanding ({}, {}, interval {}) g={}",
                current.id.0,
                current.id.1,
                current.id.2,
                current.g
            );

            if (current.id.0, current.id.1) == goal {
                let steps = reconstruct(&arena, current_idx);
                debug!(
                    "path found: {} steps, arrival {}",
                    steps.len(),
                    steps.last().unwrap().2
                );
                return Ok(Solution { steps, stats });
            }

            closed.insert(current.id);
            stats.expanded += 1;

            for succ in successors(
                &mut self.grid,
                current.id.0,
                current.id.1,
                current.id.2,
                current.g,
            ) {
                let succ_id: NodeId = (succ.i, succ.j, succ.interval);
                if closed.contains(&succ_id) {
                    continue;
                }

                let h = heuristic.estimate(succ.i, succ.j, goal);
                let idx = arena.len();
                arena.push(NodeRecord {
                    id: succ_id,
                    g: succ.arrival,
                    h,
                    parent: Some(current_idx),
                });
                push(&mut open, &arena, idx);
                stats.generated += 1;
            }
        }

        Err(PlanError::NoPath)
    }
}

fn push(open: &mut BinaryHeap<Reverse<HeapEntry>>, arena: &[NodeRecord], idx: usize) {
    let node = &arena[idx];
    open.push(Reverse(HeapEntry {
        key: Key(node.f(), Reverse(node.g)),
        arena_idx: idx,
    }));
}

/// Walks parent links from the terminal node back to the start, then
/// reverses. Parent links form an acyclic tree rooted at the start, so this
/// always terminates.
fn reconstruct(arena: &[NodeRecord], terminal: usize) -> Vec<(usize, usize, Time)> {
    let mut steps = Vec::new();
    let mut cursor = Some(terminal);
    let mut visited = 0usize;
    while let Some(idx) = cursor {
        visited += 1;
        debug_assert!(
            visited <= arena.len(),
            "parent chain did not terminate at the start: cycle in arena"
        );
        let node = &arena[idx];
        steps.push((node.id.0, node.id.1, node.g));
        cursor = node.parent;
    }
    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MovementRules;
    use crate::heuristic::{ManhattanHeuristic, OctileHeuristic};
    use crate::obstacle::{DynamicObstacle, Waypoint};
    use crate::time::time;

    fn empty_grid(
        size: usize,
        allow_diagonal: bool,
        cut_corners: bool,
        allow_squeeze: bool,
    ) -> Grid {
        Grid::new(
            size,
            size,
            (0, 0),
            (size - 1, size - 1),
            MovementRules {
                allow_diagonal,
                cut_corners,
                allow_squeeze,
            },
        )
    }

    #[test]
    fn empty_grid_four_connected() {
        let grid = empty_grid(5, false, false, false);
        let mut planner = Planner::new(grid);
        let solution = planner.solve(&ManhattanHeuristic).unwrap();
        let (i, j, t) = *solution.steps.last().unwrap();
        assert_eq!((i, j), (4, 4));
        assert_eq!(t, time(8.0));
        assert_eq!(solution.steps.len(), 9);
    }

    #[test]
    fn empty_grid_diagonal_shortcut() {
        let grid = empty_grid(5, true, true, false);
        let mut planner = Planner::new(grid);
        let solution = planner.solve(&OctileHeuristic).unwrap();
        let (i, j, t) = *solution.steps.last().unwrap();
        assert_eq!((i, j), (4, 4));
        assert!((t.0 - 4.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn corridor_waits_for_obstacle_to_clear() {
        let mut grid = Grid::new(5, 1, (0, 0), (0, 4), MovementRules::default());
        let mut obstacle = DynamicObstacle::new();
        obstacle
            .push(Waypoint {
                i: 0,
                j: 2,
                t: time(0.0),
            })
            .unwrap();
        obstacle
            .push(Waypoint {
                i: 0,
                j: 2,
                t: time(3.0),
            })
            .unwrap();
        grid.add_dynamic_obstacle(obstacle);

        let mut planner = Planner::new(grid);
        let solution = planner.solve(&ManhattanHeuristic).unwrap();
        let (i, j, t) = *solution.steps.last().unwrap();
        assert_eq!((i, j), (0, 4));
        assert!(t.0 >= 4.5);
    }

    #[test]
    fn fully_walled_goal_has_no_path() {
        let mut grid = empty_grid(3, false, false, false);
        grid.mark_static_obstacle(0, 1);
        grid.mark_static_obstacle(1, 0);
        grid.mark_static_obstacle(1, 1);
        grid.mark_static_obstacle(1, 2);
        grid.mark_static_obstacle(2, 1);

        let mut planner = Planner::new(grid);
        assert!(planner.solve(&ManhattanHeuristic).is_err());
    }

    #[test]
    fn start_on_static_obstacle_fails_immediately() {
        let mut grid = empty_grid(3, false, false, false);
        grid.mark_static_obstacle(0, 0);
        let mut planner = Planner::new(grid);
        assert!(planner.solve(&ManhattanHeuristic).is_err());
    }

    #[test]
    fn determinism_across_runs() {
        let grid = empty_grid(6, true, true, false);
        let mut planner = Planner::new(grid);
        let first = planner.solve(&OctileHeuristic).unwrap();

        let grid2 = empty_grid(6, true, true, false);
        let mut planner2 = Planner::new(grid2);
        let second = planner2.solve(&OctileHeuristic).unwrap();

        assert_eq!(
            first.steps.last().unwrap().2,
            second.steps.last().unwrap().2
        );
        assert_eq!(first.steps.len(), second.steps.len());
    }

    #[test]
    fn times_strictly_increase_along_the_path() {
        let grid = empty_grid(4, true, true, false);
        let mut planner = Planner::new(grid);
        let solution = planner.solve(&OctileHeuristic).unwrap();
        for pair in solution.steps.windows(2) {
            assert!(pair[1].2 > pair[0].2);
        }
    }
}
