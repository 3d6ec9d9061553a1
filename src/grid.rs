//! C2: the static grid model, and C3: the safe-interval builder.
//!
//! The per-cell interval table is owned here rather than by the search core,
//! per the lazy-initialization design: a single owning table with an
//! implicit "not yet built" state (an empty `Vec`) per cell, populated on
//! first touch and retained for the planner's lifetime.

use crate::interval::Interval;
use crate::obstacle::DynamicObstacle;
use crate::time::{time, Time, DIAGONAL_COST, EPSILON, INF, ORTHOGONAL_COST};

/// Movement-rule configuration (`spec.md` §6).
#[derive(Debug, Clone, Copy)]
pub struct MovementRules {
    pub allow_diagonal: bool,
    pub cut_corners: bool,
    pub allow_squeeze: bool,
}

impl Default for MovementRules {
    fn default() -> Self {
        MovementRules {
            allow_diagonal: true,
            cut_corners: true,
            allow_squeeze: false,
        }
    }
}

/// A candidate move out of one cell, admitted by the movement rules.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub i: usize,
    pub j: usize,
    pub cost: f64,
}

/// Static grid plus the lazily-built per-cell safe-interval table.
pub struct Grid {
    width: usize,
    height: usize,
    start: (usize, usize),
    goal: (usize, usize),
    pub rules: MovementRules,
    cost: f64,
    dynamic_obstacles: Vec<DynamicObstacle>,
    /// `intervals[i][j]` is empty until built; an empty list means
    /// "untouched, assumed free", matching [`Grid::is_traversable`].
    intervals: Vec<Vec<Vec<Interval>>>,
}

impl Grid {
    pub fn new(
        width: usize,
        height: usize,
        start: (usize, usize),
        goal: (usize, usize),
        rules: MovementRules,
    ) -> Self {
        Grid {
            width,
            height,
            start,
            goal,
            rules,
            cost: ORTHOGONAL_COST,
            dynamic_obstacles: Vec::new(),
            intervals: vec![vec![Vec::new(); width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> (usize, usize) {
        self.start
    }

    pub fn goal(&self) -> (usize, usize) {
        self.goal
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn in_bounds(&self, i: i64, j: i64) -> bool {
        i >= 0 && j >= 0 && (i as usize) < self.height && (j as usize) < self.width
    }

    /// Seeds a cell as a static obstacle: a single unsafe `[0, INF)`
    /// interval, present before the safe-interval builder ever runs. This
    /// makes the cell "already present" for [`Grid::ensure_intervals`]'s
    /// idempotence contract.
    pub fn mark_static_obstacle(&mut self, i: usize, j: usize) {
        self.intervals[i][j] = vec![Interval::new(false, time(0.0), INF)];
    }

    pub fn add_dynamic_obstacle(&mut self, obstacle: DynamicObstacle) {
        self.dynamic_obstacles.push(obstacle);
    }

    /// A cell is traversable iff its interval list hasn't been built yet
    /// (assumed free) or its first interval is safe.
    pub fn is_traversable(&self, i: usize, j: usize) -> bool {
        match self.intervals[i][j].first() {
            None => true,
            Some(interval) => interval.is_safe,
        }
    }

    pub fn intervals(&self, i: usize, j: usize) -> &[Interval] {
        &self.intervals[i][j]
    }

    /// Earliest interval of `(i, j)` whose end time is strictly greater
    /// than `min_time`, found by binary search (`bisect_right` on
    /// `end_time`, per `spec.md` §4.4 and the canonical reading in §9).
    pub fn safe_interval_at_or_after(&self, i: usize, j: usize, min_time: Time) -> usize {
        self.intervals[i][j].partition_point(|interval| interval.end <= min_time)
    }

    /// C3: populates `intervals[i][j]` with the canonical safe/unsafe
    /// partition of `[0, INF]` induced by the dynamic obstacles crossing
    /// this cell. Idempotent: a second call is a no-op, including for
    /// statically-seeded cells.
    pub fn ensure_intervals(&mut self, i: usize, j: usize) {
        if !self.intervals[i][j].is_empty() {
            return;
        }

        let mut unsafe_intervals = self.collision_intervals(i, j);
        unsafe_intervals.sort_by_key(|a| a.start);

        if unsafe_intervals.is_empty() {
            self.intervals[i][j].push(Interval::new(true, time(0.0), INF));
            return;
        }

        // Merge overlapping/adjacent unsafe intervals into a disjoint
        // sequence, built into a scratch buffer rather than mutated in
        // place.
        let mut merged: Vec<Interval> = Vec::with_capacity(unsafe_intervals.len());
        for interval in unsafe_intervals {
            match merged.last_mut() {
                Some(tail) if interval.start <= tail.end => {
                    tail.end = tail.end.max(interval.end);
                }
                _ => merged.push(interval),
            }
        }

        // Complement the merged unsafe intervals to produce the safe gaps,
        // including a leading gap (if the first unsafe interval doesn't
        // start at 0) and the trailing safe interval running to INF.
        let mut partition = Vec::with_capacity(merged.len() * 2 + 1);
        let mut cursor = time(0.0);
        for unsafe_interval in merged {
            if unsafe_interval.start > cursor {
                partition.push(Interval::new(true, cursor, unsafe_interval.start));
            }
            partition.push(unsafe_interval);
            cursor = unsafe_interval.end;
        }
        partition.push(Interval::new(true, cursor, INF));

        // An obstacle's crossing time can place an unsafe interval's true
        // start before t=0 (e.g. it was already waiting on this cell when
        // the clock started); the published partition still must satisfy
        // `0 <= start_time` (`spec.md` §3), so the very first interval's
        // start is clamped here, after merging used the true value.
        if let Some(first) = partition.first_mut() {
            if first.start < time(0.0) {
                first.start = time(0.0);
            }
        }

        debug_assert!(
            is_contiguous_partition(&partition),
            "safe-interval partition for ({i}, {j}) is not sorted/contiguous: {partition:?}"
        );

        self.intervals[i][j] = partition;
    }

    /// Gathers the raw (unsorted, possibly overlapping) unsafe intervals
    /// induced by every dynamic obstacle crossing cell `(i, j)`.
    fn collision_intervals(&self, i: usize, j: usize) -> Vec<Interval> {
        let mut collisions = Vec::new();

        for obstacle in &self.dynamic_obstacles {
            for window in obstacle.path.windows(2) {
                let (p, q) = (window[0], window[1]);
                if !point_on_segment(i as i64, j as i64, p.i, p.j, q.i, q.j) {
                    continue;
                }

                let crossing = p.t.0 + manhattan_distance(i as i64, j as i64, p.i, p.j) * self.cost;
                let half_width = self.cost / 2.0;
                let mut interval = Interval::new(
                    false,
                    time(crossing - half_width),
                    time(crossing + half_width),
                );

                if manhattan_distance(p.i, p.j, q.i, q.j) == 0.0 {
                    // The obstacle waits at this cell for its entire dwell.
                    interval.end = time(q.t.0 + half_width);
                }

                collisions.push(interval);
            }
        }

        collisions
    }

    /// Enumerates the reachable neighbors of `(i, j)` in the 3x3 window,
    /// honoring diagonal passage, corner-cutting and squeezing (`spec.md`
    /// §4.2).
    pub fn neighbors(&self, i: usize, j: usize) -> Vec<Move> {
        let mut moves = Vec::with_capacity(8);
        let (i, j) = (i as i64, j as i64);

        for ni in (i - 1)..=(i + 1) {
            for nj in (j - 1)..=(j + 1) {
                if ni == i && nj == j {
                    continue;
                }
                if !self.in_bounds(ni, nj) {
                    continue;
                }
                let (nu, nv) = (ni as usize, nj as usize);
                if !self.is_traversable(nu, nv) {
                    continue;
                }

                let is_diagonal = ni != i && nj != j;
                if is_diagonal {
                    if !self.diagonal_allowed(i, j, ni, nj) {
                        continue;
                    }
                    moves.push(Move {
                        i: nu,
                        j: nv,
                        cost: DIAGONAL_COST,
                    });
                } else {
                    moves.push(Move {
                        i: nu,
                        j: nv,
                        cost: ORTHOGONAL_COST,
                    });
                }
            }
        }

        moves
    }

    fn diagonal_allowed(&self, i: i64, j: i64, ni: i64, nj: i64) -> bool {
        if !self.rules.allow_diagonal {
            return false;
        }

        let corner1_free = self.in_bounds(i, nj) && self.is_traversable(i as usize, nj as usize);
        let corner2_free = self.in_bounds(ni, j) && self.is_traversable(ni as usize, j as usize);

        match (corner1_free, corner2_free) {
            (true, true) => true,
            (false, false) => self.rules.allow_squeeze,
            _ => self.rules.cut_corners,
        }
    }
}

/// Checks the invariant from `spec.md` §8: sorted, contiguous, covering
/// `[0, INF]`. Only run under `debug_assert!` — a violation is a bug in the
/// builder, not a recoverable error (§7.4).
fn is_contiguous_partition(partition: &[Interval]) -> bool {
    let starts_at_zero = matches!(partition.first(), Some(first) if first.start == time(0.0));
    let ends_at_inf = partition.last().map(|last| last.end) == Some(INF);
    let contiguous = partition.windows(2).all(|w| w[0].end == w[1].start);
    starts_at_zero && ends_at_inf && contiguous
}

fn manhattan_distance(i1: i64, j1: i64, i2: i64, j2: i64) -> f64 {
    ((i1 - i2).abs() + (j1 - j2).abs()) as f64
}

/// Collinearity-plus-between predicate: `(j, i)` lies on the segment from
/// `p` to `q` iff the sum of the Euclidean distances from the endpoints
/// equals the Euclidean length of the segment (`spec.md` §4.3, step 1).
fn point_on_segment(pi: i64, pj: i64, i1: i64, j1: i64, i2: i64, j2: i64) -> bool {
    let euclidean = |ai: i64, aj: i64, bi: i64, bj: i64| -> f64 {
        (((ai - bi).pow(2) + (aj - bj).pow(2)) as f64).sqrt()
    };

    let through = euclidean(i1, j1, pi, pj) + euclidean(pi, pj, i2, j2);
    let direct = euclidean(i1, j1, i2, j2);
    (through - direct).abs() < EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::Waypoint;

    fn grid(w: usize, h: usize) -> Grid {
        Grid::new(w, h, (0, 0), (h - 1, w - 1), MovementRules::default())
    }

    #[test]
    fn untouched_cell_is_traversable() {
        let g = grid(5, 5);
        assert!(g.is_traversable(2, 2));
    }

    #[test]
    fn static_obstacle_blocks_regardless_of_dynamic_motion() {
        let mut g = grid(5, 5);
        g.mark_static_obstacle(2, 2);

        let mut obstacle = DynamicObstacle::new();
        obstacle
            .push(Waypoint {
                i: 2,
                j: 2,
                t: time(0.0),
            })
            .unwrap();
        obstacle
            .push(Waypoint {
                i: 2,
                j: 2,
                t: time(5.0),
            })
            .unwrap();
        g.add_dynamic_obstacle(obstacle);

        g.ensure_intervals(2, 2);
        assert!(!g.is_traversable(2, 2));
        assert_eq!(g.intervals(2, 2).len(), 1);
        assert!(!g.intervals(2, 2)[0].is_safe);
    }

    #[test]
    fn no_obstacle_yields_single_safe_interval() {
        let mut g = grid(3, 3);
        g.ensure_intervals(1, 1);
        let intervals = g.intervals(1, 1);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0], Interval::new(true, time(0.0), INF));
    }

    #[test]
    fn wait_obstacle_yields_one_unsafe_interval_plus_half_widths() {
        let mut g = grid(5, 1);
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
        g.add_dynamic_obstacle(obstacle);

        g.ensure_intervals(0, 2);
        let intervals = g.intervals(0, 2);
        // The obstacle's half-width pushes the unsafe window's true start
        // before t=0, so there is no leading safe interval; the published
        // start is clamped to 0 (`spec.md` §3's `0 <= start_time`): unsafe
        // [0, 3.5), then the trailing safe interval.
        assert_eq!(intervals.len(), 2);
        assert!(!intervals[0].is_safe);
        assert_eq!(intervals[0].start, time(0.0));
        assert_eq!(intervals[0].end, time(3.5));
        assert_eq!(intervals[1], Interval::new(true, time(3.5), INF));
    }

    #[test]
    fn diagonal_rejected_when_disabled() {
        let mut g = grid(3, 3);
        g.rules.allow_diagonal = false;
        let moves = g.neighbors(1, 1);
        assert!(moves
            .iter()
            .all(|m| (m.i as i64 - 1).abs() + (m.j as i64 - 1).abs() <= 1));
    }

    #[test]
    fn corner_policy_squeeze() {
        let mut g = Grid::new(2, 2, (0, 0), (1, 1), MovementRules::default());
        g.mark_static_obstacle(0, 1);
        g.mark_static_obstacle(1, 0);

        g.rules.allow_squeeze = true;
        let moves = g.neighbors(0, 0);
        assert!(moves.iter().any(|m| m.i == 1 && m.j == 1));

        g.rules.allow_squeeze = false;
        g.rules.cut_corners = false;
        let moves = g.neighbors(0, 0);
        assert!(!moves.iter().any(|m| m.i == 1 && m.j == 1));
    }
}
