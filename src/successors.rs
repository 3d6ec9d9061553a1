//! C4: the successor generator.

use crate::grid::Grid;
use crate::time::Time;

/// One reachable `(neighbor cell, neighbor interval)` with the earliest
/// feasible arrival time.
#[derive(Debug, Clone, Copy)]
pub struct Successor {
    pub i: usize,
    pub j: usize,
    pub cost: f64,
    pub arrival: Time,
    pub interval: usize,
}

/// Expands `(i, j, k)` with known arrival time `g` into its successors.
///
/// For every neighbor admitted by the grid model: the agent must be able to
/// leave the current safe interval (`[g + c/2, end(i,j,k))` must be
/// nonempty), and for every *safe* interval of the neighbor overlapping that
/// departure window, the earliest arrival is emitted. Crossing a border
/// costs `c/2` to leave the current cell's center and `c/2` to reach the
/// neighbor's, so the two halves compose into the full step cost `c` once
/// the neighbor's interval is already open; an interval that opens late
/// instead delays the crossing, not the second half.
pub fn successors(grid: &mut Grid, i: usize, j: usize, k: usize, g: Time) -> Vec<Successor> {
    let mut out = Vec::new();

    grid.ensure_intervals(i, j);
    let max_time = grid.intervals(i, j)[k].end;

    for mv in grid.neighbors(i, j) {
        let half = mv.cost / 2.0;
        let min_time = crate::time::time(g.0 + half);

        if min_time >= max_time {
            // Cannot leave the current interval early enough to depart.
            continue;
        }

        grid.ensure_intervals(mv.i, mv.j);

        let mut interval = grid.safe_interval_at_or_after(mv.i, mv.j, min_time);
        while interval < grid.intervals(mv.i, mv.j).len() {
            let candidate = grid.intervals(mv.i, mv.j)[interval];
            if candidate.start >= max_time {
                break;
            }

            if candidate.is_safe {
                let arrival = crate::time::time(min_time.max(candidate.start).0 + half);
                out.push(Successor {
                    i: mv.i,
                    j: mv.j,
                    cost: mv.cost,
                    arrival,
                    interval,
                });
            }

            interval += 1;
        }
    }

    out
}
