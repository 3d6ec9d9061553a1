//! Dynamic obstacle polylines, validated at ingestion (`spec.md` §3, §7.1).

use crate::error::IngestError;
use crate::time::Time;

/// One `(i, j, t)` waypoint of a dynamic obstacle's trajectory. Cells use
/// the same `(row, column)` convention as the rest of the crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub i: i64,
    pub j: i64,
    pub t: Time,
}

/// A dynamic obstacle: a polyline of waypoints with fully known trajectory.
#[derive(Debug, Clone, Default)]
pub struct DynamicObstacle {
    pub path: Vec<Waypoint>,
}

impl DynamicObstacle {
    pub fn new() -> Self {
        DynamicObstacle { path: Vec::new() }
    }

    /// Appends a waypoint, validating it against the previous one.
    ///
    /// Between consecutive waypoints, either the Manhattan distance equals
    /// the elapsed time (unit-speed straight-line motion along one axis), or
    /// the distance is zero and the elapsed time is strictly positive (the
    /// obstacle waits). Any other pair is rejected.
    pub fn push(&mut self, waypoint: Waypoint) -> Result<(), IngestError> {
        if let Some(prev) = self.path.last() {
            let distance = manhattan(prev.i, prev.j, waypoint.i, waypoint.j);
            let elapsed = waypoint.t.0 - prev.t.0;

            let is_wait = distance == 0.0 && elapsed > 0.0;
            let is_move = distance != 0.0 && (distance - elapsed).abs() < crate::time::EPSILON;

            if !is_wait && !is_move {
                return Err(IngestError::InvalidObstaclePath {
                    x1: prev.j,
                    y1: prev.i,
                    t1: prev.t.0,
                    x2: waypoint.j,
                    y2: waypoint.i,
                    t2: waypoint.t.0,
                });
            }
        }
        self.path.push(waypoint);
        Ok(())
    }
}

fn manhattan(i1: i64, j1: i64, i2: i64, j2: i64) -> f64 {
    ((i2 - i1).abs() + (j2 - j1).abs()) as f64
}
