//! Scalar time representation shared by every component of the planner.

use ordered_float::OrderedFloat;

/// Non-negative real time scalar. Wrapped in `OrderedFloat` so it can be used
/// as a priority-queue key and a hash-map key, neither of which `f64` alone
/// supports.
pub type Time = OrderedFloat<f64>;

/// Sentinel meaning "forever" — the open end of the trailing safe interval
/// of every cell.
pub const INF: Time = OrderedFloat(f64::INFINITY);

/// Cost of an axis-aligned step.
pub const ORTHOGONAL_COST: f64 = 1.0;

/// Cost of a diagonal step.
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// Tolerance used when comparing floating point time values, e.g. when
/// testing whether a point lies on a segment.
pub const EPSILON: f64 = 1e-9;

pub fn time(t: f64) -> Time {
    OrderedFloat(t)
}
