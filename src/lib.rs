//! Safe-Interval Path Planning (SIPP) on a 2D grid with static and dynamic
//! obstacles.
//!
//! The crate decomposes into five components, matching the dataflow
//! C3 -> C4 -> C5 with C2 read throughout:
//!
//! - [`interval`]: the interval model (C1).
//! - [`grid`]: the static grid model and the lazy safe-interval builder
//!   (C2, C3).
//! - [`successors`]: the successor generator (C4).
//! - [`search`]: the best-first search core (C5).
//! - [`map_io`]: the XML map parsing collaborator, outside the core.

pub mod error;
pub mod grid;
pub mod heuristic;
pub mod interval;
pub mod map_io;
pub mod node;
pub mod obstacle;
pub mod search;
pub mod successors;
pub mod time;

pub use error::{IngestError, PlanError};
pub use grid::{Grid, MovementRules};
pub use heuristic::{default_heuristic, Heuristic, ManhattanHeuristic, OctileHeuristic};
pub use interval::Interval;
pub use obstacle::{DynamicObstacle, Waypoint};
pub use search::{Planner, PlannerStats, Solution};
pub use time::Time;
