//! Ingestion and planning failure modes (`spec.md` §7).

use thiserror::Error;

/// Errors surfaced while reading a map description, before the planner core
/// is ever constructed. Corresponds to the `INVALID_INPUT` failure code.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed map XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("map is missing required field <{0}>")]
    MissingField(&'static str),

    #[error("map is missing required <grid> node")]
    MissingGrid,

    #[error("map is missing required <dynamicobstacles> node")]
    MissingDynamicObstacles,

    #[error("map dimensions must be positive, got width={width}, height={height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("start or goal coordinate out of bounds: ({i}, {j})")]
    OutOfBounds { i: i64, j: i64 },

    #[error("grid has {actual} rows, expected {expected}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("row {row} has {actual} cells, expected {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("grid cell ({row}, {col}) is not an integer: {value:?}")]
    InvalidCellValue {
        row: usize,
        col: usize,
        value: String,
    },

    #[error(
        "dynamic obstacle segment from ({x1}, {y1}, {t1}) to ({x2}, {y2}, {t2}) is neither a \
         unit-speed straight move nor a wait"
    )]
    InvalidObstaclePath {
        x1: i64,
        y1: i64,
        t1: f64,
        x2: i64,
        y2: i64,
        t2: f64,
    },
}

/// Outcome of a planning attempt, distinguishing `NO_PATH` from the
/// ingestion failures above (`spec.md` §6's failure codes).
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no path found from start to goal")]
    NoPath,
}
