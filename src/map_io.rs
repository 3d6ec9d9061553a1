//! The XML map parsing collaborator (`spec.md` §1, §6). Deliberately kept
//! separate from the planning core: its only contract with C1-C5 is the
//! [`Grid`] and obstacle set it produces.

use serde::Deserialize;

use crate::error::IngestError;
use crate::grid::{Grid, MovementRules};
use crate::obstacle::{DynamicObstacle, Waypoint};
use crate::time::time;

#[derive(Debug, Default, Deserialize)]
#[serde(rename = "map")]
struct MapXml {
    width: Option<i64>,
    height: Option<i64>,
    startx: Option<i64>,
    starty: Option<i64>,
    finishx: Option<i64>,
    finishy: Option<i64>,
    #[serde(default)]
    grid: Option<GridXml>,
    #[serde(default)]
    dynamicobstacles: Option<DynamicObstaclesXml>,
}

#[derive(Debug, Deserialize)]
struct GridXml {
    #[serde(rename = "row", default)]
    rows: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DynamicObstaclesXml {
    #[serde(rename = "obstacle", default)]
    obstacles: Vec<ObstacleXml>,
}

#[derive(Debug, Deserialize)]
struct ObstacleXml {
    #[serde(rename = "point", default)]
    points: Vec<PointXml>,
}

#[derive(Debug, Deserialize)]
struct PointXml {
    #[serde(rename = "@x")]
    x: i64,
    #[serde(rename = "@y")]
    y: i64,
    #[serde(rename = "@time")]
    time: i64,
}

/// Parses a map XML document into a [`Grid`] with its dynamic obstacles
/// already attached, using the movement rules supplied by the caller (the
/// CLI wiring collaborator reads these from its own flags, per `spec.md`
/// §6).
pub fn parse_map(xml: &str, rules: MovementRules) -> Result<Grid, IngestError> {
    let parsed: MapXml = quick_xml::de::from_str(xml)?;

    let width = parsed.width.ok_or(IngestError::MissingField("width"))?;
    let height = parsed.height.ok_or(IngestError::MissingField("height"))?;
    let startx = parsed.startx.ok_or(IngestError::MissingField("startx"))?;
    let starty = parsed.starty.ok_or(IngestError::MissingField("starty"))?;
    let finishx = parsed.finishx.ok_or(IngestError::MissingField("finishx"))?;
    let finishy = parsed.finishy.ok_or(IngestError::MissingField("finishy"))?;
    let grid_xml = parsed.grid.ok_or(IngestError::MissingGrid)?;
    let obstacles_xml = parsed
        .dynamicobstacles
        .ok_or(IngestError::MissingDynamicObstacles)?;

    if width <= 0 || height <= 0 {
        return Err(IngestError::InvalidDimensions { width, height });
    }
    let (width, height) = (width as usize, height as usize);

    let start = to_zero_based(starty, startx, width, height)?;
    let goal = to_zero_based(finishy, finishx, width, height)?;

    let mut grid = Grid::new(width, height, start, goal, rules);

    if grid_xml.rows.len() != height {
        return Err(IngestError::RowCountMismatch {
            expected: height,
            actual: grid_xml.rows.len(),
        });
    }
    for (i, row) in grid_xml.rows.iter().enumerate() {
        let cells: Vec<&str> = row.split_whitespace().collect();
        if cells.len() != width {
            return Err(IngestError::ColumnCountMismatch {
                row: i,
                expected: width,
                actual: cells.len(),
            });
        }
        for (j, cell) in cells.iter().enumerate() {
            let value: i64 = cell.parse().map_err(|_| IngestError::InvalidCellValue {
                row: i,
                col: j,
                value: (*cell).to_string(),
            })?;
            if value != 0 {
                grid.mark_static_obstacle(i, j);
            }
        }
    }

    let cost = grid.cost();
    for obstacle_xml in obstacles_xml.obstacles {
        let mut obstacle = DynamicObstacle::new();
        for point in obstacle_xml.points {
            obstacle.push(Waypoint {
                i: point.y - 1,
                j: point.x - 1,
                t: time(point.time as f64 * cost),
            })?;
        }
        grid.add_dynamic_obstacle(obstacle);
    }

    Ok(grid)
}

fn to_zero_based(
    y: i64,
    x: i64,
    width: usize,
    height: usize,
) -> Result<(usize, usize), IngestError> {
    let (i, j) = (y - 1, x - 1);
    if i < 0 || j < 0 || i as usize >= height || j as usize >= width {
        return Err(IngestError::OutOfBounds { i, j });
    }
    Ok((i as usize, j as usize))
}
