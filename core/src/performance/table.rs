//! Text formats for the polar diagram and the optimal tack table.

use ndarray::Array2;
use std::fs;
use std::path::Path;

use crate::prelude::{NavError, NavResult};
use crate::telemetry::log::LogManager;

/// Columns of the tack table that the engine reads.
pub mod columns {
    pub const WIND_SPEED: usize = 0;
    pub const OPTIMAL_UP_TWA: usize = 1;
    pub const OPTIMAL_DOWN_TWA: usize = 2;
    pub const MAX_UP_VMG: usize = 5;
    pub const MAX_DOWN_VMG: usize = 6;
    pub const MIN_COUNT: usize = 8;
}

/// Boat speed by true wind angle (rows) and true wind force (columns).
#[derive(Debug, Clone, PartialEq)]
pub struct PolarDiagram {
    pub(crate) wind: Vec<f64>,
    pub(crate) angles: Vec<f64>,
    pub(crate) speeds: Array2<f64>,
}

impl PolarDiagram {
    /// Parses a whitespace-delimited table. The first row lists wind-force breakpoints
    /// (its first cell is a label and ignored); each following row is an angle and one
    /// speed per breakpoint.
    pub fn parse(text: &str) -> NavResult<Self> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
        let header = lines
            .next()
            .ok_or_else(|| NavError::TableFormat("polar diagram is empty".into()))?;
        let wind = header
            .split_whitespace()
            .skip(1)
            .map(parse_cell)
            .collect::<NavResult<Vec<_>>>()?;
        if wind.len() < 2 {
            return Err(NavError::TableFormat(
                "polar diagram needs at least two wind breakpoints".into(),
            ));
        }
        ensure_increasing(&wind, "wind breakpoints")?;

        let mut angles = Vec::new();
        let mut cells = Vec::new();
        for (row, line) in lines.enumerate() {
            let values = line
                .split_whitespace()
                .map(parse_cell)
                .collect::<NavResult<Vec<_>>>()?;
            if values.len() != wind.len() + 1 {
                return Err(NavError::TableFormat(format!(
                    "polar row {} has {} speeds, expected {}",
                    row + 1,
                    values.len().saturating_sub(1),
                    wind.len()
                )));
            }
            angles.push(values[0]);
            cells.extend_from_slice(&values[1..]);
        }
        if angles.len() < 2 {
            return Err(NavError::TableFormat(
                "polar diagram needs at least two angle rows".into(),
            ));
        }
        ensure_increasing(&angles, "angle breakpoints")?;

        let speeds = Array2::from_shape_vec((angles.len(), wind.len()), cells)
            .map_err(|err| NavError::TableFormat(err.to_string()))?;
        Ok(Self {
            wind,
            angles,
            speeds,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> NavResult<Self> {
        let path = path.as_ref();
        let diagram = Self::parse(&fs::read_to_string(path)?)?;
        LogManager::new("polar").record(&format!(
            "loaded {} ({} angles x {} wind forces)",
            path.display(),
            diagram.angles.len(),
            diagram.wind.len()
        ));
        Ok(diagram)
    }

    pub fn wind_breakpoints(&self) -> &[f64] {
        &self.wind
    }

    pub fn angle_breakpoints(&self) -> &[f64] {
        &self.angles
    }
}

/// Optimal tack angles, max VMG and the upwind/downwind threshold by wind speed.
#[derive(Debug, Clone, PartialEq)]
pub struct TackTable {
    pub(crate) rows: Array2<f64>,
}

impl TackTable {
    /// Parses the tack table. The first non-empty line is a header; rows with fewer
    /// than eight numeric columns are skipped. The threshold is the last column.
    pub fn parse(text: &str) -> NavResult<Self> {
        let logger = LogManager::new("tack-table");
        let mut width = None;
        let mut cells = Vec::new();
        let mut count = 0;

        for (index, line) in text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .skip(1)
        {
            let values: Vec<f64> = line
                .split_whitespace()
                .filter_map(|token| token.parse().ok())
                .collect();
            if values.len() < columns::MIN_COUNT {
                logger.debug(&format!("skipping malformed row {}: {}", index, line));
                continue;
            }
            let expected = *width.get_or_insert(values.len());
            if values.len() != expected {
                return Err(NavError::TableFormat(format!(
                    "tack row {} has {} columns, expected {}",
                    index,
                    values.len(),
                    expected
                )));
            }
            cells.extend(values);
            count += 1;
        }

        let width = width.ok_or_else(|| NavError::TableFormat("tack table has no rows".into()))?;
        let rows = Array2::from_shape_vec((count, width), cells)
            .map_err(|err| NavError::TableFormat(err.to_string()))?;
        let speeds: Vec<f64> = rows.column(columns::WIND_SPEED).to_vec();
        ensure_increasing(&speeds, "tack table wind speeds")?;
        Ok(Self { rows })
    }

    pub fn load(path: impl AsRef<Path>) -> NavResult<Self> {
        let path = path.as_ref();
        let table = Self::parse(&fs::read_to_string(path)?)?;
        LogManager::new("tack-table").record(&format!(
            "loaded {} ({} rows)",
            path.display(),
            table.len()
        ));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.nrows() == 0
    }

    pub(crate) fn threshold_column(&self) -> usize {
        self.rows.ncols() - 1
    }
}

fn parse_cell(token: &str) -> NavResult<f64> {
    token
        .parse()
        .map_err(|_| NavError::TableFormat(format!("not a number: {token:?}")))
}

fn ensure_increasing(values: &[f64], what: &str) -> NavResult<()> {
    if values.windows(2).all(|pair| pair[0] < pair[1]) {
        Ok(())
    } else {
        Err(NavError::TableFormat(format!("{what} must be strictly increasing")))
    }
}
