use crate::error::{PlannerError, Result};
#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// HPL P x Q process grid, rows <= cols
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessGrid {
    pub rows: u32,
    pub cols: u32,
}

impl ProcessGrid {
    pub fn process_count(&self) -> u64 {
        self.rows as u64 * self.cols as u64
    }

    pub fn aspect_gap(&self) -> u32 {
        self.cols - self.rows
    }
}

impl fmt::Display for ProcessGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} x {}", self.rows, self.cols)
    }
}

/// floor(sqrt(n)) without going through floating point
fn isqrt(n: u32) -> u32 {
    let n = n as u64;
    let mut r = (n as f64).sqrt() as u64;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r as u32
}

/// Factor `process_count` into the exact grid whose sides are closest to equal
///
/// Divisors are scanned upward from 1 to isqrt(n); only a strictly smaller gap
/// replaces the current best, so ties keep the smallest row count.
pub fn best_process_grid(process_count: u32) -> Result<ProcessGrid> {
    if process_count == 0 {
        return Err(PlannerError::invalid("process_count", "must be positive"));
    }

    let mut best = ProcessGrid {
        rows: 1,
        cols: process_count,
    };
    let mut min_gap = u32::MAX;
    for i in 1..=isqrt(process_count) {
        if process_count % i != 0 {
            continue;
        }
        let j = process_count / i;
        let gap = j - i;
        trace!(rows = i, cols = j, gap, "candidate grid");
        if gap < min_gap {
            min_gap = gap;
            best = ProcessGrid { rows: i, cols: j };
        }
    }

    Ok(best)
}
