use crate::environment::memory::ELEMENT_BYTES;
use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Divisor applied to usable memory to keep working space free for the runtime
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ReserveFactor(f64);

impl ReserveFactor {
    /// Matrix may take everything the utilization fraction allows
    pub const NONE: ReserveFactor = ReserveFactor(1.0);
    /// Keep ~10% working space beyond the matrix storage
    pub const WORKSPACE: ReserveFactor = ReserveFactor(1.1);

    pub fn new(factor: f64) -> Result<ReserveFactor> {
        if !factor.is_finite() || factor < 1.0 {
            return Err(PlannerError::invalid(
                "reserve_factor",
                format!("must be a finite value >= 1.0, got {}", factor),
            ));
        }
        Ok(ReserveFactor(factor))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for ReserveFactor {
    fn default() -> Self {
        ReserveFactor::NONE
    }
}

impl TryFrom<f64> for ReserveFactor {
    type Error = PlannerError;

    fn try_from(v: f64) -> Result<Self> {
        ReserveFactor::new(v)
    }
}

impl From<ReserveFactor> for f64 {
    fn from(r: ReserveFactor) -> f64 {
        r.0
    }
}

pub(crate) fn check_utilization(utilization: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&utilization) {
        // NaN fails the range check as well
        return Err(PlannerError::invalid(
            "utilization",
            format!("must lie in [0, 1], got {}", utilization),
        ));
    }
    Ok(utilization)
}

/// Memory available to the HPL matrix, validated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryBudget {
    pub total_bytes: u64,
    pub utilization: f64,
    pub reserve: ReserveFactor,
}

impl MemoryBudget {
    pub fn new(total_bytes: u64, utilization: f64, reserve: ReserveFactor) -> Result<MemoryBudget> {
        Ok(MemoryBudget {
            total_bytes,
            utilization: check_utilization(utilization)?,
            reserve,
        })
    }

    /// total x utilization / reserve
    pub fn usable_bytes(&self) -> f64 {
        self.total_bytes as f64 * self.utilization / self.reserve.get()
    }

    /// Unconstrained square dimension: sqrt(usable / 8)
    pub fn raw_dimension(&self) -> f64 {
        let usable = self.usable_bytes();
        if usable <= 0.0 {
            return 0.0;
        }
        (usable / ELEMENT_BYTES as f64).sqrt()
    }

    /// Largest N, a multiple of `block_size`, with N^2 doubles fitting the budget
    pub fn problem_size(&self, block_size: u64) -> Result<u64> {
        if block_size == 0 {
            return Err(PlannerError::invalid("block_size", "must be positive"));
        }
        let usable = self.usable_bytes();
        let raw = self.raw_dimension();
        let nb = block_size as f64;
        // raw and nb are both non-negative here, so floor truncates toward zero
        let mut n = (raw / nb).floor() as u64 * block_size;

        // sqrt rounding can land a hair above the exact root
        while n > 0 && (n as f64) * (n as f64) * (ELEMENT_BYTES as f64) > usable {
            n -= block_size;
        }

        debug!(
            total_bytes = self.total_bytes,
            utilization = self.utilization,
            reserve = self.reserve.get(),
            usable,
            raw,
            block_size,
            n,
            "estimated problem size"
        );
        Ok(n)
    }
}

/// Largest block-aligned N for `total_memory_bytes` at `utilization`, no reserve
pub fn estimate_problem_size(total_memory_bytes: u64, utilization: f64, block_size: u64) -> Result<u64> {
    estimate_problem_size_with_reserve(
        total_memory_bytes,
        utilization,
        block_size,
        ReserveFactor::NONE,
    )
}

pub fn estimate_problem_size_with_reserve(
    total_memory_bytes: u64,
    utilization: f64,
    block_size: u64,
    reserve: ReserveFactor,
) -> Result<u64> {
    MemoryBudget::new(total_memory_bytes, utilization, reserve)?.problem_size(block_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_factor_rejects_below_one() {
        assert!(ReserveFactor::new(0.9).is_err());
        assert!(ReserveFactor::new(f64::NAN).is_err());
        assert!(ReserveFactor::new(f64::INFINITY).is_err());
        assert_eq!(ReserveFactor::new(1.1).unwrap(), ReserveFactor::WORKSPACE);
    }

    #[test]
    fn utilization_bounds_are_inclusive() {
        assert!(check_utilization(0.0).is_ok());
        assert!(check_utilization(1.0).is_ok());
        assert!(check_utilization(1.0001).is_err());
        assert!(check_utilization(-0.01).is_err());
        assert!(check_utilization(f64::NAN).is_err());
    }

    #[test]
    fn zero_utilization_gives_zero() {
        let b = MemoryBudget::new(1 << 40, 0.0, ReserveFactor::NONE).unwrap();
        assert_eq!(b.raw_dimension(), 0.0);
        assert_eq!(b.problem_size(256).unwrap(), 0);
    }

    #[test]
    fn exact_square_is_kept() {
        // 8 * 1024^2 bytes hold exactly a 1024 x 1024 matrix
        let b = MemoryBudget::new(8 * 1024 * 1024, 1.0, ReserveFactor::NONE).unwrap();
        assert_eq!(b.problem_size(256).unwrap(), 1024);
        assert_eq!(b.problem_size(1000).unwrap(), 1000);
        assert_eq!(b.problem_size(1025).unwrap(), 0);
    }
}
