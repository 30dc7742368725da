use hpl_planner::analysis::problem_size::*;
use hpl_planner::analysis::process_grid::best_process_grid;
use proptest::prelude::*;

fn reserve_strategy() -> impl Strategy<Value = ReserveFactor> {
    (1.0f64..2.0).prop_map(|r| ReserveFactor::new(r).unwrap())
}

proptest! {
    #[test]
    fn problem_size_is_block_aligned_and_fits(
        total in 0u64..(1u64 << 52),
        utilization in 0.0f64..=1.0,
        block_size in 1u64..4096,
        reserve in reserve_strategy(),
    ) {
        let budget = MemoryBudget::new(total, utilization, reserve).unwrap();
        let n = budget.problem_size(block_size).unwrap();
        prop_assert_eq!(n % block_size, 0);
        prop_assert!((n as f64) * (n as f64) * 8.0 <= budget.usable_bytes());
        // no larger aligned size fits
        prop_assert!((n + block_size) as f64 >= budget.raw_dimension() * (1.0 - 1e-12));
        prop_assert_eq!(
            estimate_problem_size_with_reserve(total, utilization, block_size, reserve).unwrap(),
            n
        );
    }

    #[test]
    fn grid_is_exact_and_closest(n in 1u32..200_000) {
        let g = best_process_grid(n).unwrap();
        prop_assert_eq!(g.rows as u64 * g.cols as u64, n as u64);
        prop_assert!(g.rows <= g.cols);
        for i in 1..=n {
            if i as u64 * i as u64 > n as u64 {
                break;
            }
            if n % i == 0 {
                prop_assert!(n / i - i >= g.cols - g.rows);
            }
        }
        prop_assert_eq!(best_process_grid(n).unwrap(), g);
    }
}
