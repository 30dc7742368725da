/// Largest block-aligned HPL problem size for a memory budget
pub mod problem_size;
/// Near-square P x Q process grid factorization
pub mod process_grid;
