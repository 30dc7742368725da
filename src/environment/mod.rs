/// Defines how a cluster of GPU processes is represented
pub mod cluster;
/// Defines constants and helpers for memory units
pub mod memory;
/// GPU model name to device memory presets
pub mod presets;
