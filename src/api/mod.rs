/// Python bindings
#[cfg(feature = "python")]
pub mod pylib;
