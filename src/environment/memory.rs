// Memory unit constants, in bytes
pub const KIBIBYTE: u64 = 1024;
pub const MEBIBYTE: u64 = 1024 * KIBIBYTE;

/// One matrix element is an IEEE double
pub const ELEMENT_BYTES: u64 = 8;

/// Convert MiB to bytes, `None` on overflow
pub fn mib_to_bytes(mib: u64) -> Option<u64> {
    mib.checked_mul(MEBIBYTE)
}
