//! System-wide constants for BasaltDB.

// =============================================================================
// Page and Memory Constants
// =============================================================================

/// Page size in bytes (4 KB).
///
/// Every frame buffer and every disk transfer is exactly this size. It is a
/// build-time constant; changing it requires rebuilding every component that
/// touches page bytes.
pub const PAGE_SIZE: usize = 4 * 1024;

// =============================================================================
// Buffer Pool Constants
// =============================================================================

/// Default number of frames in a buffer pool instance.
pub const DEFAULT_POOL_SIZE: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size() {
        assert!(PAGE_SIZE.is_power_of_two());
        assert!(PAGE_SIZE >= 4096);
    }

    #[test]
    fn test_pool_defaults() {
        assert!(DEFAULT_POOL_SIZE > 0);
    }
}
