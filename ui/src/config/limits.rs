//! Accepted ranges for configuration values.

/// Smallest table page size
pub const MIN_PAGE_SIZE: usize = 1;

/// Largest table page size
pub const MAX_PAGE_SIZE: usize = 500;

/// Longest resize quiet period (milliseconds)
pub const MAX_RESIZE_DEBOUNCE_MS: u64 = 2_000;

/// Smallest useful breakpoint width (CSS pixels)
pub const MIN_BREAKPOINT_PX: f64 = 200.0;

/// Largest useful breakpoint width (CSS pixels)
pub const MAX_BREAKPOINT_PX: f64 = 4_000.0;

/// Upper bound for concurrently running page loads
pub const MAX_TASK_POOL_SIZE: usize = 64;
