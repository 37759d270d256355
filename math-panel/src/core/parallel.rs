//! Portable parallel iteration abstractions
//!
//! - `parallel` feature: Uses rayon for influence-row assembly and case sweeps
//! - Without it: Falls back to sequential iteration with identical results
//!
//! ## Usage
//!
//! ```ignore
//! use crate::core::parallel::*;
//!
//! // One matrix row per index
//! let rows: Vec<Vec<f64>> = parallel_map_indexed(n, |i| assemble_row(i));
//! ```

/// Check if parallel processing is available
#[inline]
pub fn is_parallel_available() -> bool {
    cfg!(feature = "parallel")
}

/// Parallel map over a slice
#[cfg(feature = "parallel")]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

/// Sequential map over a slice
#[cfg(not(feature = "parallel"))]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    data.iter().map(f).collect()
}

/// Parallel map over a range of indices
///
/// Output order always matches index order.
#[cfg(feature = "parallel")]
pub fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

/// Sequential map over a range of indices
#[cfg(not(feature = "parallel"))]
pub fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    F: Fn(usize) -> U,
{
    (0..count).map(f).collect()
}
