//! The one parallelism primitive the rest of the crate is built on:
//! `parallel_for` over a disjoint integer range, plus a scratch-buffer pool.
//!
//! Every algorithm that calls `parallel_for` partitions its writes so that
//! worker threads never touch the same cell (EDT scanlines) or perform only
//! idempotent writes (rasterize-into-grid). A sequential fallback is always
//! available and is what runs when the `with_rayon` feature is disabled, or
//! when the caller-supplied range is smaller than a threshold.

use std::sync::Mutex;

/// Runs `body(i)` for every `i` in `0..len`.
///
/// Goes parallel (via rayon, when the `with_rayon` feature is enabled) only
/// when `len >= min_parallel_len`; otherwise runs sequentially in order.
/// `max_degree`, when given, caps the number of worker threads used for this
/// call only.
pub fn parallel_for(
    len: usize,
    min_parallel_len: usize,
    max_degree: Option<usize>,
    body: impl Fn(usize) + Sync,
) {
    #[cfg(feature = "with_rayon")]
    {
        if len >= min_parallel_len && len > 0 {
            use rayon::prelude::*;
            match max_degree {
                Some(degree) if degree > 0 => {
                    // A bespoke pool for this call only; building one per call is
                    // not free, so callers should only pass a cap when they
                    // actually need to bound concurrency (e.g. a host-level
                    // budget), not on every hot-path call.
                    if let Ok(pool) = rayon::ThreadPoolBuilder::new().num_threads(degree).build() {
                        pool.install(|| (0..len).into_par_iter().for_each(&body));
                        return;
                    }
                }
                _ => {
                    (0..len).into_par_iter().for_each(&body);
                    return;
                }
            }
        }
    }
    #[cfg(not(feature = "with_rayon"))]
    {
        let _ = min_parallel_len;
        let _ = max_degree;
    }

    for i in 0..len {
        body(i);
    }
}

/// Computes `f(i)` for every `i` in `0..len` and collects the results in
/// order. Used where each unit of work produces an owned result that must
/// then be scattered somewhere not expressible as a disjoint contiguous
/// chunk (e.g. a strided column of a 3-D volume) — collecting per-item
/// results and scattering them back sequentially keeps the whole crate free
/// of unsafe code, at the cost of one intermediate allocation per pass.
pub fn parallel_map<T: Send>(
    len: usize,
    min_parallel_len: usize,
    body: impl Fn(usize) -> T + Sync,
) -> Vec<T> {
    #[cfg(feature = "with_rayon")]
    {
        if len >= min_parallel_len && len > 0 {
            use rayon::prelude::*;
            return (0..len).into_par_iter().map(&body).collect();
        }
    }
    #[cfg(not(feature = "with_rayon"))]
    {
        let _ = min_parallel_len;
    }
    (0..len).map(body).collect()
}

/// A free list of reusable `Vec<T>` scratch buffers.
///
/// EDT and SDF construction need several `N`-sized scratch volumes and many
/// small per-line buffers; renting from a shared pool instead of allocating
/// fresh each call amortizes that cost across repeated invocations. Buffers
/// are returned to the pool when the guard drops, including on unwind.
pub struct BufferPool<T> {
    free: Mutex<Vec<Vec<T>>>,
}

impl<T> Default for BufferPool<T> {
    fn default() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Clone + Default> BufferPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rents a buffer of exactly `len` elements, zeroed via `T::default()`.
    pub fn rent(&self, len: usize) -> PooledBuffer<'_, T> {
        let mut buf = {
            let mut free = self.free.lock().expect("buffer pool mutex poisoned");
            free.pop().unwrap_or_default()
        };
        buf.clear();
        buf.resize(len, T::default());
        PooledBuffer { pool: self, buf }
    }
}

pub struct PooledBuffer<'a, T> {
    pool: &'a BufferPool<T>,
    buf: Vec<T>,
}

impl<'a, T> std::ops::Deref for PooledBuffer<'a, T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        &self.buf
    }
}

impl<'a, T> std::ops::DerefMut for PooledBuffer<'a, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }
}

impl<'a, T> Drop for PooledBuffer<'a, T> {
    fn drop(&mut self) {
        let taken = std::mem::take(&mut self.buf);
        if let Ok(mut free) = self.pool.free.lock() {
            free.push(taken);
        }
    }
}
