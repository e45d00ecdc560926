//! Worker pool selection for row-parallel rendering.

use rayon::ThreadPoolBuilder;

use crate::error::RenderResult;

/// Runs `f` on a dedicated pool of `threads` workers, or on the global rayon
/// pool when `threads` is `None`.
pub(crate) fn run_on_pool<T, F>(threads: Option<usize>, f: F) -> RenderResult<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    match threads {
        Some(num_threads) => {
            let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
            Ok(pool.install(f))
        }
        None => Ok(f()),
    }
}
