use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use tracing::debug;

/// The years published by the energy balance dataset.
///
/// The cache is owned by the application shell and handed to the fetch
/// routines that need it. It is filled on first use and stays filled until
/// [`YearsCache::invalidate`] is called. An empty list is never cached, so a
/// failed fetch is retried on the next use.
#[derive(Debug, Default)]
pub struct YearsCache {
    years: Mutex<Option<Arc<[i32]>>>,
}

impl YearsCache {
    pub fn new() -> YearsCache {
        Self::default()
    }

    /// Returns the cached years, if any.
    pub fn get(&self) -> Option<Arc<[i32]>> {
        self.lock().clone()
    }

    /// Returns the cached years, calling `init` to fill the cache first if it
    /// is empty. Concurrent callers wait for the first one to finish.
    pub fn get_or_try_init<F, E>(&self, init: F) -> Result<Arc<[i32]>, E>
    where
        F: FnOnce() -> Result<Vec<i32>, E>,
    {
        let mut years = self.lock();

        if let Some(ref cached) = *years {
            return Ok(Arc::clone(cached));
        }

        let fetched: Arc<[i32]> = Arc::from(init()?);
        if !fetched.is_empty() {
            debug!(count = fetched.len(), "caching available years");
            *years = Some(Arc::clone(&fetched));
        }

        Ok(fetched)
    }

    /// Returns the most recent cached year.
    pub fn latest(&self) -> Option<i32> {
        self.lock().as_ref().and_then(|years| years.last().copied())
    }

    /// Empties the cache.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<[i32]>>> {
        self.years.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
