//! Reusable backend contexts.
//!
//! Creating a rendering context is expensive and browsers/drivers limit how
//! many can be alive. Contexts are keyed by canvas size: a context handed out
//! by [`ContextPool::acquire`] belongs to the caller until it is given back
//! with [`ContextPool::release`]. The pool holds no global state.

use std::collections::HashMap;

/// Idle contexts kept per canvas size by default.
pub const DEFAULT_IDLE_PER_SIZE: usize = 4;

/// Caller-owned pool of contexts keyed by `(width, height)`.
#[derive(Debug)]
pub struct ContextPool<C> {
    idle: HashMap<(u32, u32), Vec<C>>,
    max_idle_per_size: usize,
}

impl<C> ContextPool<C> {
    /// Create a pool keeping up to [`DEFAULT_IDLE_PER_SIZE`] contexts per size.
    pub fn new() -> Self {
        Self::with_idle_limit(DEFAULT_IDLE_PER_SIZE)
    }

    /// Create a pool keeping up to `max_idle_per_size` contexts per size.
    pub fn with_idle_limit(max_idle_per_size: usize) -> Self {
        Self {
            idle: HashMap::new(),
            max_idle_per_size,
        }
    }

    /// Take an idle context for this size, or create one.
    pub fn acquire<E, F>(&mut self, width: u32, height: u32, create: F) -> Result<C, E>
    where
        F: FnOnce(u32, u32) -> Result<C, E>,
    {
        if let Some(context) = self.idle.get_mut(&(width, height)).and_then(Vec::pop) {
            tracing::debug!(width, height, "reusing pooled context");
            return Ok(context);
        }
        tracing::debug!(width, height, "creating context");
        create(width, height)
    }

    /// Give a context back for later reuse.
    ///
    /// Contexts beyond the idle limit are dropped.
    pub fn release(&mut self, width: u32, height: u32, context: C) {
        let slot = self.idle.entry((width, height)).or_default();
        if slot.len() >= self.max_idle_per_size {
            tracing::warn!(width, height, "context pool full, dropping context");
            return;
        }
        slot.push(context);
    }

    /// Number of idle contexts for a size.
    pub fn idle_count(&self, width: u32, height: u32) -> usize {
        self.idle.get(&(width, height)).map_or(0, Vec::len)
    }

    /// Total idle contexts across all sizes.
    pub fn len(&self) -> usize {
        self.idle.values().map(Vec::len).sum()
    }

    /// Check if no context is idle.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every idle context.
    pub fn clear(&mut self) {
        self.idle.clear();
    }
}

impl<C> Default for ContextPool<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Debug, PartialEq)]
    struct Context {
        id: usize,
        size: (u32, u32),
    }

    fn factory(counter: &mut usize) -> impl FnMut(u32, u32) -> Result<Context, Infallible> + '_ {
        move |width, height| {
            *counter += 1;
            Ok(Context {
                id: *counter,
                size: (width, height),
            })
        }
    }

    #[test]
    fn test_acquire_creates_when_empty() {
        let mut pool = ContextPool::new();
        let mut created = 0;
        let context = pool.acquire(64, 64, factory(&mut created)).unwrap();
        assert_eq!(context.size, (64, 64));
        assert_eq!(created, 1);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_release_then_reuse() {
        let mut pool = ContextPool::new();
        let mut created = 0;

        let context = pool.acquire(64, 64, factory(&mut created)).unwrap();
        pool.release(64, 64, context);
        assert_eq!(pool.idle_count(64, 64), 1);

        let again = pool.acquire(64, 64, factory(&mut created)).unwrap();
        assert_eq!(again.id, 1);
        assert_eq!(created, 1);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_sizes_are_separate() {
        let mut pool = ContextPool::new();
        let mut created = 0;

        let small = pool.acquire(32, 32, factory(&mut created)).unwrap();
        pool.release(32, 32, small);

        let large = pool.acquire(128, 64, factory(&mut created)).unwrap();
        assert_eq!(large.size, (128, 64));
        assert_eq!(created, 2);
        assert_eq!(pool.idle_count(32, 32), 1);
    }

    #[test]
    fn test_idle_limit() {
        let mut pool = ContextPool::with_idle_limit(1);
        pool.release(8, 8, Context { id: 1, size: (8, 8) });
        pool.release(8, 8, Context { id: 2, size: (8, 8) });
        assert_eq!(pool.idle_count(8, 8), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_create_failure_propagates() {
        let mut pool: ContextPool<Context> = ContextPool::new();
        let result = pool.acquire(8, 8, |_, _| Err("no context"));
        assert_eq!(result.unwrap_err(), "no context");
    }

    #[test]
    fn test_clear() {
        let mut pool = ContextPool::new();
        pool.release(8, 8, Context { id: 1, size: (8, 8) });
        pool.clear();
        assert!(pool.is_empty());
    }
}
