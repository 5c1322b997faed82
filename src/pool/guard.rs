/*!
 * Pool Guard
 * Scoped instance that returns itself to its pool on drop
 */

use super::growable::GrowablePool;
use std::ops::{Deref, DerefMut};

/// Instance borrowed from a `GrowablePool`
pub struct PoolGuard<'a, T> {
    pool: &'a GrowablePool<T>,
    // Some until drop or `into_inner`
    item: Option<T>,
}

impl<T> GrowablePool<T> {
    /// Acquire an instance that is released automatically when dropped
    pub fn acquire_guard(&self) -> PoolGuard<'_, T> {
        PoolGuard {
            pool: self,
            item: Some(self.acquire()),
        }
    }
}

impl<'a, T> PoolGuard<'a, T> {
    /// Keep the instance instead of returning it to the pool
    pub fn into_inner(mut self) -> T {
        self.item
            .take()
            .expect("pool guard holds its item until consumed")
    }
}

impl<T> Deref for PoolGuard<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        self.item
            .as_ref()
            .expect("pool guard holds its item until consumed")
    }
}

impl<T> DerefMut for PoolGuard<'_, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        self.item
            .as_mut()
            .expect("pool guard holds its item until consumed")
    }
}

impl<T> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_returns_on_drop() {
        let pool = GrowablePool::<Vec<u8>>::new();
        {
            let mut buf = pool.acquire_guard();
            buf.extend_from_slice(b"data");
        }
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.acquire(), b"data".to_vec());
    }

    #[test]
    fn test_into_inner_keeps_item() {
        let pool = GrowablePool::<String>::new();
        let mut guard = pool.acquire_guard();
        guard.push_str("kept");
        let owned = guard.into_inner();
        assert_eq!(owned, "kept");
        assert!(pool.is_empty());
    }
}
