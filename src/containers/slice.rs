/*!
 * Concurrent Slice
 *
 * Ordered sequence guarded by a single exclusive lock for every
 * operation, reads included.
 */

use crate::core::sync::Mutex;

/// Mutex-guarded growable sequence
pub struct ConcurrentSlice<T> {
    data: Mutex<Vec<T>>,
}

impl<T> ConcurrentSlice<T> {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(Vec::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn push(&self, value: T) {
        self.data.lock().push(value);
    }

    /// Append every value, in order, under one lock acquisition
    pub fn append<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.data.lock().extend(values);
    }

    /// Remove the element at `index`, shifting later elements down
    ///
    /// Returns `None` if `index` is out of bounds.
    pub fn delete(&self, index: usize) -> Option<T> {
        let mut data = self.data.lock();
        (index < data.len()).then(|| data.remove(index))
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.lock().capacity()
    }

    /// Visit elements in order until `f` returns false
    ///
    /// The lock is held for the whole walk; `f` must not call back into
    /// this slice.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(usize, &T) -> bool,
    {
        let data = self.data.lock();
        for (index, value) in data.iter().enumerate() {
            if !f(index, value) {
                break;
            }
        }
    }

    pub fn into_inner(self) -> Vec<T> {
        self.data.into_inner()
    }
}

impl<T: Clone> ConcurrentSlice<T> {
    /// Clone of the element at `index`
    pub fn get(&self, index: usize) -> Option<T> {
        self.data.lock().get(index).cloned()
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Vec<T> {
        self.data.lock().clone()
    }
}

impl<T> Default for ConcurrentSlice<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ConcurrentSlice<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ConcurrentSlice<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.data.lock().iter()).finish()
    }
}
