/*!
 * Erased Results
 *
 * Type-erased result list for computations whose result count and types
 * are only known at runtime. Values are boxed as `dyn Any` and recovered
 * by position and type; a wrong type simply yields `None`.
 */

use std::any::Any;

/// Heterogeneous, positional result list
#[derive(Default)]
pub struct ErasedResults {
    values: Vec<Box<dyn Any + Send + Sync>>,
}

impl ErasedResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value (builder style)
    pub fn with<V: Any + Send + Sync>(mut self, value: V) -> Self {
        self.push(value);
        self
    }

    pub fn push<V: Any + Send + Sync>(&mut self, value: V) {
        self.values.push(Box::new(value));
    }

    /// Value at `index`, if present and of type `V`
    pub fn get<V: Any>(&self, index: usize) -> Option<&V> {
        self.values.get(index)?.downcast_ref::<V>()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for ErasedResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedResults")
            .field("len", &self.values.len())
            .finish()
    }
}
