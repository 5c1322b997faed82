/*!
 * Once Module
 * Memoized one-shot computation with typed and type-erased result shapes
 */

pub mod cell;
pub mod erased;
pub mod funcs;

pub use cell::Once;
pub use erased::ErasedResults;
pub use funcs::{once_fn, once_value, once_values};
