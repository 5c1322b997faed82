/*!
 * Pool Module
 * Object reuse with amortized doubling growth
 */

pub mod config;
pub mod growable;
pub mod guard;

pub use config::PoolConfig;
pub use growable::{Factory, GrowablePool, PoolStats};
pub use guard::PoolGuard;
