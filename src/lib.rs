//! # env-util
//!
//! A cached, overridable view of the process environment.
//! Code reads its configuration through this crate instead of `std::env`, and
//! unit tests set, override or reset variables without ever touching the real
//! environment of the test process.
//!
//! ## Features
//!
//! - **Strict reads**: `get` tells apart a variable that is unset from one set to `""`
//! - **Defaults**: `get_or` substitutes a default only when the variable is unset
//! - **Test overrides**: `set`, `override_var` and `remove` change the cache only
//! - **Reset**: reload from the OS, discarding every override
//! - **Global instance** (feature `global`, on by default): a process-wide cache
//!   behind a mutex, with free functions and the [`env_var!`] macro
//!
//! ## Example
//!
//! ```rust
//! use env_util::{EnvCache, EnvError};
//!
//! let mut env = EnvCache::from_vars([("HOME", "/home/alice")]);
//!
//! env.set("MYVAR", "MYVAL");
//! assert_eq!(env.get("MYVAR")?, "MYVAL");
//! assert_eq!(env.get_or("OTHER", "DEFAULT"), "DEFAULT");
//!
//! env.override_var("HOME", "/tmp")?;
//! assert!(matches!(env.override_var("MISSING", "x"), Err(EnvError::NotFound(_))));
//! # Ok::<(), EnvError>(())
//! ```

pub mod cache;
pub mod helpers;

pub use cache::EnvCache;

#[cfg(feature = "global")]
use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "global")]
use lazy_static::lazy_static;

#[cfg(feature = "global")]
lazy_static! {
    static ref ENVIRONMENT: Mutex<EnvCache> = Mutex::new(EnvCache::from_os());
}

/// Errors returned by environment lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// The variable is not set
    NotFound(String),
    /// The variable is set to an empty string
    Empty(String),
    /// The cache could not be serialized
    Serialization(String),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::NotFound(name) => write!(f, "Environment variable '{}' does not exist.", name),
            EnvError::Empty(name) => write!(f, "Environment variable '{}' is empty", name),
            EnvError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for EnvError {}

// Every cache operation leaves the map consistent, so a poisoned lock is safe to reuse.
#[cfg(feature = "global")]
fn lock_environment() -> MutexGuard<'static, EnvCache> {
    ENVIRONMENT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `f` against the process-wide cache while holding its lock.
///
/// The lock is not reentrant: do not call the free functions of this crate
/// (`get_env`, `set_env`, `print_env`, ...) from inside `f`, it deadlocks.
/// Use the `&mut EnvCache` argument instead.
#[cfg(feature = "global")]
pub fn with_env<R>(f: impl FnOnce(&mut EnvCache) -> R) -> R {
    f(&mut lock_environment())
}

/// Returns the value of `name` from the process-wide cache.
///
/// Fails with [`EnvError::NotFound`] if it is unset and [`EnvError::Empty`] if
/// it is set to `""`. If the variable may legitimately be empty, use
/// [`get_env_or`] with `""` as the default.
#[cfg(feature = "global")]
pub fn get_env(name: &str) -> Result<String, EnvError> {
    lock_environment().get(name)
}

/// Returns the value of `name`, or `default` if it is unset.
#[cfg(feature = "global")]
pub fn get_env_or(name: &str, default: &str) -> String {
    lock_environment().get_or(name, default)
}

/// Insert or overwrite a variable. Meant for test setup.
#[cfg(feature = "global")]
pub fn set_env(name: impl Into<String>, value: impl Into<String>) {
    lock_environment().set(name, value);
}

/// Overwrite a variable that must already exist. Meant for test setup.
#[cfg(feature = "global")]
pub fn override_env(name: &str, value: impl Into<String>) -> Result<(), EnvError> {
    lock_environment().override_var(name, value)
}

/// Reload the process-wide cache from the OS, discarding every override.
///
/// Call this between tests to get back to the original environment.
#[cfg(feature = "global")]
pub fn reset_environment() {
    lock_environment().reset();
}

/// All cached variables, one `NAME:VALUE` line each.
#[cfg(feature = "global")]
pub fn print_env() -> String {
    lock_environment().dump()
}

/// Read a variable from the process-wide cache.
///
/// `env_var!(name)` expands to [`get_env`], `env_var!(name, default)` to
/// [`get_env_or`].
#[cfg(feature = "global")]
#[macro_export]
macro_rules! env_var {
    ($name:expr) => {
        $crate::get_env($name)
    };
    ($name:expr, $default:expr) => {
        $crate::get_env_or($name, $default)
    };
}
