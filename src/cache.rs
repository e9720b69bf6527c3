use std::collections::BTreeMap;

use log::{debug, info};
use serde::Serialize;

use crate::helpers::os_env;
use crate::EnvError;

/// A mutable snapshot of the process environment.
///
/// Seeded from the OS once, then read and written in memory only. The real
/// process environment is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvCache {
    vars: BTreeMap<String, String>,
}

impl EnvCache {
    /// Create a cache holding every variable of the running process.
    pub fn from_os() -> Self {
        let vars = os_env::load_os_environment();
        debug!("Loaded {} environment variables", vars.len());
        Self { vars }
    }

    /// Create a cache from explicit name/value pairs, without touching the OS.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the value of `name`.
    ///
    /// # Errors
    ///
    /// * [`EnvError::NotFound`] if the variable is not set
    /// * [`EnvError::Empty`] if it is set to an empty string. Use
    ///   [`EnvCache::get_or`] when an empty value is acceptable.
    pub fn get(&self, name: &str) -> Result<String, EnvError> {
        match self.vars.get(name) {
            Some(val) if val.is_empty() => Err(EnvError::Empty(name.to_string())),
            Some(val) => Ok(val.clone()),
            None => Err(EnvError::NotFound(name.to_string())),
        }
    }

    /// Returns the value of `name`, or `default` if it is not set.
    ///
    /// An existing empty value is returned as is.
    pub fn get_or(&self, name: &str, default: &str) -> String {
        self.vars
            .get(name)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Insert or overwrite a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        debug!("Setting environment variable '{}'", name);
        self.vars.insert(name, value.into());
    }

    /// Overwrite a variable that already exists.
    ///
    /// # Errors
    ///
    /// [`EnvError::NotFound`] if the variable is not set. The cache is left
    /// untouched in that case.
    pub fn override_var(&mut self, name: &str, value: impl Into<String>) -> Result<(), EnvError> {
        match self.vars.get_mut(name) {
            Some(slot) => {
                debug!("Overriding environment variable '{}'", name);
                *slot = value.into();
                Ok(())
            }
            None => Err(EnvError::NotFound(name.to_string())),
        }
    }

    /// Unset a variable, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let prev = self.vars.remove(name);
        if prev.is_some() {
            debug!("Removed environment variable '{}'", name);
        }
        prev
    }

    /// Drop every override and reload from the live OS environment.
    pub fn reset(&mut self) {
        self.vars = os_env::load_os_environment();
        info!("Environment reset: {} variables loaded", self.vars.len());
    }

    /// Drop every override and reload from explicit name/value pairs.
    pub fn reset_from<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        *self = Self::from_vars(vars);
        info!("Environment reset: {} variables loaded", self.vars.len());
    }

    /// Whether `name` is set, even if empty.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Number of cached variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// True when no variable is cached.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Owned copy of the current contents.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.vars.clone()
    }

    /// One `NAME:VALUE` line per variable, sorted by name.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (k, v) in &self.vars {
            out.push_str(k);
            out.push(':');
            out.push_str(v);
            out.push('\n');
        }
        out
    }

    /// The cache contents as a JSON object.
    pub fn to_json(&self) -> Result<String, EnvError> {
        serde_json::to_string(self).map_err(|e| EnvError::Serialization(e.to_string()))
    }
}

impl Default for EnvCache {
    fn default() -> Self {
        Self::from_os()
    }
}
