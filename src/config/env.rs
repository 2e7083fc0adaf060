//! Environment variable binding
//!
//! Any option is bound to `AFT_<NAME>` where `<NAME>` is the option name
//! uppercased with `-` and `.` mapped to `_`. Only the exact uppercase name
//! is recognized. Names are computed on demand, so new options pick up an
//! environment binding without registering it anywhere.

use std::collections::BTreeMap;

use crate::domain::ENV_PREFIX;

/// Environment variable name bound to a config key.
pub fn env_var_name(key: &str) -> String {
    format!("{}_{}", ENV_PREFIX, key.trim().replace(['-', '.'], "_").to_ascii_uppercase())
}

/// Source of environment variables.
///
/// `System` reads the process environment at lookup time, one variable at a
/// time. `Fixed` holds an explicit set of variables so tests never depend on
/// the real environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Env {
    System,
    Fixed(BTreeMap<String, String>),
}

impl Default for Env {
    /// An empty environment.
    fn default() -> Self {
        Env::Fixed(BTreeMap::new())
    }
}

impl Env {
    pub fn from_system() -> Self {
        Env::System
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Env::Fixed(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Value of `name`, treating an empty variable as unset. A system
    /// variable that is not valid UTF-8 is also treated as unset.
    pub fn get(&self, name: &str) -> Option<String> {
        let value = match self {
            Env::System => std::env::var(name).ok(),
            Env::Fixed(vars) => vars.get(name).cloned(),
        };
        value.filter(|value| !value.is_empty())
    }
}
