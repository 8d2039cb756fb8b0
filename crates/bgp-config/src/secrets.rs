//! Runtime secret resolution.
//!
//! Config YAML stores only env var NAMES. [`resolve_secrets`] is called once
//! at startup and the result is passed into constructors. Error messages
//! name the variable, never its value.

use anyhow::{bail, Result};

use crate::IngestConfig;

/// Secrets resolved from the environment for one run.
/// **Values are redacted in `Debug` output.**
#[derive(Clone)]
pub struct ResolvedSecrets {
    pub database_url: String,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("database_url", &"<REDACTED>")
            .finish()
    }
}

/// Resolve a named environment variable.
/// Returns `None` if the variable is unset or its value is blank.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

pub fn resolve_secrets(cfg: &IngestConfig) -> Result<ResolvedSecrets> {
    let var = cfg.store.database_url_env.trim();
    match resolve_env(var) {
        Some(database_url) => Ok(ResolvedSecrets { database_url }),
        None => bail!(
            "SECRETS_MISSING: required env var '{}' (store connection string) is not set or empty",
            var
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_database_url() {
        let s = ResolvedSecrets {
            database_url: "postgres://u:p@h/db".to_string(),
        };
        let dbg = format!("{s:?}");
        assert!(dbg.contains("<REDACTED>"));
        assert!(!dbg.contains("u:p@h"));
    }

    #[test]
    fn missing_env_var_error_names_the_variable() {
        let mut cfg = IngestConfig::default();
        cfg.store.database_url_env = "BGP_TEST_SURELY_UNSET_DB_URL_9f2c".to_string();
        let err = resolve_secrets(&cfg).unwrap_err().to_string();
        assert!(err.contains("BGP_TEST_SURELY_UNSET_DB_URL_9f2c"), "{err}");
    }
}
