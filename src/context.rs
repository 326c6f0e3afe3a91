use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::utils;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context lock poisoned")]
    Poisoned,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-session UI state shared by the pages of one visitor.
///
/// Only preferences are persisted. The admin token lives for the session.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct UiContext {
    pub selected_city: Option<String>,
    #[serde(skip)]
    pub admin_token: Option<String>,
}

impl UiContext {
    pub fn is_admin(&self) -> bool {
        self.admin_token.is_some()
    }
}

pub struct ContextStore {
    path: Option<PathBuf>,
    data: Mutex<UiContext>,
}

impl ContextStore {
    /// A store that lives only in memory.
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            data: Mutex::new(UiContext::default()),
        }
    }

    /// Loads preferences from `path`; a missing or unreadable file starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match read_context(&path) {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %path.display(), "ignoring unreadable context file: {err}");
                UiContext::default()
            }
        };
        Self {
            path: Some(path),
            data: Mutex::new(data),
        }
    }

    pub fn load_default() -> Self {
        Self::load(utils::context_path())
    }

    pub fn read(&self) -> Result<UiContext, ContextError> {
        self.data
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| ContextError::Poisoned)
    }

    pub fn update<F>(&self, transform: F) -> Result<UiContext, ContextError>
    where
        F: FnOnce(&mut UiContext),
    {
        let mut guard = self.data.lock().map_err(|_| ContextError::Poisoned)?;
        let mut next = guard.clone();
        transform(&mut next);
        // Memory only changes once the file write has succeeded.
        if let Some(path) = &self.path {
            write_context(path, &next)?;
        }
        *guard = next.clone();
        Ok(next)
    }

    pub fn select_city(&self, city: &str) -> Result<UiContext, ContextError> {
        let city = city.trim();
        self.update(|ctx| {
            ctx.selected_city = if city.is_empty() {
                None
            } else {
                Some(city.to_lowercase())
            };
        })
    }

    pub fn sign_in(&self, token: &str) -> Result<UiContext, ContextError> {
        let token = token.trim();
        self.update(|ctx| {
            ctx.admin_token = if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            };
        })
    }

    pub fn sign_out(&self) -> Result<UiContext, ContextError> {
        self.update(|ctx| ctx.admin_token = None)
    }

    /// Selected city or the given default.
    pub fn city_or(&self, default: &str) -> Result<String, ContextError> {
        Ok(self
            .read()?
            .selected_city
            .unwrap_or_else(|| default.to_string()))
    }
}

fn read_context(path: &Path) -> Result<UiContext, ContextError> {
    if !path.exists() {
        return Ok(UiContext::default());
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_context(path: &Path, context: &UiContext) -> Result<(), ContextError> {
    utils::ensure_parent(path)?;
    let contents = serde_json::to_string_pretty(context)?;
    fs::write(path, contents)?;
    debug!(path = %path.display(), "context saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_store_round_trips_in_memory() {
        let store = ContextStore::ephemeral();
        store.select_city("  Ankara ").unwrap();
        store.sign_in("secret").unwrap();

        let ctx = store.read().unwrap();
        assert_eq!(ctx.selected_city.as_deref(), Some("ankara"));
        assert!(ctx.is_admin());

        let ctx = store.sign_out().unwrap();
        assert!(!ctx.is_admin());
        assert_eq!(store.city_or("istanbul").unwrap(), "ankara");
    }

    #[test]
    fn blank_city_clears_selection() {
        let store = ContextStore::ephemeral();
        store.select_city("izmir").unwrap();
        store.select_city("   ").unwrap();
        assert_eq!(store.city_or("istanbul").unwrap(), "istanbul");
    }

    #[test]
    fn persists_preferences_but_not_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("context.json");

        let store = ContextStore::load(&path);
        store.select_city("izmir").unwrap();
        store.sign_in("secret").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("secret"));

        let reloaded = ContextStore::load(&path).read().unwrap();
        assert_eq!(reloaded.selected_city.as_deref(), Some("izmir"));
        assert_eq!(reloaded.admin_token, None);
    }

    #[test]
    fn failed_write_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let store = ContextStore::load(blocker.join("context.json"));
        assert!(store.select_city("izmir").is_err());
        assert!(store.sign_in("secret").is_err());
        assert_eq!(store.read().unwrap(), UiContext::default());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.json");
        fs::write(&path, "{not json").unwrap();

        let store = ContextStore::load(&path);
        assert_eq!(store.read().unwrap(), UiContext::default());
    }
}
