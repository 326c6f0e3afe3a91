//! Fetch-then-render flow as an explicit state machine.

use std::fmt::Display;
use std::future::Future;

use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot finish a load that was never started")]
pub struct NotLoading;

impl<T> LoadState<T> {
    /// Enters `Loading`. Allowed from every state; from a finished state it is a reload.
    pub fn start(&mut self) {
        *self = Self::Loading;
    }

    /// `Loading` → `Success` / `Failed`. Any other state is left untouched.
    pub fn finish<E: Display>(&mut self, result: Result<T, E>) -> Result<(), NotLoading> {
        if !self.is_loading() {
            return Err(NotLoading);
        }
        *self = match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failed(err.to_string()),
        };
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Publishes [`LoadState`] transitions to any number of subscribers.
pub struct Loader<T> {
    tx: watch::Sender<LoadState<T>>,
}

impl<T> Default for Loader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Loader<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LoadState::Idle);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> LoadState<T>
    where
        T: Clone,
    {
        self.tx.borrow().clone()
    }

    pub fn reset(&self) {
        self.tx.send_modify(LoadState::reset);
    }

    /// Runs `fetch` through `Loading` and records its outcome.
    pub async fn run<F, E>(&self, fetch: F)
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.tx.send_modify(LoadState::start);
        debug!("load started");

        let result = fetch.await;
        if let Err(err) = &result {
            warn!("load failed: {err}");
        }

        self.tx.send_modify(|state| {
            if state.finish(result).is_err() {
                debug!("load finished after reset; result dropped");
            }
        });
    }
}
