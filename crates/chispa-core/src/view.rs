//! Cross-cutting view error policy and the stale-load guard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Every failure a view can show.
///
/// Fetch failures and missing records are rendered in place of the content;
/// authentication and authorization failures redirect away instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The backend call failed; the message is shown verbatim.
    #[error("{0}")]
    Fetch(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),
}

impl ViewError {
    pub fn fetch(error: impl std::fmt::Display) -> Self {
        ViewError::Fetch(error.to_string())
    }

    /// Where an authorization failure sends the user, if anywhere.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            ViewError::Unauthenticated(_) => Some("/login"),
            ViewError::Forbidden(_) => Some("/"),
            ViewError::Fetch(_) | ViewError::NotFound(_) => None,
        }
    }
}

/// Generation counter for the views one session has open.
///
/// Each load takes a [`LoadTicket`] before fetching. Loads never invalidate
/// each other, so any number of views may be in flight at once. Only
/// [`LoadGeneration::abandon`], called when the session ends, makes
/// outstanding tickets stale so their late results are dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadGeneration(Arc<AtomicU64>);

impl LoadGeneration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn begin(&self) -> LoadTicket {
        LoadTicket {
            counter: Arc::clone(&self.0),
            generation: self.0.load(Ordering::SeqCst),
        }
    }

    /// Invalidates every outstanding ticket.
    pub fn abandon(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct LoadTicket {
    counter: Arc<AtomicU64>,
    generation: u64,
}

impl LoadTicket {
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.generation
    }

    /// Hands `result` back only if the session has not been abandoned since.
    pub fn apply<T>(&self, result: T) -> Option<T> {
        self.is_current().then_some(result)
    }
}
