//! # Revision source abstraction.
//!
//! A [`RevisionSource`] wraps one version-controlled directory.
//!
//! ## Rules
//! - `pull` reports informational stderr in [`PullReport`] instead of failing.
//! - `current_revision` fails loudly; the tick is aborted.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RevisionError;

/// Shared handle to a revision source.
pub type RevisionRef = Arc<dyn RevisionSource>;

/// Outcome of a successful pull.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullReport {
    /// Diagnostics the update command wrote to stderr, if any.
    pub stderr: Option<String>,
}

/// # A version-controlled directory.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use signvisor::{PullReport, RevisionError, RevisionSource};
///
/// struct Pinned;
///
/// #[async_trait]
/// impl RevisionSource for Pinned {
///     fn name(&self) -> &str { "pinned" }
///     async fn pull(&self) -> Result<PullReport, RevisionError> { Ok(PullReport::default()) }
///     async fn current_revision(&self) -> Result<String, RevisionError> { Ok("v1".into()) }
/// }
/// ```
#[async_trait]
pub trait RevisionSource: Send + Sync + 'static {
    /// Human-readable location (usually the directory path) for logs.
    fn name(&self) -> &str;

    /// Fetches and applies the latest revision.
    async fn pull(&self) -> Result<PullReport, RevisionError>;

    /// Returns the id of the revision currently checked out.
    async fn current_revision(&self) -> Result<String, RevisionError>;
}

/// Revision source that never changes and never runs commands.
#[derive(Debug, Clone)]
pub struct StaticRevision {
    revision: String,
}

impl StaticRevision {
    pub fn new(revision: impl Into<String>) -> Self {
        Self {
            revision: revision.into(),
        }
    }

    /// Creates the source and returns it as a shared handle.
    pub fn arc(revision: impl Into<String>) -> RevisionRef {
        Arc::new(Self::new(revision))
    }
}

#[async_trait]
impl RevisionSource for StaticRevision {
    fn name(&self) -> &str {
        "static"
    }

    async fn pull(&self) -> Result<PullReport, RevisionError> {
        Ok(PullReport::default())
    }

    async fn current_revision(&self) -> Result<String, RevisionError> {
        Ok(self.revision.clone())
    }
}
