//! Revision sources: "pull latest" and "which revision is checked out".
//!
//! ## Contents
//! - [`RevisionSource`] the async trait the supervisor talks to
//! - [`GitRepo`] runs `git pull` / `git rev-parse HEAD` in a directory
//! - [`StaticRevision`] fixed revision, no commands (debug mode)
//!
//! The supervisor holds two sources: one for its own installation
//! directory and one for the configuration repository.

mod git;
mod source;

pub use git::GitRepo;
pub use source::{PullReport, RevisionRef, RevisionSource, StaticRevision};
