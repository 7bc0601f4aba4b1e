//! # Event subscribers for the supervisor.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Supervisor ── emit(Event) ──► SubscriberSet ──► [queue] ──► worker ──► LogWriter::on_event()
//!                                              └► [queue] ──► worker ──► custom subscriber
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use signvisor::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct Alerts;
//!
//! #[async_trait]
//! impl Subscribe for Alerts {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::TickFailed {
//!             // page someone
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "alerts" }
//! }
//! ```

mod log;
mod subscriber;
mod subscriber_set;

pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
