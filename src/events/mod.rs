//! Supervisor events: what happened during a tick.
//!
//! The supervisor never formats log text itself. It emits [`Event`]s into a
//! [`SubscriberSet`](crate::SubscriberSet); subscribers such as
//! [`LogWriter`](crate::LogWriter) turn them into output.
//!
//! ## Contents
//! - [`EventKind`] event classification
//! - [`Event`] kind plus optional metadata, ordered by `seq`

mod event;

pub use event::{Event, EventKind};
