//! Durable supervisor state.
//!
//! ## Contents
//! - [`SupervisorState`] last software/config revisions already acted upon
//! - [`StateStore`] loads and atomically saves it under `<work_dir>/tmp/`

mod state;

pub use state::{StateStore, SupervisorState};
pub(crate) use state::SCRATCH_DIR;
