//! Playback client library.
//!
//! Used by the `signage-playback` binary, which the supervisor launches for
//! devices in `video` mode.
//!
//! ## Contents
//! - [`ManifestResolver`] turns media-portal page URLs into playable ones
//! - [`Playlist`] ordered URLs, wrapping after the last
//! - [`Player`] / [`play_forever`] runs the external media player in a loop

mod manifest;
mod player;

pub use manifest::{DEFAULT_MANIFEST_BASE, ManifestResolver, media_url, portal_entry};
pub use player::{DEFAULT_PLAYER, Player, Playlist, play_forever};
