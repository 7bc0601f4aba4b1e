//! # Looping playback.
//!
//! [`Playlist`] yields URLs in order and wraps to the first after the last.
//! [`Player`] runs the external media player once per URL and waits for it to
//! finish; [`play_forever`] strings the two together until cancelled.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::core::ClientCommand;
use crate::error::PlaybackError;

/// Default media player program.
pub const DEFAULT_PLAYER: &str = "omxplayer";

/// Pause after a failed play so a broken item does not spin the loop.
const FAILURE_PAUSE: Duration = Duration::from_secs(1);

/// Non-empty ordered list of URLs with a wrapping cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    urls: Vec<String>,
    cursor: usize,
}

impl Playlist {
    /// `None` when `urls` is empty.
    pub fn new(urls: Vec<String>) -> Option<Self> {
        if urls.is_empty() {
            return None;
        }
        Some(Self { urls, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// The next URL to play. Wraps around to the first after the last.
    pub fn next_url(&mut self) -> &str {
        let idx = self.cursor;
        self.cursor = (self.cursor + 1) % self.urls.len();
        &self.urls[idx]
    }
}

/// The external media player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    command: ClientCommand,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(ClientCommand::new(DEFAULT_PLAYER))
    }
}

impl Player {
    pub fn new(command: ClientCommand) -> Self {
        Self { command }
    }

    /// Player from `SIGNAGE_PLAYER` (program plus arguments), else `omxplayer`.
    pub fn from_env() -> Self {
        std::env::var("SIGNAGE_PLAYER")
            .ok()
            .and_then(|raw| ClientCommand::parse(&raw))
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn program(&self) -> &str {
        &self.command.program
    }

    /// Plays `url` to completion.
    ///
    /// The player process is killed if the returned future is dropped.
    pub async fn play(&self, url: &str) -> Result<ExitStatus, PlaybackError> {
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| self.player_error(source))?;
        child.wait().await.map_err(|source| self.player_error(source))
    }

    fn player_error(&self, source: std::io::Error) -> PlaybackError {
        PlaybackError::Player {
            program: self.command.program.clone(),
            source,
        }
    }
}

/// Plays `playlist` in a loop until `token` is cancelled.
///
/// A player that exits unsuccessfully is reported and the loop moves on to
/// the next URL. A player that cannot be started at all ends the loop with
/// an error. Returns how many plays ran to completion.
pub async fn play_forever(
    player: &Player,
    mut playlist: Playlist,
    token: CancellationToken,
) -> Result<u64, PlaybackError> {
    let mut completed = 0u64;
    loop {
        let url = playlist.next_url().to_string();
        let status = tokio::select! {
            _ = token.cancelled() => return Ok(completed),
            status = player.play(&url) => status?,
        };
        completed += 1;

        if !status.success() {
            eprintln!("[playback] {} exited with {status} for {url}", player.program());
            tokio::select! {
                _ = token.cancelled() => return Ok(completed),
                _ = tokio::time::sleep(FAILURE_PAUSE) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_wraps_to_first_after_last() {
        let mut list = Playlist::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        let order: Vec<String> = (0..7).map(|_| list.next_url().to_string()).collect();
        assert_eq!(order, vec!["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[test]
    fn single_item_playlist_repeats() {
        let mut list = Playlist::new(vec!["only".into()]).unwrap();
        assert_eq!(list.next_url(), "only");
        assert_eq!(list.next_url(), "only");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn empty_playlist_is_rejected() {
        assert!(Playlist::new(Vec::new()).is_none());
    }

    #[tokio::test]
    async fn loops_until_cancelled() {
        let player = Player::new(ClientCommand::new("true"));
        let list = Playlist::new(vec!["a".into(), "b".into()]).unwrap();
        let token = CancellationToken::new();

        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let completed = play_forever(&player, list, token).await.unwrap();
        assert!(completed >= 2, "expected several plays, got {completed}");
    }

    #[tokio::test]
    async fn cancellation_stops_a_running_player() {
        let player = Player::new(ClientCommand::new("sleep"));
        let list = Playlist::new(vec!["30".into()]).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let completed = tokio::time::timeout(
            Duration::from_secs(5),
            play_forever(&player, list, token),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(completed, 0);
    }

    #[tokio::test]
    async fn missing_player_is_an_error() {
        let player = Player::new(ClientCommand::new("/nonexistent/omxplayer"));
        let list = Playlist::new(vec!["a".into()]).unwrap();
        let err = play_forever(&player, list, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PlaybackError::Player { ref program, .. } if program == "/nonexistent/omxplayer"));
    }
}
