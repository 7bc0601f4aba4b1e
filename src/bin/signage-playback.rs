//! Playback client: `signage-playback <url>...`
//!
//! Resolves media-portal URLs to playable ones, then loops the media player
//! over all of them until terminated.

use std::process::ExitCode;

use signvisor::{ManifestResolver, Player, Playlist, listen_for_shutdown, play_forever};

const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("No urls submitted.");
        eprintln!("usage: signage-playback <url>...");
        return ExitCode::from(EXIT_USAGE);
    }

    let resolver = ManifestResolver::default();
    let mut urls = Vec::with_capacity(args.len());
    for url in &args {
        match resolver.resolve(url).await {
            Ok(playable) => urls.push(playable),
            Err(e) => eprintln!("[playback] skipping {url}: {e}"),
        }
    }
    let Some(playlist) = Playlist::new(urls) else {
        eprintln!("[playback] none of the {} url(s) could be resolved", args.len());
        return ExitCode::FAILURE;
    };

    let token = match listen_for_shutdown() {
        Ok(token) => token,
        Err(e) => {
            eprintln!("[playback] cannot install signal handlers: {e}");
            return ExitCode::FAILURE;
        }
    };

    let player = Player::from_env();
    match play_forever(&player, playlist, token).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[playback] {e}");
            ExitCode::FAILURE
        }
    }
}
