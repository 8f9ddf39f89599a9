use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    cli::auth::login_if_needed,
    config, error, generator, info,
    management::TokenStore,
    openai::ChatClient,
    spotify::{SessionManager, playlist},
    success,
    types::{Generation, Playlist},
    utils, warning,
};

pub async fn generate(mood: String, publish: bool) {
    let openai = match config::openai() {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    // fail on missing Spotify credentials before spending a chat completion
    let spotify = if publish {
        match config::spotify() {
            Ok(c) => Some(c),
            Err(e) => error!("{}", e),
        }
    } else {
        None
    };

    let client = match ChatClient::new(openai) {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Generating playlist with {}...", client.model()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let Generation {
        playlist: generated,
        failure,
    } = generator::generate_playlist(&client, &mood).await;

    spinner.finish_and_clear();

    if let Some(failure) = failure {
        warning!("{}", failure);
        if let Some(raw) = failure.raw_text() {
            warning!("Raw model output:\n{}", raw);
        }
    }

    print_playlist(&generated);

    let Some(spotify) = spotify else {
        return;
    };

    if generated.songs.is_empty() {
        warning!("Nothing to publish.");
        return;
    }

    let session = SessionManager::restore(spotify, TokenStore::default())
        .await
        .shared();

    if let Err(e) = login_if_needed(&session).await {
        error!("{}", e);
    }

    let mut session = session.lock().await;
    match playlist::publish(&mut session, &generated).await {
        Ok(report) => {
            let skipped = report.skipped().len();
            if skipped > 0 {
                info!("{} of {} songs not found on Spotify", skipped, report.tracks.len());
            }
            success!("Playlist created with {} tracks: {}", report.added, report.url());
        }
        Err(e) => error!("Cannot publish playlist: {}", e),
    }
}

fn print_playlist(playlist: &Playlist) {
    if !playlist.title.is_empty() {
        success!("{}", playlist.title);
    }
    if !playlist.description.is_empty() {
        println!("{}\n", playlist.description);
    }

    if playlist.songs.is_empty() {
        info!("No songs to show.");
        return;
    }

    println!("{}", Table::new(utils::song_rows(playlist)));
}
