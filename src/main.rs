//! Console front-end: scans the configured library and prints what the
//! managers know. The desktop UI drives the same crate surface.

use log::info;

use tunedeck::favorites_manager::FavoritesManager;
use tunedeck::library_manager::LibraryManager;
use tunedeck::playlist_manager::PlaylistManager;
use tunedeck::runtime_config::{config_file_path, Config};

fn main() {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Info);
    clog.init();

    let config = Config::load_or_default(&config_file_path());
    info!(
        "Scanning music directory {}",
        config.music_directory.display()
    );

    let mut library = LibraryManager::new(&config.music_directory, config.fold_extension_case);
    let songs = library.scan_library();
    println!("{} song(s) indexed", songs.len());

    for artist in library.artists() {
        println!("{artist}");
        for (album, tracks) in library.albums_by_artist(&artist) {
            println!("  {} ({} track(s))", album, tracks.len());
        }
    }

    let playlists = PlaylistManager::load(&config.playlists_file);
    let names = playlists.playlist_names();
    if !names.is_empty() {
        println!("Playlists:");
        for name in names {
            println!("  {} ({} song(s))", name, playlists.playlist_songs(&name).len());
        }
    }

    let favorites = FavoritesManager::load(&config.favorites_file, config.favorites_max_size);
    let ranking = favorites.top_favorites();
    if !ranking.is_empty() {
        println!("Most played:");
        for (path, count) in ranking {
            println!("  {} ({count} play(s))", path.display());
        }
    }
}
