use super::{Action, ContextAction, InfoLabels, ListingEntry};
use crate::{
    navigation::{Endpoint, NavigationTarget},
    types::{Album, Artist, DownloadedTrack, Playlist, Radio, Track},
    utils,
};

fn settings_action() -> ContextAction {
    ContextAction::new(
        "Settings",
        Action::Run(NavigationTarget::new(Endpoint::OpenSettings)),
    )
}

fn albums_by_artist_action(artist_id: &str) -> ContextAction {
    ContextAction::new(
        "Show albums by this artist",
        Action::View(
            NavigationTarget::new(Endpoint::ShowAlbumsByArtist).with_param("artist_id", artist_id),
        ),
    )
}

fn tracks_in_album_action(album_id: &str) -> ContextAction {
    ContextAction::new(
        "Show tracks in this album",
        Action::View(
            NavigationTarget::new(Endpoint::ShowTracksInAlbum).with_param("album_id", album_id),
        ),
    )
}

fn track_context_menu(track: &Track) -> Vec<ContextAction> {
    let mut actions = vec![ContextAction::new("Song info", Action::Info)];
    if !track.artist_id.is_empty() {
        actions.push(albums_by_artist_action(&track.artist_id));
    }
    actions.push(ContextAction::new(
        "Show similar tracks",
        Action::View(
            NavigationTarget::new(Endpoint::ShowSimilarTracks).with_param("track_id", &track.id),
        ),
    ));
    if !track.album_id.is_empty() {
        actions.push(tracks_in_album_action(&track.album_id));
    }
    actions.push(ContextAction::new(
        "Download track",
        Action::Run(NavigationTarget::new(Endpoint::DownloadTrack).with_param("track_id", &track.id)),
    ));
    actions.push(settings_action());
    actions
}

fn play_track_target(track_id: &str) -> NavigationTarget {
    NavigationTarget::new(Endpoint::PlayTrack).with_param("track_id", track_id)
}

/// Top-level menu entry leading to another listing.
pub fn menu_item(label: &str, endpoint: Endpoint) -> ListingEntry {
    ListingEntry::new(label, NavigationTarget::new(endpoint))
}

/// Formats tracks as `artist - name (album)` entries.
///
/// Genre and comment are only filled when the record carries music info
/// (the `tracks` resource does, `tracks/similar` does not).
pub fn format_tracks(tracks: &[Track]) -> Vec<ListingEntry> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| ListingEntry {
            label: format!(
                "{} - {} ({})",
                track.artist_name, track.name, track.album_name
            ),
            info: InfoLabels {
                count: i + 2,
                title: Some(track.name.clone()),
                album: Some(track.album_name.clone()),
                artist: Some(track.artist_name.clone()),
                duration: Some(track.duration),
                year: Some(utils::release_year(&track.releasedate)),
                genre: track
                    .musicinfo
                    .as_ref()
                    .map(|info| info.tags.genres.join(", ")),
                comment: track.musicinfo.as_ref().map(utils::music_comment),
                ..InfoLabels::default()
            },
            context_menu: track_context_menu(track),
            thumbnail: utils::image_url(&track.album_image),
            is_playable: true,
            target: play_track_target(&track.id),
        })
        .collect()
}

pub fn format_albums(albums: &[Album]) -> Vec<ListingEntry> {
    albums
        .iter()
        .enumerate()
        .map(|(i, album)| {
            let mut context_menu = vec![
                ContextAction::new("Album info", Action::Info),
                tracks_in_album_action(&album.id),
            ];
            if !album.artist_id.is_empty() {
                context_menu.push(albums_by_artist_action(&album.artist_id));
            }
            context_menu.push(settings_action());

            ListingEntry {
                label: format!("{} - {}", album.artist_name, album.name),
                info: InfoLabels {
                    count: i + 2,
                    artist: Some(album.artist_name.clone()),
                    album: Some(album.name.clone()),
                    year: Some(utils::release_year(&album.releasedate)),
                    ..InfoLabels::default()
                },
                context_menu,
                thumbnail: utils::image_url(&album.image),
                is_playable: false,
                target: NavigationTarget::new(Endpoint::ShowTracksInAlbum)
                    .with_param("album_id", &album.id),
            }
        })
        .collect()
}

pub fn format_playlists(playlists: &[Playlist]) -> Vec<ListingEntry> {
    playlists
        .iter()
        .enumerate()
        .map(|(i, playlist)| ListingEntry {
            label: format!("{} ({})", playlist.name, playlist.user_name),
            info: InfoLabels {
                count: i + 2,
                artist: Some(playlist.user_name.clone()),
                album: Some(playlist.name.clone()),
                year: Some(utils::release_year(&playlist.creationdate)),
                ..InfoLabels::default()
            },
            context_menu: vec![settings_action()],
            thumbnail: None,
            is_playable: false,
            target: NavigationTarget::new(Endpoint::ShowTracksInPlaylist)
                .with_param("playlist_id", &playlist.id),
        })
        .collect()
}

pub fn format_artists(artists: &[Artist]) -> Vec<ListingEntry> {
    artists
        .iter()
        .enumerate()
        .map(|(i, artist)| ListingEntry {
            label: artist.name.clone(),
            info: InfoLabels {
                count: i + 2,
                artist: Some(artist.name.clone()),
                ..InfoLabels::default()
            },
            context_menu: vec![albums_by_artist_action(&artist.id), settings_action()],
            thumbnail: utils::image_url(&artist.image),
            is_playable: false,
            target: NavigationTarget::new(Endpoint::ShowAlbumsByArtist)
                .with_param("artist_id", &artist.id),
        })
        .collect()
}

pub fn format_radios(radios: &[Radio]) -> Vec<ListingEntry> {
    radios
        .iter()
        .enumerate()
        .map(|(i, radio)| {
            let label = if radio.dispname.is_empty() {
                &radio.name
            } else {
                &radio.dispname
            };

            ListingEntry {
                label: label.clone(),
                info: InfoLabels {
                    count: i + 2,
                    ..InfoLabels::default()
                },
                context_menu: vec![settings_action()],
                thumbnail: utils::image_url(&radio.image),
                is_playable: true,
                target: NavigationTarget::new(Endpoint::PlayRadio).with_param("radio_id", &radio.id),
            }
        })
        .collect()
}

/// Formats the tracks of a playlist with their playlist position.
pub fn format_playlist_tracks(playlist: &Playlist, tracks: &[Track]) -> Vec<ListingEntry> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| ListingEntry {
            label: track.name.clone(),
            info: InfoLabels {
                count: i + 2,
                tracknumber: Some(track.position),
                duration: Some(track.duration),
                playlist: Some(playlist.name.clone()),
                ..InfoLabels::default()
            },
            context_menu: track_context_menu(track),
            thumbnail: utils::image_url(&track.album_image),
            is_playable: true,
            target: play_track_target(&track.id),
        })
        .collect()
}

/// Formats entries of the downloaded-tracks index; they play the local file.
pub fn format_downloads(downloads: &[DownloadedTrack]) -> Vec<ListingEntry> {
    downloads
        .iter()
        .enumerate()
        .map(|(i, download)| {
            let track = &download.track;
            ListingEntry {
                label: format!("{} - {}", track.artist_name, track.name),
                info: InfoLabels {
                    count: i + 2,
                    title: Some(track.name.clone()),
                    artist: Some(track.artist_name.clone()),
                    album: Some(track.album_name.clone()),
                    duration: Some(track.duration),
                    year: Some(utils::release_year(&track.releasedate)),
                    comment: Some(download.path.display().to_string()),
                    ..InfoLabels::default()
                },
                context_menu: track_context_menu(track),
                thumbnail: utils::image_url(&track.album_image),
                is_playable: true,
                target: NavigationTarget::new(Endpoint::PlayDownloaded)
                    .with_param("track_id", &track.id),
            }
        })
        .collect()
}
