use super::{JamendoApi, JamendoError, Params};
use crate::types::{Playlist, PlaylistWithTracks, Track};

impl JamendoApi {
    /// Retrieves a page of playlists, optionally filtered by name.
    pub fn list_playlists(
        &self,
        page: u32,
        search_terms: Option<&str>,
    ) -> Result<Vec<Playlist>, JamendoError> {
        let mut params = self.page_params(page);
        if let Some(search_terms) = search_terms.filter(|v| !v.is_empty()) {
            params.insert("namesearch".to_string(), search_terms.to_string());
        }

        self.api_call("playlists", params)
    }

    /// Retrieves a playlist together with its ordered tracks in one call.
    ///
    /// An unknown playlist id yields a default (empty) playlist and no tracks.
    pub fn get_playlist_with_tracks(
        &self,
        playlist_id: &str,
    ) -> Result<(Playlist, Vec<Track>), JamendoError> {
        let mut params = Params::new();
        params.insert("id".to_string(), playlist_id.to_string());

        let playlists: Vec<PlaylistWithTracks> = self.api_call("playlists/tracks", params)?;
        Ok(playlists
            .into_iter()
            .next()
            .map(|p| (p.playlist, p.tracks))
            .unwrap_or_default())
    }
}
