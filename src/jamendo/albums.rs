use super::{JamendoApi, JamendoError};
use crate::types::{Album, AlbumWithTracks, Track};

impl JamendoApi {
    /// Retrieves a page of albums, optionally scoped to one artist.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page number
    /// * `artist_id` - Restricts the listing to albums of this artist
    /// * `sort_method` - One of [`super::EntityKind::Album`]'s sort methods (`order`)
    /// * `search_terms` - Album name search (`namesearch`)
    ///
    /// # Example
    ///
    /// ```
    /// let albums = api.list_albums(2, None, Some("popularity_week"), None)?;
    /// ```
    pub fn list_albums(
        &self,
        page: u32,
        artist_id: Option<&str>,
        sort_method: Option<&str>,
        search_terms: Option<&str>,
    ) -> Result<Vec<Album>, JamendoError> {
        let mut params = self.page_params(page);
        params.insert("imagesize".to_string(), "400".to_string());
        if let Some(artist_id) = artist_id.filter(|v| !v.is_empty()) {
            params.insert("artist_id".to_string(), artist_id.to_string());
        }
        if let Some(sort_method) = sort_method.filter(|v| !v.is_empty()) {
            params.insert("order".to_string(), sort_method.to_string());
        }
        if let Some(search_terms) = search_terms.filter(|v| !v.is_empty()) {
            params.insert("namesearch".to_string(), search_terms.to_string());
        }

        self.api_call("albums", params)
    }

    /// Retrieves an album together with its ordered tracks in one call.
    ///
    /// Nested track records do not carry album or artist fields, so they are
    /// filled in from the parent album. An unknown album id yields a default
    /// (empty) album and no tracks.
    pub fn get_album_with_tracks(&self, album_id: &str) -> Result<(Album, Vec<Track>), JamendoError> {
        let mut params = super::Params::new();
        params.insert("id".to_string(), album_id.to_string());
        params.insert("imagesize".to_string(), "400".to_string());

        let albums: Vec<AlbumWithTracks> = self.api_call("albums/tracks", params)?;
        let Some(AlbumWithTracks { album, mut tracks }) = albums.into_iter().next() else {
            return Ok((Album::default(), Vec::new()));
        };

        for track in tracks.iter_mut() {
            if track.album_id.is_empty() {
                track.album_id = album.id.clone();
            }
            if track.album_name.is_empty() {
                track.album_name = album.name.clone();
            }
            if track.album_image.is_empty() {
                track.album_image = album.image.clone();
            }
            if track.artist_id.is_empty() {
                track.artist_id = album.artist_id.clone();
            }
            if track.artist_name.is_empty() {
                track.artist_name = album.artist_name.clone();
            }
            if track.releasedate.is_empty() {
                track.releasedate = album.releasedate.clone();
            }
        }

        Ok((album, tracks))
    }
}
