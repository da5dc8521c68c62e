use super::{AudioFormat, JamendoApi, JamendoError, Params};
use crate::{debug, types::Track};

impl JamendoApi {
    /// Retrieves a page of tracks including their music info.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page number
    /// * `sort_method` - One of the track sort methods (`order`)
    /// * `filter` - Generic key/value refinement merged last, so it may
    ///   override shared parameters. Typical filters are `album_id`,
    ///   `artist_id`, `search` or an `id` set joined by `+`.
    ///
    /// # Example
    ///
    /// ```
    /// let mut filter = Params::new();
    /// filter.insert("album_id".to_string(), "24".to_string());
    /// let tracks = api.list_tracks(1, None, Some(&filter))?;
    /// ```
    pub fn list_tracks(
        &self,
        page: u32,
        sort_method: Option<&str>,
        filter: Option<&Params>,
    ) -> Result<Vec<Track>, JamendoError> {
        let mut params = self.page_params(page);
        params.insert("include".to_string(), "musicinfo".to_string());
        if let Some(sort_method) = sort_method.filter(|v| !v.is_empty()) {
            params.insert("order".to_string(), sort_method.to_string());
        }
        if let Some(filter) = filter {
            params.extend(filter.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        self.api_call("tracks", params)
    }

    /// Full-text track search (`search` filter).
    pub fn search_tracks(&self, search_terms: &str, page: u32) -> Result<Vec<Track>, JamendoError> {
        let mut filter = Params::new();
        filter.insert("search".to_string(), search_terms.to_string());
        self.list_tracks(page, None, Some(&filter))
    }

    /// Retrieves a page of tracks similar to `track_id`.
    pub fn list_similar_tracks(&self, track_id: &str, page: u32) -> Result<Vec<Track>, JamendoError> {
        let mut params = self.page_params(page);
        params.insert("id".to_string(), track_id.to_string());
        params.insert(
            "audioformat".to_string(),
            self.config.audio_format().as_str().to_string(),
        );
        params.insert("imagesize".to_string(), "400".to_string());

        self.api_call("tracks/similar", params)
    }

    /// Resolves a track id to a directly playable stream location.
    ///
    /// The `tracks/file` resource answers with a redirect to the audio file;
    /// only its target is captured, the audio payload is never requested.
    pub fn resolve_track_stream_url(
        &self,
        track_id: &str,
        audio_format: AudioFormat,
    ) -> Result<String, JamendoError> {
        let mut params = Params::new();
        params.insert("audioformat".to_string(), audio_format.as_str().to_string());
        params.insert("id".to_string(), track_id.to_string());

        let target_url = self.api_redirect("tracks/file", params)?;
        debug!("resolve_track_stream_url target_url: {}", target_url);
        Ok(target_url)
    }
}
