use super::{JamendoApi, JamendoError, Params};
use crate::types::{Radio, RadioStream};

impl JamendoApi {
    /// Retrieves a page of the web radios.
    pub fn list_radios(&self, page: u32) -> Result<Vec<Radio>, JamendoError> {
        let mut params = self.page_params(page);
        params.insert("imagesize".to_string(), "150".to_string());
        params.insert("type".to_string(), "www".to_string());

        self.api_call("radios", params)
    }

    /// Resolves a radio id to its live stream URL.
    ///
    /// Returns `Ok(None)` when the radio is unknown or has no stream.
    pub fn resolve_radio_stream_url(&self, radio_id: &str) -> Result<Option<String>, JamendoError> {
        let mut params = Params::new();
        params.insert("id".to_string(), radio_id.to_string());

        let radios: Vec<RadioStream> = self.api_call("radios/stream", params)?;
        Ok(radios
            .into_iter()
            .next()
            .and_then(|radio| radio.stream)
            .filter(|stream| !stream.is_empty()))
    }
}
