use super::{JamendoApi, JamendoError};
use crate::types::Artist;

impl JamendoApi {
    /// Retrieves a page of artists.
    ///
    /// `sort_method` maps to `order`, `search_terms` to `namesearch`.
    pub fn list_artists(
        &self,
        page: u32,
        sort_method: Option<&str>,
        search_terms: Option<&str>,
    ) -> Result<Vec<Artist>, JamendoError> {
        let mut params = self.page_params(page);
        if let Some(sort_method) = sort_method.filter(|v| !v.is_empty()) {
            params.insert("order".to_string(), sort_method.to_string());
        }
        if let Some(search_terms) = search_terms.filter(|v| !v.is_empty()) {
            params.insert("namesearch".to_string(), search_terms.to_string());
        }

        self.api_call("artists", params)
    }
}
