use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Jamendo is loose with JSON types: ids and positions show up both as numbers
// and as strings, and optional fields are sometimes `null`.
fn de_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

fn de_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn de_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_u32")]
    pub duration: u32,
    #[serde(default, deserialize_with = "de_string")]
    pub artist_id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub artist_name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub album_id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub album_name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub album_image: String,
    #[serde(default, deserialize_with = "de_string")]
    pub releasedate: String,
    #[serde(default, deserialize_with = "de_u32")]
    pub position: u32,
    #[serde(default)]
    pub musicinfo: Option<MusicInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicInfo {
    #[serde(default, deserialize_with = "de_string")]
    pub lang: String,
    #[serde(default)]
    pub tags: MusicTags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicTags {
    #[serde(default, deserialize_with = "de_strings")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "de_strings")]
    pub instruments: Vec<String>,
    #[serde(default, deserialize_with = "de_strings")]
    pub vartags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub artist_id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub artist_name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub image: String,
    #[serde(default, deserialize_with = "de_string")]
    pub releasedate: String,
}

/// Album record of the `albums/tracks` resource, with its tracks nested.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumWithTracks {
    #[serde(flatten)]
    pub album: Album,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub image: String,
    #[serde(default, deserialize_with = "de_string")]
    pub joindate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub user_name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub creationdate: String,
}

/// Playlist record of the `playlists/tracks` resource, with its tracks nested.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistWithTracks {
    #[serde(flatten)]
    pub playlist: Playlist,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Radio {
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub dispname: String,
    #[serde(default, deserialize_with = "de_string")]
    pub image: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RadioStream {
    #[serde(default, deserialize_with = "de_string")]
    pub id: String,
    #[serde(default)]
    pub stream: Option<String>,
}

/// Outer JSON envelope returned by every Jamendo resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub headers: ResponseHeaders,
    #[serde(default)]
    pub results: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseHeaders {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub warnings: Option<Value>,
    #[serde(default)]
    pub results_count: Option<u64>,
}

/// Entry of the downloaded-tracks index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadedTrack {
    pub path: PathBuf,
    pub track: Track,
    pub downloaded_at: i64,
}
