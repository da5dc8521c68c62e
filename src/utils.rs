use crate::types::MusicInfo;

/// Extracts the year from a `YYYY-MM-DD` date; absent or malformed dates yield 0.
pub fn release_year(date: &str) -> i32 {
    date.split('-')
        .next()
        .and_then(|year| year.trim().parse::<i32>().ok())
        .unwrap_or(0)
}

/// Fixes whitespace in artwork URLs; an empty URL means "no artwork".
pub fn image_url(url: &str) -> Option<String> {
    if url.trim().is_empty() {
        None
    } else {
        Some(url.replace(' ', "%20"))
    }
}

/// Composes the multi-line comment shown in the track info dialog.
pub fn music_comment(musicinfo: &MusicInfo) -> String {
    [
        format!("Language: {}", musicinfo.lang),
        format!("Instruments: {}", musicinfo.tags.instruments.join(", ")),
        format!("Tags: {}", musicinfo.tags.vartags.join(", ")),
    ]
    .join("\n")
}

/// Formats seconds as `m:ss` (or `h:mm:ss`).
pub fn format_duration(seconds: u32) -> String {
    let (hours, minutes, seconds) = (seconds / 3600, (seconds / 60) % 60, seconds % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Replaces characters that are not allowed in file names on common platforms.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_matches('.').trim();
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
