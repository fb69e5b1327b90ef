//! File-extension tables used to classify media by location.

use crate::media::MediaKind;

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "3gp", "asf", "avi", "divx", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "mts",
    "mxf", "ogm", "ogv", "rm", "rmvb", "ts", "vob", "webm", "wmv",
];

pub const AUDIO_EXTENSIONS: &[&str] = &[
    "a52", "aac", "ac3", "aiff", "amr", "ape", "dts", "flac", "m4a", "m4b", "mka", "mlp", "mp1",
    "mp2", "mp3", "oga", "ogg", "oma", "opus", "spx", "tta", "voc", "wav", "wma", "wv", "xm",
];

pub const SUBTITLE_EXTENSIONS: &[&str] = &[
    "ass", "idx", "smi", "srt", "ssa", "sub", "utf", "vtt",
];

pub const PLAYLIST_EXTENSIONS: &[&str] = &[
    "asx", "b4s", "m3u", "m3u8", "pls", "wpl", "xspf",
];

/// Classify a lowercase extension (without the dot).
pub fn kind_for_extension(ext: &str) -> MediaKind {
    if VIDEO_EXTENSIONS.contains(&ext) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        MediaKind::Audio
    } else if SUBTITLE_EXTENSIONS.contains(&ext) {
        MediaKind::Subtitle
    } else if PLAYLIST_EXTENSIONS.contains(&ext) {
        MediaKind::Playlist
    } else {
        MediaKind::Unknown
    }
}

/// Classify a location by its last path segment, ignoring any query string.
pub fn kind_for_location(location: &str) -> MediaKind {
    let segment = location.rsplit('/').next().unwrap_or(location);
    let segment = segment.split('?').next().unwrap_or(segment);
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => kind_for_extension(&ext.to_ascii_lowercase()),
        _ => MediaKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_extensions() {
        assert_eq!(kind_for_extension("mkv"), MediaKind::Video);
        assert_eq!(kind_for_extension("flac"), MediaKind::Audio);
        assert_eq!(kind_for_extension("srt"), MediaKind::Subtitle);
        assert_eq!(kind_for_extension("m3u"), MediaKind::Playlist);
        assert_eq!(kind_for_extension("pdf"), MediaKind::Unknown);
    }

    #[test]
    fn location_classification_ignores_query_strings() {
        assert_eq!(
            kind_for_location("http://host/stream/movie.mp4?token=abc"),
            MediaKind::Video
        );
        assert_eq!(kind_for_location("file:///music/track.OGG"), MediaKind::Audio);
        assert_eq!(kind_for_location("file:///no-extension"), MediaKind::Unknown);
        // A dotfile has no stem to classify.
        assert_eq!(kind_for_location("file:///music/.hidden"), MediaKind::Unknown);
    }
}
