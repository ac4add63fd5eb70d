// Rootline - core/media.rs
//
// Out-of-band media attachment. Imports never populate media; display
// layers call in here after the user uploads files for an event.

use crate::core::ids::IdGenerator;
use crate::core::model::{MediaItem, MediaKind, PersonRecord};
use chrono::{DateTime, Utc};
use std::path::Path;

const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic", "bmp", "tif", "tiff"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg", "flac"];

/// Classifies a file by MIME type, falling back to its extension.
/// Anything unrecognised is a document.
pub fn infer_media_kind(file_name: &str, mime_type: Option<&str>) -> MediaKind {
    if let Some(mime) = mime_type {
        let mime = mime.to_ascii_lowercase();
        if mime.starts_with("image/") {
            return MediaKind::Photo;
        }
        if mime.starts_with("video/") {
            return MediaKind::Video;
        }
        if mime.starts_with("audio/") {
            return MediaKind::Audio;
        }
    }

    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Photo
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Audio
    } else {
        MediaKind::Document
    }
}

/// Builds a media item with a fresh id.
pub fn new_media_item(
    ids: &mut dyn IdGenerator,
    name: &str,
    mime_type: Option<&str>,
    url: impl Into<String>,
    now: DateTime<Utc>,
) -> MediaItem {
    MediaItem {
        id: ids.next_id("m"),
        name: name.to_string(),
        kind: infer_media_kind(name, mime_type),
        url: url.into(),
        created_at: now,
    }
}

/// Appends `items` to the event `event_id` on `person`.
///
/// Returns how many items were attached: zero when the event does not exist.
pub fn attach_media(person: &mut PersonRecord, event_id: &str, items: Vec<MediaItem>) -> usize {
    match person.event_mut(event_id) {
        Some(event) => {
            let count = items.len();
            event.media.extend(items);
            tracing::debug!(event_id = %event_id, count, "Media attached to event");
            count
        }
        None => {
            tracing::warn!(event_id = %event_id, "Cannot attach media: event not found");
            0
        }
    }
}
