//! Extension to MIME type mapping for package-manifest assets.
//!
//! This table doubles as the allow-list: an emitted file whose extension has
//! no entry here is silently left out of the `<manifest>` element.

/// Look up the media type for a file extension.
///
/// Extensions are matched case-insensitively. Returns `None` for anything
/// an EPUB reader cannot be expected to handle.
pub fn media_type(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "html" | "xhtml" => Some("application/xhtml+xml"),
        "js" => Some("application/javascript"),
        "css" => Some("text/css"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        "webp" => Some("image/webp"),
        "woff" => Some("font/woff"),
        "woff2" => Some("font/woff2"),
        "ttf" => Some("font/ttf"),
        "otf" => Some("font/otf"),
        "mp3" => Some("audio/mpeg"),
        "mp4" => Some("video/mp4"),
        _ => None,
    }
}
