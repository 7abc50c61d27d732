use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

static MIME_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("html", "text/html; charset=utf-8"),
        ("htm", "text/html; charset=utf-8"),
        ("css", "text/css; charset=utf-8"),
        ("js", "text/javascript; charset=utf-8"),
        ("json", "application/json"),
        ("xml", "text/xml; charset=utf-8"),
        ("txt", "text/plain; charset=utf-8"),
        ("ico", "image/x-icon"),
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("gif", "image/gif"),
        ("svg", "image/svg+xml"),
        ("webp", "image/webp"),
        ("pdf", "application/pdf"),
        ("wasm", "application/wasm"),
        ("woff", "font/woff"),
        ("woff2", "font/woff2"),
        ("ttf", "font/ttf"),
    ]
    .into_iter()
    .collect()
});

/// Content type for a file, by extension (case-insensitive).
pub fn mime_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| MIME_TYPES.get(ext.to_ascii_lowercase().as_str()))
        .copied()
        .unwrap_or(DEFAULT_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(mime_type_for(Path::new("/a/index.html")), "text/html; charset=utf-8");
        assert_eq!(mime_type_for(Path::new("logo.PNG")), "image/png");
        assert_eq!(mime_type_for(Path::new("photo.jpeg")), "image/jpeg");
    }

    #[test]
    fn unknown_or_missing_extension() {
        assert_eq!(mime_type_for(Path::new("archive.xyz")), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for(Path::new("README")), DEFAULT_MIME_TYPE);
    }
}
