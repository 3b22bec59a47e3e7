//! Media URL resolution
//!
//! Upload providers return either absolute URLs (object storage, CDN) or
//! paths relative to the backend origin. Rendering code only ever sees
//! absolute URLs.

use url::Url;

/// Join a relative media path with the backend origin
///
/// Absolute URLs are returned unchanged, so resolving twice is a no-op.
pub fn resolve_media_url(base: &Url, raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    match Url::parse(raw) {
        Ok(_) => raw.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base.join(&origin_relative(raw)) {
            Ok(joined) => joined.to_string(),
            Err(e) => {
                tracing::warn!(path = %raw, error = %e, "Could not resolve media path");
                raw.to_string()
            }
        },
        Err(e) => {
            tracing::warn!(path = %raw, error = %e, "Unparsable media URL");
            raw.to_string()
        }
    }
}

/// Upload paths hang off the origin even when the base carries a path
fn origin_relative(raw: &str) -> String {
    if raw.starts_with("//") {
        raw.to_string()
    } else {
        format!("/{}", raw.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://cms.example.org:1337").unwrap()
    }

    #[test]
    fn test_relative_path_is_joined() {
        assert_eq!(
            resolve_media_url(&base(), "/uploads/photo_ab12.jpg"),
            "http://cms.example.org:1337/uploads/photo_ab12.jpg"
        );
    }

    #[test]
    fn test_path_without_leading_slash() {
        assert_eq!(
            resolve_media_url(&base(), "uploads/logo.svg"),
            "http://cms.example.org:1337/uploads/logo.svg"
        );
    }

    #[test]
    fn test_absolute_url_unchanged() {
        let cdn = "https://cdn.example.net/bucket/photo.jpg?v=2";
        assert_eq!(resolve_media_url(&base(), cdn), cdn);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let once = resolve_media_url(&base(), "/uploads/a.png");
        let twice = resolve_media_url(&base(), &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_protocol_relative_takes_base_scheme() {
        assert_eq!(
            resolve_media_url(&base(), "//cdn.example.net/a.png"),
            "http://cdn.example.net/a.png"
        );
    }

    #[test]
    fn test_base_with_path_uses_origin() {
        let base = Url::parse("https://example.org/cms/").unwrap();
        assert_eq!(
            resolve_media_url(&base, "/uploads/a.png"),
            "https://example.org/uploads/a.png"
        );
    }

    #[test]
    fn test_bare_path_with_base_path_uses_origin() {
        let base = Url::parse("https://x.org/cms/").unwrap();
        assert_eq!(resolve_media_url(&base, "uploads/a.png"), "https://x.org/uploads/a.png");
    }
}
