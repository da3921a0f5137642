use url::Url;

/// Last path segment of `url`, verbatim (no percent-decoding).
/// Returns `None` when the URL has no usable segment.
pub fn file_name_from_url(url: &Url) -> Option<String> {
    let name = url.path_segments()?.next_back()?;
    match name {
        "" | "." | ".." => None,
        _ => Some(name.to_string()),
    }
}
