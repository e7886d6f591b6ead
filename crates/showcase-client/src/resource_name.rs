//! Path templates for the resource-name demo.
//!
//! The service echoes these strings back untouched; rendering and parsing
//! only exist on the client side.

const ID_SEGMENT: &str = "id/";
const SINGLE_SUFFIX: &str = "/single";
const FIRST_SUFFIX: &str = "/first";

/// Renders `id/{id}/single`.
pub fn single_path(id: &str) -> String {
    format!("{ID_SEGMENT}{id}{SINGLE_SUFFIX}")
}

/// Renders `id/{id}/first`.
pub fn first_path(id: &str) -> String {
    format!("{ID_SEGMENT}{id}{FIRST_SUFFIX}")
}

/// Recovers `id` from a path rendered by [`single_path`].
pub fn parse_single_path(path: &str) -> Option<&str> {
    parse(path, SINGLE_SUFFIX)
}

/// Recovers `id` from a path rendered by [`first_path`].
pub fn parse_first_path(path: &str) -> Option<&str> {
    parse(path, FIRST_SUFFIX)
}

fn parse<'a>(path: &'a str, suffix: &str) -> Option<&'a str> {
    let id = path.strip_prefix(ID_SEGMENT)?.strip_suffix(suffix)?;
    // a single path segment, never empty
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(id)
}
