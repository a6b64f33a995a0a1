//! Notion content-hash suffix removal
//!
//! Notion appends a 32 character hex id to every exported page and database,
//! both in filenames ("Page Name 0123...cdef.md") and in the URL-escaped link
//! targets pointing at them ("Page%20Name%200123...cdef.md").

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

/// A 32 hex id, with any whitespace or `%20` escapes in front of it.
///
/// The match is purely syntactic: any 32 hex run is treated as an id.
static CONTENT_HASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s|%20)*[a-fA-F0-9]{32}").expect("valid content hash regex"));

/// Remove every Notion id from a filename, path or URL.
///
/// "123 aAbBcCdDeEfF00112233445566778899.md" -> "123.md"
///
/// Removal is repeated until nothing matches, so that removing one id can
/// never leave a new 32 hex run behind and the result is stable under a
/// second call.
pub fn strip_hash_from_path_segment(text: &str) -> Cow<'_, str> {
    let mut stripped = match CONTENT_HASH_RE.replace_all(text, "") {
        Cow::Borrowed(_) => return Cow::Borrowed(text),
        Cow::Owned(stripped) => stripped,
    };

    loop {
        let next = CONTENT_HASH_RE.replace_all(&stripped, "").into_owned();
        if next == stripped {
            return Cow::Owned(stripped);
        }
        stripped = next;
    }
}

/// Strip ids from a single path component or link segment.
///
/// A component that is nothing but an id is kept as is.
fn strip_hash_from_component(name: &str) -> Cow<'_, str> {
    match strip_hash_from_path_segment(name) {
        stripped if stripped.trim().is_empty() => Cow::Borrowed(name),
        stripped => stripped,
    }
}

/// Strip ids from every normal component of a filesystem path.
pub fn strip_hash_from_path(path: &Path) -> PathBuf {
    path.components()
        .map(|component| match component {
            Component::Normal(name) => {
                PathBuf::from(strip_hash_from_component(&name.to_string_lossy()).into_owned())
            }
            other => PathBuf::from(other.as_os_str()),
        })
        .collect()
}

/// Strip ids from a link target, one `/` separated segment at a time,
/// so a link follows the file renamed by [`strip_hash_from_path`].
pub fn strip_hash_from_link(url: &str) -> Cow<'_, str> {
    if !url.split('/').any(|segment| strip_hash_from_component(segment) != segment) {
        return Cow::Borrowed(url);
    }

    Cow::Owned(
        url.split('/')
            .map(strip_hash_from_component)
            .collect::<Vec<_>>()
            .join("/"),
    )
}

/// Output path for a converted database: ids stripped and `.csv` mapped to `.md`
pub fn board_output_path(path: &Path) -> PathBuf {
    let cleaned = strip_hash_from_path(path);
    let is_csv = cleaned
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        cleaned.with_extension("md")
    } else {
        cleaned
    }
}
