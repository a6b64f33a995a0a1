//! Markdown link rewriting
//!
//! Notion links between exported pages point at the id-suffixed filenames.
//! Once the files are renamed the links have to follow.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use super::hash::strip_hash_from_link;

/// `[title](url)`, narrowest match per bracket pair
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid markdown link regex"));

/// Rewrite the links of a single line.
///
/// Every link whose target changes when its ids are stripped has all
/// literal occurrences of that target in the line replaced. A path segment
/// made only of an id is kept, matching the renamed files. Returns the
/// number of rewritten link targets with the line.
pub fn rewrite_line(line: &str) -> (Cow<'_, str>, usize) {
    let mut rewritten = Cow::Borrowed(line);
    let mut count = 0;

    for caps in MARKDOWN_LINK_RE.captures_iter(line) {
        let title = &caps[1];
        let url = &caps[2];
        let stripped = strip_hash_from_link(url);

        if stripped == url {
            continue;
        }

        log::debug!("Rewriting link '{}': {} -> {}", title, url, stripped);
        rewritten = Cow::Owned(rewritten.replace(url, &stripped));
        count += 1;
    }

    (rewritten, count)
}

/// Rewrite a whole markdown document held in memory.
///
/// Lines keep their terminators, so the output differs from the input only
/// inside rewritten links.
pub fn rewrite_markdown(markdown: &str) -> (String, usize) {
    let mut output = String::with_capacity(markdown.len());
    let mut count = 0;

    for line in markdown.split_inclusive('\n') {
        let (line, rewritten) = rewrite_line(line);
        output.push_str(&line);
        count += rewritten;
    }

    (output, count)
}
