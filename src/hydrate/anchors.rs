//! Text-anchor operations on HTML source.
//!
//! These work on literal byte sequences, not parsed markup, so a document in
//! any ASCII-compatible encoding passes through with every byte outside the
//! edited spans unchanged. Each operation either finds its anchor and returns
//! the edited bytes, or returns `None` and leaves the caller to decide what a
//! miss means.

use std::ops::Range;

/// Offset of the first occurrence of `needle` in `haystack`.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Replace the first occurrence of `needle`.
pub fn replace_first(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Option<Vec<u8>> {
    let start = find(haystack, needle)?;
    Some(splice(haystack, start..start + needle.len(), replacement))
}

/// Insert `insertion` immediately before the first occurrence of `anchor`.
pub fn insert_before(haystack: &[u8], anchor: &[u8], insertion: &[u8]) -> Option<Vec<u8>> {
    let at = find(haystack, anchor)?;
    Some(splice(haystack, at..at, insertion))
}

/// Byte range from the first `open` through the end of the first `close`
/// that follows it.
///
/// This is not a balanced search: nested or repeated tags are not considered.
pub fn find_span(haystack: &[u8], open: &[u8], close: &[u8]) -> Option<Range<usize>> {
    if close.is_empty() {
        return None;
    }
    let start = find(haystack, open)?;
    let after_open = start + open.len();
    let close_at = find(&haystack[after_open..], close)? + after_open;
    Some(start..close_at + close.len())
}

/// Replace `range` of `haystack` with `replacement`.
///
/// `range` must come from one of the search functions above.
pub fn splice(haystack: &[u8], range: Range<usize>, replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len() - range.len() + replacement.len());
    out.extend_from_slice(&haystack[..range.start]);
    out.extend_from_slice(replacement);
    out.extend_from_slice(&haystack[range.end..]);
    out
}
