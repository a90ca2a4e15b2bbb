//! Output-tree path construction.
//!
//! Paths in the output container are built by string concatenation of the
//! parent path and a child key (set name, instance name, step name, frame
//! increment number). The underlying store uses `/` as its hierarchy
//! separator, so any `/` inside a key is replaced with `|` before the key
//! becomes a path component.

use std::borrow::Cow;

/// Hierarchy separator of the output store.
pub const SEPARATOR: char = '/';

/// Replacement for separators that occur inside a path segment.
pub const SEGMENT_ESCAPE: char = '|';

/// Escape a single path segment.
///
/// Returns the input unchanged (borrowed) when it contains no separator.
pub fn escape(segment: &str) -> Cow<'_, str> {
    if segment.contains(SEPARATOR) {
        Cow::Owned(segment.replace(SEPARATOR, &SEGMENT_ESCAPE.to_string()))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Join a parent path and a child segment, escaping the segment.
pub fn join(parent: &str, segment: &str) -> String {
    let child = escape(segment);
    if parent.ends_with(SEPARATOR) {
        format!("{parent}{child}")
    } else {
        format!("{parent}{SEPARATOR}{child}")
    }
}

/// Join a parent path and a numeric index.
pub fn join_index(parent: &str, index: usize) -> String {
    join(parent, &index.to_string())
}

/// The parent of a path, or `/` for top-level entries.
pub fn parent_of(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(0) | None => "/",
        Some(pos) => &path[..pos],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_passthrough() {
        assert_eq!(escape("INST-1"), "INST-1");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_slashes() {
        assert_eq!(escape("LOAD/UNLOAD"), "LOAD|UNLOAD");
        assert_eq!(escape("a/b/c"), "a|b|c");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/odb/steps", "Step-1"), "/odb/steps/Step-1");
        assert_eq!(join("/odb/steps", "LOAD/UNLOAD"), "/odb/steps/LOAD|UNLOAD");
        assert_eq!(join("/", "odb"), "/odb");
        assert_eq!(join_index("/odb/constraints/ties", 3), "/odb/constraints/ties/3");
    }

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of("/odb/steps"), "/odb");
        assert_eq!(parent_of("/odb"), "/");
        assert_eq!(parent_of("odb"), "/");
    }
}
