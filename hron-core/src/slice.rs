//! Zero-copy line slices.
//!
//! The parser never copies tag names or value fragments: every event carries
//! a [`LineSlice`], a `(base, begin, len)` view into a line the caller already
//! holds. Materializing an owned `String` happens only when a consumer asks
//! for it (tree build, error reporting).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use memchr::memchr;

/// An immutable view into a line of text.
///
/// Slicing a slice composes offsets into the same base string instead of
/// copying. Offsets are only ever advanced past ASCII bytes (tabs and the
/// structural sigils), so sub-slices always start on a UTF-8 char boundary.
#[derive(Clone, Copy)]
pub struct LineSlice<'a> {
    base: &'a str,
    begin: usize,
    len: usize,
}

impl<'a> LineSlice<'a> {
    /// View over an entire string.
    pub fn new(base: &'a str) -> Self {
        LineSlice { base, begin: 0, len: base.len() }
    }

    /// The empty slice.
    pub fn empty() -> Self {
        LineSlice { base: "", begin: 0, len: 0 }
    }

    pub(crate) fn from_parts(base: &'a str, begin: usize, len: usize) -> Self {
        debug_assert!(begin + len <= base.len());
        LineSlice { base, begin, len }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the slice is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the content.
    pub fn as_str(&self) -> &'a str {
        &self.base[self.begin..self.begin + self.len]
    }

    /// Byte at offset `n` from the start of the slice.
    pub fn byte_at(&self, n: usize) -> Option<u8> {
        self.as_str().as_bytes().get(n).copied()
    }

    /// Sub-slice starting `n` bytes in, running to the end.
    ///
    /// Composes offsets; `n` past the end yields the empty tail.
    pub fn slice_from(&self, n: usize) -> LineSlice<'a> {
        let n = n.min(self.len);
        LineSlice {
            base: self.base,
            begin: self.begin + n,
            len: self.len - n,
        }
    }

    /// Sub-slice of `len` bytes starting `begin` bytes in.
    ///
    /// Both bounds clamp to the available content.
    pub fn slice(&self, begin: usize, len: usize) -> LineSlice<'a> {
        let begin = begin.min(self.len);
        let len = len.min(self.len - begin);
        LineSlice { base: self.base, begin: self.begin + begin, len }
    }

    /// Number of leading `\t` characters.
    pub fn leading_tabs(&self) -> usize {
        self.as_str()
            .as_bytes()
            .iter()
            .take_while(|&&b| b == b'\t')
            .count()
    }

    /// True when the content is empty or entirely whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.as_str().chars().all(char::is_whitespace)
    }

    /// Whitespace-trimmed sub-slice (offset-composed, no copy).
    pub fn trimmed(&self) -> LineSlice<'a> {
        let s = self.as_str();
        let trimmed = s.trim();
        let begin = self.begin + (trimmed.as_ptr() as usize - s.as_ptr() as usize);
        LineSlice { base: self.base, begin, len: trimmed.len() }
    }
}

impl PartialEq for LineSlice<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for LineSlice<'_> {}

impl PartialOrd for LineSlice<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LineSlice<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for LineSlice<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for LineSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for LineSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineSlice({:?})", self.as_str())
    }
}

/// Split a document into line slices.
///
/// Lines are separated by `\n`; one trailing `\r` per line is stripped so
/// CRLF input parses the same as LF input. The final line is yielded even
/// without a terminator, but a trailing newline does not produce a phantom
/// empty line.
pub fn lines(text: &str) -> Lines<'_> {
    Lines { base: text, pos: 0 }
}

/// Iterator returned by [`lines`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    base: &'a str,
    pos: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineSlice<'a>;

    fn next(&mut self) -> Option<LineSlice<'a>> {
        if self.pos >= self.base.len() {
            return None;
        }
        let rest = &self.base.as_bytes()[self.pos..];
        let (mut len, next) = match memchr(b'\n', rest) {
            Some(i) => (i, self.pos + i + 1),
            None => (rest.len(), self.base.len()),
        };
        if len > 0 && rest[len - 1] == b'\r' {
            len -= 1;
        }
        let line = LineSlice::from_parts(self.base, self.pos, len);
        self.pos = next;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_composition() {
        let line = LineSlice::new("\t\t=name");
        assert_eq!(line.leading_tabs(), 2);
        let tag = line.slice_from(2);
        assert_eq!(tag.as_str(), "=name");
        let name = tag.slice_from(1);
        assert_eq!(name.as_str(), "name");
        // Slicing past the end clamps to the empty tail.
        assert_eq!(name.slice_from(99).as_str(), "");
        assert_eq!(line.slice(2, 3).as_str(), "=na");
        assert_eq!(line.slice(5, 99).as_str(), "me");
    }

    #[test]
    fn test_whitespace_and_trim() {
        assert!(LineSlice::new("").is_whitespace());
        assert!(LineSlice::new(" \t ").is_whitespace());
        assert!(!LineSlice::new(" x ").is_whitespace());
        assert_eq!(LineSlice::new("  name \t").trimmed().as_str(), "name");
    }

    #[test]
    fn test_content_equality() {
        let a = LineSlice::new("\tfoo").slice_from(1);
        let b = LineSlice::new("foo");
        assert_eq!(a, b);
        assert!(LineSlice::new("a") < LineSlice::new("b"));
    }

    #[test]
    fn test_lines_lf() {
        let got: Vec<_> = lines("a\nb\n\nc").map(|l| l.as_str()).collect();
        assert_eq!(got, vec!["a", "b", "", "c"]);
    }

    #[test]
    fn test_lines_crlf_and_trailing_newline() {
        let got: Vec<_> = lines("a\r\nb\r\n").map(|l| l.as_str()).collect();
        assert_eq!(got, vec!["a", "b"]);
        assert_eq!(lines("").count(), 0);
    }
}
