use serde::Serialize;

/// Character-offset span into source text. Start is inclusive, end is
/// exclusive. Offsets are counted in `char`s, not bytes, so they line up
/// directly with [`IndexedText`]'s coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a new span from char offsets.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    /// Length of the span in chars.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span is empty (zero-length).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Source text with a precomputed line index, supporting offset-preserving
/// substrings.
///
/// All positions are char offsets into the *original* text a chain of
/// `substring` calls descends from -- not offsets relative to whichever
/// view currently holds them. This is what lets a nested substring's
/// `line_position` agree with its parent's.
#[derive(Debug, Clone)]
pub struct IndexedText {
    text: Vec<char>,
    /// Char offset of the start of each line, relative to `text`. The
    /// first entry is always 0.
    line_starts: Vec<u32>,
    /// Offset of `text[0]` within the original, ultimate source text.
    base_offset: u32,
}

impl IndexedText {
    /// Build an indexed view over the whole of `source`.
    pub fn new(source: &str) -> Self {
        Self::from_parts(source.chars().collect(), 0)
    }

    fn from_parts(text: Vec<char>, base_offset: u32) -> Self {
        let mut line_starts = vec![0u32];
        for (i, &c) in text.iter().enumerate() {
            if c == '\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            text,
            line_starts,
            base_offset,
        }
    }

    /// Number of lines in the text.
    pub fn lines(&self) -> usize {
        self.line_starts.len()
    }

    /// Number of chars in the text.
    pub fn chars(&self) -> usize {
        self.text.len()
    }

    /// Length, in chars, of the given 1-based line, excluding any trailing
    /// newline. Out-of-range lines clamp to the last line.
    pub fn line_length(&self, line: usize) -> usize {
        self.get_line(line).chars().count()
    }

    /// Text of the given 1-based line, without its trailing newline.
    /// Out-of-range lines clamp to the last line.
    pub fn get_line(&self, line: usize) -> String {
        let idx = line.saturating_sub(1).min(self.line_starts.len() - 1);
        let start = self.line_starts[idx] as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s as usize - 1) // drop the newline itself
            .unwrap_or(self.text.len());
        self.text[start..end.max(start)].iter().collect()
    }

    /// Convert an absolute char offset (into the *original* text this view
    /// descends from) to a 1-based `(line, column)` pair local to this
    /// view. Out-of-range offsets clamp to the terminal position.
    pub fn line_position(&self, char_offset: u32) -> (u32, u32) {
        let local = char_offset.saturating_sub(self.base_offset) as usize;
        let local = local.min(self.text.len());
        let line_idx = self
            .line_starts
            .partition_point(|&start| start as usize <= local)
            .saturating_sub(1);
        let line = (line_idx as u32) + 1;
        let col = local as u32 - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// A view over the suffix starting at absolute char offset
    /// `char_offset`, sharing this view's offset origin: `line_position`
    /// calls against the returned view accept the same absolute offsets
    /// as this one and agree with it on the result.
    pub fn substring(&self, char_offset: u32) -> IndexedText {
        let local = char_offset.saturating_sub(self.base_offset) as usize;
        let local = local.min(self.text.len());
        IndexedText::from_parts(self.text[local..].to_vec(), self.base_offset + local as u32)
    }
}
