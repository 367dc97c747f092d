//! Line-indexed search and splicing over changelog text

use regex::Regex;

/// Position of one line inside the document text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    /// Zero-based line number
    pub index: usize,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset just past the line terminator (or end of text)
    pub end: usize,
}

impl LineSpan {
    /// Line content without its terminator
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source[self.start..self.end].trim_end_matches(['\n', '\r'])
    }

    /// Whether the line runs to end of text without a newline
    pub fn is_unterminated(&self, source: &str) -> bool {
        !source[self.start..self.end].ends_with('\n')
    }
}

/// All lines of `text`, terminators included in each span
pub fn lines(text: &str) -> impl Iterator<Item = LineSpan> + '_ {
    text.split_inclusive('\n')
        .scan(0usize, |offset, line| {
            let start = *offset;
            *offset += line.len();
            Some((start, *offset))
        })
        .enumerate()
        .map(|(index, (start, end))| LineSpan { index, start, end })
}

/// First line containing `token` literally
pub fn find_line_containing(text: &str, token: &str) -> Option<LineSpan> {
    lines(text).find(|span| span.text(text).contains(token))
}

/// Line holding the first match of `pattern`
pub fn find_line_matching(text: &str, pattern: &Regex) -> Option<LineSpan> {
    let found = pattern.find(text)?;
    lines(text).find(|span| found.start() >= span.start && found.start() < span.end)
}

/// Number of lines containing `token`
pub fn count_lines_containing(text: &str, token: &str) -> usize {
    lines(text)
        .filter(|span| span.text(text).contains(token))
        .count()
}

/// End of the region that starts at byte `from`.
///
/// The region stops at the first `\n---\n` delimiter after `from`, keeping
/// the newline that precedes the delimiter inside the region. Without a
/// delimiter the region runs to end of text.
pub fn region_end(text: &str, from: usize) -> usize {
    let search_from = from.saturating_sub(1).min(text.len());
    text[search_from..]
        .find("\n---\n")
        .map_or(text.len(), |pos| search_from + pos + 1)
}

/// Whether `[start, end)` contains a line equal to `heading`, ignoring trailing whitespace
pub fn has_heading(text: &str, start: usize, end: usize, heading: &str) -> bool {
    lines(&text[start..end]).any(|span| span.text(&text[start..end]).trim_end() == heading)
}

/// Insert `block` directly after `line`, leaving everything else untouched.
///
/// An unterminated last line gets a newline first so the block starts on a
/// line of its own.
pub fn splice_after(text: &str, line: LineSpan, block: &str) -> String {
    let mut out = String::with_capacity(text.len() + block.len() + 1);
    out.push_str(&text[..line.end]);
    if line.is_unterminated(text) {
        out.push('\n');
    }
    out.push_str(block);
    out.push_str(&text[line.end..]);
    out
}
