//! In-table search: match positions for a term across the visible columns.
//!
//! Matches are (row, column) index pairs into the current record set and the
//! visible column list that produced them. They carry no references into
//! the data, so they go stale the moment either input changes; callers then
//! run [`SearchEngine::refresh`] (same term, new inputs) or
//! [`SearchEngine::clear`].

use crate::record::{Column, LogRecord};

/// A cell containing the search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellMatch {
    pub row: usize,
    /// Index into the visible column list, not into [`Column::ALL`].
    pub col: usize,
}

impl CellMatch {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Search term, its matches in row-major order, and the navigation cursor.
///
/// Invariant: `cursor` is `None` or a valid index into `matches`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchEngine {
    term: String,
    matches: Vec<CellMatch>,
    cursor: Option<usize>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute matches for `term` from scratch.
    ///
    /// An empty term deactivates the search. Otherwise every searchable
    /// visible column of every row is tested (case-insensitive substring,
    /// full untruncated text) and the cursor jumps to the first match.
    /// Returns the number of matches.
    pub fn search(&mut self, records: &[LogRecord], columns: &[Column], term: &str) -> usize {
        self.term = term.to_string();
        self.matches = find_matches(records, columns, term);
        self.cursor = if self.matches.is_empty() { None } else { Some(0) };
        self.matches.len()
    }

    /// Recompute with the retained term after the records or columns changed.
    pub fn refresh(&mut self, records: &[LogRecord], columns: &[Column]) -> usize {
        let term = std::mem::take(&mut self.term);
        self.search(records, columns, &term)
    }

    /// Reset to inactive. Idempotent.
    pub fn clear(&mut self) {
        self.term.clear();
        self.matches.clear();
        self.cursor = None;
    }

    /// Step forward with wraparound. `None` means no active search.
    pub fn next(&mut self) -> Option<CellMatch> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        let next = match self.cursor {
            Some(c) => (c + 1) % len,
            None => 0,
        };
        self.cursor = Some(next);
        Some(self.matches[next])
    }

    /// Step backward with wraparound. `None` means no active search.
    pub fn prev(&mut self) -> Option<CellMatch> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        let prev = match self.cursor {
            Some(c) => (c + len - 1) % len,
            None => len - 1,
        };
        self.cursor = Some(prev);
        Some(self.matches[prev])
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }

    pub fn matches(&self) -> &[CellMatch] {
        &self.matches
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<CellMatch> {
        self.cursor.map(|c| self.matches[c])
    }

    /// Whether the cell is one of the matches (binary search on row-major order).
    pub fn is_match(&self, row: usize, col: usize) -> bool {
        self.matches.binary_search(&CellMatch::new(row, col)).is_ok()
    }

    pub fn is_current(&self, row: usize, col: usize) -> bool {
        self.current() == Some(CellMatch::new(row, col))
    }

    /// "3/12"-style position for the status line.
    pub fn position_label(&self) -> Option<String> {
        self.cursor
            .map(|c| format!("{}/{}", c + 1, self.matches.len()))
    }
}

/// Row-major scan; the ordering drives deterministic n/N navigation.
fn find_matches(records: &[LogRecord], columns: &[Column], term: &str) -> Vec<CellMatch> {
    if term.is_empty() {
        return Vec::new();
    }
    let needle = term.to_lowercase();
    let searchable: Vec<(usize, Column)> = columns
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, c)| c.is_searchable())
        .collect();

    let mut matches = Vec::new();
    for (row, record) in records.iter().enumerate() {
        for &(col, column) in &searchable {
            if column.text(record).to_lowercase().contains(&needle) {
                matches.push(CellMatch::new(row, col));
            }
        }
    }
    matches
}

/// Byte ranges of case-insensitive occurrences of `term` in `text`, for
/// highlighting inside a displayed cell.
///
/// Returns `None` when lowercasing changes byte lengths (some non-ASCII
/// text), in which case the caller highlights the whole cell.
pub fn highlight_ranges(text: &str, term: &str) -> Option<Vec<(usize, usize)>> {
    if term.is_empty() {
        return Some(Vec::new());
    }
    let hay = text.to_lowercase();
    let needle = term.to_lowercase();
    if hay.len() != text.len() {
        return None;
    }
    let mut ranges = Vec::new();
    let mut from = 0;
    while let Some(pos) = hay[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return None;
        }
        ranges.push((start, end));
        from = end;
    }
    Some(ranges)
}
