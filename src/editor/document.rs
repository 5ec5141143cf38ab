use crate::git::hunks::{compute_hunks, CONTEXT_LINES};
use crate::git::types::{DiffLine, DiffLineOrigin};
use crate::uri::ResourceUri;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    HunkHeader(usize),
    Line(DiffLineOrigin),
}

#[derive(Debug, Clone)]
pub struct DocumentRow {
    pub kind: RowKind,
    pub old_lineno: Option<u32>,
    pub new_lineno: Option<u32>,
    pub text: String,
}

/// Rows covered by one hunk, header included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkSpan {
    pub first_row: usize,
    pub last_row: usize,
}

/// Content shown in the editor pane: either a two-sided diff or a single
/// resource.
#[derive(Debug)]
pub struct Document {
    pub uri: ResourceUri,
    pub title: String,
    rows: Vec<DocumentRow>,
    hunks: Vec<HunkSpan>,
    is_diff: bool,
    current_hunk: Option<usize>,
    pub scroll: usize,
}

impl Document {
    pub fn diff(uri: ResourceUri, title: String, old: &str, new: &str) -> Self {
        let mut rows = Vec::new();
        let mut spans = Vec::new();
        for (idx, hunk) in compute_hunks(old, new, CONTEXT_LINES).into_iter().enumerate() {
            let first_row = rows.len();
            rows.push(DocumentRow {
                kind: RowKind::HunkHeader(idx),
                old_lineno: None,
                new_lineno: None,
                text: hunk.header,
            });
            rows.extend(hunk.lines.into_iter().map(row_from_line));
            spans.push(HunkSpan {
                first_row,
                last_row: rows.len() - 1,
            });
        }
        Self {
            uri,
            title,
            rows,
            hunks: spans,
            is_diff: true,
            current_hunk: None,
            scroll: 0,
        }
    }

    pub fn single(uri: ResourceUri, title: String, content: &str) -> Self {
        let rows = content
            .lines()
            .enumerate()
            .map(|(i, line)| DocumentRow {
                kind: RowKind::Line(DiffLineOrigin::Context),
                old_lineno: None,
                new_lineno: Some(i as u32 + 1),
                text: line.to_string(),
            })
            .collect();
        Self {
            uri,
            title,
            rows,
            hunks: Vec::new(),
            is_diff: false,
            current_hunk: None,
            scroll: 0,
        }
    }

    pub fn rows(&self) -> &[DocumentRow] {
        &self.rows
    }

    pub fn is_diff(&self) -> bool {
        self.is_diff
    }

    pub fn hunk_count(&self) -> usize {
        self.hunks.len()
    }

    pub fn current_hunk(&self) -> Option<usize> {
        self.current_hunk
    }

    pub fn current_span(&self) -> Option<HunkSpan> {
        self.current_hunk.and_then(|i| self.hunks.get(i).copied())
    }

    pub fn has_next_hunk(&self) -> bool {
        self.current_hunk.map_or(0, |i| i + 1) < self.hunks.len()
    }

    pub fn has_previous_hunk(&self) -> bool {
        self.current_hunk.is_some_and(|i| i > 0)
    }

    pub fn next_hunk(&mut self) {
        if self.has_next_hunk() {
            self.focus_hunk(self.current_hunk.map_or(0, |i| i + 1));
        }
    }

    pub fn previous_hunk(&mut self) {
        if let Some(i) = self.current_hunk.filter(|&i| i > 0) {
            self.focus_hunk(i - 1);
        }
    }

    fn focus_hunk(&mut self, index: usize) {
        self.current_hunk = Some(index);
        self.scroll = self.hunks[index].first_row;
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.rows.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// Swap in freshly loaded content, keeping the hunk cursor where possible.
    pub fn replace_content(&mut self, fresh: Document) {
        let keep = self.current_hunk.filter(|&i| i < fresh.hunks.len());
        self.title = fresh.title;
        self.rows = fresh.rows;
        self.hunks = fresh.hunks;
        self.is_diff = fresh.is_diff;
        self.current_hunk = keep;
        self.scroll = self.scroll.min(self.rows.len().saturating_sub(1));
    }
}

fn row_from_line(line: DiffLine) -> DocumentRow {
    DocumentRow {
        kind: RowKind::Line(line.origin),
        old_lineno: line.old_lineno,
        new_lineno: line.new_lineno,
        text: line.content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn uri() -> ResourceUri {
        ResourceUri::file(Path::new("/r/a.txt"))
    }

    fn two_hunk_doc() -> Document {
        let old: String = (1..=30).map(|i| format!("line {i}\n")).collect();
        let new = old
            .replace("line 2\n", "line two\n")
            .replace("line 25\n", "line twenty-five\n");
        Document::diff(uri(), "a.txt".into(), &old, &new)
    }

    #[test]
    fn hunk_cursor_starts_before_first_hunk() {
        let mut doc = two_hunk_doc();
        assert_eq!(doc.hunk_count(), 2);
        assert!(doc.has_next_hunk());
        assert!(!doc.has_previous_hunk());

        doc.next_hunk();
        assert_eq!(doc.current_hunk(), Some(0));
        assert_eq!(doc.scroll, 0);

        doc.next_hunk();
        assert_eq!(doc.current_hunk(), Some(1));
        assert!(!doc.has_next_hunk());
        assert_eq!(doc.scroll, doc.current_span().unwrap().first_row);
        assert_eq!(doc.rows()[doc.scroll].kind, RowKind::HunkHeader(1));

        doc.previous_hunk();
        assert_eq!(doc.current_hunk(), Some(0));
    }

    #[test]
    fn single_resource_has_no_hunks() {
        let doc = Document::single(uri(), "a.txt".into(), "x\ny\n");
        assert!(!doc.is_diff());
        assert!(!doc.has_next_hunk());
        assert_eq!(doc.rows().len(), 2);
    }

    #[test]
    fn reload_keeps_cursor_when_hunk_survives() {
        let mut doc = two_hunk_doc();
        doc.next_hunk();
        doc.next_hunk();
        doc.replace_content(two_hunk_doc());
        assert_eq!(doc.current_hunk(), Some(1));

        doc.replace_content(Document::diff(uri(), "a.txt".into(), "same\n", "same\n"));
        assert_eq!(doc.current_hunk(), None);
        assert_eq!(doc.scroll, 0);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut doc = Document::single(uri(), "a.txt".into(), "1\n2\n3\n");
        doc.scroll_by(-4);
        assert_eq!(doc.scroll, 0);
        doc.scroll_by(10);
        assert_eq!(doc.scroll, 2);
    }
}
