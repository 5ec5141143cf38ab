use similar::{ChangeTag, TextDiff};

use super::types::{DiffLine, DiffLineOrigin, Hunk};

/// Lines of unchanged context kept around each change.
pub const CONTEXT_LINES: usize = 3;

/// Line diff of two texts grouped into hunks.
pub fn compute_hunks(old: &str, new: &str, context: usize) -> Vec<Hunk> {
    let diff = TextDiff::from_lines(old, new);

    diff.grouped_ops(context)
        .iter()
        .filter_map(|group| {
            let first = group.first()?;
            let last = group.last()?;
            let old_range = first.old_range().start..last.old_range().end;
            let new_range = first.new_range().start..last.new_range().end;

            let lines = group
                .iter()
                .flat_map(|op| diff.iter_changes(op))
                .map(|change| {
                    let origin = match change.tag() {
                        ChangeTag::Equal => DiffLineOrigin::Context,
                        ChangeTag::Insert => DiffLineOrigin::Addition,
                        ChangeTag::Delete => DiffLineOrigin::Deletion,
                    };
                    DiffLine {
                        origin,
                        old_lineno: change.old_index().map(|i| i as u32 + 1),
                        new_lineno: change.new_index().map(|i| i as u32 + 1),
                        content: change.value().trim_end_matches(['\n', '\r']).to_string(),
                    }
                })
                .collect();

            let old_start = old_range.start as u32 + 1;
            let new_start = new_range.start as u32 + 1;
            let old_lines = old_range.len() as u32;
            let new_lines = new_range.len() as u32;
            Some(Hunk {
                header: format!("@@ -{old_start},{old_lines} +{new_start},{new_lines} @@"),
                old_start,
                old_lines,
                new_start,
                new_lines,
                lines,
            })
        })
        .collect()
}
