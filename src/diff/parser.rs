use crate::diff::{ChangeSet, ChangedLine};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // @@ -old_start[,old_count] +new_start[,new_count] @@ [section]
    static ref HUNK_HEADER: Regex =
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap();
}

/// Position inside the body of a hunk.
#[derive(Debug, Clone, Copy)]
struct HunkCursor {
    next_line: usize,
    old_remaining: usize,
    new_remaining: usize,
}

impl HunkCursor {
    fn in_body(&self) -> bool {
        self.old_remaining > 0 || self.new_remaining > 0
    }
}

/// Parse unified diff text (as produced by `git diff`) into the lines each
/// file gained.
///
/// Only `+` lines are recorded. Context lines move the line counter forward,
/// removed lines do not. Deleted files (`+++ /dev/null`) contribute nothing.
pub fn parse_unified_diff(text: &str) -> ChangeSet {
    let mut changes = ChangeSet::new();
    let mut target: Option<String> = None;
    let mut cursor: Option<HunkCursor> = None;
    let lines: Vec<&str> = text.lines().collect();

    for (idx, &line) in lines.iter().enumerate() {
        // No hunk body line starts with "diff " or "@@", so these are
        // headers even when the previous hunk's counts were too large.
        if line.starts_with("diff ") {
            target = None;
            cursor = None;
            continue;
        }
        if line.starts_with("@@") {
            cursor = parse_hunk_header(line);
            if cursor.is_none() {
                log::warn!("Skipping malformed hunk header: {}", line);
            }
            continue;
        }

        // Inside a hunk body "+++ counter" is an added line, unless it sits
        // in a complete `---`/`+++`/`@@` file header.
        let in_body = cursor.is_some_and(|c| c.in_body());
        if let Some(path) = line.strip_prefix("+++ ") {
            let prev_is_old_header = idx > 0 && lines[idx - 1].starts_with("--- ");
            let next_is_hunk = lines.get(idx + 1).is_some_and(|l| l.starts_with("@@"));
            if !in_body || (prev_is_old_header && next_is_hunk) {
                target = parse_target_path(path);
                cursor = None;
                continue;
            }
        }
        if in_body && line.starts_with("--- ") {
            let next_is_new_header = lines.get(idx + 1).is_some_and(|l| l.starts_with("+++ "));
            let then_hunk = lines.get(idx + 2).is_some_and(|l| l.starts_with("@@"));
            if next_is_new_header && then_hunk {
                continue;
            }
        }

        let (Some(path), Some(hunk)) = (target.as_deref(), cursor.as_mut()) else {
            continue;
        };

        match line.as_bytes().first() {
            Some(b'+') => {
                changes.push_line(path, ChangedLine::new(hunk.next_line, &line[1..]));
                hunk.next_line += 1;
                hunk.new_remaining = hunk.new_remaining.saturating_sub(1);
            }
            Some(b'-') => {
                hunk.old_remaining = hunk.old_remaining.saturating_sub(1);
            }
            Some(b' ') | None => {
                hunk.next_line += 1;
                hunk.old_remaining = hunk.old_remaining.saturating_sub(1);
                hunk.new_remaining = hunk.new_remaining.saturating_sub(1);
            }
            // "\ No newline at end of file" and anything else
            _ => {}
        }
    }

    changes
}

fn parse_hunk_header(line: &str) -> Option<HunkCursor> {
    let caps = HUNK_HEADER.captures(line)?;
    let count = |idx: usize| -> Option<usize> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };

    Some(HunkCursor {
        next_line: caps.get(3)?.as_str().parse().ok()?,
        old_remaining: count(2)?,
        new_remaining: count(4)?,
    })
}

/// Path of the new file from a `+++` header, `None` for deletions.
fn parse_target_path(raw: &str) -> Option<String> {
    // plain `diff -u` appends a tab and a timestamp
    let raw = raw.split('\t').next().unwrap_or(raw).trim_end();
    let raw = raw.trim_matches('"');

    if raw == "/dev/null" {
        return None;
    }

    let path = raw.strip_prefix("b/").unwrap_or(raw);
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}
