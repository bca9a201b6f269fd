//! Where the changed lines come from: a raw string, a diff file, or git.

use crate::diff::{parse_unified_diff, ChangeSet};
use crate::filter::PathFilter;
use crate::git::Git;
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// File name used for text that is not a diff.
pub const STDIN_NAME: &str = "<stdin>";

#[derive(Debug, Clone)]
pub enum InputSource {
    /// Raw text or diff, with backslash escapes still encoded.
    Text(String),
    /// Unified diff file, `-` for stdin.
    DiffFile(PathBuf),
    /// Diff of the working tree against `<remote>/<base_branch>`.
    Git {
        base_branch: String,
        filter: PathFilter,
        git: Git,
    },
}

impl InputSource {
    /// The changed lines to check. `None` when git mode found no changed
    /// file that passes the include/exclude filter.
    pub fn load(&self) -> Result<Option<ChangeSet>> {
        match self {
            InputSource::Text(raw) => Ok(Some(from_text(&unescape(raw)))),
            InputSource::DiffFile(path) => {
                let text = read_diff_file(path)?;
                Ok(Some(parse_unified_diff(&text)))
            }
            InputSource::Git {
                base_branch,
                filter,
                git,
            } => from_git(git, base_branch, filter),
        }
    }
}

/// Text that starts with `diff` is parsed as a unified diff, anything else is
/// treated as fully changed plain text.
pub fn from_text(text: &str) -> ChangeSet {
    if text.trim_start().starts_with("diff") {
        parse_unified_diff(text)
    } else {
        ChangeSet::from_plain_text(STDIN_NAME, text)
    }
}

fn read_diff_file(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read diff from stdin")?;
        return Ok(text);
    }

    if !path.is_file() {
        bail!("Diff file not found: {}", path.display());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read diff file: {}", path.display()))
}

fn from_git(git: &Git, base_branch: &str, filter: &PathFilter) -> Result<Option<ChangeSet>> {
    git.prepare(base_branch)?;

    let changed = git.changed_files(base_branch)?;
    log::debug!("Changed files: {:?}", changed);

    let files = filter.filter(&changed);
    log::debug!("Filtered files: {:?}", files);
    if files.is_empty() {
        return Ok(None);
    }

    let per_file = files
        .par_iter()
        .map(|file| git.changed_lines(base_branch, file).map(|lines| (file, lines)))
        .collect::<crate::Result<Vec<_>>>()?;

    let mut set = ChangeSet::new();
    for (file, lines) in per_file {
        set.insert(file, lines);
    }
    Ok(Some(set))
}

/// Decode backslash escapes the way CI inputs usually arrive: `\n`, `\t`,
/// `\r`, `\0`, `\\`, `\'`, `\"`, `\xHH`, `\uXXXX` and `\UXXXXXXXX`.
/// Unknown or incomplete escapes are kept as written.
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(&next) = chars.peek() else {
            out.push('\\');
            break;
        };

        let simple = match next {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '0' => Some('\0'),
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            _ => None,
        };
        if let Some(decoded) = simple {
            chars.next();
            out.push(decoded);
            continue;
        }

        let width = match next {
            'x' => 2,
            'u' => 4,
            'U' => 8,
            _ => 0,
        };
        if width > 0 {
            let digits: String = chars.clone().skip(1).take(width).collect();
            let decoded = if digits.len() == width && digits.chars().all(|d| d.is_ascii_hexdigit()) {
                u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
            } else {
                None
            };
            if let Some(decoded) = decoded {
                for _ in 0..=width {
                    chars.next();
                }
                out.push(decoded);
                continue;
            }
        }

        out.push('\\');
    }

    out
}
