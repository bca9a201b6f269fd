//! Include/exclude filtering of changed paths.

use crate::error::{DiffSpellError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

pub const DEFAULT_INCLUDE: &[&str] = &[
    "**/*.md",
    "**/*.txt",
    "**/*.rst",
    "**/*.json",
    "**/*.yaml",
    "**/*.yml",
    "**/*.ini",
    "**/*.tex",
    "**/*.html",
    "**/*.xml",
    "**/*.xhtml",
    "**/*.csv",
];

/// Keeps paths that match an include pattern, match no exclude pattern and
/// exist as files under `root`.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: GlobSet,
    exclude: GlobSet,
    root: PathBuf,
}

impl PathFilter {
    pub fn new(
        include: &[String],
        exclude: &[String],
        root: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            include: build_set(include)?,
            exclude: build_set(exclude)?,
            root: root.into(),
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = path.strip_prefix("./").unwrap_or(path);
        self.include.is_match(path) && !self.exclude.is_match(path)
    }

    /// Sorted, de-duplicated subset of `paths` worth checking.
    pub fn filter<I, S>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = paths
            .into_iter()
            .filter(|p| self.matches(p.as_ref()))
            .filter(|p| self.exists(p.as_ref()))
            .map(|p| p.as_ref().to_string())
            .collect();
        kept.sort();
        kept.dedup();
        kept
    }

    fn exists(&self, path: &str) -> bool {
        let full = self.root.join(Path::new(path));
        let is_file = full.is_file();
        if !is_file {
            log::debug!("Skipping '{}': not a file in the working tree", path);
        }
        is_file
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // `*` stays within one path component, `**/` spans zero or more
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| DiffSpellError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| DiffSpellError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}
