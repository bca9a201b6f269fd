pub mod checker;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod git;
pub mod input;

pub use checker::SpellChecker;
pub use config::Config;
pub use diff::{ChangeSet, ChangedLine, FileChanges};
pub use error::{DiffSpellError, Result};

#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub files_checked: usize,
    pub findings: Vec<Finding>,
}

impl CheckResult {
    pub fn typo_count(&self) -> usize {
        self.findings.len()
    }

    /// Number of distinct files with at least one finding.
    pub fn files_with_typos(&self) -> usize {
        let mut files: Vec<&str> = self.findings.iter().map(|f| f.file.as_str()).collect();
        files.dedup();
        files.len()
    }
}

/// A misspelled word on a changed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub file: String,
    pub line: usize,
    pub word: String,
    pub context: String,
}
