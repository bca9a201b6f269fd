use crate::diff::{parse_unified_diff, ChangedLine};
use crate::error::{DiffSpellError, Result};
use std::path::PathBuf;
use std::process::{Command, Output};

/// Thin wrapper over the `git` binary.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
    remote: String,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            workdir: workdir.into(),
            remote: remote.into(),
        }
    }

    /// `<remote>/<branch>`, the ref every diff is taken against.
    pub fn base_ref(&self, branch: &str) -> String {
        format!("{}/{}", self.remote, branch)
    }

    /// Pull request checkouts in CI are usually detached, in which case the
    /// base branch may not have been fetched yet.
    pub fn prepare(&self, branch: &str) -> Result<()> {
        if self.is_detached_head()? {
            log::debug!("Detached HEAD detected, fetching '{}'", branch);
            self.fetch(branch)?;
        }
        Ok(())
    }

    pub fn is_detached_head(&self) -> Result<bool> {
        let output = self.run(&["symbolic-ref", "--quiet", "HEAD"])?;
        Ok(!output.status.success())
    }

    pub fn fetch(&self, branch: &str) -> Result<()> {
        let output = self.run(&["fetch", &self.remote, branch])?;
        if !output.status.success() {
            log::warn!(
                "git fetch {} {} failed: {}",
                self.remote,
                branch,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }

    /// Paths (relative to the repository root) that differ from the base.
    pub fn changed_files(&self, branch: &str) -> Result<Vec<String>> {
        let base = self.base_ref(branch);
        let stdout = self.run_checked(&["diff", "--name-only", &base])?;
        Ok(parse_name_only(&stdout))
    }

    /// Lines `file` gained relative to the base.
    pub fn changed_lines(&self, branch: &str, file: &str) -> Result<Vec<ChangedLine>> {
        let base = self.base_ref(branch);
        let stdout = self.run_checked(&["diff", "-U0", &base, "--", file])?;
        let changes = parse_unified_diff(&stdout);
        Ok(changes
            .get(file)
            .map(|f| f.lines.clone())
            .unwrap_or_default())
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        log::debug!("git {}", args.join(" "));
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(DiffSpellError::GitSpawn)
    }

    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(DiffSpellError::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn parse_name_only(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_ref() {
        let git = Git::new(".", "upstream");
        assert_eq!(git.base_ref("main"), "upstream/main");
    }

    fn run_git(dir: &std::path::Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_detached_head_detection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path();
        if !run_git(path, &["init", "-q"]) {
            return;
        }
        run_git(path, &["config", "user.email", "dev@example.com"]);
        run_git(path, &["config", "user.name", "Dev"]);
        run_git(path, &["config", "commit.gpgsign", "false"]);
        std::fs::write(path.join("a.md"), "text\n").unwrap();
        assert!(run_git(path, &["add", "."]));
        assert!(run_git(path, &["commit", "-q", "-m", "init"]));

        let git = Git::new(path, "origin");
        assert!(!git.is_detached_head().unwrap());

        assert!(run_git(path, &["checkout", "-q", "--detach"]));
        assert!(git.is_detached_head().unwrap());
    }

    #[test]
    fn test_changed_files_without_base_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        if !run_git(dir.path(), &["init", "-q"]) {
            return;
        }
        let git = Git::new(dir.path(), "origin");
        assert!(matches!(
            git.changed_files("master"),
            Err(DiffSpellError::Git { .. })
        ));
    }

    #[test]
    fn test_parse_name_only_skips_blank_lines() {
        let files = parse_name_only("README.md\n\ndocs/guide.md\n");
        assert_eq!(files, vec!["README.md", "docs/guide.md"]);
    }
}
