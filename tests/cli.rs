//! CLI integration tests. The external checker is stood in for by
//! `grep -ow`, which prints each listed word found on stdin.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;
use tempfile::{tempdir, TempDir};

const EXAMPLE_DIFF: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/example.diff");

fn diffspell() -> Command {
    let mut cmd = Command::cargo_bin("diffspell").unwrap();
    for var in [
        "INPUT_BASE_BRANCH",
        "INPUT_REMOTE",
        "INPUT_INCLUDE",
        "INPUT_EXCLUDE",
        "INPUT_CMD",
        "INPUT_DICTIONARY",
        "INPUT_DICTIONARY_FILE",
        "INPUT_FORMAT",
        "INPUT_DEBUG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_flag() {
    diffspell()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_diff_string_input() {
    let example_diff = "
diff --git a/file.md b/file.md
index abc123..def456 100644
--- a/file.md
+++ b/file.md
@@ -1 +1,2 @@
 This is a sentence with a speling mistake.
+Another bad werd here.
";
    diffspell()
        .args(["--cmd", "grep -ow -e speling -e werd", "--input-string", example_diff])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "::error file=file.md,line=2::Possible typo: 'werd' in line: Another bad werd here.",
        ))
        .stdout(predicate::str::contains("speling").not());
}

#[test]
fn test_file_input() {
    diffspell()
        .args(["--cmd", "grep -ow -e Thiss -e shold -e Thisss", "--diff-file", EXAMPLE_DIFF])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("file=docs/intro.md,line=2::Possible typo: 'Thiss'"))
        .stdout(predicate::str::contains("shold").not())
        .stdout(predicate::str::contains("Thisss").not());
}

#[test]
fn test_diff_from_stdin() {
    let diff = fs::read_to_string(EXAMPLE_DIFF).unwrap();
    diffspell()
        .args(["--cmd", "grep -ow -e Thiss", "--diff-file", "-", "--console-output", "--no-color"])
        .write_stdin(diff)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "docs/intro.md:2: typo: 'Thiss' in: Thiss line was added.",
        ))
        .stdout(predicate::str::contains("✗ 1 typo found in 1 file"));
}

#[test]
fn test_empty_string() {
    diffspell()
        .args(["--input-string", " "])
        .assert()
        .success()
        .stdout("✅ No typos found.\n");
}

#[test]
fn test_escaped_plain_text_input() {
    diffspell()
        .args([
            "--cmd",
            "grep -ow -e werd",
            "--console-output",
            "--no-color",
            "--input-string",
            r"Hello werd\nsecond werd line",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("<stdin>:1: typo: 'werd' in: Hello werd"))
        .stdout(predicate::str::contains("<stdin>:2: typo: 'werd' in: second werd line"));
}

#[test]
fn test_dictionary_allows_words() {
    diffspell()
        .args([
            "--cmd",
            "grep -ow -e werd",
            "--dictionary",
            "werd other",
            "--input-string",
            "a werd",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ No typos found."));
}

#[test]
fn test_dictionary_from_environment() {
    diffspell()
        .env("INPUT_DICTIONARY", "werd")
        .args(["--cmd", "grep -ow -e werd", "--input-string", "a werd"])
        .assert()
        .success();
}

#[test]
fn test_empty_action_inputs_are_unset() {
    diffspell()
        .env("INPUT_DICTIONARY_FILE", "")
        .env("INPUT_FORMAT", "")
        .env("INPUT_BASE_BRANCH", "")
        .args(["--input-string", "ok text", "--cmd", "grep -ow -e werd"])
        .assert()
        .success()
        .stdout("✅ No typos found.\n");
}

#[test]
fn test_unknown_format_exits_with_error() {
    diffspell()
        .env("INPUT_FORMAT", "xml")
        .args(["--input-string", "ok text"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown format: xml"));
}

#[test]
fn test_no_fail() {
    diffspell()
        .args(["--cmd", "grep -ow -e werd", "--no-fail", "--input-string", "a werd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("::error file=<stdin>,line=1::"));
}

#[test]
fn test_json_output() {
    let assert = diffspell()
        .args(["--cmd", "grep -ow -e werd", "--format", "json", "--input-string", "a werd"])
        .assert()
        .code(1);

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["total_typos"], 1);
    assert_eq!(value["typos"][0]["file"], "<stdin>");
}

#[test]
fn test_missing_diff_file() {
    diffspell()
        .args(["--diff-file", "/nonexistent/change.diff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Diff file not found"));
}

#[test]
fn test_missing_checker_is_an_error() {
    diffspell()
        .args(["--cmd", "definitely-not-a-real-checker", "--input-string", "some text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("definitely-not-a-real-checker"));
}

fn git(dir: &Path, args: &[&str]) -> bool {
    StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A working repository on branch `master` whose `origin` is a bare clone
/// of the initial commit.
struct Repo {
    work: TempDir,
    _origin: TempDir,
}

impl Repo {
    fn path(&self) -> &Path {
        self.work.path()
    }
}

fn init_repo() -> Option<Repo> {
    let work = tempdir().unwrap();
    let origin = tempdir().unwrap();
    let path = work.path();
    if !git(path, &["init", "-q"]) {
        return None;
    }
    git(path, &["symbolic-ref", "HEAD", "refs/heads/master"]);
    git(path, &["config", "user.email", "dev@example.com"]);
    git(path, &["config", "user.name", "Dev"]);
    git(path, &["config", "commit.gpgsign", "false"]);

    fs::write(path.join("README.md"), "Intro line\nSecond line\n").unwrap();
    fs::write(path.join("main.rs"), "fn main() {}\n").unwrap();
    if !git(path, &["add", "."]) || !git(path, &["commit", "-q", "-m", "init"]) {
        return None;
    }

    let bare = origin.path().join("origin.git");
    let bare = bare.to_str()?;
    if !git(path, &["clone", "-q", "--bare", ".", bare])
        || !git(path, &["remote", "add", "origin", bare])
        || !git(path, &["fetch", "-q", "origin"])
    {
        return None;
    }

    Some(Repo {
        work,
        _origin: origin,
    })
}

#[test]
fn test_git_mode_reports_changed_lines_only() {
    let Some(repo) = init_repo() else {
        return;
    };
    fs::write(repo.path().join("README.md"), "Intro line\nSecond line\nA werd appears\n").unwrap();
    fs::write(repo.path().join("main.rs"), "fn main() {}\n// werd\n").unwrap();

    diffspell()
        .current_dir(repo.path())
        .args(["--cmd", "grep -ow -e werd -e Intro", "--console-output", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("README.md:3: typo: 'werd' in: A werd appears"))
        .stdout(predicate::str::contains("Intro").not())
        .stdout(predicate::str::contains("main.rs").not());
}

#[test]
fn test_git_mode_on_detached_head() {
    let Some(repo) = init_repo() else {
        return;
    };
    fs::write(repo.path().join("README.md"), "Intro line\nSecond werd line\n").unwrap();
    assert!(git(repo.path(), &["checkout", "-q", "--detach"]));

    diffspell()
        .current_dir(repo.path())
        .args(["--cmd", "grep -ow -e werd"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "::error file=README.md,line=2::Possible typo: 'werd' in line: Second werd line",
        ));
}

#[test]
fn test_git_mode_without_matching_files() {
    let Some(repo) = init_repo() else {
        return;
    };
    fs::write(repo.path().join("main.rs"), "fn main() {}\n// werd\n").unwrap();

    diffspell()
        .current_dir(repo.path())
        .args(["--cmd", "grep -ow -e werd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ No files to check."));
}

#[test]
fn test_git_mode_with_only_deletions() {
    let Some(repo) = init_repo() else {
        return;
    };
    fs::write(repo.path().join("README.md"), "Intro line\n").unwrap();

    diffspell()
        .current_dir(repo.path())
        .args(["--cmd", "grep -ow -e werd"])
        .assert()
        .success()
        .stdout("✅ No typos found.\n");
}
