pub mod dictionary;
pub mod tokenizer;

use crate::diff::ChangedLine;
use crate::error::{DiffSpellError, Result};
use crate::Finding;
use dictionary::AllowList;
use regex::Regex;
use std::collections::HashSet;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;

pub const DEFAULT_COMMAND: &str = "aspell --mode=sgml \
--add-sgml-skip=code,pre,style,script,command,literal,ulink,parameter,filename,programlisting \
--lang=en list";

/// Runs an external word-listing spell checker over changed lines and maps
/// the words it reports back onto those lines.
///
/// The command reads text on stdin and prints one misspelled word per line,
/// the way `aspell list` and `hunspell -l` do.
pub struct SpellChecker {
    program: String,
    args: Vec<String>,
    allow_list: AllowList,
    ignore_patterns: Vec<Regex>,
}

impl SpellChecker {
    pub fn new(command: &str, allow_list: AllowList, ignore_patterns: &[String]) -> Result<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next().ok_or(DiffSpellError::EmptyCommand)?;
        let args = parts.collect();

        let ignore_patterns = ignore_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| DiffSpellError::InvalidRegex {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            program,
            args,
            allow_list,
            ignore_patterns,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Findings for `file`, in line order.
    pub fn check(&self, file: &str, lines: &[ChangedLine]) -> Result<Vec<Finding>> {
        let input = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        log::debug!(
            "Checking {} changed line(s) of '{}' with `{} {}`",
            lines.len(),
            file,
            self.program,
            self.args.join(" ")
        );
        let misspelled = self.misspelled_words(input)?;
        Ok(self.collect_findings(file, lines, &misspelled))
    }

    fn misspelled_words(&self, input: String) -> Result<HashSet<String>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| DiffSpellError::CheckerSpawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from a separate thread so a checker that streams its
        // output cannot deadlock against a full pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child.wait_with_output()?;

        if let Some(handle) = writer {
            if let Ok(Err(e)) = handle.join() {
                // the checker is free to stop reading early
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() && !stderr.is_empty() {
            return Err(DiffSpellError::CheckerFailed {
                program: self.program.clone(),
                status: output.status,
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(String::from)
            .collect())
    }

    fn collect_findings(
        &self,
        file: &str,
        lines: &[ChangedLine],
        misspelled: &HashSet<String>,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        for changed in lines {
            for (raw, word) in tokenizer::tokens(&changed.text) {
                if self.should_ignore(raw) {
                    continue;
                }
                if !misspelled.contains(&word) || self.allow_list.contains(&word) {
                    continue;
                }
                findings.push(Finding {
                    file: file.to_string(),
                    line: changed.line,
                    word,
                    context: changed.text.trim().to_string(),
                });
            }
        }

        findings
    }

    fn should_ignore(&self, token: &str) -> bool {
        self.ignore_patterns.iter().any(|p| p.is_match(token))
    }
}
