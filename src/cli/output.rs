use crate::checker::tokenizer::clean_word;
use crate::{CheckResult, Finding};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// GitHub Actions `::error` workflow commands.
    #[default]
    Github,
    Console,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "github" => Ok(OutputFormat::Github),
            "console" | "text" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Github => write!(f, "github"),
            OutputFormat::Console => write!(f, "console"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonTypo<'a> {
    file: &'a str,
    line: usize,
    word: &'a str,
    context: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    files_checked: usize,
    total_typos: usize,
    typos: Vec<JsonTypo<'a>>,
}

/// Print every finding plus the closing summary to stdout.
pub fn print_report(result: &CheckResult, format: OutputFormat, colored_output: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, result, format, colored_output)
}

pub fn write_report<W: Write>(
    out: &mut W,
    result: &CheckResult,
    format: OutputFormat,
    colored_output: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Github => {
            for finding in &result.findings {
                log::debug!("Emitting annotation for {}:{}", finding.file, finding.line);
                writeln!(out, "{}", github_annotation(finding))?;
            }
            write_summary(out, result, false, colored_output)
        }
        OutputFormat::Console => {
            for finding in &result.findings {
                writeln!(out, "{}", console_line(finding, colored_output))?;
            }
            write_summary(out, result, true, colored_output)
        }
        OutputFormat::Json => write_json(out, result),
    }
}

/// `::error file=<file>,line=<n>::Possible typo: '<word>' in line: <context>`
pub fn github_annotation(finding: &Finding) -> String {
    format!(
        "::error file={},line={}::{}",
        escape_property(&finding.file),
        finding.line,
        escape_data(&format!(
            "Possible typo: '{}' in line: {}",
            finding.word, finding.context
        ))
    )
}

pub fn console_line(finding: &Finding, colored_output: bool) -> String {
    if colored_output {
        format!(
            "{}:{}: {} '{}' in: {}",
            finding.file.bold(),
            finding.line.to_string().blue().bold(),
            "typo:".yellow(),
            finding.word.red().bold(),
            highlight(&finding.context, &finding.word)
        )
    } else {
        format!(
            "{}:{}: typo: '{}' in: {}",
            finding.file, finding.line, finding.word, finding.context
        )
    }
}

/// Colour the whitespace tokens of `context` that reduce to `word`.
fn highlight(context: &str, word: &str) -> String {
    context
        .split_inclusive(char::is_whitespace)
        .map(|piece| {
            let token = piece.trim_end();
            if clean_word(token) == word {
                format!("{}{}", token.red().bold(), &piece[token.len()..])
            } else {
                piece.to_string()
            }
        })
        .collect()
}

fn write_json<W: Write>(out: &mut W, result: &CheckResult) -> io::Result<()> {
    let output = JsonOutput {
        files_checked: result.files_checked,
        total_typos: result.typo_count(),
        typos: result
            .findings
            .iter()
            .map(|f| JsonTypo {
                file: &f.file,
                line: f.line,
                word: &f.word,
                context: &f.context,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).map_err(io::Error::from)?;
    writeln!(out, "{}", json)
}

fn write_summary<W: Write>(
    out: &mut W,
    result: &CheckResult,
    with_counts: bool,
    colored: bool,
) -> io::Result<()> {
    let total = result.typo_count();
    if total == 0 {
        return if colored {
            writeln!(out, "{}", "✅ No typos found.".green().bold())
        } else {
            writeln!(out, "✅ No typos found.")
        };
    }

    if !with_counts {
        return Ok(());
    }

    let files = result.files_with_typos();
    let typo_word = if total == 1 { "typo" } else { "typos" };
    let file_word = if files == 1 { "file" } else { "files" };
    if colored {
        writeln!(
            out,
            "{} {} {} found in {} {}",
            "✗".red().bold(),
            total.to_string().red().bold(),
            typo_word,
            files,
            file_word
        )
    } else {
        writeln!(out, "✗ {} {} found in {} {}", total, typo_word, files, file_word)
    }
}

pub fn print_no_files(colored: bool) {
    if colored {
        println!("{}", "✅ No files to check.".green().bold());
    } else {
        println!("✅ No files to check.");
    }
}

// Workflow command escaping, see the GitHub Actions toolkit `command.ts`.
fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
