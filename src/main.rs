use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use diffspell::checker::dictionary::AllowList;
use diffspell::cli::output::{self, OutputFormat};
use diffspell::config::Overrides;
use diffspell::filter::PathFilter;
use diffspell::git::Git;
use diffspell::input::InputSource;
use diffspell::{CheckResult, Config, SpellChecker};
use rayon::prelude::*;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "diffspell")]
#[command(
    version,
    about = "Spell check only the lines changed in Git diffs or a diff file",
    long_about = None
)]
struct Cli {
    /// Branch to diff against (ignored with --diff-file or --input-string)
    #[arg(long, env = "INPUT_BASE_BRANCH")]
    base_branch: Option<String>,

    /// Remote the base branch lives on
    #[arg(long, env = "INPUT_REMOTE")]
    remote: Option<String>,

    /// JSON list of glob patterns to include
    #[arg(long, env = "INPUT_INCLUDE", value_name = "JSON")]
    include: Option<String>,

    /// JSON list of glob patterns to exclude
    #[arg(long, env = "INPUT_EXCLUDE", value_name = "JSON")]
    exclude: Option<String>,

    /// Spell checker command; reads text on stdin, prints misspelled words
    #[arg(long, env = "INPUT_CMD")]
    cmd: Option<String>,

    /// Space-separated list of allowed words
    #[arg(long, env = "INPUT_DICTIONARY")]
    dictionary: Option<String>,

    /// File with one allowed word per line
    #[arg(long, env = "INPUT_DICTIONARY_FILE", value_name = "PATH")]
    dictionary_file: Option<String>,

    /// Skip tokens matching this regex (repeatable)
    #[arg(long)]
    ignore_pattern: Vec<String>,

    /// Output format (github, console, json)
    #[arg(short = 'o', long, env = "INPUT_FORMAT", value_name = "FORMAT")]
    format: Option<String>,

    /// Emit console output instead of GitHub-style error annotations
    #[arg(long)]
    console_output: bool,

    /// Path to a unified diff file, `-` for stdin
    #[arg(long)]
    diff_file: Option<PathBuf>,

    /// Raw text or diff string to spellcheck directly
    #[arg(long)]
    input_string: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if typos are found
    #[arg(long)]
    no_fail: bool,

    /// Print debug logs to stderr
    #[arg(long)]
    debug: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "diffspell", &mut io::stdout());
        return Ok(());
    }

    init_logging(cli.debug || env_flag("INPUT_DEBUG"));

    let config = Config::load(Overrides {
        base_branch: non_empty(cli.base_branch.clone()),
        remote: non_empty(cli.remote.clone()),
        include: non_empty(cli.include.clone()),
        exclude: non_empty(cli.exclude.clone()),
        cmd: non_empty(cli.cmd.clone()),
        dictionary: non_empty(cli.dictionary.clone()),
        dictionary_file: non_empty(cli.dictionary_file.clone()).map(PathBuf::from),
        ignore_patterns: cli.ignore_pattern.clone(),
        format: non_empty(cli.format.clone())
            .map(|f| f.parse::<OutputFormat>())
            .transpose()
            .map_err(anyhow::Error::msg)?,
    })?;
    log::debug!("Effective config: {:?}", config);

    let format = if cli.console_output {
        OutputFormat::Console
    } else {
        config.format
    };
    let colored = !cli.no_color && format == OutputFormat::Console;

    let source = if let Some(text) = &cli.input_string {
        InputSource::Text(text.clone())
    } else if let Some(path) = &cli.diff_file {
        InputSource::DiffFile(path.clone())
    } else {
        let root = std::env::current_dir().context("Failed to get current directory")?;
        InputSource::Git {
            base_branch: config.base_branch.clone(),
            filter: PathFilter::new(&config.include, &config.exclude, &root)?,
            git: Git::new(&root, config.remote.clone()),
        }
    };

    let Some(changes) = source.load()? else {
        if format == OutputFormat::Json {
            output::print_report(&CheckResult::default(), format, colored)?;
        } else {
            output::print_no_files(colored);
        }
        return Ok(());
    };

    let allow_list = AllowList::load(
        &config.dictionary,
        config.dictionary_file.as_deref(),
        config.case_sensitive,
    )?;
    let checker = SpellChecker::new(&config.cmd, allow_list, &config.ignore_patterns)?;

    let files = changes.into_files();
    let findings = files
        .par_iter()
        .map(|file| checker.check(&file.path, &file.lines))
        .collect::<diffspell::Result<Vec<_>>>()?;

    let result = CheckResult {
        files_checked: files.len(),
        findings: findings.into_iter().flatten().collect(),
    };

    output::print_report(&result, format, colored)?;

    // Exit with appropriate code
    if result.typo_count() > 0 && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

/// GitHub passes unset action inputs as empty strings, so flags backed by
/// `INPUT_*` variables are taken as strings and blank ones dropped here.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_flag(name: &str) -> bool {
    std::env::var_os(name).is_some_and(|v| !v.is_empty())
}
