use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffSpellError>;

#[derive(Debug, Error)]
pub enum DiffSpellError {
    #[error("failed to run git: {0}")]
    GitSpawn(#[source] std::io::Error),

    #[error("`git {command}` failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("spell checker command is empty")]
    EmptyCommand,

    #[error("failed to run spell checker `{program}`: {source}")]
    CheckerSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("spell checker `{program}` exited with {status}: {stderr}")]
    CheckerFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read dictionary file {}: {source}", .path.display())]
    DictionaryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
