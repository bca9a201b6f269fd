use crate::error::{DiffSpellError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Words accepted even when the external checker flags them.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    words: HashSet<String>,
    case_sensitive: bool,
}

impl AllowList {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            words: HashSet::new(),
            case_sensitive,
        }
    }

    /// Build from inline words plus an optional word-list file.
    pub fn load<S: AsRef<str>>(
        inline: &[S],
        file: Option<&Path>,
        case_sensitive: bool,
    ) -> Result<Self> {
        let mut list = Self::new(case_sensitive);
        list.extend_from_str(&inline.iter().map(|w| w.as_ref()).collect::<Vec<_>>().join(" "));

        if let Some(path) = file {
            let content = fs::read_to_string(path).map_err(|source| DiffSpellError::DictionaryRead {
                path: path.to_path_buf(),
                source,
            })?;
            list.extend_from_word_list(&content);
            log::debug!("Loaded dictionary file {}", path.display());
        }

        Ok(list)
    }

    /// Add space-separated words.
    pub fn extend_from_str(&mut self, words: &str) {
        for word in words.split_whitespace() {
            self.insert(word);
        }
    }

    /// One word per line; `#` comments and blank lines are skipped.
    pub fn extend_from_word_list(&mut self, content: &str) {
        for line in content.lines() {
            let word = line.trim();
            if !word.is_empty() && !word.starts_with('#') {
                self.insert(word);
            }
        }
    }

    pub fn insert(&mut self, word: &str) {
        let word = self.normalize(word);
        self.words.insert(word);
    }

    pub fn contains(&self, word: &str) -> bool {
        if self.case_sensitive {
            self.words.contains(word)
        } else {
            self.words.contains(&word.to_lowercase())
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn normalize(&self, word: &str) -> String {
        if self.case_sensitive {
            word.to_string()
        } else {
            word.to_lowercase()
        }
    }
}
