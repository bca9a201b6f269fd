pub mod parser;

pub use parser::parse_unified_diff;

/// A line that exists in the new version of a file and was added or changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedLine {
    /// 1-based line number in the new version of the file.
    pub line: usize,
    pub text: String,
}

impl ChangedLine {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChanges {
    pub path: String,
    pub lines: Vec<ChangedLine>,
}

/// Changed lines grouped per file, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    files: Vec<FileChanges>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat every line of `text` as changed, numbered from 1.
    pub fn from_plain_text(name: &str, text: &str) -> Self {
        let lines: Vec<ChangedLine> = text
            .lines()
            .enumerate()
            .map(|(i, line)| ChangedLine::new(i + 1, line))
            .collect();

        let mut set = Self::new();
        set.insert(name, lines);
        set
    }

    /// Append lines for `path`, creating the entry on first use.
    /// Empty line lists are dropped.
    pub fn insert(&mut self, path: &str, lines: Vec<ChangedLine>) {
        if lines.is_empty() {
            return;
        }
        match self.files.iter_mut().find(|f| f.path == path) {
            Some(existing) => existing.lines.extend(lines),
            None => self.files.push(FileChanges {
                path: path.to_string(),
                lines,
            }),
        }
    }

    pub(crate) fn push_line(&mut self, path: &str, line: ChangedLine) {
        self.insert(path, vec![line]);
    }

    pub fn get(&self, path: &str) -> Option<&FileChanges> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileChanges> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<FileChanges> {
        self.files
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a FileChanges;
    type IntoIter = std::slice::Iter<'a, FileChanges>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
