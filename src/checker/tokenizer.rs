// Word extraction mirrors what line-oriented checkers such as `aspell list`
// report: whitespace tokens stripped down to their letters.

/// Whitespace-separated tokens of a line, raw and cleaned.
pub fn tokens(line: &str) -> impl Iterator<Item = (&str, String)> {
    line.split_whitespace()
        .map(|raw| (raw, clean_word(raw)))
        .filter(|(_, clean)| !clean.is_empty())
}

/// Keep only alphabetic characters: `"werd,"` -> `"werd"`, `"don't"` -> `"dont"`.
pub fn clean_word(token: &str) -> String {
    token.chars().filter(|c| c.is_alphabetic()).collect()
}
