//! Input normalisation for the prompt.

/// Lowercases `text` and splits it on any whitespace, dropping empty words.
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect()
}
