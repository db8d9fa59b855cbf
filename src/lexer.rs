//! Lexical analysis of a single, already expanded command segment.
//!
//! Words are separated by runs of spaces and tabs. There is no quoting: every
//! character other than a separator belongs to a word.

/// Returns `true` for the characters that separate words.
pub fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Splits a segment into its argument vector.
///
/// Leading and trailing blanks are ignored, so an empty or all-blank segment
/// yields an empty vector.
///
/// # Arguments
/// * `segment` - The expanded segment text.
pub fn split_into_tokens(segment: &str) -> Vec<String> {
    segment
        .split(is_blank)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns the first word of `text` and the byte offset where it starts, or
/// `None` if the text is blank.
pub fn first_word(text: &str) -> Option<(usize, &str)> {
    let start = text.find(|c: char| !is_blank(c))?;
    let rest = &text[start..];
    let len = rest.find(is_blank).unwrap_or(rest.len());
    Some((start, &rest[..len]))
}
