//! Word budgeting for truncation and map-reduce summarization.

/// Window size for complete-mode map-reduce summarization.
pub const DEFAULT_WINDOW_WORDS: usize = 800;

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep the first `limit` whitespace-split words. The flag reports whether
/// anything was dropped.
pub fn truncate_words(text: &str, limit: usize) -> (String, bool) {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return (words.join(" "), false);
    }
    (words[..limit].join(" "), true)
}

/// Split into consecutive windows of `size` words covering every word
/// exactly once; the final window may be shorter. Empty input yields no
/// windows.
pub fn word_windows(text: &str, size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(size).map(|chunk| chunk.join(" ")).collect()
}
