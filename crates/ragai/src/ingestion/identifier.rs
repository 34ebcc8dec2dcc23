//! Stable chunk identifiers derived from file name and chunk index

/// Build the store key for a chunk: the file name with every character
/// outside `[A-Za-z0-9]` replaced by `_`, then `_chunk_{index}`.
///
/// File names that sanitize to the same string share keys, so uploading
/// `a b.txt` after `a_b.txt` overwrites its chunks.
pub fn chunk_id(file_name: &str, chunk_index: usize) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_chunk_{}", sanitized, chunk_index)
}
