pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// Closing quote handling shared by `'..'`, `".."` and `[..]`: a doubled
/// closing character is an escape and stays inside the literal.
pub(super) fn closes_quote(bytes: &[u8], idx: usize, close: u8) -> Option<usize> {
    if bytes.get(idx) != Some(&close) {
        return None;
    }
    if bytes.get(idx + 1) == Some(&close) {
        Some(idx + 1)
    } else {
        Some(idx)
    }
}
