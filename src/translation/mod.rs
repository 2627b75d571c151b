use std::borrow::Cow;

mod parsers;
mod scanner;

use parsers::{closes_quote, is_block_comment_end, is_block_comment_start, is_line_comment_start};
use scanner::{State, scan_digits};

/// Placeholder style a physical handle expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Positional `?` (SQLite, ODBC, dblib).
    Question,
    /// Named positional `@P1`, `@P2`, ... (TDS / tiberius).
    AtP,
}

/// Rewrite `?` placeholders into the target style.
///
/// Bare `?` placeholders are numbered left to right; an explicit `?N` keeps
/// its number. Quoted strings, quoted and bracketed identifiers, and comments
/// are left alone. Returns a borrowed `Cow` when no changes are needed.
#[must_use]
pub fn translate_placeholders(sql: &str, target: PlaceholderStyle) -> Cow<'_, str> {
    if target == PlaceholderStyle::Question {
        return Cow::Borrowed(sql);
    }

    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    // Start of the not yet copied slice of `sql`.
    let mut copied = 0;
    let mut next_ordinal = 1usize;
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'[' => state = State::Bracketed,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'?' => {
                    let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
                    buf.push_str(&sql[copied..idx]);
                    buf.push_str("@P");
                    if let Some((digits_end, digits)) = scan_digits(bytes, idx + 1) {
                        buf.push_str(digits);
                        copied = digits_end;
                        idx = digits_end;
                    } else {
                        buf.push_str(&next_ordinal.to_string());
                        next_ordinal += 1;
                        copied = idx + 1;
                        idx += 1;
                    }
                    continue;
                }
                _ => {}
            },
            State::SingleQuoted => {
                if let Some(end) = closes_quote(bytes, idx, b'\'') {
                    if end == idx {
                        state = State::Normal;
                    }
                    idx = end;
                }
            }
            State::DoubleQuoted => {
                if let Some(end) = closes_quote(bytes, idx, b'"') {
                    if end == idx {
                        state = State::Normal;
                    }
                    idx = end;
                }
            }
            State::Bracketed => {
                if let Some(end) = closes_quote(bytes, idx, b']') {
                    if end == idx {
                        state = State::Normal;
                    }
                    idx = end;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_bare_placeholders_in_order() {
        let sql = "select * from t where a = ? and b = ?";
        let res = translate_placeholders(sql, PlaceholderStyle::AtP);
        assert_eq!(res, "select * from t where a = @P1 and b = @P2");
    }

    #[test]
    fn keeps_explicit_numbers() {
        let sql = "insert into t values(?2, ?1)";
        let res = translate_placeholders(sql, PlaceholderStyle::AtP);
        assert_eq!(res, "insert into t values(@P2, @P1)");
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "select '?', [a?b], \"c?\" -- ?\n/* ? /* ? */ */ from t where a = ?";
        let res = translate_placeholders(sql, PlaceholderStyle::AtP);
        assert_eq!(
            res,
            "select '?', [a?b], \"c?\" -- ?\n/* ? /* ? */ */ from t where a = @P1"
        );
    }

    #[test]
    fn escaped_quotes_stay_inside_literal() {
        let sql = "select 'it''s ?' where x = ?";
        let res = translate_placeholders(sql, PlaceholderStyle::AtP);
        assert_eq!(res, "select 'it''s ?' where x = @P1");
    }

    #[test]
    fn non_ascii_text_survives() {
        let sql = "select 'héllo' where nom = ?";
        let res = translate_placeholders(sql, PlaceholderStyle::AtP);
        assert_eq!(res, "select 'héllo' where nom = @P1");
    }

    #[test]
    fn question_style_borrows() {
        let sql = "select * from t where a = ?";
        let res = translate_placeholders(sql, PlaceholderStyle::Question);
        assert!(matches!(res, Cow::Borrowed(_)));

        let res = translate_placeholders("select 1", PlaceholderStyle::AtP);
        assert!(matches!(res, Cow::Borrowed(_)));
    }
}
