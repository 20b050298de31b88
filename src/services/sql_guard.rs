//! Read-only check for generated SQL.
//!
//! This is a lexical guard, not a parser: literals, quoted identifiers and
//! comments are blanked out, then the remaining words are inspected. It
//! accepts one `SELECT` or `WITH` statement and rejects anything carrying a
//! data-modifying, DDL or session keyword. The database role behind the RPC
//! should still be read-only.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GuardError {
    #[error("query is empty")]
    Empty,

    #[error("only a single statement is allowed")]
    MultipleStatements,

    #[error("only SELECT queries are allowed, got {0}")]
    NotReadOnly(String),

    #[error("query uses a forbidden keyword: {0}")]
    ForbiddenKeyword(String),

    #[error("query has an unterminated literal or comment")]
    Unterminated,
}

const ALLOWED_LEADING: &[&str] = &["SELECT", "WITH"];

const FORBIDDEN: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "MERGE", "UPSERT", "DROP", "ALTER", "CREATE", "TRUNCATE", "GRANT",
    "REVOKE", "COPY", "CALL", "DO", "EXECUTE", "PREPARE", "DEALLOCATE", "VACUUM", "ANALYZE", "REINDEX",
    "CLUSTER", "COMMENT", "LOCK", "SET", "RESET", "REFRESH", "LISTEN", "NOTIFY", "UNLISTEN", "DISCARD",
    "INTO", "SECURITY", "PG_SLEEP", "PG_TERMINATE_BACKEND", "PG_CANCEL_BACKEND", "PG_READ_FILE",
    "PG_READ_BINARY_FILE", "PG_LS_DIR", "LO_IMPORT", "LO_EXPORT", "SET_CONFIG", "DBLINK", "DBLINK_EXEC",
];

/// Reject anything that is not a single read-only query
pub fn ensure_read_only(sql: &str) -> Result<(), GuardError> {
    let code = strip_literals_and_comments(sql)?;
    let code = code.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace());

    if code.is_empty() {
        return Err(GuardError::Empty);
    }
    if code.contains(';') {
        return Err(GuardError::MultipleStatements);
    }

    let words: Vec<String> = code
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_uppercase)
        .collect();

    match words.first() {
        Some(first) if ALLOWED_LEADING.contains(&first.as_str()) => {}
        Some(first) => return Err(GuardError::NotReadOnly(first.clone())),
        None => return Err(GuardError::Empty),
    }

    if let Some(word) = words.iter().find(|w| FORBIDDEN.contains(&w.as_str())) {
        return Err(GuardError::ForbiddenKeyword(word.clone()));
    }

    Ok(())
}

/// Replace string literals, quoted identifiers, dollar-quoted bodies and
/// comments with a single space each.
fn strip_literals_and_comments(sql: &str) -> Result<String, GuardError> {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match (c, next) {
            ('-', Some('-')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                out.push(' ');
            }
            ('/', Some('*')) => {
                i += 2;
                loop {
                    match (chars.get(i), chars.get(i + 1)) {
                        (Some('*'), Some('/')) => {
                            i += 2;
                            break;
                        }
                        (Some(_), _) => i += 1,
                        (None, _) => return Err(GuardError::Unterminated),
                    }
                }
                out.push(' ');
            }
            ('\'', _) | ('"', _) => {
                i = skip_quoted(&chars, i, c)?;
                out.push(' ');
            }
            ('$', _) => match dollar_tag(&chars, i) {
                Some(tag) => {
                    i = skip_dollar_quoted(&chars, i, &tag)?;
                    out.push(' ');
                }
                None => {
                    out.push(c);
                    i += 1;
                }
            },
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Skip a `'...'` or `"..."` run starting at `start`; doubled quotes escape.
fn skip_quoted(chars: &[char], start: usize, quote: char) -> Result<usize, GuardError> {
    let mut i = start + 1;
    while i < chars.len() {
        if chars[i] == quote {
            if chars.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return Ok(i + 1);
        }
        i += 1;
    }
    Err(GuardError::Unterminated)
}

/// `$tag$` opening at `start`, if any. Positional parameters like `$1` are not tags.
fn dollar_tag(chars: &[char], start: usize) -> Option<String> {
    let mut i = start + 1;
    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    if chars.get(i) != Some(&'$') {
        return None;
    }
    let tag: String = chars[start..=i].iter().collect();
    if tag.chars().nth(1).is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(tag)
}

fn skip_dollar_quoted(chars: &[char], start: usize, tag: &str) -> Result<usize, GuardError> {
    let tag: Vec<char> = tag.chars().collect();
    let mut i = start + tag.len();
    while i + tag.len() <= chars.len() {
        if chars[i..i + tag.len()] == tag[..] {
            return Ok(i + tag.len());
        }
        i += 1;
    }
    Err(GuardError::Unterminated)
}
