//! Splits a message into literal text and action tokens.
//!
//! The scanner walks the source looking for the left delimiter. Everything
//! before it is text; everything up to the matching right delimiter is
//! tokenized. String literals may contain the right delimiter.
//!
//! Trim markers follow the usual convention: `L- ` trims trailing whitespace
//! from the preceding text and ` -R` trims leading whitespace from the
//! following text. `L/* ... */R` is a comment.

use crate::error::{FormatError, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Identifier(String),
    Field(String),
    Dot,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,
    Pipe,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset in the message.
    pub offset: usize,
    /// Whether whitespace separates this token from the previous one.
    pub spaced: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment {
    Text(String),
    Action { tokens: Vec<Token>, offset: usize },
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn error_at(offset: usize, msg: impl std::fmt::Display) -> FormatError {
    FormatError::expression(format!("at offset {}: {}", offset, msg))
}

/// Returns the byte length of a left trim marker (`-` followed by a space).
fn left_trim_marker(after_left: &str) -> Option<usize> {
    let mut chars = after_left.chars();
    match (chars.next(), chars.next()) {
        (Some('-'), Some(c)) if is_space(c) => Some(1),
        _ => None,
    }
}

/// Scans `source` into text and action segments.
pub(crate) fn scan(source: &str, left: &str, right: &str) -> Result<Vec<Segment>> {
    if left.is_empty() || right.is_empty() {
        return Err(FormatError::expression("delimiters must not be empty"));
    }

    let mut segments = Vec::new();
    let mut pos = 0;
    let mut trim_next = false;

    while pos < source.len() {
        let rest = &source[pos..];
        let Some(found) = rest.find(left) else {
            push_text(&mut segments, rest, trim_next, false);
            break;
        };

        let open = pos + found;
        let mut cursor = open + left.len();
        let trim_previous = match left_trim_marker(&source[cursor..]) {
            Some(len) => {
                cursor += len;
                true
            }
            None => false,
        };
        push_text(&mut segments, &rest[..found], trim_next, trim_previous);

        let body = if trim_previous {
            source[cursor..].trim_start_matches(is_space)
        } else {
            &source[cursor..]
        };
        if body.starts_with("/*") {
            let comment_start = source.len() - body.len();
            let (end, trim_after) = skip_comment(source, comment_start, right, open)?;
            pos = end;
            trim_next = trim_after;
            continue;
        }

        let (tokens, end, trim_after) = lex_action(source, cursor, right, open)?;
        segments.push(Segment::Action {
            tokens,
            offset: open,
        });
        pos = end;
        trim_next = trim_after;
    }

    Ok(segments)
}

fn push_text(segments: &mut Vec<Segment>, text: &str, trim_start: bool, trim_end: bool) {
    let mut text = text;
    if trim_start {
        text = text.trim_start_matches(is_space);
    }
    if trim_end {
        text = text.trim_end_matches(is_space);
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

/// Skips `/* ... */` and the closing delimiter that must follow it.
fn skip_comment(source: &str, start: usize, right: &str, open: usize) -> Result<(usize, bool)> {
    let close = source[start + 2..]
        .find("*/")
        .ok_or_else(|| error_at(open, "unclosed comment"))?;
    let after = start + 2 + close + 2;
    let rest = &source[after..];

    if rest.starts_with(right) {
        return Ok((after + right.len(), false));
    }
    if let Some(len) = right_trim_marker(rest, right) {
        return Ok((after + len, true));
    }
    Err(error_at(open, "comment ends before closing delimiter"))
}

/// Returns the byte length of ` -R` if `rest` starts with it.
fn right_trim_marker(rest: &str, right: &str) -> Option<usize> {
    let c = rest.chars().next().filter(|c| is_space(*c))?;
    let tail = rest[c.len_utf8()..].strip_prefix('-')?;
    tail.starts_with(right)
        .then(|| c.len_utf8() + 1 + right.len())
}

/// Tokenizes one action, returning the tokens, the position after the right
/// delimiter, and whether a right trim marker was present.
fn lex_action(
    source: &str,
    start: usize,
    right: &str,
    open: usize,
) -> Result<(Vec<Token>, usize, bool)> {
    let mut tokens = Vec::new();
    let mut pos = start;
    let mut spaced = true;

    loop {
        let rest = &source[pos..];
        if rest.starts_with(right) {
            return Ok((tokens, pos + right.len(), false));
        }
        if let Some(len) = right_trim_marker(rest, right) {
            return Ok((tokens, pos + len, true));
        }

        let Some(c) = rest.chars().next() else {
            return Err(error_at(open, "unclosed action"));
        };
        if is_space(c) {
            pos += c.len_utf8();
            spaced = true;
            continue;
        }

        let (kind, len) = lex_token(rest, pos)?;
        tokens.push(Token {
            kind,
            offset: pos,
            spaced,
        });
        spaced = false;
        pos += len;
    }
}

fn lex_token(rest: &str, offset: usize) -> Result<(TokenKind, usize)> {
    let mut chars = rest.chars();
    let c = chars.next().ok_or_else(|| error_at(offset, "unexpected end"))?;
    let next = chars.next();

    match c {
        '|' => Ok((TokenKind::Pipe, 1)),
        '(' => Ok((TokenKind::LeftParen, 1)),
        ')' => Ok((TokenKind::RightParen, 1)),
        '"' => lex_quoted(rest, offset),
        '`' => lex_raw(rest, offset),
        '.' => match next {
            Some(n) if is_ident_start(n) => {
                let name = take_identifier(&rest[1..]);
                Ok((TokenKind::Field(name.to_string()), 1 + name.len()))
            }
            _ => Ok((TokenKind::Dot, 1)),
        },
        '$' => Err(error_at(offset, "variables are not supported")),
        c if c.is_ascii_digit() => lex_number(rest, offset),
        '+' | '-' if next.is_some_and(|n| n.is_ascii_digit()) => lex_number(rest, offset),
        c if is_ident_start(c) => {
            let name = take_identifier(rest);
            let kind = match name {
                "true" => TokenKind::Bool(true),
                "false" => TokenKind::Bool(false),
                "nil" => TokenKind::Nil,
                _ => TokenKind::Identifier(name.to_string()),
            };
            Ok((kind, name.len()))
        }
        other => Err(error_at(offset, format!("unexpected {:?} in action", other))),
    }
}

fn take_identifier(rest: &str) -> &str {
    let end = rest
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map_or(rest.len(), |(i, _)| i);
    &rest[..end]
}

fn lex_number(rest: &str, offset: usize) -> Result<(TokenKind, usize)> {
    let bytes = rest.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let sign_len = end;

    let is_hex = rest[end..].starts_with("0x") || rest[end..].starts_with("0X");
    let mut is_float = false;
    if is_hex {
        end += 2;
        while end < bytes.len() && bytes[end].is_ascii_hexdigit() {
            end += 1;
        }
    } else {
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            is_float = true;
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
            is_float = true;
            end += 1;
            if end < bytes.len() && matches!(bytes[end], b'+' | b'-') {
                end += 1;
            }
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
    }

    let text = &rest[..end];
    if rest[end..].chars().next().is_some_and(is_ident_char) {
        return Err(error_at(offset, format!("bad number syntax: {:?}", text)));
    }

    let bad = || error_at(offset, format!("bad number syntax: {:?}", text));
    let kind = if is_hex {
        let digits = &text[sign_len + 2..];
        let magnitude = i64::from_str_radix(digits, 16).map_err(|_| bad())?;
        if text.starts_with('-') {
            TokenKind::Int(-magnitude)
        } else {
            TokenKind::Int(magnitude)
        }
    } else if is_float {
        TokenKind::Float(text.parse::<f64>().map_err(|_| bad())?)
    } else {
        TokenKind::Int(text.parse::<i64>().map_err(|_| bad())?)
    };
    Ok((kind, end))
}

fn lex_raw(rest: &str, offset: usize) -> Result<(TokenKind, usize)> {
    let close = rest[1..]
        .find('`')
        .ok_or_else(|| error_at(offset, "unterminated raw quoted string"))?;
    Ok((TokenKind::Str(rest[1..1 + close].to_string()), close + 2))
}

fn lex_quoted(rest: &str, offset: usize) -> Result<(TokenKind, usize)> {
    let mut out = String::new();
    let mut chars = rest.char_indices().skip(1);

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((TokenKind::Str(out), i + 1)),
            '\n' => break,
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or_else(|| error_at(offset, "unterminated quoted string"))?;
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'a' => out.push('\x07'),
                    '0' => out.push('\0'),
                    '\\' | '"' | '\'' => out.push(escaped),
                    'x' | 'u' => {
                        let width = if escaped == 'x' { 2 } else { 4 };
                        let mut code = 0u32;
                        for _ in 0..width {
                            let digit = chars
                                .next()
                                .and_then(|(_, d)| d.to_digit(16))
                                .ok_or_else(|| error_at(offset, "invalid escape in string"))?;
                            code = code * 16 + digit;
                        }
                        let decoded = char::from_u32(code)
                            .ok_or_else(|| error_at(offset, "invalid escape in string"))?;
                        out.push(decoded);
                    }
                    other => {
                        return Err(error_at(
                            offset,
                            format!("unknown escape sequence: \\{}", other),
                        ))
                    }
                }
            }
            c => out.push(c),
        }
    }

    Err(error_at(offset, "unterminated quoted string"))
}
