//! Tokenizer for stackm listings.

use crate::error::AsmError;

/// A single token from a listing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// An identifier (instruction mnemonic). Always lowercase.
    Ident(String),
    /// A numeric literal (decimal or hex, optionally negative).
    Number(i128),
}

/// A classified listing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line {
    Blank,
    /// Full-line comment text, without the `; ` marker.
    Comment(String),
    Tokens(Vec<Token>),
}

/// Tokenize a single line of listing text.
///
/// A line whose first non-blank character is `;` is a comment and is kept.
/// On instruction lines, everything from `#` (a trace snapshot column) or a
/// trailing `;` onward is ignored.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Line, AsmError> {
    let trimmed = line.trim_start();
    if let Some(text) = trimmed.strip_prefix(';') {
        let text = text.strip_prefix(' ').unwrap_or(text);
        return Ok(Line::Comment(text.to_string()));
    }

    let code = match trimmed.find(['#', ';']) {
        Some(pos) => &trimmed[..pos],
        None => trimmed,
    };

    let mut tokens = Vec::new();
    for word in code.split_whitespace() {
        let numeric = word.starts_with('-')
            || word.as_bytes().first().is_some_and(|b| b.is_ascii_digit());
        let token = if numeric {
            Token::Number(parse_number(word).ok_or_else(|| AsmError::InvalidNumber {
                line: line_num,
                token: word.to_string(),
            })?)
        } else {
            Token::Ident(word.to_lowercase())
        };
        tokens.push(token);
    }

    if tokens.is_empty() {
        Ok(Line::Blank)
    } else {
        Ok(Line::Tokens(tokens))
    }
}

fn parse_number(word: &str) -> Option<i128> {
    let (negative, digits) = match word.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, word),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            i128::from_str_radix(hex, 16).ok()?
        }
        Some(_) => return None,
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse().ok()?
        }
        None => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}
