//! The ATLAST scanner. Partitions one line of input into number, string, and word tokens,
//! with Forth-style comment handling. Unlike a whole-buffer tokenizer this is explicitly
//! incremental: a multi-line `( ... )` comment or a runaway string can span several calls to
//! `next_token`, so the caller carries a small `ScannerState` between calls.

use crate::lang::source_buffer::SourceBuffer;
use crate::runtime::error::{self, AtlastError, Status};

/// Maximum length, in bytes, of a word, string, or number token. Exceeding it on a string is a
/// runaway condition (`RUNSTRING`), not a silent truncation.
pub const MAX_TOKEN_LEN: usize = 128;

/// One token out of the scanner. `Null` means "nothing on this line right now" — either the line
/// ran out, or the token was consumed entirely by comment handling.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Null,
    Word(String),
    Int(i64),
    Real(f64),
    Str(Vec<u8>),
}

/// Persistent scanner state that must survive across calls to `next_token` on successive lines:
/// whether we're in the middle of a `( ...` comment that didn't close on its own line.
#[derive(Default, Clone, Copy)]
pub struct ScannerState {
    pub comment_pending: bool,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn skip_whitespace(buffer: &mut SourceBuffer) {
    while let Some(b) = buffer.peek() {
        if !is_whitespace(b) {
            break;
        }
        let _ = buffer.next_byte();
    }
}

/// Collect bytes up to the next whitespace (or end of line), used for both words and numbers.
fn collect_word(buffer: &mut SourceBuffer) -> Vec<u8> {
    let mut text = Vec::new();
    while let Some(b) = buffer.peek() {
        if is_whitespace(b) {
            break;
        }
        text.push(b);
        let _ = buffer.next_byte();
    }
    text
}

/// Process one `\` escape inside a string literal. The byte after the backslash has already been
/// peeked; this consumes it and returns the translated character, or drops the backslash for any
/// escape it doesn't recognize (an unknown escape just drops the backslash).
fn process_escape(buffer: &mut SourceBuffer) -> u8 {
    match buffer.next_byte() {
        Some(b'b') => 0x08,
        Some(b'n') => b'\n',
        Some(b'r') => b'\r',
        Some(b't') => b'\t',
        Some(other) => other,
        None => b'\\',
    }
}

/// Scan a `"`-delimited string literal. The opening `"` has already been consumed by the caller.
fn scan_string(buffer: &mut SourceBuffer, location: &crate::lang::source_buffer::SourceLocation) -> error::Result<Token> {
    let mut bytes = Vec::new();

    loop {
        match buffer.next_byte() {
            Some(b'"') => return Ok(Token::Str(bytes)),

            Some(b'\\') => {
                bytes.push(process_escape(buffer));
            }

            Some(other) => {
                bytes.push(other);
            }

            None => {
                return Err(AtlastError::new(
                    Status::RunString,
                    Some(location.clone()),
                    "unterminated string literal".to_string(),
                ));
            }
        }

        if bytes.len() > MAX_TOKEN_LEN {
            return Err(AtlastError::new(
                Status::RunString,
                Some(location.clone()),
                format!("string literal exceeds {} bytes", MAX_TOKEN_LEN),
            ));
        }
    }
}

/// Does this candidate word look like it should be tried as a number? First byte is a digit, or
/// `-` followed by a digit (or a `0x`/`0X` prefix).
fn looks_numeric(text: &[u8]) -> bool {
    match text.first() {
        Some(b) if b.is_ascii_digit() => true,
        Some(b'-') => matches!(text.get(1), Some(b) if b.is_ascii_digit()),
        _ => false,
    }
}

/// Try to parse `text` as an integer, auto-detecting the base: `0x`/`0X` prefix is hex, a bare
/// leading `0` (with more digits after it) is octal, anything else is decimal.
fn try_int(text: &str) -> Option<i64> {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, text),
    };

    if unsigned.is_empty() {
        return None;
    }

    let value = if let Some(hex) = unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if unsigned.len() > 1 && unsigned.as_bytes()[0] == b'0' {
        i64::from_str_radix(&unsigned[1..], 8).ok()?
    } else {
        unsigned.parse::<i64>().ok()?
    };

    Some(sign * value)
}

/// Scan the next token from `buffer`. Returns `Token::Null` when the line is exhausted or the
/// call was entirely consumed by comment handling.
pub fn next_token(buffer: &mut SourceBuffer, state: &mut ScannerState) -> error::Result<Token> {
    // A pending multi-line comment swallows the rest of this call until it closes.
    if state.comment_pending {
        loop {
            match buffer.next_byte() {
                Some(b')') => {
                    state.comment_pending = false;
                    break;
                }
                Some(_) => continue,
                None => return Ok(Token::Null),
            }
        }
    }

    skip_whitespace(buffer);

    if buffer.at_end() {
        return Ok(Token::Null);
    }

    let location = buffer.location();
    let next = buffer.peek().unwrap();

    // String literal.
    if next == b'"' {
        let _ = buffer.next_byte();
        return scan_string(buffer, &location);
    }

    // Everything else is scanned as a bare word first; comments and numbers are then
    // distinguished from it by their exact text.
    let text = collect_word(buffer);

    if text.len() > MAX_TOKEN_LEN {
        return Err(AtlastError::new(
            Status::RunString,
            Some(location),
            format!("token exceeds {} bytes", MAX_TOKEN_LEN),
        ));
    }

    // Line comment: `\` consumes the rest of the line.
    if text == b"\\" {
        buffer.skip_to_end();
        return Ok(Token::Null);
    }

    // Multi-line comment opener: `(` consumes through the first `)` on this line, or sets
    // comment-pending if none is found.
    if text == b"(" {
        loop {
            match buffer.next_byte() {
                Some(b')') => return next_token(buffer, state),
                Some(_) => continue,
                None => {
                    state.comment_pending = true;
                    return Ok(Token::Null);
                }
            }
        }
    }

    let as_str = match std::str::from_utf8(&text) {
        Ok(s) => s,
        Err(_) => return Ok(Token::Word(String::from_utf8_lossy(&text).to_uppercase())),
    };

    if looks_numeric(&text) {
        if let Some(i) = try_int(as_str) {
            return Ok(Token::Int(i));
        }
        if let Ok(f) = as_str.parse::<f64>() {
            return Ok(Token::Real(f));
        }
    }

    Ok(Token::Word(as_str.to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_line(line: &str) -> Vec<Token> {
        let mut buffer = SourceBuffer::new("<test>");
        buffer.set_line(line);
        let mut state = ScannerState::default();
        let mut tokens = Vec::new();

        loop {
            let token = next_token(&mut buffer, &mut state).expect("scan should not fail");
            if token == Token::Null {
                break;
            }
            tokens.push(token);
        }

        tokens
    }

    #[test]
    fn scans_words_and_numbers() {
        let tokens = scan_line("DUP 42 -7 3.5 swap");
        assert_eq!(
            tokens,
            vec![
                Token::Word("DUP".to_string()),
                Token::Int(42),
                Token::Int(-7),
                Token::Real(3.5),
                Token::Word("SWAP".to_string()),
            ]
        );
    }

    #[test]
    fn scans_hex_and_octal() {
        let tokens = scan_line("0x1F 010");
        assert_eq!(tokens, vec![Token::Int(31), Token::Int(8)]);
    }

    #[test]
    fn scans_string_with_escapes() {
        let tokens = scan_line("\"a\\tb\\nc\"");
        assert_eq!(tokens, vec![Token::Str(b"a\tb\nc".to_vec())]);
    }

    #[test]
    fn unterminated_string_is_runstring() {
        let mut buffer = SourceBuffer::new("<test>");
        buffer.set_line("\"unterminated");
        let mut state = ScannerState::default();
        let result = next_token(&mut buffer, &mut state);
        assert!(matches!(result, Err(e) if e.status() == Status::RunString));
    }

    #[test]
    fn line_comment_consumes_rest_of_line() {
        let tokens = scan_line("DUP \\ this is ignored SWAP");
        assert_eq!(tokens, vec![Token::Word("DUP".to_string())]);
    }

    #[test]
    fn single_line_paren_comment_is_skipped() {
        let tokens = scan_line("DUP ( comment ) SWAP");
        assert_eq!(
            tokens,
            vec![Token::Word("DUP".to_string()), Token::Word("SWAP".to_string())]
        );
    }

    #[test]
    fn multiline_paren_comment_spans_calls() {
        let mut buffer = SourceBuffer::new("<test>");
        let mut state = ScannerState::default();

        buffer.set_line("DUP ( start of comment");
        let first = next_token(&mut buffer, &mut state).unwrap();
        assert_eq!(first, Token::Word("DUP".to_string()));
        let second = next_token(&mut buffer, &mut state).unwrap();
        assert_eq!(second, Token::Null);
        assert!(state.comment_pending);

        buffer.set_line("still inside ) SWAP");
        let third = next_token(&mut buffer, &mut state).unwrap();
        assert_eq!(third, Token::Word("SWAP".to_string()));
        assert!(!state.comment_pending);
    }
}
