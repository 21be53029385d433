//! Table-style scanner tests, using `test-case` to drive one case per row.

use atlast::lang::scanner::{self, ScannerState, Token};
use atlast::lang::source_buffer::SourceBuffer;
use atlast::runtime::error::Status;
use test_case::test_case;

fn scan_one(line: &str) -> Token {
    let mut buffer = SourceBuffer::new("<test>");
    buffer.set_line(line);
    let mut state = ScannerState::default();
    scanner::next_token(&mut buffer, &mut state).expect("scan should not fail")
}

#[test_case("0", Token::Int(0); "zero")]
#[test_case("42", Token::Int(42); "positive decimal")]
#[test_case("-42", Token::Int(-42); "negative decimal")]
#[test_case("0x2A", Token::Int(42); "hex uppercase prefix")]
#[test_case("0X2a", Token::Int(42); "hex mixed case")]
#[test_case("052", Token::Int(42); "octal prefix")]
#[test_case("3.5", Token::Real(3.5); "simple real")]
#[test_case("-2.25", Token::Real(-2.25); "negative real")]
#[test_case("DUP", Token::Word("DUP".to_string()); "bare word")]
#[test_case("dup", Token::Word("DUP".to_string()); "word is upper-cased")]
#[test_case("1-", Token::Word("1-".to_string()); "leading digit word is not numeric")]
#[test_case("-FOO", Token::Word("-FOO".to_string()); "dash without following digit is a word")]
fn scans_expected_token(line: &str, expected: Token) {
    assert_eq!(scan_one(line), expected);
}

#[test_case("DUP SWAP", &["DUP", "SWAP"]; "two words")]
#[test_case("  DUP   SWAP  ", &["DUP", "SWAP"]; "extra whitespace is skipped")]
#[test_case("1 2 3", &["1", "2", "3"]; "three integers")]
fn scans_expected_word_sequence(line: &str, expected_count: &[&str]) {
    let mut buffer = SourceBuffer::new("<test>");
    buffer.set_line(line);
    let mut state = ScannerState::default();
    let mut count = 0;
    loop {
        let token = scanner::next_token(&mut buffer, &mut state).unwrap();
        if token == Token::Null {
            break;
        }
        count += 1;
    }
    assert_eq!(count, expected_count.len());
}

#[test_case(""; "empty line")]
#[test_case("   "; "whitespace only line")]
#[test_case("\\ nothing but a comment"; "line comment only")]
#[test_case("( a whole comment )"; "single line paren comment only")]
fn yields_null_token(line: &str) {
    assert_eq!(scan_one(line), Token::Null);
}

#[test]
fn oversize_token_is_runstring() {
    let long_word = "A".repeat(200);
    let mut buffer = SourceBuffer::new("<test>");
    buffer.set_line(&long_word);
    let mut state = ScannerState::default();
    let result = scanner::next_token(&mut buffer, &mut state);
    assert!(matches!(result, Err(e) if e.status() == Status::RunString));
}

#[test]
fn unrecognized_escape_drops_the_backslash() {
    let mut buffer = SourceBuffer::new("<test>");
    buffer.set_line("\"a\\qb\"");
    let mut state = ScannerState::default();
    let token = scanner::next_token(&mut buffer, &mut state).unwrap();
    assert_eq!(token, Token::Str(b"aqb".to_vec()));
}

#[test]
fn comment_pending_resumes_cleanly_across_a_fresh_line_after_unterminated_string() {
    // An unterminated string on one line reports RUNSTRING without leaving any latched state
    // behind: a fresh line scans normally afterward.
    let mut buffer = SourceBuffer::new("<test>");
    buffer.set_line("\"oops");
    let mut state = ScannerState::default();
    let result = scanner::next_token(&mut buffer, &mut state);
    assert!(result.is_err());

    buffer.set_line("DUP");
    let token = scanner::next_token(&mut buffer, &mut state).unwrap();
    assert_eq!(token, Token::Word("DUP".to_string()));
}
