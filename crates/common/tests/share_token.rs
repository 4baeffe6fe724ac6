//! Share token validation matrix for the `pub` URL parameter
//!
//! Every case here must be settled before a token is allowed anywhere near
//! the key exchange: strict length, strict charset, no trimming.

use common::crypto::{ShareToken, TokenError, SHARE_TOKEN_LEN};

#[test]
fn accepts_valid_266_char_hex_string() {
    let token = "a".repeat(266);
    assert!(ShareToken::validate(&token).is_ok());
}

#[test]
fn accepts_mixed_case_hex() {
    let mut token = String::from("aAbBcCdDeEfF00112233");
    token.push_str(&"0".repeat(SHARE_TOKEN_LEN - token.len()));
    assert!(ShareToken::validate(&token).is_ok());
}

#[test]
fn rejects_non_hex_characters() {
    let token = "g".repeat(266);
    assert!(matches!(
        ShareToken::validate(&token),
        Err(TokenError::InvalidCharacter(0))
    ));
}

#[test]
fn rejects_whitespace() {
    let spaces = " ".repeat(266);
    assert!(ShareToken::validate(&spaces).is_err());

    // An otherwise valid token with one embedded space is still invalid
    let mut token = "a".repeat(266);
    token.replace_range(100..101, " ");
    assert!(matches!(
        ShareToken::validate(&token),
        Err(TokenError::InvalidCharacter(100))
    ));
}

#[test]
fn rejects_special_characters() {
    let token = "0".repeat(265) + "!";
    assert!(matches!(
        ShareToken::validate(&token),
        Err(TokenError::InvalidCharacter(265))
    ));
}

#[test]
fn rejects_wrong_length() {
    assert!(matches!(
        ShareToken::validate(&"a".repeat(265)),
        Err(TokenError::InvalidLength(265))
    ));
    assert!(matches!(
        ShareToken::validate(&"a".repeat(267)),
        Err(TokenError::InvalidLength(267))
    ));
}

#[test]
fn rejects_empty_string() {
    assert!(matches!(
        ShareToken::validate(""),
        Err(TokenError::InvalidLength(0))
    ));
}

#[test]
fn rejects_hex_prefix() {
    // No prefix stripping: "0x..." fails on charset, not silently accepted
    let token = format!("0x{}", "a".repeat(264));
    assert!(matches!(
        ShareToken::validate(&token),
        Err(TokenError::InvalidCharacter(1))
    ));
}
