//! URL query string parsing with strict percent-decoding.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid percent escape at byte {0} of value")]
    InvalidEscape(usize),

    #[error("decoded value is not valid UTF-8")]
    NotUtf8,
}

/// Parse a URL query substring into a `key -> decoded value` map.
///
/// The input is everything after the first `?` of the URL, `?` excluded.
/// Pairs are split on `&`, keys from values on the first `=`. Pairs with an
/// empty key are dropped; a repeated key keeps its last value. A bare key
/// with no `=` maps to the empty string. An empty query yields an empty map.
///
/// Any malformed value fails the whole parse.
pub fn parse_query(query: &str) -> Result<HashMap<String, String>, DecodeError> {
    let mut params = HashMap::new();
    if query.is_empty() {
        return Ok(params);
    }

    for pair in query.split('&') {
        let (key, raw_value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        if key.is_empty() {
            continue;
        }
        params.insert(key.to_string(), percent_decode(raw_value)?);
    }

    Ok(params)
}

/// Strict percent-decoding: `%XX` escapes only, `+` stays literal. A `%` not
/// followed by two hex digits, or a decoded byte sequence that is not UTF-8,
/// is an error.
pub fn percent_decode(raw: &str) -> Result<String, DecodeError> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16));
            let lo = bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16));
            match (hi, lo) {
                (Some(hi), Some(lo)) => {
                    out.push(((hi as u8) << 4) | lo as u8);
                    i += 3;
                }
                _ => return Err(DecodeError::InvalidEscape(i)),
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| DecodeError::NotUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_empty_map() {
        assert!(parse_query("").unwrap().is_empty());
    }

    #[test]
    fn splits_pairs_and_decodes_values() {
        let params = parse_query("access_token=abc%20123&next=%2Fboard").unwrap();
        assert_eq!(params.get("access_token").map(String::as_str), Some("abc 123"));
        assert_eq!(params.get("next").map(String::as_str), Some("/board"));
    }

    #[test]
    fn last_occurrence_wins_for_repeated_keys() {
        let params = parse_query("a=1&b=2&a=3").unwrap();
        assert_eq!(params.get("a").map(String::as_str), Some("3"));
        assert_eq!(params.get("b").map(String::as_str), Some("2"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn bare_key_maps_to_empty_string() {
        let params = parse_query("flag&a=1").unwrap();
        assert_eq!(params.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn empty_keys_are_dropped() {
        let params = parse_query("=orphan&&a=1").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("a").map(String::as_str), Some("1"));
    }

    #[test]
    fn value_splits_on_first_equals_only() {
        let params = parse_query("t=a=b=c").unwrap();
        assert_eq!(params.get("t").map(String::as_str), Some("a=b=c"));
    }

    #[test]
    fn plus_is_not_a_space() {
        let params = parse_query("q=a+b").unwrap();
        assert_eq!(params.get("q").map(String::as_str), Some("a+b"));
    }

    #[test]
    fn decodes_multibyte_escapes() {
        assert_eq!(percent_decode("%EB%84%A4%EC%9D%B4%EB%B2%84").unwrap(), "네이버");
    }

    #[test]
    fn invalid_escape_fails_the_parse() {
        assert_eq!(parse_query("access_token=%ZZ"), Err(DecodeError::InvalidEscape(0)));
    }

    #[test]
    fn truncated_escape_fails() {
        assert_eq!(percent_decode("abc%A"), Err(DecodeError::InvalidEscape(3)));
        assert_eq!(percent_decode("abc%"), Err(DecodeError::InvalidEscape(3)));
    }

    #[test]
    fn escape_error_reports_the_offset_within_the_value() {
        let err = parse_query("a=ok&access_token=xx%ZZ").unwrap_err();
        assert_eq!(err, DecodeError::InvalidEscape(2));
        assert_eq!(
            err.to_string(),
            "invalid percent escape at byte 2 of value"
        );
    }

    #[test]
    fn non_utf8_result_fails() {
        assert_eq!(percent_decode("%FF"), Err(DecodeError::NotUtf8));
    }
}
