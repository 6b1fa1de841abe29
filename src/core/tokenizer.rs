//! Splits the text after a verb into positional and keyword tokens.
//!
//! The grammar is flat: parts are separated by single spaces,
//! `key=value` parts become keywords, and parts containing `,`, `;` or `|`
//! expand into several positionals. There is no quoting.

use std::collections::HashMap;

use crate::error::{CalbrError, Result};

/// Characters trimmed from both ends of every part.
const EDGE_CHARS: [char; 5] = ['=', ',', ';', '|', '/'];
/// Characters that split a part into several positionals.
const ARG_SEPARATORS: [char; 3] = [',', ';', '|'];

/// Raw tokens of one input line, before coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    /// Positional tokens in input order.
    pub positional: Vec<String>,
    /// Keyword tokens; the last occurrence of a key wins.
    pub keyword: HashMap<String, String>,
}

/// Tokenize the remainder of an input line.
///
/// # Errors
///
/// Returns [`CalbrError::MalformedKeyword`] if a part contains more than one `=`.
pub fn tokenize(remainder: &str) -> Result<Tokens> {
    let mut tokens = Tokens::default();

    for part in remainder.split(' ') {
        let part = part.trim_matches(EDGE_CHARS);
        if part.is_empty() {
            continue;
        }

        if let Some((key, value)) = part.split_once('=') {
            if value.contains('=') {
                return Err(CalbrError::MalformedKeyword {
                    token: part.to_string(),
                });
            }
            tokens.keyword.insert(key.to_string(), value.to_string());
        } else if part.contains(ARG_SEPARATORS) {
            tokens.positional.extend(
                part.split(ARG_SEPARATORS)
                    .filter(|target| !target.is_empty())
                    .map(str::to_string),
            );
        } else {
            tokens.positional.push(part.to_string());
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn keyword_takes_priority_over_separators() {
        let tokens = tokenize("pres=110,120 mode=fast").unwrap();
        assert!(tokens.positional.is_empty());
        assert_eq!(tokens.keyword, kw(&[("pres", "110,120"), ("mode", "fast")]));
    }

    #[test]
    fn separators_expand_into_positionals() {
        let tokens = tokenize("100,101,102").unwrap();
        assert_eq!(tokens.positional, vec!["100", "101", "102"]);
        assert!(tokens.keyword.is_empty());
    }

    #[test]
    fn mixed_separators_drop_empty_segments() {
        let tokens = tokenize("1001;;1002|1003,").unwrap();
        assert_eq!(tokens.positional, vec!["1001", "1002", "1003"]);
    }

    #[test]
    fn repeated_spaces_collapse() {
        let tokens = tokenize("   1001    1002  ").unwrap();
        assert_eq!(tokens.positional, vec!["1001", "1002"]);
    }

    #[test]
    fn edge_punctuation_is_stripped() {
        let tokens = tokenize("/1001, ,1002; dest=/tmp/out/").unwrap();
        assert_eq!(tokens.positional, vec!["1001", "1002"]);
        assert_eq!(tokens.keyword, kw(&[("dest", "/tmp/out")]));
    }

    #[test]
    fn dangling_equals_becomes_positional() {
        let tokens = tokenize("dry= =yes").unwrap();
        assert_eq!(tokens.positional, vec!["dry", "yes"]);
        assert!(tokens.keyword.is_empty());
    }

    #[test]
    fn ranges_pass_through_verbatim() {
        let tokens = tokenize("1001-1005 2001~2003").unwrap();
        assert_eq!(tokens.positional, vec!["1001-1005", "2001~2003"]);
    }

    #[test]
    fn last_repeated_key_wins() {
        let tokens = tokenize("dry=no 1001 dry=yes").unwrap();
        assert_eq!(tokens.positional, vec!["1001"]);
        assert_eq!(tokens.keyword, kw(&[("dry", "yes")]));
    }

    #[test]
    fn double_equals_is_rejected() {
        let err = tokenize("a=b=c").unwrap_err();
        assert!(matches!(err, CalbrError::MalformedKeyword { ref token } if token == "a=b=c"));
    }

    #[test]
    fn empty_remainder_yields_nothing() {
        assert_eq!(tokenize("").unwrap(), Tokens::default());
    }
}
