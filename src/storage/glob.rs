//! Glob pattern matching for the KEYS command.
//!
//! Patterns are compiled once per call and then matched against every
//! key. Matching is byte-oriented; keys are not assumed to be UTF-8.
//!
//! Supported syntax:
//! - `*` matches any run of bytes, including none
//! - `?` matches exactly one byte
//! - `[abc]`, `[a-z]` match one byte from a class; `[^...]` negates it
//! - `\x` matches `x` literally, also inside a class
//!
//! An unterminated class, an empty class, or a trailing backslash is an
//! invalid pattern.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(u8),
    AnyByte,
    AnyRun,
    Class { negated: bool, ranges: Vec<(u8, u8)> },
}

impl Token {
    /// Whether a single-byte token accepts `b`. `AnyRun` is handled by the matcher.
    fn accepts(&self, b: u8) -> bool {
        match self {
            Token::Literal(c) => *c == b,
            Token::AnyByte => true,
            Token::AnyRun => false,
            Token::Class { negated, ranges } => {
                let hit = ranges.iter().any(|&(lo, hi)| lo <= b && b <= hi);
                hit != *negated
            }
        }
    }
}

/// A compiled glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    tokens: Vec<Token>,
}

impl GlobPattern {
    /// Compiles a pattern, rejecting malformed classes and escapes.
    pub fn compile(pattern: &[u8]) -> Result<Self> {
        let mut tokens = Vec::with_capacity(pattern.len());
        let mut i = 0;

        while i < pattern.len() {
            match pattern[i] {
                b'*' => {
                    // consecutive stars are equivalent to one
                    if tokens.last() != Some(&Token::AnyRun) {
                        tokens.push(Token::AnyRun);
                    }
                    i += 1;
                }
                b'?' => {
                    tokens.push(Token::AnyByte);
                    i += 1;
                }
                b'\\' => {
                    let c = *pattern
                        .get(i + 1)
                        .ok_or_else(|| Error::InvalidPattern("trailing escape".into()))?;
                    tokens.push(Token::Literal(c));
                    i += 2;
                }
                b'[' => {
                    let (token, next) = compile_class(pattern, i + 1)?;
                    tokens.push(token);
                    i = next;
                }
                c => {
                    tokens.push(Token::Literal(c));
                    i += 1;
                }
            }
        }

        Ok(Self { tokens })
    }

    /// True if the whole of `text` matches the pattern.
    pub fn matches(&self, text: &[u8]) -> bool {
        let mut p = 0;
        let mut t = 0;
        // backtracking point for the most recent '*': (token index, text index)
        let mut star: Option<(usize, usize)> = None;

        while t < text.len() {
            match self.tokens.get(p) {
                Some(Token::AnyRun) => {
                    star = Some((p, t));
                    p += 1;
                    continue;
                }
                Some(token) if token.accepts(text[t]) => {
                    p += 1;
                    t += 1;
                    continue;
                }
                _ => {}
            }

            match star {
                Some((sp, st)) => {
                    // let the star swallow one more byte and retry
                    p = sp + 1;
                    t = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            }
        }

        self.tokens[p..].iter().all(|token| *token == Token::AnyRun)
    }
}

/// Parses a character class body starting just after `[`. Returns the
/// token and the index just past the closing `]`.
fn compile_class(pattern: &[u8], mut i: usize) -> Result<(Token, usize)> {
    let mut negated = false;
    if pattern.get(i) == Some(&b'^') {
        negated = true;
        i += 1;
    }

    let mut ranges = Vec::new();
    loop {
        let c = match pattern.get(i) {
            None => return Err(Error::InvalidPattern("unterminated character class".into())),
            Some(b']') => break,
            Some(b'\\') => {
                i += 1;
                *pattern
                    .get(i)
                    .ok_or_else(|| Error::InvalidPattern("trailing escape".into()))?
            }
            Some(&c) => c,
        };

        // a-z style range, unless the '-' is the last byte before ']'
        if pattern.get(i + 1) == Some(&b'-') && !matches!(pattern.get(i + 2), None | Some(b']')) {
            let hi = pattern[i + 2];
            let (lo, hi) = if c <= hi { (c, hi) } else { (hi, c) };
            ranges.push((lo, hi));
            i += 3;
        } else {
            ranges.push((c, c));
            i += 1;
        }
    }

    if ranges.is_empty() {
        return Err(Error::InvalidPattern("empty character class".into()));
    }

    Ok((Token::Class { negated, ranges }, i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(p: &str) -> GlobPattern {
        GlobPattern::compile(p.as_bytes()).unwrap()
    }

    #[test]
    fn test_star() {
        let pattern = glob("h*llo");
        assert!(pattern.matches(b"hello"));
        assert!(pattern.matches(b"hallo"));
        assert!(pattern.matches(b"hllo"));
        assert!(pattern.matches(b"heeeello"));
        assert!(!pattern.matches(b"world"));

        let pattern = glob("*");
        assert!(pattern.matches(b""));
        assert!(pattern.matches(b"anything"));

        let pattern = glob("a*b*c");
        assert!(pattern.matches(b"abc"));
        assert!(pattern.matches(b"axxbyyc"));
        assert!(!pattern.matches(b"axxbyy"));
    }

    #[test]
    fn test_question_mark() {
        let pattern = glob("h?llo");
        assert!(pattern.matches(b"hello"));
        assert!(pattern.matches(b"hallo"));
        assert!(!pattern.matches(b"hllo"));
        assert!(!pattern.matches(b"heello"));

        let pattern = glob("k?");
        assert!(pattern.matches(b"k1"));
        assert!(!pattern.matches(b"k10"));
    }

    #[test]
    fn test_classes() {
        let pattern = glob("h[ae]llo");
        assert!(pattern.matches(b"hello"));
        assert!(pattern.matches(b"hallo"));
        assert!(!pattern.matches(b"hillo"));

        let pattern = glob("h[^e]llo");
        assert!(pattern.matches(b"hallo"));
        assert!(!pattern.matches(b"hello"));

        let pattern = glob("key[0-9]");
        assert!(pattern.matches(b"key7"));
        assert!(!pattern.matches(b"keyx"));

        // reversed ranges are normalized
        assert!(glob("[z-a]").matches(b"m"));

        // trailing '-' is literal
        let pattern = glob("[a-]");
        assert!(pattern.matches(b"-"));
        assert!(pattern.matches(b"a"));
        assert!(!pattern.matches(b"b"));
    }

    #[test]
    fn test_escapes() {
        let pattern = glob(r"a\*b");
        assert!(pattern.matches(b"a*b"));
        assert!(!pattern.matches(b"axb"));

        let pattern = glob(r"[\]]");
        assert!(pattern.matches(b"]"));
    }

    #[test]
    fn test_binary_keys() {
        let pattern = GlobPattern::compile(b"\xff*").unwrap();
        assert!(pattern.matches(b"\xff\x00\x01"));
        assert!(!pattern.matches(b"\xfe"));
        assert!(glob("?").matches(b"\x80"));
    }

    #[test]
    fn test_invalid_patterns() {
        for bad in ["[abc", "abc\\", "[]", "[^]", "[a\\"] {
            let err = GlobPattern::compile(bad.as_bytes()).unwrap_err();
            assert!(matches!(err, Error::InvalidPattern(_)), "{bad}: {err:?}");
        }
    }
}
