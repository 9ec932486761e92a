//! Constant values carried by attribute leaves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The value of a constant leaf: `"Obama"`, `5`, `-`, `imperative`.
///
/// Numbers keep their textual form so `1.50` prints back as `1.50`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Literal {
    String(String),
    Number(String),
    Symbol(String),
}

impl Literal {
    /// Classify printed Penman text.
    ///
    /// Quoted text becomes a `String` (with `\"` and `\\` unescaped),
    /// numeric text a `Number`, anything else a `Symbol`.
    pub fn from_text(text: &str) -> Self {
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            Literal::String(unescape(&text[1..text.len() - 1]))
        } else if is_number(text) {
            Literal::Number(text.to_string())
        } else {
            Literal::Symbol(text.to_string())
        }
    }

    /// Printed Penman form; inverse of [`Literal::from_text`].
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{}\"", escape(s)),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Symbol(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self { Literal::from_text(v) }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self { Literal::Number(v.to_string()) }
}

/// `[+-]?digits(.digits)?([eE][+-]?digits)?`
pub(crate) fn is_number(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return false;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(e @ ('"' | '\\')) => out.push(e),
                Some(other) => { out.push('\\'); out.push(other); }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_classifies() {
        assert_eq!(Literal::from_text("\"Obama\""), Literal::String("Obama".into()));
        assert_eq!(Literal::from_text("5"), Literal::Number("5".into()));
        assert_eq!(Literal::from_text("-2.5e3"), Literal::Number("-2.5e3".into()));
        assert_eq!(Literal::from_text("-"), Literal::Symbol("-".into()));
        assert_eq!(Literal::from_text("imperative"), Literal::Symbol("imperative".into()));
    }

    #[test]
    fn test_number_keeps_text() {
        assert_eq!(Literal::from_text("1.50").to_text(), "1.50");
    }

    #[test]
    fn test_string_escapes() {
        let lit = Literal::String("say \"hi\" \\o/".into());
        let printed = lit.to_text();
        assert_eq!(printed, r#""say \"hi\" \\o/""#);
        assert_eq!(Literal::from_text(&printed), lit);
    }

    #[test]
    fn test_not_numbers() {
        assert!(!is_number("1."));
        assert!(!is_number("+"));
        assert!(!is_number("2e"));
        assert!(!is_number("12a"));
        assert!(is_number("+7"));
    }
}
