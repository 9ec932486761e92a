//! Penman lexer: tokenizes graph text.

use crate::model::literal::{is_number, unescape};
use crate::{Error, Result};

/// A token from the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TokenSpan,
    pub text: String,
}

/// Byte range of a token in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    Slash,
    /// `:ARG0`: text holds the label without the colon.
    Role,
    /// `"..."`: text holds the unescaped content.
    StringLiteral,
    Number,
    /// Variable, concept or bare constant.
    Symbol,
    /// `~e.2,3`: text holds the part after the tilde.
    Alignment,
    Eof,
}

/// Characters that end a bare token.
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"' | '/' | ':' | '~')
}

/// Tokenize Penman graph text.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => { chars.next(); }

            // Comments run to end of line
            '#' => {
                while chars.peek().is_some_and(|&(_, c)| c != '\n') {
                    chars.next();
                }
            }

            '"' => {
                chars.next(); // opening quote
                let start = pos;
                let mut raw = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\\')) => {
                            raw.push('\\');
                            if let Some((_, escaped)) = chars.next() {
                                raw.push(escaped);
                            }
                        }
                        Some((end, '"')) => {
                            tokens.push(Token {
                                kind: TokenKind::StringLiteral,
                                span: TokenSpan { start, end: end + 1 },
                                text: unescape(&raw),
                            });
                            break;
                        }
                        Some((_, c)) => raw.push(c),
                        None => return Err(Error::SyntaxError {
                            position: start,
                            message: "Unterminated string literal".into(),
                        }),
                    }
                }
            }

            ':' => {
                chars.next();
                let label = take_bare(&mut chars);
                if label.is_empty() {
                    return Err(Error::SyntaxError {
                        position: pos,
                        message: "Empty relation label".into(),
                    });
                }
                tokens.push(Token {
                    kind: TokenKind::Role,
                    span: TokenSpan { start: pos, end: pos + 1 + label.len() },
                    text: label,
                });
            }

            '~' => {
                chars.next();
                let marker = take_bare(&mut chars);
                tokens.push(Token {
                    kind: TokenKind::Alignment,
                    span: TokenSpan { start: pos, end: pos + 1 + marker.len() },
                    text: marker,
                });
            }

            '(' => { chars.next(); tokens.push(punct(TokenKind::LParen, pos, "(")); }
            ')' => { chars.next(); tokens.push(punct(TokenKind::RParen, pos, ")")); }
            '/' => { chars.next(); tokens.push(punct(TokenKind::Slash, pos, "/")); }

            _ => {
                let text = take_bare(&mut chars);
                let kind = if is_number(&text) { TokenKind::Number } else { TokenKind::Symbol };
                tokens.push(Token {
                    kind,
                    span: TokenSpan { start: pos, end: pos + text.len() },
                    text,
                });
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: TokenSpan { start: input.len(), end: input.len() },
        text: String::new(),
    });

    Ok(tokens)
}

fn take_bare(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> String {
    let mut text = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if is_delimiter(c) {
            break;
        }
        text.push(c);
        chars.next();
    }
    text
}

fn punct(kind: TokenKind, pos: usize, text: &str) -> Token {
    Token {
        kind,
        span: TokenSpan { start: pos, end: pos + text.len() },
        text: text.to_string(),
    }
}
