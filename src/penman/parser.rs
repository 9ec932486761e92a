//! Penman recursive descent parser.
//!
//! Parses token streams into a [`Graph`]. Supports:
//! - nested `(var / concept :role target ...)` nodes
//! - re-entrancy through bare variables after their introduction
//! - string, number and symbol constants
//! - inverse roles (`:ARG0-of`)
//! - surface alignment markers (`want-01~e.2`, `c1~e.4`); markers on
//!   roles (`:ARG0~e.3`) are read and dropped
//! - several top-level trees sharing one variable scope

use hashbrown::HashSet;

use super::lexer::{Token, TokenKind};
use super::naming::looks_like_variable;
use crate::model::edge::is_valid_label;
use crate::model::{Alignment, Graph, Literal, NodeId, Role, Span};
use crate::{Error, Result};

/// Parser state: wraps a token slice with cursor and the graph under
/// construction.
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    graph: Graph,
    alignment: Alignment,
    /// Variables introduced so far, in any enclosing or earlier scope.
    introduced: HashSet<String>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            graph: Graph::new(),
            alignment: Alignment::new(),
            introduced: HashSet::new(),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&self, msg: String) -> Error {
        Error::SyntaxError {
            position: self.peek().span.start,
            message: msg,
        }
    }

    fn unbalanced(&self) -> Error {
        self.error("Unbalanced parentheses: missing ')'".into())
    }
}

/// Parse a complete Penman graph from tokens.
pub fn parse_graph(tokens: &[Token]) -> Result<(Graph, Alignment)> {
    let mut p = Parser::new(tokens);

    if !p.at(TokenKind::LParen) {
        return Err(match p.peek_kind() {
            TokenKind::Eof => p.error("Empty graph".into()),
            TokenKind::RParen => p.error("Unbalanced parentheses: unexpected ')'".into()),
            kind => p.error(format!("Expected '(' at start of graph, got {:?} '{}'", kind, p.peek().text)),
        });
    }

    let root = parse_node(&mut p, None)?;
    p.graph.set_root(root)?;

    // Further top-level trees are fragments of the same graph
    while p.at(TokenKind::LParen) {
        parse_node(&mut p, None)?;
    }

    if !p.at(TokenKind::Eof) {
        return Err(match p.peek_kind() {
            TokenKind::RParen => p.error("Unbalanced parentheses: unexpected ')'".into()),
            kind => p.error(format!("Unexpected token after graph: {:?} '{}'", kind, p.peek().text)),
        });
    }

    Ok((p.graph, p.alignment))
}

// ============================================================================
// Nodes
// ============================================================================

/// `( var / concept [~align] (:role target)* )`
///
/// `incoming` is attached as soon as the node exists, so edges are
/// recorded in the order they appear in the text.
fn parse_node(p: &mut Parser, incoming: Option<(NodeId, Role)>) -> Result<NodeId> {
    p.advance(); // consume '('

    let variable = match p.peek_kind() {
        TokenKind::Symbol => p.advance().text.clone(),
        TokenKind::Eof => return Err(p.unbalanced()),
        kind => return Err(p.error(format!("Expected variable after '(', got {:?} '{}'", kind, p.peek().text))),
    };

    if !p.eat(TokenKind::Slash) {
        return Err(p.error(format!("Missing '/' after variable '{variable}'")));
    }

    let concept = match p.peek_kind() {
        TokenKind::Symbol | TokenKind::Number => p.advance().text.clone(),
        TokenKind::Eof => return Err(p.unbalanced()),
        kind => return Err(p.error(format!("Expected concept for '{variable}', got {:?} '{}'", kind, p.peek().text))),
    };

    if !p.introduced.insert(variable.clone()) {
        return Err(p.error(format!("Variable '{variable}' is introduced more than once")));
    }
    let id = p.graph.add_concept(Some(variable.as_str()), concept)?;
    if let Some((parent, role)) = incoming {
        p.graph.add_edge(parent, id, role, false)?;
    }
    parse_alignment_marker(p, id)?;

    loop {
        match p.peek_kind() {
            TokenKind::RParen => {
                p.advance();
                return Ok(id);
            }
            TokenKind::Role => parse_relation(p, id)?,
            TokenKind::Eof => return Err(p.unbalanced()),
            kind => return Err(p.error(format!("Expected relation or ')', got {:?} '{}'", kind, p.peek().text))),
        }
    }
}

/// `:role target` where target is a node, a reference or a constant.
fn parse_relation(p: &mut Parser, parent: NodeId) -> Result<()> {
    let role_tok = p.advance().clone();
    if !is_valid_label(&role_tok.text) {
        return Err(Error::SyntaxError {
            position: role_tok.span.start,
            message: format!("Malformed relation label ':{}'", role_tok.text),
        });
    }
    let role = Role::parse(&role_tok.text)?;
    // Edges carry no alignment
    p.eat(TokenKind::Alignment);

    match p.peek_kind() {
        TokenKind::LParen => {
            parse_node(p, Some((parent, role)))?;
        }
        TokenKind::StringLiteral => {
            let value = Literal::String(p.advance().text.clone());
            attach_constant(p, parent, role, value)?;
        }
        TokenKind::Number => {
            let value = Literal::Number(p.advance().text.clone());
            attach_constant(p, parent, role, value)?;
        }
        TokenKind::Symbol => {
            let tok = p.advance().clone();
            if let Some(target) = p.graph.by_name(&tok.text) {
                p.graph.add_edge(parent, target, role, true)?;
                parse_alignment_marker(p, target)?;
            } else if looks_like_variable(&tok.text) {
                return Err(Error::UndefinedReference {
                    variable: tok.text,
                    position: tok.span.start,
                });
            } else {
                attach_constant(p, parent, role, Literal::Symbol(tok.text))?;
            }
        }
        TokenKind::Eof => return Err(p.unbalanced()),
        kind => {
            return Err(p.error(format!(
                "Missing target for ':{}', got {:?} '{}'", role_tok.text, kind, p.peek().text
            )));
        }
    }
    Ok(())
}

fn attach_constant(p: &mut Parser, parent: NodeId, role: Role, value: Literal) -> Result<()> {
    let leaf = p.graph.add_constant(None, value);
    p.graph.add_edge(parent, leaf, role, false)?;
    parse_alignment_marker(p, leaf)
}

/// `~e.2,3` or `~2` → one-token spans on `node`.
fn parse_alignment_marker(p: &mut Parser, node: NodeId) -> Result<()> {
    if !p.at(TokenKind::Alignment) {
        return Ok(());
    }
    let tok = p.advance().clone();
    let indices = tok.text.split_once('.').map_or(tok.text.as_str(), |(_, rest)| rest);
    for index in indices.split(',') {
        let start: usize = index.parse().map_err(|_| Error::SyntaxError {
            position: tok.span.start,
            message: format!("Malformed alignment marker '~{}'", tok.text),
        })?;
        p.alignment.insert(node, Span::new(start, start + 1));
    }
    Ok(())
}
