//! # Penman Notation
//!
//! Parser and serializer for the parenthesized graph notation, plus the
//! file layer that carries `# ::` metadata around each graph.
//! Pure functions, no I/O beyond the `Write` handed in.

pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod naming;
pub mod document;

use crate::model::{Alignment, Graph};
use crate::Result;

pub use document::{read_document, write_annotation, write_document};
pub use naming::{VariableNamer, VariablePolicy};
pub use serializer::{Layout, Printed, SerializeOptions};

/// Parse Penman text into a graph.
pub fn parse(text: &str) -> Result<Graph> {
    parse_with_alignment(text).map(|(graph, _)| graph)
}

/// Parse Penman text, keeping `~e.N` surface alignments.
pub fn parse_with_alignment(text: &str) -> Result<(Graph, Alignment)> {
    let tokens = lexer::tokenize(text)?;
    parser::parse_graph(&tokens)
}

/// Print a graph as Penman text.
pub fn serialize(graph: &Graph, options: &SerializeOptions) -> String {
    let mut namer = VariableNamer::new(options.variables.clone());
    serializer::print(graph, options.layout, &mut namer).text
}
