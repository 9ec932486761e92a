//! # Graph Model
//!
//! Plain data types shared by the Penman codec and the JSON exchange
//! adapter: nodes, relations, the arena-backed graph, token spans and the
//! per-sentence annotation that bundles them.
//!
//! Design rule: no I/O, no parsing, no serde_json here.

pub mod node;
pub mod edge;
pub mod graph;
pub mod literal;
pub mod span;
pub mod annotation;

pub use node::{Node, NodeId, NodeKind};
pub use edge::{Edge, EdgeId, Role};
pub use graph::{Graph, Triple};
pub use literal::Literal;
pub use span::{Alignment, Span, SpanList};
pub use annotation::{Annotation, Metadata, Sentence};
