//! # streamside: Penman codec for semantic graph annotation
//!
//! Reads and writes AMR-style semantic graphs in Penman notation and
//! converts them to and from the annotation tool's JSON records.
//!
//! ## Design Principles
//!
//! 1. **Arena graph**: `Graph` owns node and edge tables; re-entrancy is an
//!    index, never a duplicated node or a pointer cycle
//! 2. **Parser owns nothing**: Penman → `Graph` is a pure function
//! 3. **Naming is explicit**: variable assignment lives in a caller-owned
//!    `VariableNamer`, not in global state
//! 4. **One file, one failure**: batch conversion isolates errors per file
//!
//! ## Quick Start
//!
//! ```rust
//! use streamside::penman::{self, SerializeOptions};
//!
//! # fn example() -> streamside::Result<()> {
//! let graph = penman::parse("(c0 / say-01 :ARG0 (c1 / boy) :ARG1 (c2 / want-01 :ARG0 c1))")?;
//! let boy = graph.by_name("c1").unwrap();
//! assert_eq!(graph.incoming(boy).count(), 2);
//!
//! let text = penman::serialize(&graph, &SerializeOptions::default());
//! assert!(text.starts_with("(c0 / say-01"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Formats
//!
//! | Format | Module | Description |
//! |--------|--------|-------------|
//! | Penman | `penman` | Parenthesized graph text with `# ::` metadata comments |
//! | JSON | `exchange` | `{"graphs": [...]}` annotation records |
//! | Plain text | `convert` | One sentence per line, imported as empty records |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod penman;
pub mod exchange;
pub mod config;
pub mod convert;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Annotation, Alignment, Edge, EdgeId, Graph, Literal, Metadata,
    Node, NodeId, NodeKind, Role, Sentence, Span, Triple,
};

// ============================================================================
// Re-exports: Codec and conversion
// ============================================================================

pub use penman::{Layout, SerializeOptions, VariableNamer, VariablePolicy};
pub use exchange::{Document, EdgeRecord, NodeRecord, Record};
pub use config::ConvertConfig;
pub use convert::{BatchReport, Direction, FileFailure};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Penman syntax error at position {position}: {message}")]
    SyntaxError { position: usize, message: String },

    #[error("Undefined variable '{variable}' referenced at position {position}")]
    UndefinedReference { variable: String, position: usize },

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Span {start}-{end} on node '{node}' is outside the sentence ({tokens} tokens)")]
    SpanRange { node: String, start: usize, end: usize, tokens: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable kind name used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::SyntaxError { .. } => "SyntaxError",
            Error::UndefinedReference { .. } => "UndefinedReferenceError",
            Error::MalformedRecord(_) => "MalformedRecordError",
            Error::SpanRange { .. } => "SpanRangeError",
            Error::Config(_) => "ConfigError",
            // A record that does not even decode is malformed.
            Error::Json(_) => "MalformedRecordError",
            Error::Io(_) => "IoError",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
