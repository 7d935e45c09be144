// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! C# parsing.
//!
//! [`CSharpParser`] wraps a tree-sitter parser configured with the C#
//! grammar and lowers each parse into a [`CompilationUnit`]. tree-sitter is
//! error tolerant: malformed source still produces a unit, with
//! [`ParsedUnit::has_errors`] set.

mod lower;

pub use lower::{decode_string_literal, normalize_type_text};

use thiserror::Error;
use tracing::trace;

use crate::nodes::CompilationUnit;

/// Errors from parser setup or parsing.
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// The C# grammar could not be loaded into the parser.
    #[error("failed to load C# grammar: {message}")]
    Language { message: String },

    /// tree-sitter returned no tree.
    #[error("parser produced no syntax tree")]
    NoTree,
}

/// The result of parsing one source text.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    pub root: CompilationUnit,
    /// True if the parse contained error or missing nodes.
    pub has_errors: bool,
    /// Number of NodeIds assigned during lowering.
    pub node_count: u32,
}

/// A reusable C# parser. Not shareable across threads; create one per
/// worker.
pub struct CSharpParser {
    parser: tree_sitter::Parser,
}

impl CSharpParser {
    pub fn new() -> Result<Self, SyntaxError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| SyntaxError::Language {
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }

    /// Parse and lower `source`.
    pub fn parse(&mut self, source: &str) -> Result<ParsedUnit, SyntaxError> {
        let tree = self.parser.parse(source, None).ok_or(SyntaxError::NoTree)?;
        let root_node = tree.root_node();
        let has_errors = root_node.has_error();

        let mut lowerer = lower::Lowerer::new(source);
        let root = lowerer.compilation_unit(root_node);
        let node_count = lowerer.node_count();
        trace!(node_count, has_errors, "lowered compilation unit");

        Ok(ParsedUnit {
            root,
            has_errors,
            node_count,
        })
    }
}

/// Parse `source` with a fresh parser.
pub fn parse_compilation_unit(source: &str) -> Result<ParsedUnit, SyntaxError> {
    CSharpParser::new()?.parse(source)
}
