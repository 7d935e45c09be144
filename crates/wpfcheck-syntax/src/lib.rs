// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! C# parsing and syntax model for wpfcheck.
//!
//! # Overview
//!
//! - **Parsing**: [`SyntaxTree::parse`] parses a source file with
//!   tree-sitter-c-sharp and lowers it into an owned [`nodes`] model.
//! - **Traversal**: the [`visitor`] module provides the [`Visitor`] trait and
//!   `walk_*` functions.
//! - **Classification**: [`helpers`] recognizes invocation shapes such as
//!   `nameof(X)` and `typeof(T)`; [`modifiers`] edits modifier lists;
//!   [`naming`] relates registered names to member names.
//!
//! # Quick Start
//!
//! ```
//! use wpfcheck_syntax::SyntaxTree;
//!
//! let tree = SyntaxTree::parse("Foo.cs", "class Foo { }").expect("parse");
//! assert_eq!(tree.root.types[0].name.text, "Foo");
//! ```

pub mod helpers;
pub mod modifiers;
pub mod naming;
pub mod nodes;
pub mod parser;
pub mod visitor;

pub use modifiers::{with_readonly_modifier, with_static_modifier, Modifier, ModifierKind, Modifiers};
pub use nodes::{NodeId, Span};
pub use parser::{parse_compilation_unit, CSharpParser, ParsedUnit, SyntaxError};
pub use visitor::{VisitResult, Visitor};

use wpfcheck_core::Location;

use crate::nodes::CompilationUnit;

/// One parsed source file: its path, text, and lowered root.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub path: String,
    pub source: String,
    pub root: CompilationUnit,
    /// True if tree-sitter reported error or missing nodes.
    pub has_errors: bool,
}

impl SyntaxTree {
    /// Parse `source` with a fresh parser.
    pub fn parse(path: impl Into<String>, source: impl Into<String>) -> Result<Self, SyntaxError> {
        Self::parse_with(&mut CSharpParser::new()?, path, source)
    }

    /// Parse `source` with an existing parser.
    pub fn parse_with(
        parser: &mut CSharpParser,
        path: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, SyntaxError> {
        let source = source.into();
        let parsed = parser.parse(&source)?;
        Ok(Self {
            path: path.into(),
            source,
            root: parsed.root,
            has_errors: parsed.has_errors,
        })
    }

    /// Source text covered by `span`, or `""` if out of range.
    pub fn text(&self, span: Span) -> &str {
        self.source.get(span.start..span.end).unwrap_or("")
    }

    /// 1-indexed location of `span` in this file.
    pub fn location(&self, span: Span) -> Location {
        Location::from_span(self.path.clone(), &self.source, span)
    }
}
