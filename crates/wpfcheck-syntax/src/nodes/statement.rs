// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement nodes and member bodies.
//!
//! Only the statement shapes analysis looks into are modeled explicitly.
//! Everything else (`if`, `switch`, loops, `try`, `using`, ...) lowers to
//! [`OtherStmt`], whose children keep every nested statement and
//! expression so a full descent still reaches all invocations.

use super::declaration::VariableDeclarator;
use super::expression::{Expr, SyntaxChild, TypeSyntax};
use super::traits::{NodeId, Span};

/// The body of a method, accessor, constructor, or lambda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Block(Block),
    Expression(Expr),
}

impl Body {
    /// `=> expr`, or a block consisting of exactly `return expr;`.
    pub fn single_expression(&self) -> Option<&Expr> {
        match self {
            Body::Expression(expr) => Some(expr),
            Body::Block(block) => match block.statements.as_slice() {
                [Stmt::Return(ReturnStmt {
                    expression: Some(expr),
                    ..
                })] => Some(expr),
                _ => None,
            },
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Body::Block(block) => block.span,
            Body::Expression(expr) => expr.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub node_id: NodeId,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Block(Block),
    Expression(ExpressionStmt),
    Return(ReturnStmt),
    LocalDeclaration(LocalDeclaration),
    Other(OtherStmt),
}

impl Stmt {
    pub fn node_id(&self) -> NodeId {
        match self {
            Stmt::Block(s) => s.node_id,
            Stmt::Expression(s) => s.node_id,
            Stmt::Return(s) => s.node_id,
            Stmt::LocalDeclaration(s) => s.node_id,
            Stmt::Other(s) => s.node_id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Stmt::Block(s) => s.span,
            Stmt::Expression(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::LocalDeclaration(s) => s.span,
            Stmt::Other(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionStmt {
    pub node_id: NodeId,
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStmt {
    pub node_id: NodeId,
    pub expression: Option<Expr>,
    pub span: Span,
}

/// `T a = x, b;` inside a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDeclaration {
    pub node_id: NodeId,
    /// `var` is kept as written.
    pub ty: TypeSyntax,
    pub declarators: Vec<VariableDeclarator>,
    pub span: Span,
}

/// A statement kind not modeled explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherStmt {
    pub node_id: NodeId,
    /// The tree-sitter node kind, e.g. `if_statement`.
    pub kind: String,
    pub children: Vec<SyntaxChild>,
    pub span: Span,
}
