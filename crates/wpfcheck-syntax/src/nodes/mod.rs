// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Owned C# syntax model.
//!
//! Nodes are produced by [`crate::parser`] from a tree-sitter parse and own
//! all of their text, so a tree outlives the parser that built it and can be
//! shared across threads. Every analyzable node carries a [`NodeId`] and a
//! byte [`Span`] into the source it was parsed from.

mod declaration;
mod expression;
mod statement;
mod traits;

pub use declaration::{
    AccessorDecl, AccessorKind, CompilationUnit, ConstructorDecl, FieldDecl, MemberDecl,
    MethodDecl, OtherMember, Parameter, PropertyDecl, TypeDecl, TypeKind, UsingDirective,
    VariableDeclarator,
};
pub use expression::{
    simple_type_name, Argument, AssignmentExpr, CastExpr, Expr, Identifier, Invocation,
    KeywordExpr, LambdaExpr, Literal, LiteralKind, MemberAccess, NameExpr, ObjectCreation,
    OtherExpr, ParenthesizedExpr, SyntaxChild, TypeOfExpr, TypeSyntax,
};
pub use statement::{
    Block, Body, ExpressionStmt, LocalDeclaration, OtherStmt, ReturnStmt, Stmt,
};
pub use traits::{NodeId, NodeIdGenerator, Span};
