// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Syntax classification helpers for invocations and operator expressions.
//!
//! These are purely syntactic: they never consult a semantic model, so a
//! user method called `nameof` is indistinguishable from the operator here.

use crate::nodes::{Expr, Invocation, Literal, LiteralKind, TypeSyntax};

/// The simple name of the invoked member.
///
/// `Name(...)`, `Name<T>(...)`, `expr.Name(...)` and `expr.Name<T>(...)`
/// give `Name`. Anything else (element access, conditional access, a
/// delegate returned by another call) gives `None`.
pub fn invocation_name(invocation: &Invocation) -> Option<&str> {
    match invocation.function.as_ref() {
        Expr::Name(name) => Some(&name.identifier.text),
        Expr::MemberAccess(access) => Some(&access.name.text),
        _ => None,
    }
}

/// True if this is a call to `nameof`.
pub fn is_nameof(invocation: &Invocation) -> bool {
    matches!(invocation.function.as_ref(), Expr::Name(name) if name.identifier.text == "nameof")
}

/// The identifier named by a single-argument `nameof(...)`.
///
/// `nameof(Bar)` and `nameof(Foo.Bar)` both give `Bar`.
pub fn try_get_nameof_argument(invocation: &Invocation) -> Option<&str> {
    if !is_nameof(invocation) {
        return None;
    }
    match invocation.arguments.as_slice() {
        [argument] => argument
            .expression
            .without_parentheses()
            .trailing_identifier()
            .map(|id| id.text.as_str()),
        _ => None,
    }
}

/// The type named by `typeof(T)`, looking through parentheses.
pub fn try_get_typeof_argument(expr: &Expr) -> Option<&TypeSyntax> {
    match expr.without_parentheses() {
        Expr::TypeOf(type_of) => Some(&type_of.ty),
        _ => None,
    }
}

/// The decoded value of a string literal expression.
pub fn string_literal_value(expr: &Expr) -> Option<&str> {
    match expr.without_parentheses() {
        Expr::Literal(Literal {
            kind: LiteralKind::String,
            value: Some(value),
            ..
        }) => Some(value),
        _ => None,
    }
}

/// True for the `null` literal.
pub fn is_null_literal(expr: &Expr) -> bool {
    matches!(
        expr.without_casts_and_parentheses(),
        Expr::Literal(Literal {
            kind: LiteralKind::Null,
            ..
        })
    )
}
