// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definition for syntax traversal.

use crate::nodes::{
    AccessorDecl, Argument, AssignmentExpr, Block, Body, CompilationUnit, ConstructorDecl, Expr,
    FieldDecl, Invocation, LambdaExpr, Literal, MemberAccess, MemberDecl, MethodDecl, NameExpr,
    ObjectCreation, Parameter, PropertyDecl, Stmt, TypeDecl, TypeOfExpr, VariableDeclarator,
};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// `leave_*` is still called for this node.
    SkipChildren,

    /// Stop traversal entirely. No further `visit_*` or `leave_*` calls.
    Stop,
}

/// Generates pairs of `visit_*` and `leave_*` methods with default
/// implementations that return `VisitResult::Continue` and do nothing.
///
/// ```ignore
/// visitor_methods! {
///     'a;
///     invocation: Invocation,
/// }
/// ```
macro_rules! visitor_methods {
    (
        $lt:lifetime;
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. Return `VisitResult` to control traversal."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &$lt $node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited. Called even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &$lt $node_type) {}
            )*
        }
    };
}

/// Immutable visitor over the syntax model.
///
/// Implement the methods for the node types of interest; traversal is driven
/// by the `walk_*` functions in [`super::dispatch`]. Nodes are borrowed for
/// `'a`, so a visitor may keep references into the tree it walks.
pub trait Visitor<'a> {
    visitor_methods! {
        'a;
        // Declarations
        compilation_unit: CompilationUnit,
        type_decl: TypeDecl,
        member: MemberDecl,
        field_decl: FieldDecl,
        variable_declarator: VariableDeclarator,
        property_decl: PropertyDecl,
        accessor_decl: AccessorDecl,
        method_decl: MethodDecl,
        constructor_decl: ConstructorDecl,
        parameter: Parameter,
        // Bodies and statements
        body: Body,
        block: Block,
        stmt: Stmt,
        // Expressions
        expr: Expr,
        invocation: Invocation,
        argument: Argument,
        member_access: MemberAccess,
        name_expr: NameExpr,
        type_of: TypeOfExpr,
        literal: Literal,
        object_creation: ObjectCreation,
        lambda: LambdaExpr,
        assignment: AssignmentExpr,
    }
}
