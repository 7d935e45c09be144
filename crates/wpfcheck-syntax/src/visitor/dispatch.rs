// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for syntax traversal.
//!
//! - **Pre-order**: `visit_*` is called before descending into children
//! - **Post-order**: `leave_*` is called after all children have been visited
//! - **Source order**: children are visited left-to-right
//!
//! Every `Expr` and `Stmt` passes through [`walk_expr`]/[`walk_stmt`] first
//! (calling `visit_expr`/`visit_stmt`), then through the walk function of its
//! concrete kind. Generic nodes descend into all of their children, so a walk
//! over a body reaches every nested invocation, including those inside
//! conditionals, switch arms, and lambdas.

use super::traits::{VisitResult, Visitor};
use crate::nodes::{
    AccessorDecl, Argument, AssignmentExpr, Block, Body, CompilationUnit, ConstructorDecl, Expr,
    FieldDecl, Invocation, LambdaExpr, MemberAccess, MemberDecl, MethodDecl, ObjectCreation,
    Parameter, PropertyDecl, Stmt, SyntaxChild, TypeDecl, VariableDeclarator,
};

/// Run `$children` unless the visit result says otherwise, then leave.
macro_rules! walk_node {
    ($visitor:ident, $node:ident, $visit:ident, $leave:ident, $children:block) => {{
        match $visitor.$visit($node) {
            VisitResult::Stop => return VisitResult::Stop,
            VisitResult::SkipChildren => {}
            VisitResult::Continue => $children,
        }
        $visitor.$leave($node);
        VisitResult::Continue
    }};
}

/// Return `Stop` from the enclosing function if `$e` stopped.
macro_rules! propagate_stop {
    ($e:expr) => {
        if $e == VisitResult::Stop {
            return VisitResult::Stop;
        }
    };
}

// ============================================================================
// Declarations
// ============================================================================

pub fn walk_compilation_unit<'a, V: Visitor<'a>>(
    visitor: &mut V,
    node: &'a CompilationUnit,
) -> VisitResult {
    walk_node!(visitor, node, visit_compilation_unit, leave_compilation_unit, {
        for decl in &node.types {
            propagate_stop!(walk_type_decl(visitor, decl));
        }
    })
}

pub fn walk_type_decl<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a TypeDecl) -> VisitResult {
    walk_node!(visitor, node, visit_type_decl, leave_type_decl, {
        for member in &node.members {
            propagate_stop!(walk_member(visitor, member));
        }
    })
}

pub fn walk_member<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a MemberDecl) -> VisitResult {
    walk_node!(visitor, node, visit_member, leave_member, {
        let inner = match node {
            MemberDecl::Field(f) => walk_field_decl(visitor, f),
            MemberDecl::Property(p) => walk_property_decl(visitor, p),
            MemberDecl::Method(m) => walk_method_decl(visitor, m),
            MemberDecl::Constructor(c) => walk_constructor_decl(visitor, c),
            MemberDecl::Type(t) => walk_type_decl(visitor, t),
            MemberDecl::Other(_) => VisitResult::Continue,
        };
        propagate_stop!(inner);
    })
}

pub fn walk_field_decl<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a FieldDecl) -> VisitResult {
    walk_node!(visitor, node, visit_field_decl, leave_field_decl, {
        for declarator in &node.declarators {
            propagate_stop!(walk_variable_declarator(visitor, declarator));
        }
    })
}

pub fn walk_variable_declarator<'a, V: Visitor<'a>>(
    visitor: &mut V,
    node: &'a VariableDeclarator,
) -> VisitResult {
    walk_node!(visitor, node, visit_variable_declarator, leave_variable_declarator, {
        if let Some(init) = &node.initializer {
            propagate_stop!(walk_expr(visitor, init));
        }
    })
}

pub fn walk_property_decl<'a, V: Visitor<'a>>(
    visitor: &mut V,
    node: &'a PropertyDecl,
) -> VisitResult {
    walk_node!(visitor, node, visit_property_decl, leave_property_decl, {
        for accessor in &node.accessors {
            propagate_stop!(walk_accessor_decl(visitor, accessor));
        }
        if let Some(init) = &node.initializer {
            propagate_stop!(walk_expr(visitor, init));
        }
    })
}

pub fn walk_accessor_decl<'a, V: Visitor<'a>>(
    visitor: &mut V,
    node: &'a AccessorDecl,
) -> VisitResult {
    walk_node!(visitor, node, visit_accessor_decl, leave_accessor_decl, {
        if let Some(body) = &node.body {
            propagate_stop!(walk_body(visitor, body));
        }
    })
}

pub fn walk_method_decl<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a MethodDecl) -> VisitResult {
    walk_node!(visitor, node, visit_method_decl, leave_method_decl, {
        for param in &node.parameters {
            propagate_stop!(walk_parameter(visitor, param));
        }
        if let Some(body) = &node.body {
            propagate_stop!(walk_body(visitor, body));
        }
    })
}

pub fn walk_constructor_decl<'a, V: Visitor<'a>>(
    visitor: &mut V,
    node: &'a ConstructorDecl,
) -> VisitResult {
    walk_node!(visitor, node, visit_constructor_decl, leave_constructor_decl, {
        for param in &node.parameters {
            propagate_stop!(walk_parameter(visitor, param));
        }
        if let Some(body) = &node.body {
            propagate_stop!(walk_body(visitor, body));
        }
    })
}

pub fn walk_parameter<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a Parameter) -> VisitResult {
    walk_node!(visitor, node, visit_parameter, leave_parameter, {})
}

// ============================================================================
// Bodies and statements
// ============================================================================

pub fn walk_body<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a Body) -> VisitResult {
    walk_node!(visitor, node, visit_body, leave_body, {
        let inner = match node {
            Body::Block(b) => walk_block(visitor, b),
            Body::Expression(e) => walk_expr(visitor, e),
        };
        propagate_stop!(inner);
    })
}

pub fn walk_block<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a Block) -> VisitResult {
    walk_node!(visitor, node, visit_block, leave_block, {
        for stmt in &node.statements {
            propagate_stop!(walk_stmt(visitor, stmt));
        }
    })
}

pub fn walk_stmt<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a Stmt) -> VisitResult {
    walk_node!(visitor, node, visit_stmt, leave_stmt, {
        match node {
            Stmt::Block(b) => propagate_stop!(walk_block(visitor, b)),
            Stmt::Expression(s) => propagate_stop!(walk_expr(visitor, &s.expression)),
            Stmt::Return(r) => {
                if let Some(e) = &r.expression {
                    propagate_stop!(walk_expr(visitor, e));
                }
            }
            Stmt::LocalDeclaration(d) => {
                for declarator in &d.declarators {
                    propagate_stop!(walk_variable_declarator(visitor, declarator));
                }
            }
            Stmt::Other(o) => propagate_stop!(walk_children(visitor, &o.children)),
        }
    })
}

/// Walk the children of a generic node in order.
pub fn walk_children<'a, V: Visitor<'a>>(visitor: &mut V, children: &'a [SyntaxChild]) -> VisitResult {
    for child in children {
        let result = match child {
            SyntaxChild::Expr(e) => walk_expr(visitor, e),
            SyntaxChild::Stmt(s) => walk_stmt(visitor, s),
        };
        propagate_stop!(result);
    }
    VisitResult::Continue
}

// ============================================================================
// Expressions
// ============================================================================

pub fn walk_expr<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a Expr) -> VisitResult {
    walk_node!(visitor, node, visit_expr, leave_expr, {
        let inner = match node {
            Expr::Name(n) => walk_node!(visitor, n, visit_name_expr, leave_name_expr, {}),
            Expr::MemberAccess(m) => walk_member_access(visitor, m),
            Expr::Invocation(i) => walk_invocation(visitor, i),
            Expr::TypeOf(t) => walk_node!(visitor, t, visit_type_of, leave_type_of, {}),
            Expr::Literal(l) => walk_node!(visitor, l, visit_literal, leave_literal, {}),
            Expr::ObjectCreation(o) => walk_object_creation(visitor, o),
            Expr::Cast(c) => walk_expr(visitor, &c.expression),
            Expr::Parenthesized(p) => walk_expr(visitor, &p.expression),
            Expr::This(_) | Expr::Base(_) => VisitResult::Continue,
            Expr::Lambda(l) => walk_lambda(visitor, l),
            Expr::Assignment(a) => walk_assignment(visitor, a),
            Expr::Other(o) => walk_children(visitor, &o.children),
        };
        propagate_stop!(inner);
    })
}

pub fn walk_invocation<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a Invocation) -> VisitResult {
    walk_node!(visitor, node, visit_invocation, leave_invocation, {
        propagate_stop!(walk_expr(visitor, &node.function));
        for arg in &node.arguments {
            propagate_stop!(walk_argument(visitor, arg));
        }
    })
}

pub fn walk_argument<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a Argument) -> VisitResult {
    walk_node!(visitor, node, visit_argument, leave_argument, {
        propagate_stop!(walk_expr(visitor, &node.expression));
    })
}

pub fn walk_member_access<'a, V: Visitor<'a>>(
    visitor: &mut V,
    node: &'a MemberAccess,
) -> VisitResult {
    walk_node!(visitor, node, visit_member_access, leave_member_access, {
        propagate_stop!(walk_expr(visitor, &node.expression));
    })
}

pub fn walk_object_creation<'a, V: Visitor<'a>>(
    visitor: &mut V,
    node: &'a ObjectCreation,
) -> VisitResult {
    walk_node!(visitor, node, visit_object_creation, leave_object_creation, {
        for arg in &node.arguments {
            propagate_stop!(walk_argument(visitor, arg));
        }
        if let Some(init) = &node.initializer {
            propagate_stop!(walk_expr(visitor, init));
        }
    })
}

pub fn walk_lambda<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a LambdaExpr) -> VisitResult {
    walk_node!(visitor, node, visit_lambda, leave_lambda, {
        propagate_stop!(walk_body(visitor, &node.body));
    })
}

pub fn walk_assignment<'a, V: Visitor<'a>>(
    visitor: &mut V,
    node: &'a AssignmentExpr,
) -> VisitResult {
    walk_node!(visitor, node, visit_assignment, leave_assignment, {
        propagate_stop!(walk_expr(visitor, &node.left));
        propagate_stop!(walk_expr(visitor, &node.right));
    })
}
