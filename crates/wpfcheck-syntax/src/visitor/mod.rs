// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for the C# syntax model.
//!
//! - [`Visitor`]: immutable traversal trait with `visit_*`/`leave_*` pairs
//! - `walk_*` functions: drive a visitor through a subtree
//! - [`InvocationCollector`]: gathers invocations by member name

mod dispatch;
mod invocations;
mod traits;

pub use dispatch::{
    walk_accessor_decl, walk_argument, walk_assignment, walk_block, walk_body, walk_children,
    walk_compilation_unit, walk_constructor_decl, walk_expr, walk_field_decl, walk_invocation,
    walk_lambda, walk_member, walk_member_access, walk_method_decl, walk_object_creation,
    walk_parameter, walk_property_decl, walk_stmt, walk_type_decl, walk_variable_declarator,
};
pub use invocations::InvocationCollector;
pub use traits::{VisitResult, Visitor};
