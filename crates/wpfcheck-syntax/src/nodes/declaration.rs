// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration nodes: compilation units, types, and their members.

use super::expression::{Expr, Identifier, TypeSyntax};
use super::statement::{Block, Body, Stmt};
use super::traits::{NodeId, Span};
use crate::modifiers::Modifiers;

/// The root of one parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub node_id: NodeId,
    pub usings: Vec<UsingDirective>,
    /// Top-level type declarations, including those nested in namespaces.
    pub types: Vec<TypeDecl>,
    pub span: Span,
}

impl CompilationUnit {
    /// All type declarations in this unit, nested types included, in
    /// source order.
    pub fn all_types(&self) -> Vec<&TypeDecl> {
        fn collect<'a>(decl: &'a TypeDecl, out: &mut Vec<&'a TypeDecl>) {
            out.push(decl);
            for nested in decl.nested_types() {
                collect(nested, out);
            }
        }
        let mut out = Vec::new();
        for decl in &self.types {
            collect(decl, &mut out);
        }
        out
    }
}

/// A `using` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    /// The imported namespace or type, whitespace removed.
    pub name: String,
    pub alias: Option<String>,
    pub is_static: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Record,
    RecordStruct,
}

impl TypeKind {
    /// Map a tree-sitter declaration kind to a type kind.
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "class_declaration" => Some(Self::Class),
            "struct_declaration" => Some(Self::Struct),
            "interface_declaration" => Some(Self::Interface),
            "record_declaration" => Some(Self::Record),
            "record_struct_declaration" => Some(Self::RecordStruct),
            _ => None,
        }
    }
}

/// A class, struct, interface, or record declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub node_id: NodeId,
    pub kind: TypeKind,
    pub name: Identifier,
    /// Enclosing namespace, dotted, if any.
    pub namespace: Option<String>,
    /// Names of enclosing types for nested declarations, outermost first.
    pub enclosing_types: Vec<String>,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<String>,
    pub base_types: Vec<TypeSyntax>,
    pub members: Vec<MemberDecl>,
    pub span: Span,
}

impl TypeDecl {
    /// Namespace-qualified name, nested types joined with `.`.
    pub fn full_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(ns) = &self.namespace {
            parts.push(ns);
        }
        parts.extend(self.enclosing_types.iter().map(String::as_str));
        parts.push(&self.name.text);
        parts.join(".")
    }

    pub fn is_partial(&self) -> bool {
        self.modifiers.is_partial()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Property(p) => Some(p),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Method(m) => Some(m),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Constructor(c) => Some(c),
            _ => None,
        })
    }

    pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Type(t) => Some(t),
            _ => None,
        })
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDecl {
    Field(FieldDecl),
    Property(PropertyDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Type(TypeDecl),
    /// Events, indexers, operators, enums, delegates, and anything else.
    Other(OtherMember),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherMember {
    pub node_id: NodeId,
    pub kind: String,
    pub span: Span,
}

/// A field declaration; one declaration may declare several variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub node_id: NodeId,
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    pub declarators: Vec<VariableDeclarator>,
    pub span: Span,
}

/// `name` or `name = initializer` in a field or local declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclarator {
    pub node_id: NodeId,
    pub name: Identifier,
    pub initializer: Option<Expr>,
    pub span: Span,
}

/// A property declaration.
///
/// An expression-bodied property (`int X => expr;`) is lowered with a
/// synthesized `get` accessor whose body is the expression, and
/// `is_expression_bodied` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub node_id: NodeId,
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    pub name: Identifier,
    pub accessors: Vec<AccessorDecl>,
    pub is_expression_bodied: bool,
    pub initializer: Option<Expr>,
    pub span: Span,
}

impl PropertyDecl {
    pub fn getter(&self) -> Option<&AccessorDecl> {
        self.accessors.iter().find(|a| a.kind == AccessorKind::Get)
    }

    /// The `set` or `init` accessor.
    pub fn setter(&self) -> Option<&AccessorDecl> {
        self.accessors
            .iter()
            .find(|a| matches!(a.kind, AccessorKind::Set | AccessorKind::Init))
    }

    /// The expression a getter-only property evaluates to: the expression
    /// body, or a getter that is `=> expr` or `{ return expr; }`.
    pub fn getter_only_expression(&self) -> Option<&Expr> {
        if self.setter().is_some() {
            return None;
        }
        self.getter()?.body.as_ref()?.single_expression()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    Init,
    Add,
    Remove,
}

impl AccessorKind {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "get" => Some(Self::Get),
            "set" => Some(Self::Set),
            "init" => Some(Self::Init),
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Init => "init",
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

/// An accessor; `body` is `None` for auto-accessors (`get;`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorDecl {
    pub node_id: NodeId,
    pub kind: AccessorKind,
    pub modifiers: Modifiers,
    pub body: Option<Body>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub node_id: NodeId,
    pub modifiers: Modifiers,
    pub return_type: TypeSyntax,
    pub name: Identifier,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub body: Option<Body>,
    pub span: Span,
}

impl MethodDecl {
    /// The single expression this method returns: `=> expr` or a block
    /// whose only statement is `return expr;`.
    pub fn returned_expression(&self) -> Option<&Expr> {
        self.body.as_ref()?.single_expression()
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub node_id: NodeId,
    pub modifiers: Modifiers,
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
    pub body: Option<Body>,
    pub span: Span,
}

impl ConstructorDecl {
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    /// Top-level statements of a block body.
    pub fn statements(&self) -> &[Stmt] {
        match &self.body {
            Some(Body::Block(Block { statements, .. })) => statements,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub node_id: NodeId,
    /// `this`, `ref`, `out`, `in`, `params`, `scoped` as written.
    pub modifiers: Vec<String>,
    /// `None` for implicitly typed lambda parameters.
    pub ty: Option<TypeSyntax>,
    pub name: Identifier,
    pub span: Span,
}
