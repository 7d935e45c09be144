// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lowering from a tree-sitter C# parse tree into the owned node model.
//!
//! Lookups go through field names first and fall back to structural
//! positions, so minor grammar differences between tree-sitter-c-sharp
//! releases do not drop nodes. Unrecognized node kinds lower to
//! [`OtherExpr`]/[`OtherStmt`] with all named children preserved.

use tree_sitter::Node;

use crate::modifiers::{Modifier, ModifierKind, Modifiers};
use crate::nodes::{
    AccessorDecl, AccessorKind, Argument, AssignmentExpr, Block, Body, CastExpr, CompilationUnit,
    ConstructorDecl, Expr, ExpressionStmt, FieldDecl, Identifier, Invocation, KeywordExpr,
    LambdaExpr, Literal, LiteralKind, LocalDeclaration, MemberAccess, MemberDecl, MethodDecl,
    NameExpr, NodeIdGenerator, ObjectCreation, OtherExpr, OtherMember, OtherStmt, Parameter,
    ParenthesizedExpr, PropertyDecl, ReturnStmt, Span, Stmt, SyntaxChild, TypeDecl, TypeKind,
    TypeOfExpr, TypeSyntax, UsingDirective, VariableDeclarator,
};

// ============================================================================
// Tree navigation
// ============================================================================

fn span(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn is_trivia(kind: &str) -> bool {
    kind == "comment" || kind.starts_with("preproc")
}

fn is_conditional_directive(kind: &str) -> bool {
    matches!(kind, "preproc_if" | "preproc_elif" | "preproc_else" | "preproc_ifdef")
}

/// Named children with comments and directives removed. Code inside
/// `#if`/`#elif`/`#else` regions is spliced into the parent.
fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        push_code(child, &mut out);
    }
    out
}

fn push_code<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    let kind = node.kind();
    if is_conditional_directive(kind) {
        let condition = node.child_by_field_name("condition").map(|c| c.id());
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if Some(child.id()) != condition {
                push_code(child, out);
            }
        }
    } else if !is_trivia(kind) {
        out.push(node);
    }
}

/// All children, anonymous tokens included.
fn all_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    named_children(node).into_iter().find(|c| c.kind() == kind)
}

/// The first named child following the anonymous `token`.
fn named_after_token<'t>(node: Node<'t>, token: &str) -> Option<Node<'t>> {
    let mut seen = false;
    for child in all_children(node) {
        if seen && child.is_named() && !is_trivia(child.kind()) {
            return Some(child);
        }
        if !child.is_named() && child.kind() == token {
            seen = true;
        }
    }
    None
}

fn is_statement_kind(kind: &str) -> bool {
    kind == "block" || kind.ends_with("_statement")
}

/// Remove whitespace and `global::` qualifiers from type text.
pub fn normalize_type_text(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    compact.replace("global::", "")
}

/// Decode the contents of a regular, verbatim, or raw string literal.
pub fn decode_string_literal(raw: &str) -> Option<String> {
    let text = raw.trim();
    let text = text.strip_suffix("u8").unwrap_or(text);
    if let Some(rest) = text.strip_prefix("@\"") {
        return rest.strip_suffix('"').map(|v| v.replace("\"\"", "\""));
    }
    let quotes = text.chars().take_while(|&c| c == '"').count();
    if quotes >= 3 {
        let fence = &text[..quotes];
        let inner = text[quotes..].strip_suffix(fence)?;
        return Some(inner.trim().to_string());
    }
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    Some(unescape(inner))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other @ ('\\' | '"' | '\'')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn literal_kind(kind: &str) -> Option<LiteralKind> {
    match kind {
        "string_literal" | "verbatim_string_literal" | "raw_string_literal" => {
            Some(LiteralKind::String)
        }
        "character_literal" => Some(LiteralKind::Char),
        "integer_literal" => Some(LiteralKind::Integer),
        "real_literal" => Some(LiteralKind::Real),
        "boolean_literal" => Some(LiteralKind::Boolean),
        "null_literal" => Some(LiteralKind::Null),
        _ => None,
    }
}

// ============================================================================
// Lowerer
// ============================================================================

/// Lowers one parse tree. NodeIds are assigned in pre-order.
pub(crate) struct Lowerer<'s> {
    source: &'s str,
    ids: NodeIdGenerator,
}

impl<'s> Lowerer<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        Self {
            source,
            ids: NodeIdGenerator::new(),
        }
    }

    pub(crate) fn node_count(&self) -> u32 {
        self.ids.count()
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    fn identifier(&self, node: Node<'_>) -> Identifier {
        let text = self.text(node).trim();
        Identifier::new(text.strip_prefix('@').unwrap_or(text), span(node))
    }

    fn type_syntax(&mut self, node: Node<'_>) -> TypeSyntax {
        TypeSyntax {
            node_id: self.ids.next_id(),
            text: normalize_type_text(self.text(node)),
            span: span(node),
        }
    }

    /// Placeholder for a type the parse tree does not contain.
    fn missing_type(&mut self, node: Node<'_>) -> TypeSyntax {
        TypeSyntax {
            node_id: self.ids.next_id(),
            text: String::new(),
            span: Span::new(node.start_byte(), node.start_byte()),
        }
    }

    fn modifiers(&self, node: Node<'_>) -> Modifiers {
        let mut items = Vec::new();
        for child in all_children(node) {
            if child.kind() == "modifier" {
                items.push(Modifier::new(
                    ModifierKind::parse(self.text(child)),
                    Some(span(child)),
                ));
            } else if !child.is_named() {
                let kind = ModifierKind::parse(child.kind());
                if !matches!(kind, ModifierKind::Other(_)) {
                    items.push(Modifier::new(kind, Some(span(child))));
                }
            }
        }
        Modifiers::new(items)
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    pub(crate) fn compilation_unit(&mut self, root: Node<'_>) -> CompilationUnit {
        let node_id = self.ids.next_id();
        let mut usings = Vec::new();
        let mut types = Vec::new();
        self.namespace_body(root, None, &mut usings, &mut types);
        CompilationUnit {
            node_id,
            usings,
            types,
            span: span(root),
        }
    }

    fn namespace_name(&self, node: Node<'_>) -> String {
        node.child_by_field_name("name")
            .map(|n| normalize_type_text(self.text(n)))
            .unwrap_or_default()
    }

    fn namespace_body(
        &mut self,
        node: Node<'_>,
        namespace: Option<String>,
        usings: &mut Vec<UsingDirective>,
        types: &mut Vec<TypeDecl>,
    ) {
        let mut current = namespace;
        for child in named_children(node) {
            match child.kind() {
                "using_directive" => usings.push(self.using_directive(child)),
                "namespace_declaration" => {
                    let full = qualify(current.as_deref(), &self.namespace_name(child));
                    let body = child
                        .child_by_field_name("body")
                        .or_else(|| child_of_kind(child, "declaration_list"));
                    if let Some(body) = body {
                        self.namespace_body(body, Some(full), usings, types);
                    }
                }
                "file_scoped_namespace_declaration" => {
                    let full = qualify(current.as_deref(), &self.namespace_name(child));
                    // Newer grammars nest the members; older ones make them siblings.
                    self.namespace_body(child, Some(full.clone()), usings, types);
                    current = Some(full);
                }
                kind if TypeKind::from_node_kind(kind).is_some() => {
                    types.push(self.type_decl(child, current.clone(), &[]));
                }
                _ => {}
            }
        }
    }

    fn using_directive(&self, node: Node<'_>) -> UsingDirective {
        let children = all_children(node);
        let is_static = children
            .iter()
            .any(|c| !c.is_named() && c.kind() == "static");
        let has_alias = children.iter().any(|c| !c.is_named() && c.kind() == "=");
        let named = named_children(node);
        let alias = if has_alias {
            named.first().map(|n| self.text(*n).trim().to_string())
        } else {
            None
        };
        let name = named
            .last()
            .map(|n| normalize_type_text(self.text(*n)))
            .unwrap_or_default();
        UsingDirective {
            name,
            alias,
            is_static,
            span: span(node),
        }
    }

    fn type_decl(
        &mut self,
        node: Node<'_>,
        namespace: Option<String>,
        enclosing: &[String],
    ) -> TypeDecl {
        let node_id = self.ids.next_id();
        let kind = TypeKind::from_node_kind(node.kind()).unwrap_or(TypeKind::Class);
        let name = node
            .child_by_field_name("name")
            .or_else(|| child_of_kind(node, "identifier"))
            .map(|n| self.identifier(n))
            .unwrap_or_else(|| Identifier::new("", span(node)));
        let modifiers = self.modifiers(node);
        let type_parameters = child_of_kind(node, "type_parameter_list")
            .map(|list| self.type_parameter_names(list))
            .unwrap_or_default();
        let base_types = match child_of_kind(node, "base_list") {
            Some(list) => self.base_types(list),
            None => Vec::new(),
        };

        let mut nested = enclosing.to_vec();
        nested.push(name.text.clone());
        let mut members = Vec::new();
        let body = node
            .child_by_field_name("body")
            .or_else(|| child_of_kind(node, "declaration_list"));
        if let Some(body) = body {
            for member in named_children(body) {
                members.push(self.member(member, &namespace, &nested));
            }
        }

        TypeDecl {
            node_id,
            kind,
            name,
            namespace,
            enclosing_types: enclosing.to_vec(),
            modifiers,
            type_parameters,
            base_types,
            members,
            span: span(node),
        }
    }

    fn type_parameter_names(&self, list: Node<'_>) -> Vec<String> {
        named_children(list)
            .into_iter()
            .filter(|p| p.kind() == "type_parameter")
            .map(|p| {
                let name = p
                    .child_by_field_name("name")
                    .or_else(|| child_of_kind(p, "identifier"))
                    .unwrap_or(p);
                self.text(name).trim().to_string()
            })
            .collect()
    }

    fn base_types(&mut self, list: Node<'_>) -> Vec<TypeSyntax> {
        let mut out = Vec::new();
        for child in named_children(list) {
            match child.kind() {
                "argument_list" => {}
                "primary_constructor_base_type" => {
                    let ty = child
                        .child_by_field_name("type")
                        .or_else(|| named_children(child).into_iter().next());
                    if let Some(ty) = ty {
                        out.push(self.type_syntax(ty));
                    }
                }
                _ => out.push(self.type_syntax(child)),
            }
        }
        out
    }

    fn member(
        &mut self,
        node: Node<'_>,
        namespace: &Option<String>,
        enclosing: &[String],
    ) -> MemberDecl {
        match node.kind() {
            "field_declaration" => MemberDecl::Field(self.field(node)),
            "property_declaration" => MemberDecl::Property(self.property(node)),
            "method_declaration" => MemberDecl::Method(self.method(node)),
            "constructor_declaration" => MemberDecl::Constructor(self.constructor(node)),
            kind if TypeKind::from_node_kind(kind).is_some() => {
                MemberDecl::Type(self.type_decl(node, namespace.clone(), enclosing))
            }
            kind => MemberDecl::Other(OtherMember {
                node_id: self.ids.next_id(),
                kind: kind.to_string(),
                span: span(node),
            }),
        }
    }

    fn field(&mut self, node: Node<'_>) -> FieldDecl {
        let node_id = self.ids.next_id();
        let modifiers = self.modifiers(node);
        let (ty, declarators) = match child_of_kind(node, "variable_declaration") {
            Some(decl) => self.variable_declaration(decl),
            None => (self.missing_type(node), Vec::new()),
        };
        FieldDecl {
            node_id,
            modifiers,
            ty,
            declarators,
            span: span(node),
        }
    }

    fn variable_declaration(&mut self, node: Node<'_>) -> (TypeSyntax, Vec<VariableDeclarator>) {
        let children = named_children(node);
        let ty_node = node
            .child_by_field_name("type")
            .or_else(|| children.iter().copied().find(|c| c.kind() != "variable_declarator"));
        let ty = match ty_node {
            Some(t) => self.type_syntax(t),
            None => self.missing_type(node),
        };
        let declarators = children
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
            .map(|v| self.declarator(v))
            .collect();
        (ty, declarators)
    }

    fn declarator(&mut self, node: Node<'_>) -> VariableDeclarator {
        let node_id = self.ids.next_id();
        let name = node
            .child_by_field_name("name")
            .or_else(|| child_of_kind(node, "identifier"))
            .map(|n| self.identifier(n))
            .unwrap_or_else(|| Identifier::new("", span(node)));
        let init = child_of_kind(node, "equals_value_clause")
            .and_then(|clause| named_children(clause).into_iter().next())
            .or_else(|| named_after_token(node, "="));
        let initializer = init.map(|e| self.expr(e));
        VariableDeclarator {
            node_id,
            name,
            initializer,
            span: span(node),
        }
    }

    fn property(&mut self, node: Node<'_>) -> PropertyDecl {
        let node_id = self.ids.next_id();
        let modifiers = self.modifiers(node);
        let children = named_children(node);
        let ty_node = node.child_by_field_name("type").or_else(|| {
            children.iter().copied().find(|c| {
                !matches!(
                    c.kind(),
                    "modifier" | "attribute_list" | "explicit_interface_specifier"
                )
            })
        });
        let ty = match ty_node {
            Some(t) => self.type_syntax(t),
            None => self.missing_type(node),
        };
        let name = node
            .child_by_field_name("name")
            .or_else(|| {
                children
                    .iter()
                    .copied()
                    .filter(|c| c.kind() == "identifier")
                    .last()
            })
            .map(|n| self.identifier(n))
            .unwrap_or_else(|| Identifier::new("", span(node)));

        let mut accessors = Vec::new();
        let mut is_expression_bodied = false;
        if let Some(list) = children.iter().copied().find(|c| c.kind() == "accessor_list") {
            for accessor in named_children(list) {
                if accessor.kind() == "accessor_declaration" {
                    accessors.push(self.accessor(accessor));
                }
            }
        } else if let Some(arrow) = children
            .iter()
            .copied()
            .find(|c| c.kind() == "arrow_expression_clause")
        {
            if let Some(expr) = named_children(arrow).into_iter().next() {
                let getter_id = self.ids.next_id();
                let body = Body::Expression(self.expr(expr));
                accessors.push(AccessorDecl {
                    node_id: getter_id,
                    kind: AccessorKind::Get,
                    modifiers: Modifiers::default(),
                    body: Some(body),
                    span: span(arrow),
                });
                is_expression_bodied = true;
            }
        }

        let initializer = node
            .child_by_field_name("value")
            .or_else(|| named_after_token(node, "="))
            .map(|e| self.expr(e));

        PropertyDecl {
            node_id,
            modifiers,
            ty,
            name,
            accessors,
            is_expression_bodied,
            initializer,
            span: span(node),
        }
    }

    fn accessor(&mut self, node: Node<'_>) -> AccessorDecl {
        let node_id = self.ids.next_id();
        let kind = node
            .child_by_field_name("name")
            .and_then(|n| AccessorKind::from_keyword(self.text(n).trim()))
            .or_else(|| {
                all_children(node)
                    .into_iter()
                    .find_map(|c| AccessorKind::from_keyword(c.kind()))
            })
            .unwrap_or(AccessorKind::Get);
        let modifiers = self.modifiers(node);
        let body = self.member_body(node);
        AccessorDecl {
            node_id,
            kind,
            modifiers,
            body,
            span: span(node),
        }
    }

    fn member_body(&mut self, node: Node<'_>) -> Option<Body> {
        let body = node
            .child_by_field_name("body")
            .filter(|b| matches!(b.kind(), "block" | "arrow_expression_clause"))
            .or_else(|| {
                named_children(node)
                    .into_iter()
                    .find(|c| matches!(c.kind(), "block" | "arrow_expression_clause"))
            })?;
        self.body(body)
    }

    fn body(&mut self, node: Node<'_>) -> Option<Body> {
        match node.kind() {
            "block" => Some(Body::Block(self.block(node))),
            "arrow_expression_clause" => {
                let expr = named_children(node).into_iter().next()?;
                Some(Body::Expression(self.expr(expr)))
            }
            _ => Some(Body::Expression(self.expr(node))),
        }
    }

    fn method(&mut self, node: Node<'_>) -> MethodDecl {
        let node_id = self.ids.next_id();
        let modifiers = self.modifiers(node);
        let return_type = match node
            .child_by_field_name("returns")
            .or_else(|| node.child_by_field_name("type"))
        {
            Some(t) => self.type_syntax(t),
            None => self.missing_type(node),
        };
        let name = node
            .child_by_field_name("name")
            .map(|n| self.identifier(n))
            .unwrap_or_else(|| Identifier::new("", span(node)));
        let type_parameters = node
            .child_by_field_name("type_parameters")
            .or_else(|| child_of_kind(node, "type_parameter_list"))
            .map(|list| self.type_parameter_names(list))
            .unwrap_or_default();
        let parameters = self.parameter_list(node);
        let body = self.member_body(node);
        MethodDecl {
            node_id,
            modifiers,
            return_type,
            name,
            type_parameters,
            parameters,
            body,
            span: span(node),
        }
    }

    fn constructor(&mut self, node: Node<'_>) -> ConstructorDecl {
        let node_id = self.ids.next_id();
        let modifiers = self.modifiers(node);
        let name = node
            .child_by_field_name("name")
            .or_else(|| child_of_kind(node, "identifier"))
            .map(|n| self.identifier(n))
            .unwrap_or_else(|| Identifier::new("", span(node)));
        let parameters = self.parameter_list(node);
        let body = self.member_body(node);
        ConstructorDecl {
            node_id,
            modifiers,
            name,
            parameters,
            body,
            span: span(node),
        }
    }

    fn parameter_list(&mut self, node: Node<'_>) -> Vec<Parameter> {
        let list = node
            .child_by_field_name("parameters")
            .or_else(|| child_of_kind(node, "parameter_list"));
        match list {
            Some(list) => named_children(list)
                .into_iter()
                .filter(|p| p.kind() == "parameter")
                .map(|p| self.parameter(p))
                .collect(),
            None => Vec::new(),
        }
    }

    fn parameter(&mut self, node: Node<'_>) -> Parameter {
        let node_id = self.ids.next_id();
        let mut modifiers = Vec::new();
        for child in all_children(node) {
            let kind = child.kind();
            if kind == "parameter_modifier" || kind == "modifier" {
                modifiers.push(self.text(child).trim().to_string());
            } else if !child.is_named()
                && matches!(kind, "this" | "ref" | "out" | "in" | "params" | "scoped")
            {
                modifiers.push(kind.to_string());
            }
        }
        let ty = node.child_by_field_name("type").map(|t| self.type_syntax(t));
        let name = node
            .child_by_field_name("name")
            .or_else(|| {
                named_children(node)
                    .into_iter()
                    .filter(|c| c.kind() == "identifier")
                    .last()
            })
            .map(|n| self.identifier(n))
            .unwrap_or_else(|| Identifier::new("", span(node)));
        Parameter {
            node_id,
            modifiers,
            ty,
            name,
            span: span(node),
        }
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn block(&mut self, node: Node<'_>) -> Block {
        let node_id = self.ids.next_id();
        let statements = named_children(node)
            .into_iter()
            .map(|s| self.stmt(s))
            .collect();
        Block {
            node_id,
            statements,
            span: span(node),
        }
    }

    fn stmt(&mut self, node: Node<'_>) -> Stmt {
        match node.kind() {
            "block" => Stmt::Block(self.block(node)),
            "expression_statement" => match named_children(node).first().copied() {
                Some(expr) => {
                    let node_id = self.ids.next_id();
                    let expression = self.expr(expr);
                    Stmt::Expression(ExpressionStmt {
                        node_id,
                        expression,
                        span: span(node),
                    })
                }
                None => self.other_stmt(node),
            },
            "return_statement" => {
                let node_id = self.ids.next_id();
                let expression = named_children(node).first().map(|e| self.expr(*e));
                Stmt::Return(ReturnStmt {
                    node_id,
                    expression,
                    span: span(node),
                })
            }
            "local_declaration_statement" => match child_of_kind(node, "variable_declaration") {
                Some(decl) => {
                    let node_id = self.ids.next_id();
                    let (ty, declarators) = self.variable_declaration(decl);
                    Stmt::LocalDeclaration(LocalDeclaration {
                        node_id,
                        ty,
                        declarators,
                        span: span(node),
                    })
                }
                None => self.other_stmt(node),
            },
            _ => self.other_stmt(node),
        }
    }

    fn other_stmt(&mut self, node: Node<'_>) -> Stmt {
        let node_id = self.ids.next_id();
        let children = self.children(node);
        Stmt::Other(OtherStmt {
            node_id,
            kind: node.kind().to_string(),
            children,
            span: span(node),
        })
    }

    fn children(&mut self, node: Node<'_>) -> Vec<crate::nodes::SyntaxChild> {
        named_children(node)
            .into_iter()
            .map(|child| {
                if is_statement_kind(child.kind()) {
                    SyntaxChild::Stmt(self.stmt(child))
                } else {
                    SyntaxChild::Expr(self.expr(child))
                }
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    pub(crate) fn expr(&mut self, node: Node<'_>) -> Expr {
        let kind = node.kind();
        if let Some(literal) = literal_kind(kind) {
            return self.literal(node, literal);
        }
        match kind {
            "identifier" | "predefined_type" => Expr::Name(NameExpr {
                node_id: self.ids.next_id(),
                identifier: self.identifier(node),
                type_arguments: Vec::new(),
                span: span(node),
            }),
            "generic_name" => {
                let node_id = self.ids.next_id();
                let (identifier, type_arguments) = self.simple_name(node);
                Expr::Name(NameExpr {
                    node_id,
                    identifier,
                    type_arguments,
                    span: span(node),
                })
            }
            "member_access_expression" => {
                let children = named_children(node);
                let receiver = node
                    .child_by_field_name("expression")
                    .or_else(|| children.first().copied());
                let name = node
                    .child_by_field_name("name")
                    .or_else(|| children.last().copied());
                match (receiver, name) {
                    (Some(receiver), Some(name)) if receiver.id() != name.id() => {
                        self.member_access(node, receiver, name)
                    }
                    _ => self.other_expr(node),
                }
            }
            "qualified_name" => {
                let children = named_children(node);
                let qualifier = node
                    .child_by_field_name("qualifier")
                    .or_else(|| children.first().copied());
                let name = node
                    .child_by_field_name("name")
                    .or_else(|| children.last().copied());
                match (qualifier, name) {
                    (Some(qualifier), Some(name)) if qualifier.id() != name.id() => {
                        self.member_access(node, qualifier, name)
                    }
                    _ => self.other_expr(node),
                }
            }
            "alias_qualified_name" => {
                let name = node
                    .child_by_field_name("name")
                    .or_else(|| named_children(node).last().copied());
                match name {
                    Some(name) if name.id() != node.id() => self.expr(name),
                    _ => self.other_expr(node),
                }
            }
            "invocation_expression" => {
                let function = node
                    .child_by_field_name("function")
                    .or_else(|| named_children(node).first().copied());
                match function {
                    Some(function) => {
                        let node_id = self.ids.next_id();
                        let function = Box::new(self.expr(function));
                        let arguments = self.argument_list(node);
                        Expr::Invocation(Invocation {
                            node_id,
                            function,
                            arguments,
                            span: span(node),
                        })
                    }
                    None => self.other_expr(node),
                }
            }
            "typeof_expression" => {
                let ty = node
                    .child_by_field_name("type")
                    .or_else(|| named_children(node).first().copied());
                match ty {
                    Some(ty) => {
                        let node_id = self.ids.next_id();
                        Expr::TypeOf(TypeOfExpr {
                            node_id,
                            ty: self.type_syntax(ty),
                            span: span(node),
                        })
                    }
                    None => self.other_expr(node),
                }
            }
            "object_creation_expression" | "implicit_object_creation_expression" => {
                let node_id = self.ids.next_id();
                let ty = if kind == "object_creation_expression" {
                    node.child_by_field_name("type").map(|t| self.type_syntax(t))
                } else {
                    None
                };
                let arguments = self.argument_list(node);
                let initializer = node
                    .child_by_field_name("initializer")
                    .or_else(|| child_of_kind(node, "initializer_expression"))
                    .map(|i| Box::new(self.expr(i)));
                Expr::ObjectCreation(ObjectCreation {
                    node_id,
                    ty,
                    arguments,
                    initializer,
                    span: span(node),
                })
            }
            "cast_expression" => {
                let children = named_children(node);
                let ty = node
                    .child_by_field_name("type")
                    .or_else(|| children.first().copied());
                let value = node
                    .child_by_field_name("value")
                    .or_else(|| children.last().copied());
                match (ty, value) {
                    (Some(ty), Some(value)) if ty.id() != value.id() => {
                        let node_id = self.ids.next_id();
                        let ty = self.type_syntax(ty);
                        let expression = Box::new(self.expr(value));
                        Expr::Cast(CastExpr {
                            node_id,
                            ty,
                            expression,
                            span: span(node),
                        })
                    }
                    _ => self.other_expr(node),
                }
            }
            "parenthesized_expression" => match named_children(node).first().copied() {
                Some(inner) => {
                    let node_id = self.ids.next_id();
                    let expression = Box::new(self.expr(inner));
                    Expr::Parenthesized(ParenthesizedExpr {
                        node_id,
                        expression,
                        span: span(node),
                    })
                }
                None => self.other_expr(node),
            },
            "this_expression" | "this" => Expr::This(KeywordExpr {
                node_id: self.ids.next_id(),
                span: span(node),
            }),
            "base_expression" | "base" => Expr::Base(KeywordExpr {
                node_id: self.ids.next_id(),
                span: span(node),
            }),
            "lambda_expression" | "anonymous_method_expression" => self.lambda(node),
            "assignment_expression" => {
                let children = named_children(node);
                let left = node
                    .child_by_field_name("left")
                    .or_else(|| children.first().copied());
                let right = node
                    .child_by_field_name("right")
                    .or_else(|| children.last().copied());
                match (left, right) {
                    (Some(left), Some(right)) if left.id() != right.id() => {
                        let node_id = self.ids.next_id();
                        let operator = self.assignment_operator(node);
                        let left = Box::new(self.expr(left));
                        let right = Box::new(self.expr(right));
                        Expr::Assignment(AssignmentExpr {
                            node_id,
                            left,
                            operator,
                            right,
                            span: span(node),
                        })
                    }
                    _ => self.other_expr(node),
                }
            }
            _ => self.other_expr(node),
        }
    }

    fn other_expr(&mut self, node: Node<'_>) -> Expr {
        let node_id = self.ids.next_id();
        let children = self.children(node);
        Expr::Other(OtherExpr {
            node_id,
            kind: node.kind().to_string(),
            children,
            span: span(node),
        })
    }

    /// Identifier and type arguments of an `identifier` or `generic_name`.
    fn simple_name(&mut self, node: Node<'_>) -> (Identifier, Vec<TypeSyntax>) {
        if node.kind() != "generic_name" {
            return (self.identifier(node), Vec::new());
        }
        let identifier = node
            .child_by_field_name("name")
            .or_else(|| child_of_kind(node, "identifier"))
            .map(|n| self.identifier(n))
            .unwrap_or_else(|| self.identifier(node));
        let type_arguments = match child_of_kind(node, "type_argument_list") {
            Some(list) => named_children(list)
                .into_iter()
                .map(|t| self.type_syntax(t))
                .collect(),
            None => Vec::new(),
        };
        (identifier, type_arguments)
    }

    fn member_access(&mut self, node: Node<'_>, receiver: Node<'_>, name: Node<'_>) -> Expr {
        let node_id = self.ids.next_id();
        let expression = Box::new(self.expr(receiver));
        let (name, type_arguments) = self.simple_name(name);
        Expr::MemberAccess(MemberAccess {
            node_id,
            expression,
            name,
            type_arguments,
            span: span(node),
        })
    }

    fn argument_list(&mut self, node: Node<'_>) -> Vec<Argument> {
        let list = node
            .child_by_field_name("arguments")
            .filter(|l| l.kind() == "argument_list")
            .or_else(|| child_of_kind(node, "argument_list"));
        match list {
            Some(list) => named_children(list)
                .into_iter()
                .filter(|a| a.kind() == "argument")
                .map(|a| self.argument(a))
                .collect(),
            None => Vec::new(),
        }
    }

    fn argument(&mut self, node: Node<'_>) -> Argument {
        let node_id = self.ids.next_id();
        let children = all_children(node);
        let name_colon = child_of_kind(node, "name_colon");
        let has_colon = children.iter().any(|c| !c.is_named() && c.kind() == ":");
        let name_node = match name_colon {
            Some(nc) => child_of_kind(nc, "identifier").or(Some(nc)),
            None if has_colon => node
                .child_by_field_name("name")
                .or_else(|| children.iter().copied().find(|c| c.kind() == "identifier")),
            None => None,
        };
        let ref_kind = children
            .iter()
            .find(|c| matches!(c.kind(), "ref" | "out" | "in"))
            .map(|c| c.kind().to_string());

        let excluded = [name_colon.map(|n| n.id()), name_node.map(|n| n.id())];
        let expr_node = named_children(node)
            .into_iter()
            .rev()
            .find(|c| !excluded.contains(&Some(c.id())));
        let name = name_node.map(|n| {
            let text = self.text(n).trim().trim_end_matches(':').trim();
            Identifier::new(text, span(n))
        });
        let expression = match expr_node {
            Some(e) => self.expr(e),
            None => Expr::Other(OtherExpr {
                node_id: self.ids.next_id(),
                kind: "missing".to_string(),
                children: Vec::new(),
                span: Span::new(node.end_byte(), node.end_byte()),
            }),
        };
        Argument {
            node_id,
            name,
            ref_kind,
            expression,
            span: span(node),
        }
    }

    fn literal(&mut self, node: Node<'_>, kind: LiteralKind) -> Expr {
        let text = self.text(node).trim().to_string();
        let value = match kind {
            LiteralKind::String => decode_string_literal(&text),
            _ => None,
        };
        Expr::Literal(Literal {
            node_id: self.ids.next_id(),
            kind,
            text,
            value,
            span: span(node),
        })
    }

    fn lambda(&mut self, node: Node<'_>) -> Expr {
        let node_id = self.ids.next_id();
        let children = named_children(node);
        let params = node
            .child_by_field_name("parameters")
            .or_else(|| children.iter().copied().find(|c| c.kind() == "parameter_list"));
        let parameters = match params {
            Some(p) if p.kind() == "parameter_list" => named_children(p)
                .into_iter()
                .filter(|c| c.kind() == "parameter")
                .filter_map(|c| {
                    c.child_by_field_name("name").or_else(|| {
                        named_children(c)
                            .into_iter()
                            .filter(|n| n.kind() == "identifier")
                            .last()
                    })
                })
                .map(|n| self.identifier(n))
                .collect(),
            Some(p) => vec![self.identifier(p)],
            None => Vec::new(),
        };
        let body_node = node
            .child_by_field_name("body")
            .or_else(|| children.iter().copied().find(|c| c.kind() == "block"))
            .or_else(|| children.last().copied());
        let body = match body_node {
            Some(b) if b.kind() == "block" => Body::Block(self.block(b)),
            Some(b) => Body::Expression(self.expr(b)),
            None => Body::Block(Block {
                node_id: self.ids.next_id(),
                statements: Vec::new(),
                span: span(node),
            }),
        };
        Expr::Lambda(LambdaExpr {
            node_id,
            parameters,
            body: Box::new(body),
            span: span(node),
        })
    }

    fn assignment_operator(&self, node: Node<'_>) -> String {
        if let Some(op) = node.child_by_field_name("operator") {
            return self.text(op).trim().to_string();
        }
        all_children(node)
            .into_iter()
            .find(|c| c.kind() == "assignment_operator" || (!c.is_named() && c.kind().ends_with('=')))
            .map(|c| self.text(c).trim().to_string())
            .unwrap_or_else(|| "=".to_string())
    }
}

fn qualify(outer: Option<&str>, name: &str) -> String {
    match outer {
        Some(outer) if !outer.is_empty() => format!("{outer}.{name}"),
        _ => name.to_string(),
    }
}
