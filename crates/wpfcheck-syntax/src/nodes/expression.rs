// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes, identifiers, and type syntax.

use super::statement::{Body, Stmt};
use super::traits::{NodeId, Span};

/// An identifier token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub text: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

/// A type as written in source.
///
/// `text` has whitespace and any `global::` prefix removed, so
/// `global::System.Windows.DependencyProperty` and
/// `System.Windows.DependencyProperty` compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSyntax {
    pub node_id: NodeId,
    pub text: String,
    pub span: Span,
}

impl TypeSyntax {
    /// The unqualified type name without generic arguments, nullable
    /// marker, or array rank: `System.Collections.Generic.List<int>?` gives
    /// `List`.
    pub fn simple_name(&self) -> &str {
        simple_type_name(&self.text)
    }

    /// The dotted qualifier, if the type is qualified.
    pub fn qualifier(&self) -> Option<&str> {
        let base = strip_type_decorations(&self.text);
        base.rfind('.').map(|i| &base[..i])
    }

    pub fn is_nullable(&self) -> bool {
        self.text.ends_with('?')
    }

    /// Returns true for the implicitly typed `var`.
    pub fn is_var(&self) -> bool {
        self.text == "var"
    }
}

/// Remove generic arguments, nullable markers, and array ranks.
fn strip_type_decorations(text: &str) -> &str {
    let mut base = match text.find('<') {
        Some(i) => &text[..i],
        None => text,
    };
    loop {
        if let Some(stripped) = base.strip_suffix('?') {
            base = stripped;
        } else if let Some(stripped) = base.strip_suffix("[]") {
            base = stripped;
        } else {
            break;
        }
    }
    base
}

/// The last segment of a dotted or alias-qualified type name.
pub fn simple_type_name(text: &str) -> &str {
    let base = strip_type_decorations(text);
    let base = match base.rfind("::") {
        Some(i) => &base[i + 2..],
        None => base,
    };
    match base.rfind('.') {
        Some(i) => &base[i + 1..],
        None => base,
    }
}

/// Either an expression or a statement, for generic nodes whose children
/// can be both (a `switch` section, a `catch` clause, an `if` statement).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxChild {
    Expr(Expr),
    Stmt(Stmt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `Name` or `Name<T>`.
    Name(NameExpr),
    /// `expr.Name` or `expr.Name<T>`; qualified names lower here too.
    MemberAccess(MemberAccess),
    Invocation(Invocation),
    TypeOf(TypeOfExpr),
    Literal(Literal),
    ObjectCreation(ObjectCreation),
    Cast(CastExpr),
    Parenthesized(ParenthesizedExpr),
    This(KeywordExpr),
    Base(KeywordExpr),
    Lambda(LambdaExpr),
    Assignment(AssignmentExpr),
    Other(OtherExpr),
}

impl Expr {
    pub fn node_id(&self) -> NodeId {
        match self {
            Expr::Name(e) => e.node_id,
            Expr::MemberAccess(e) => e.node_id,
            Expr::Invocation(e) => e.node_id,
            Expr::TypeOf(e) => e.node_id,
            Expr::Literal(e) => e.node_id,
            Expr::ObjectCreation(e) => e.node_id,
            Expr::Cast(e) => e.node_id,
            Expr::Parenthesized(e) => e.node_id,
            Expr::This(e) | Expr::Base(e) => e.node_id,
            Expr::Lambda(e) => e.node_id,
            Expr::Assignment(e) => e.node_id,
            Expr::Other(e) => e.node_id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::Name(e) => e.span,
            Expr::MemberAccess(e) => e.span,
            Expr::Invocation(e) => e.span,
            Expr::TypeOf(e) => e.span,
            Expr::Literal(e) => e.span,
            Expr::ObjectCreation(e) => e.span,
            Expr::Cast(e) => e.span,
            Expr::Parenthesized(e) => e.span,
            Expr::This(e) | Expr::Base(e) => e.span,
            Expr::Lambda(e) => e.span,
            Expr::Assignment(e) => e.span,
            Expr::Other(e) => e.span,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn without_parentheses(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Parenthesized(p) = expr {
            expr = &p.expression;
        }
        expr
    }

    /// Strip enclosing parentheses and casts, in any nesting.
    pub fn without_casts_and_parentheses(&self) -> &Expr {
        let mut expr = self;
        loop {
            match expr {
                Expr::Parenthesized(p) => expr = &p.expression,
                Expr::Cast(c) => expr = &c.expression,
                _ => return expr,
            }
        }
    }

    pub fn as_invocation(&self) -> Option<&Invocation> {
        match self {
            Expr::Invocation(inv) => Some(inv),
            _ => None,
        }
    }

    /// The identifier of a simple name or the member name of an access.
    pub fn trailing_identifier(&self) -> Option<&Identifier> {
        match self {
            Expr::Name(n) => Some(&n.identifier),
            Expr::MemberAccess(m) => Some(&m.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameExpr {
    pub node_id: NodeId,
    pub identifier: Identifier,
    pub type_arguments: Vec<TypeSyntax>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAccess {
    pub node_id: NodeId,
    pub expression: Box<Expr>,
    pub name: Identifier,
    pub type_arguments: Vec<TypeSyntax>,
    pub span: Span,
}

impl MemberAccess {
    /// The dotted text of a pure name chain (`System.Windows.X`), or `None`
    /// if the receiver contains anything but names.
    pub fn dotted_name(&self) -> Option<String> {
        let prefix = match self.expression.as_ref() {
            Expr::Name(n) => n.identifier.text.clone(),
            Expr::MemberAccess(m) => m.dotted_name()?,
            _ => return None,
        };
        Some(format!("{}.{}", prefix, self.name.text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub node_id: NodeId,
    pub function: Box<Expr>,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

impl Invocation {
    /// The receiver of `receiver.Name(...)`, `None` for unqualified calls.
    pub fn receiver(&self) -> Option<&Expr> {
        match self.function.as_ref() {
            Expr::MemberAccess(m) => Some(&m.expression),
            _ => None,
        }
    }

    /// The argument passed for `name`: by `name:` if any argument is
    /// named so, otherwise the positional argument at `position`.
    ///
    /// Positional lookup stops at the first named argument, since C# binds
    /// later positional arguments only when names are in position.
    pub fn argument(&self, position: usize, name: &str) -> Option<&Argument> {
        if let Some(named) = self
            .arguments
            .iter()
            .find(|a| a.name.as_ref().is_some_and(|n| n.text == name))
        {
            return Some(named);
        }
        let arg = self.arguments.get(position)?;
        match &arg.name {
            None => Some(arg),
            Some(_) => None,
        }
    }
}

/// An argument in an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub node_id: NodeId,
    /// `name:` for named arguments.
    pub name: Option<Identifier>,
    /// `ref`, `out`, or `in`.
    pub ref_kind: Option<String>,
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOfExpr {
    pub node_id: NodeId,
    pub ty: TypeSyntax,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    String,
    Char,
    Integer,
    Real,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub node_id: NodeId,
    pub kind: LiteralKind,
    /// The literal as written.
    pub text: String,
    /// Decoded contents of a string literal (regular, verbatim, or raw).
    pub value: Option<String>,
    pub span: Span,
}

/// `new T(args) { ... }` or target-typed `new(args)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCreation {
    pub node_id: NodeId,
    /// `None` for target-typed `new(...)`.
    pub ty: Option<TypeSyntax>,
    pub arguments: Vec<Argument>,
    pub initializer: Option<Box<Expr>>,
    pub span: Span,
}

impl ObjectCreation {
    pub fn is_target_typed(&self) -> bool {
        self.ty.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastExpr {
    pub node_id: NodeId,
    pub ty: TypeSyntax,
    pub expression: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParenthesizedExpr {
    pub node_id: NodeId,
    pub expression: Box<Expr>,
    pub span: Span,
}

/// `this` or `base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordExpr {
    pub node_id: NodeId,
    pub span: Span,
}

/// A lambda or anonymous method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaExpr {
    pub node_id: NodeId,
    pub parameters: Vec<Identifier>,
    pub body: Box<Body>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentExpr {
    pub node_id: NodeId,
    pub left: Box<Expr>,
    /// `=`, `+=`, `??=`, ...
    pub operator: String,
    pub right: Box<Expr>,
    pub span: Span,
}

impl AssignmentExpr {
    pub fn is_simple(&self) -> bool {
        self.operator == "="
    }
}

/// An expression kind not modeled explicitly (binary and conditional
/// expressions, switch expressions, element access, interpolated strings,
/// error nodes, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherExpr {
    pub node_id: NodeId,
    /// The tree-sitter node kind.
    pub kind: String,
    pub children: Vec<SyntaxChild>,
    pub span: Span,
}
