//! Expression binding.
//!
//! Binding answers "what does this expression denote" for the shapes the
//! dependency-property patterns use: simple names, member access chains,
//! `this`, `base`, parameters, locals, casts, object creation, and calls.
//! Anything outside those shapes binds to [`Binding::Unresolved`].

use tracing::trace;
use wpfcheck_syntax::helpers::invocation_name;
use wpfcheck_syntax::nodes::{
    Body, ConstructorDecl, Expr, Invocation, LiteralKind, LocalDeclaration, MemberAccess, NameExpr,
    Parameter, Stmt,
};
use wpfcheck_syntax::visitor::walk_body;
use wpfcheck_syntax::{VisitResult, Visitor};

use crate::known::{KnownMethod, KnownType};
use crate::semantic::{ResolvedType, SemanticModel};
use crate::symbols::{
    BackingMember, MemberSymbol, MethodSymbol, PropertySymbol, TreeId, TypeId,
};

// ============================================================================
// Binding context
// ============================================================================

/// A parameter or local visible in the current body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedValue<'c> {
    pub name: &'c str,
    pub ty: ResolvedType,
}

/// Where an expression is bound: the tree, the enclosing type, and the
/// parameters and locals of the enclosing member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingContext<'c> {
    pub tree: TreeId,
    pub containing_type: Option<TypeId>,
    pub parameters: Vec<NamedValue<'c>>,
    pub locals: Vec<NamedValue<'c>>,
}

impl<'c> BindingContext<'c> {
    pub fn new(tree: TreeId, containing_type: Option<TypeId>) -> Self {
        Self {
            tree,
            containing_type,
            parameters: Vec::new(),
            locals: Vec::new(),
        }
    }

    fn lookup_value(&self, name: &str) -> Option<Binding<'c>> {
        if let Some(local) = self.locals.iter().rev().find(|v| v.name == name) {
            return Some(Binding::Local(local.ty.clone()));
        }
        self.parameters
            .iter()
            .find(|v| v.name == name)
            .map(|p| Binding::Parameter(p.ty.clone()))
    }
}

/// Collects local declarations anywhere in a body.
#[derive(Default)]
struct LocalCollector<'c> {
    locals: Vec<&'c LocalDeclaration>,
}

impl<'c> Visitor<'c> for LocalCollector<'c> {
    fn visit_stmt(&mut self, node: &'c Stmt) -> VisitResult {
        if let Stmt::LocalDeclaration(decl) = node {
            self.locals.push(decl);
        }
        VisitResult::Continue
    }
}

// ============================================================================
// Bindings
// ============================================================================

/// What an expression denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding<'c> {
    /// A type name.
    Type(ResolvedType),
    /// A source field, property, or method.
    Member(MemberSymbol<'c>),
    /// A static member of a framework type, such as
    /// `TextElement.FontSizeProperty`.
    FrameworkMember { owner: KnownType, name: String },
    Parameter(ResolvedType),
    Local(ResolvedType),
    This(ResolvedType),
    Base(ResolvedType),
    /// A computed value of a known type (a cast, a call, a literal).
    Value(ResolvedType),
    Unresolved,
}

/// The target of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokedMethod<'c> {
    Source(MethodSymbol<'c>),
    Framework(KnownMethod),
}

impl<'c> SemanticModel<'c> {
    // ------------------------------------------------------------------------
    // Contexts
    // ------------------------------------------------------------------------

    /// Context for expressions at type level (initializers).
    pub fn type_context(&self, tree: TreeId, ty: TypeId) -> BindingContext<'c> {
        BindingContext::new(tree, Some(ty))
    }

    pub fn member_context(&self, member: BackingMember<'c>) -> BindingContext<'c> {
        BindingContext::new(member.tree(), Some(member.containing_type()))
    }

    /// Context for the accessors of a property; setters see `value`.
    pub fn property_context(&self, property: PropertySymbol<'c>) -> BindingContext<'c> {
        let tree = property.id.tree;
        let containing = Some(property.containing_type);
        let mut ctx = BindingContext::new(tree, containing);
        ctx.parameters.push(NamedValue {
            name: "value",
            ty: self.resolve_type_syntax(&property.decl.ty, tree, containing),
        });
        for accessor in &property.decl.accessors {
            if let Some(body) = &accessor.body {
                self.add_locals(&mut ctx, body);
            }
        }
        ctx
    }

    pub fn method_context(&self, method: MethodSymbol<'c>) -> BindingContext<'c> {
        let mut ctx = BindingContext::new(method.id.tree, Some(method.containing_type));
        self.add_parameters(&mut ctx, &method.decl.parameters);
        if let Some(body) = &method.decl.body {
            self.add_locals(&mut ctx, body);
        }
        ctx
    }

    pub fn constructor_context(
        &self,
        tree: TreeId,
        ty: TypeId,
        ctor: &'c ConstructorDecl,
    ) -> BindingContext<'c> {
        let mut ctx = BindingContext::new(tree, Some(ty));
        self.add_parameters(&mut ctx, &ctor.parameters);
        if let Some(body) = &ctor.body {
            self.add_locals(&mut ctx, body);
        }
        ctx
    }

    fn add_parameters(&self, ctx: &mut BindingContext<'c>, parameters: &'c [Parameter]) {
        for parameter in parameters {
            let ty = match &parameter.ty {
                Some(ty) => self.resolve_type_syntax(ty, ctx.tree, ctx.containing_type),
                None => ResolvedType::Unknown(String::new()),
            };
            ctx.parameters.push(NamedValue {
                name: &parameter.name.text,
                ty,
            });
        }
    }

    fn add_locals(&self, ctx: &mut BindingContext<'c>, body: &'c Body) {
        let mut collector = LocalCollector::default();
        walk_body(&mut collector, body);
        for decl in collector.locals {
            for declarator in &decl.declarators {
                let ty = if decl.ty.is_var() {
                    declarator
                        .initializer
                        .as_ref()
                        .and_then(|init| self.infer_var_type(init, ctx))
                        .unwrap_or_else(|| ResolvedType::Unknown("var".to_string()))
                } else {
                    self.resolve_type_syntax(&decl.ty, ctx.tree, ctx.containing_type)
                };
                ctx.locals.push(NamedValue {
                    name: &declarator.name.text,
                    ty,
                });
            }
        }
    }

    /// `var x = (T)e;` and `var x = new T();` are typed; other
    /// initializers go through ordinary binding.
    fn infer_var_type(&self, init: &Expr, ctx: &BindingContext<'c>) -> Option<ResolvedType> {
        match init.without_parentheses() {
            Expr::Cast(cast) => Some(self.resolve_type_syntax(&cast.ty, ctx.tree, ctx.containing_type)),
            Expr::ObjectCreation(creation) => creation
                .ty
                .as_ref()
                .map(|ty| self.resolve_type_syntax(ty, ctx.tree, ctx.containing_type)),
            other => self.type_of(other, ctx),
        }
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    /// Bind an expression in `ctx`.
    pub fn bind_expr(&self, expr: &Expr, ctx: &BindingContext<'c>) -> Binding<'c> {
        match expr.without_parentheses() {
            Expr::This(_) => Binding::This(match ctx.containing_type {
                Some(ty) => ResolvedType::Source(ty),
                None => ResolvedType::Unknown("this".to_string()),
            }),
            Expr::Base(_) => Binding::Base(
                ctx.containing_type
                    .and_then(|ty| self.base_class(ty))
                    .unwrap_or_else(|| ResolvedType::Unknown("base".to_string())),
            ),
            Expr::Name(name) => self.bind_name(name, ctx),
            Expr::MemberAccess(access) => self.bind_member_access(access, ctx),
            Expr::Cast(cast) => Binding::Value(self.resolve_type_syntax(&cast.ty, ctx.tree, ctx.containing_type)),
            Expr::ObjectCreation(creation) => match &creation.ty {
                Some(ty) => Binding::Value(self.resolve_type_syntax(ty, ctx.tree, ctx.containing_type)),
                None => Binding::Unresolved,
            },
            Expr::Invocation(invocation) => self
                .bind_invocation(invocation, ctx)
                .and_then(|method| self.invocation_result_type(method))
                .map_or(Binding::Unresolved, Binding::Value),
            Expr::Literal(literal) => {
                let keyword = match literal.kind {
                    LiteralKind::String => "string",
                    LiteralKind::Char => "char",
                    LiteralKind::Integer => "int",
                    LiteralKind::Real => "double",
                    LiteralKind::Boolean => "bool",
                    LiteralKind::Null => return Binding::Unresolved,
                };
                Binding::Value(ResolvedType::Predefined(keyword.to_string()))
            }
            _ => Binding::Unresolved,
        }
    }

    fn bind_name(&self, name: &NameExpr, ctx: &BindingContext<'c>) -> Binding<'c> {
        let text = name.identifier.text.as_str();
        if name.type_arguments.is_empty() {
            if let Some(value) = ctx.lookup_value(text) {
                return value;
            }
            if let Some(member) = self.lookup_in_scope(ctx.containing_type, text) {
                return Binding::Member(member);
            }
        }
        match self.resolve_type_parts(
            text,
            None,
            name.type_arguments.len(),
            ctx.tree,
            ctx.containing_type,
        ) {
            Some(ty) => Binding::Type(ty),
            None => Binding::Unresolved,
        }
    }

    fn bind_member_access(&self, access: &MemberAccess, ctx: &BindingContext<'c>) -> Binding<'c> {
        let name = access.name.text.as_str();
        match self.bind_expr(&access.expression, ctx) {
            Binding::Type(ResolvedType::Source(ty)) => {
                if let Some(member) = self.lookup_member(ty, name) {
                    return Binding::Member(member);
                }
                self.types()
                    .iter()
                    .find(|t| t.containing_type == Some(ty) && t.name == name)
                    .map_or(Binding::Unresolved, |t| Binding::Type(ResolvedType::Source(t.id)))
            }
            Binding::Type(ResolvedType::Known(owner)) => Binding::FrameworkMember {
                owner,
                name: name.to_string(),
            },
            Binding::Type(_) => Binding::Unresolved,
            Binding::Unresolved => {
                // A namespace-qualified type name such as `System.Windows.X`.
                let Some(dotted) = access.dotted_name() else {
                    return Binding::Unresolved;
                };
                let ty = self.resolve_type_text(&dotted, ctx.tree, ctx.containing_type);
                if ty.is_unknown() {
                    Binding::Unresolved
                } else {
                    Binding::Type(ty)
                }
            }
            receiver => match self.binding_type(&receiver) {
                Some(ResolvedType::Source(ty)) => self
                    .lookup_member(ty, name)
                    .map_or(Binding::Unresolved, Binding::Member),
                Some(ResolvedType::Known(owner)) => Binding::FrameworkMember {
                    owner,
                    name: name.to_string(),
                },
                _ => Binding::Unresolved,
            },
        }
    }

    /// The type of the value a binding denotes.
    pub fn binding_type(&self, binding: &Binding<'c>) -> Option<ResolvedType> {
        match binding {
            Binding::Member(member) => self.member_type(*member),
            Binding::FrameworkMember { owner, name } => {
                if *owner == KnownType::DependencyPropertyKey && name == "DependencyProperty" {
                    Some(ResolvedType::Known(KnownType::DependencyProperty))
                } else {
                    KnownType::static_member_type(name).map(ResolvedType::Known)
                }
            }
            Binding::Parameter(ty)
            | Binding::Local(ty)
            | Binding::This(ty)
            | Binding::Base(ty)
            | Binding::Value(ty) => Some(ty.clone()),
            Binding::Type(_) | Binding::Unresolved => None,
        }
    }

    /// The type of an expression's value, if it binds to one.
    pub fn type_of(&self, expr: &Expr, ctx: &BindingContext<'c>) -> Option<ResolvedType> {
        self.binding_type(&self.bind_expr(expr, ctx))
    }

    /// The field or property an expression refers to.
    pub fn bind_backing_member(&self, expr: &Expr, ctx: &BindingContext<'c>) -> Option<BackingMember<'c>> {
        match self.bind_expr(expr, ctx) {
            Binding::Member(member) => member.as_backing(),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Invocations
    // ------------------------------------------------------------------------

    /// Bind the target of a call.
    ///
    /// A source method with the invoked name wins over a framework member,
    /// so a user-declared `GetValue` shadows `DependencyObject.GetValue`.
    pub fn bind_invocation(&self, invocation: &Invocation, ctx: &BindingContext<'c>) -> Option<InvokedMethod<'c>> {
        let name = invocation_name(invocation)?;
        let count = invocation.arguments.len();
        let bound = match invocation.receiver() {
            None => self.bind_unqualified_call(name, count, ctx),
            Some(receiver) => self.bind_qualified_call(receiver, name, count, ctx),
        }
        .filter(|method| match method {
            InvokedMethod::Framework(known) => known.accepts_arity(count),
            InvokedMethod::Source(_) => true,
        });
        trace!(method = name, ?bound, "bound invocation");
        bound
    }

    fn bind_unqualified_call(&self, name: &str, count: usize, ctx: &BindingContext<'c>) -> Option<InvokedMethod<'c>> {
        if let Some(method) = pick_overload(self.lookup_methods_in_scope(ctx.containing_type, name), count) {
            return Some(InvokedMethod::Source(method));
        }
        if name == "nameof" && count == 1 {
            return Some(InvokedMethod::Framework(KnownMethod::NameOf));
        }
        if let Some(ty) = ctx.containing_type {
            if self.is_dependency_object(&ResolvedType::Source(ty)) {
                if let Some(method) = KnownMethod::dependency_object_method(name) {
                    return Some(InvokedMethod::Framework(method));
                }
            }
        }
        self.bind_static_using_call(name, ctx)
    }

    /// `using static System.Windows.DependencyProperty;` brings `Register`
    /// and friends into scope.
    fn bind_static_using_call(&self, name: &str, ctx: &BindingContext<'c>) -> Option<InvokedMethod<'c>> {
        self.tree(ctx.tree)
            .root
            .usings
            .iter()
            .filter(|u| u.is_static)
            .find_map(|u| match self.resolve_type_text(&u.name, ctx.tree, None) {
                ResolvedType::Known(owner) => KnownMethod::static_on(owner, name),
                _ => None,
            })
            .map(InvokedMethod::Framework)
    }

    fn bind_qualified_call(
        &self,
        receiver: &Expr,
        name: &str,
        count: usize,
        ctx: &BindingContext<'c>,
    ) -> Option<InvokedMethod<'c>> {
        match self.bind_expr(receiver, ctx) {
            Binding::Type(ResolvedType::Known(owner)) => {
                KnownMethod::static_on(owner, name).map(InvokedMethod::Framework)
            }
            Binding::Type(ResolvedType::Source(ty)) => {
                pick_overload(self.lookup_methods(ty, name), count)
                    .filter(MethodSymbol::is_static)
                    .map(InvokedMethod::Source)
            }
            Binding::Type(_) | Binding::Unresolved => None,
            value => {
                let ty = self.binding_type(&value)?;
                match &ty {
                    ResolvedType::Source(id) => {
                        if let Some(method) = pick_overload(self.lookup_methods(*id, name), count) {
                            return Some(InvokedMethod::Source(method));
                        }
                        if self.is_dependency_object(&ty) {
                            return KnownMethod::dependency_object_method(name).map(InvokedMethod::Framework);
                        }
                        None
                    }
                    ResolvedType::Known(owner) => {
                        KnownMethod::instance_on(*owner, name).map(InvokedMethod::Framework)
                    }
                    _ => None,
                }
            }
        }
    }

    /// The result type of a bound call.
    pub fn invocation_result_type(&self, method: InvokedMethod<'c>) -> Option<ResolvedType> {
        let known = match method {
            InvokedMethod::Source(method) => return Some(self.method_return_type(method)),
            InvokedMethod::Framework(method) => method,
        };
        match known {
            KnownMethod::Register | KnownMethod::RegisterAttached | KnownMethod::AddOwner => {
                Some(ResolvedType::Known(KnownType::DependencyProperty))
            }
            KnownMethod::RegisterReadOnly | KnownMethod::RegisterAttachedReadOnly => {
                Some(ResolvedType::Known(KnownType::DependencyPropertyKey))
            }
            KnownMethod::RegisterRoutedEvent | KnownMethod::RoutedEventAddOwner => {
                Some(ResolvedType::Known(KnownType::RoutedEvent))
            }
            KnownMethod::NameOf => Some(ResolvedType::Predefined("string".to_string())),
            KnownMethod::GetValue => Some(ResolvedType::Predefined("object".to_string())),
            KnownMethod::OverrideMetadata
            | KnownMethod::SetValue
            | KnownMethod::SetCurrentValue
            | KnownMethod::ClearValue => None,
        }
    }
}

/// The first overload that can take `count` arguments.
///
/// Without an applicable source overload the call falls through to the
/// framework, so a `GetValue(int, int)` helper does not hide
/// `DependencyObject.GetValue(dp)`.
fn pick_overload<'c>(methods: Vec<MethodSymbol<'c>>, count: usize) -> Option<MethodSymbol<'c>> {
    methods.into_iter().find(|m| accepts_argument_count(m, count))
}

fn accepts_argument_count(method: &MethodSymbol<'_>, count: usize) -> bool {
    let parameters = &method.decl.parameters;
    match parameters.last() {
        Some(last) if last.modifiers.iter().any(|m| m == "params") => count + 1 >= parameters.len(),
        _ => count == parameters.len(),
    }
}
