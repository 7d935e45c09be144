//! Dependency-property registration resolution.
//!
//! Given a field or property typed `DependencyProperty` or
//! `DependencyPropertyKey`, find the `Register*` call that created its value
//! and read the registered name, value type, owner type, and metadata.
//!
//! The value expression is followed through the shapes WPF code uses:
//!
//! | Shape | Result |
//! |-------|--------|
//! | `DependencyProperty.Register*(...)` | read directly |
//! | `X.AddOwner(typeof(T)[, metadata])` | `X` with owner and metadata replaced |
//! | `X.OverrideMetadata(typeof(T), metadata)` | `X` with owner and metadata replaced |
//! | `Key.DependencyProperty` | the key's registration, linked to the key |
//! | `X` | alias of another backing member |
//! | `Create()` | the single expression `Create` returns, unwrapped once |
//!
//! Resolution keeps a visited set and a depth bound, so cyclic aliases end
//! as "not found".

use std::collections::HashSet;

use tracing::{debug, trace};
use wpfcheck_core::{CancellationToken, Cancelled};
use wpfcheck_syntax::helpers::{
    invocation_name, string_literal_value, try_get_nameof_argument, try_get_typeof_argument,
};
use wpfcheck_syntax::nodes::{Argument, Expr, Invocation, Stmt};
use wpfcheck_syntax::visitor::InvocationCollector;

use crate::binding::{BindingContext, InvokedMethod};
use crate::known::{KnownMethod, KnownType};
use crate::metadata::{non_null_argument, parse_metadata, PropertyMetadataInfo};
use crate::semantic::{SemanticModel, TypeReference};
use crate::symbols::{BackingMember, SymbolId, TypeId};

/// Alias and `AddOwner` chains longer than this are not followed.
pub const MAX_RESOLUTION_DEPTH: usize = 16;

// ============================================================================
// Descriptors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationKind {
    Register,
    RegisterReadOnly,
    RegisterAttached,
    RegisterAttachedReadOnly,
    AddOwner,
    Override,
}

impl RegistrationKind {
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            RegistrationKind::RegisterReadOnly | RegistrationKind::RegisterAttachedReadOnly
        )
    }

    pub fn is_attached(self) -> bool {
        matches!(
            self,
            RegistrationKind::RegisterAttached | RegistrationKind::RegisterAttachedReadOnly
        )
    }

    fn from_register(method: KnownMethod) -> Option<Self> {
        match method {
            KnownMethod::Register => Some(RegistrationKind::Register),
            KnownMethod::RegisterReadOnly => Some(RegistrationKind::RegisterReadOnly),
            KnownMethod::RegisterAttached => Some(RegistrationKind::RegisterAttached),
            KnownMethod::RegisterAttachedReadOnly => Some(RegistrationKind::RegisterAttachedReadOnly),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationKind::Register => "Register",
            RegistrationKind::RegisterReadOnly => "RegisterReadOnly",
            RegistrationKind::RegisterAttached => "RegisterAttached",
            RegistrationKind::RegisterAttachedReadOnly => "RegisterAttachedReadOnly",
            RegistrationKind::AddOwner => "AddOwner",
            RegistrationKind::Override => "OverrideMetadata",
        }
    }
}

/// How the registered name was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisteredNameSource {
    /// `"Bar"` or `@"Bar"`.
    Literal,
    /// `nameof(Bar)` or `nameof(Foo.Bar)`.
    NameOf,
    /// A `const string` field with a literal initializer.
    Constant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredName<'c> {
    pub value: String,
    pub source: RegisteredNameSource,
    /// The name argument as written.
    pub expression: &'c Expr,
}

/// A resolved dependency-property registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRegistration<'c> {
    /// The member holding the `DependencyProperty` or key.
    pub backing: BackingMember<'c>,
    pub kind: RegistrationKind,
    /// The `Register*` kind at the root of an `AddOwner` or override chain.
    pub registered_as: RegistrationKind,
    pub registered_name: Option<RegisteredName<'c>>,
    pub value_type: TypeReference<'c>,
    pub owner_type: TypeReference<'c>,
    pub metadata: Option<PropertyMetadataInfo<'c>>,
    pub validate_value_callback: Option<&'c Expr>,
    /// The call that produced this descriptor.
    pub invocation: &'c Invocation,
    /// The `DependencyPropertyKey` member of a read-only registration.
    pub key_field: Option<BackingMember<'c>>,
}

impl<'c> PropertyRegistration<'c> {
    /// The registered name, if it was recognized.
    pub fn name(&self) -> Option<&str> {
        self.registered_name.as_ref().map(|n| n.value.as_str())
    }

    pub fn is_read_only(&self) -> bool {
        self.registered_as.is_read_only()
    }

    pub fn is_attached(&self) -> bool {
        self.registered_as.is_attached()
    }

    /// True if this registration describes the key member itself.
    pub fn is_key(&self) -> bool {
        self.key_field == Some(self.backing)
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Cycle and depth bookkeeping shared by the property and routed-event
/// resolvers.
pub(crate) struct ResolutionGuard {
    visited: HashSet<SymbolId>,
    depth: usize,
}

impl ResolutionGuard {
    pub(crate) fn new() -> Self {
        Self {
            visited: HashSet::new(),
            depth: 0,
        }
    }

    /// Enter `member`, or `false` on a cycle or when too deep.
    pub(crate) fn enter(&mut self, member: BackingMember<'_>) -> bool {
        if self.depth >= MAX_RESOLUTION_DEPTH || !self.visited.insert(member.id()) {
            trace!(member = member.name(), depth = self.depth, "stopped at cycle or depth bound");
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// The expression a member is initialized with and the context to bind it
/// in: a declaration initializer, a getter-only expression body, or a
/// `Member = expr;` statement in a static constructor.
pub(crate) fn value_expression<'c>(
    model: &SemanticModel<'c>,
    member: BackingMember<'c>,
) -> Option<(&'c Expr, BindingContext<'c>)> {
    if let Some(init) = member.initializer() {
        return Some((init, model.member_context(member)));
    }
    let ty = model.type_symbol(member.containing_type());
    for (tree, ctor) in ty.static_constructors() {
        let ctx = model.constructor_context(tree, ty.id, ctor);
        for stmt in ctor.statements() {
            let Stmt::Expression(stmt) = stmt else {
                continue;
            };
            let Expr::Assignment(assignment) = &stmt.expression else {
                continue;
            };
            if assignment.is_simple()
                && model.bind_backing_member(&assignment.left, &ctx) == Some(member)
            {
                return Some((assignment.right.as_ref(), ctx));
            }
        }
    }
    None
}

/// Read the registered-name argument.
pub(crate) fn registered_name<'c>(
    model: &SemanticModel<'c>,
    expression: &'c Expr,
    ctx: &BindingContext<'c>,
) -> Option<RegisteredName<'c>> {
    let name = |value: &str, source| RegisteredName {
        value: value.to_string(),
        source,
        expression,
    };
    if let Some(value) = string_literal_value(expression) {
        return Some(name(value, RegisteredNameSource::Literal));
    }
    if let Expr::Invocation(invocation) = expression.without_parentheses() {
        return try_get_nameof_argument(invocation).map(|value| name(value, RegisteredNameSource::NameOf));
    }
    match model.bind_backing_member(expression, ctx)? {
        BackingMember::Field(field) if field.field.modifiers.is_const() => field
            .declarator
            .initializer
            .as_ref()
            .and_then(string_literal_value)
            .map(|value| name(value, RegisteredNameSource::Constant)),
        _ => None,
    }
}

/// `typeof(T)` in `argument`, resolved.
pub(crate) fn typeof_reference<'c>(
    model: &SemanticModel<'c>,
    argument: &'c Argument,
    ctx: &BindingContext<'c>,
) -> Option<TypeReference<'c>> {
    let syntax = try_get_typeof_argument(&argument.expression)?;
    Some(model.type_reference(syntax, ctx.tree, ctx.containing_type))
}

struct Resolver<'m, 'c> {
    model: &'m SemanticModel<'c>,
    token: &'m CancellationToken,
    guard: ResolutionGuard,
}

impl<'m, 'c> Resolver<'m, 'c> {
    fn new(model: &'m SemanticModel<'c>, token: &'m CancellationToken) -> Self {
        Self {
            model,
            token,
            guard: ResolutionGuard::new(),
        }
    }

    fn resolve_member(&mut self, member: BackingMember<'c>) -> Result<Option<PropertyRegistration<'c>>, Cancelled> {
        self.token.check()?;
        let ty = self.model.backing_type(member);
        if !ty.is_known(KnownType::DependencyProperty) && !ty.is_known(KnownType::DependencyPropertyKey) {
            return Ok(None);
        }
        if !self.guard.enter(member) {
            return Ok(None);
        }
        let resolved = match value_expression(self.model, member) {
            Some((expr, ctx)) => self.resolve_value(member, expr, &ctx, true),
            None => Ok(None),
        };
        self.guard.leave();

        Ok(resolved?.map(|mut registration| {
            registration.backing = member;
            if registration.key_field.is_none() && registration.kind.is_read_only() {
                registration.key_field = Some(member);
            }
            registration
        }))
    }

    fn resolve_value(
        &mut self,
        member: BackingMember<'c>,
        expr: &'c Expr,
        ctx: &BindingContext<'c>,
        unwrap_methods: bool,
    ) -> Result<Option<PropertyRegistration<'c>>, Cancelled> {
        self.token.check()?;
        match expr.without_casts_and_parentheses() {
            Expr::Invocation(invocation) => self.resolve_invocation(member, invocation, ctx, unwrap_methods),
            Expr::MemberAccess(access) if access.name.text == "DependencyProperty" => {
                match self.model.bind_backing_member(&access.expression, ctx) {
                    Some(key) if self.model.backing_type(key).is_known(KnownType::DependencyPropertyKey) => {
                        self.resolve_member(key)
                    }
                    _ => Ok(None),
                }
            }
            alias @ (Expr::Name(_) | Expr::MemberAccess(_)) => {
                match self.model.bind_backing_member(alias, ctx) {
                    Some(other) => self.resolve_member(other),
                    None => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }

    fn resolve_invocation(
        &mut self,
        member: BackingMember<'c>,
        invocation: &'c Invocation,
        ctx: &BindingContext<'c>,
        unwrap_methods: bool,
    ) -> Result<Option<PropertyRegistration<'c>>, Cancelled> {
        match self.model.bind_invocation(invocation, ctx) {
            Some(InvokedMethod::Framework(method)) => {
                if let Some(kind) = RegistrationKind::from_register(method) {
                    return Ok(self.read_register(member, invocation, ctx, kind));
                }
                match method {
                    KnownMethod::AddOwner => self.resolve_add_owner(member, invocation, ctx),
                    KnownMethod::OverrideMetadata => self.resolve_override(member, invocation, ctx),
                    _ => Ok(None),
                }
            }
            Some(InvokedMethod::Source(method)) if unwrap_methods => {
                let Some(returned) = method.decl.returned_expression() else {
                    return Ok(None);
                };
                trace!(method = method.name(), "unwrapping factory method");
                let method_ctx = self.model.method_context(method);
                self.resolve_value(member, returned, &method_ctx, false)
            }
            _ => Ok(None),
        }
    }

    fn read_register(
        &self,
        member: BackingMember<'c>,
        invocation: &'c Invocation,
        ctx: &BindingContext<'c>,
        kind: RegistrationKind,
    ) -> Option<PropertyRegistration<'c>> {
        let metadata_name = if kind.is_attached() {
            "defaultMetadata"
        } else {
            "typeMetadata"
        };
        let name = invocation.argument(0, "name")?;
        let value_type = typeof_reference(self.model, invocation.argument(1, "propertyType")?, ctx)?;
        let owner_type = typeof_reference(self.model, invocation.argument(2, "ownerType")?, ctx)?;
        let metadata = non_null_argument(invocation.argument(3, metadata_name))
            .and_then(|a| parse_metadata(self.model, &a.expression, ctx));
        let validate_value_callback = non_null_argument(invocation.argument(4, "validateValueCallback"))
            .map(|a| &a.expression);
        Some(PropertyRegistration {
            backing: member,
            kind,
            registered_as: kind,
            registered_name: registered_name(self.model, &name.expression, ctx),
            value_type,
            owner_type,
            metadata,
            validate_value_callback,
            invocation,
            key_field: None,
        })
    }

    /// `X.AddOwner(typeof(T)[, metadata])`.
    fn resolve_add_owner(
        &mut self,
        member: BackingMember<'c>,
        invocation: &'c Invocation,
        ctx: &BindingContext<'c>,
    ) -> Result<Option<PropertyRegistration<'c>>, Cancelled> {
        let Some(owner) = invocation
            .argument(0, "ownerType")
            .and_then(|a| typeof_reference(self.model, a, ctx))
        else {
            return Ok(None);
        };
        let Some(receiver) = invocation.receiver() else {
            return Ok(None);
        };
        let Some(mut registration) = self.resolve_value(member, receiver, ctx, false)? else {
            trace!("AddOwner receiver did not resolve");
            return Ok(None);
        };
        registration.kind = RegistrationKind::AddOwner;
        registration.owner_type = owner;
        registration.invocation = invocation;
        if let Some(argument) = non_null_argument(invocation.argument(1, "typeMetadata")) {
            registration.metadata = parse_metadata(self.model, &argument.expression, ctx);
        }
        Ok(Some(registration))
    }

    /// `X.OverrideMetadata(typeof(T), metadata[, key])`.
    fn resolve_override(
        &mut self,
        member: BackingMember<'c>,
        invocation: &'c Invocation,
        ctx: &BindingContext<'c>,
    ) -> Result<Option<PropertyRegistration<'c>>, Cancelled> {
        let Some(owner) = invocation
            .argument(0, "forType")
            .and_then(|a| typeof_reference(self.model, a, ctx))
        else {
            return Ok(None);
        };
        let Some(receiver) = invocation.receiver() else {
            return Ok(None);
        };
        let Some(mut registration) = self.resolve_value(member, receiver, ctx, false)? else {
            return Ok(None);
        };
        registration.kind = RegistrationKind::Override;
        registration.owner_type = owner;
        registration.invocation = invocation;
        registration.metadata = non_null_argument(invocation.argument(1, "typeMetadata"))
            .and_then(|a| parse_metadata(self.model, &a.expression, ctx));
        Ok(Some(registration))
    }
}

/// Resolve the registration behind `member`.
///
/// Returns `Ok(None)` if the member is not typed `DependencyProperty` or
/// `DependencyPropertyKey`, or if its value is not a recognized shape.
pub fn resolve_registration<'c>(
    model: &SemanticModel<'c>,
    member: BackingMember<'c>,
    token: &CancellationToken,
) -> Result<Option<PropertyRegistration<'c>>, Cancelled> {
    let registration = Resolver::new(model, token).resolve_member(member)?;
    debug!(
        member = member.name(),
        found = registration.is_some(),
        kind = registration.as_ref().map(|r| r.kind.as_str()),
        "resolved registration"
    );
    Ok(registration)
}

/// Resolve an `X.OverrideMetadata(typeof(T), metadata)` call found as a
/// statement. The descriptor's backing member is `X`.
pub fn resolve_override_metadata<'c>(
    model: &SemanticModel<'c>,
    invocation: &'c Invocation,
    ctx: &BindingContext<'c>,
    token: &CancellationToken,
) -> Result<Option<PropertyRegistration<'c>>, Cancelled> {
    token.check()?;
    if model.bind_invocation(invocation, ctx) != Some(InvokedMethod::Framework(KnownMethod::OverrideMetadata)) {
        return Ok(None);
    }
    let Some(receiver) = invocation.receiver() else {
        return Ok(None);
    };
    let Some(property) = model.bind_backing_member(receiver, ctx) else {
        return Ok(None);
    };
    Resolver::new(model, token).resolve_override(property, invocation, ctx)
}

/// Every `OverrideMetadata` call in the static constructors of `ty`, with
/// the context to bind it in.
pub fn override_metadata_calls<'c>(
    model: &SemanticModel<'c>,
    ty: TypeId,
) -> Vec<(&'c Invocation, BindingContext<'c>)> {
    let symbol = model.type_symbol(ty);
    let mut calls = Vec::new();
    for (tree, ctor) in symbol.static_constructors() {
        let Some(body) = &ctor.body else {
            continue;
        };
        let ctx = model.constructor_context(tree, ty, ctor);
        for invocation in InvocationCollector::collect_in_body(body) {
            if invocation.receiver().is_some()
                && invocation_name(invocation) == Some("OverrideMetadata")
            {
                calls.push((invocation, ctx.clone()));
            }
        }
    }
    calls
}
