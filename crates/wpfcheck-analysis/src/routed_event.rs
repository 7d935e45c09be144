//! Routed-event registration resolution.
//!
//! The routed-event counterpart of [`crate::registration`]: a `RoutedEvent`
//! member initialized with `EventManager.RegisterRoutedEvent(name, strategy,
//! typeof(Handler), typeof(Owner))`, with `X.AddOwner(typeof(Owner))`, or
//! with a reference to another routed-event member.

use tracing::debug;
use wpfcheck_core::{CancellationToken, Cancelled};
use wpfcheck_syntax::nodes::{Expr, Invocation};

use crate::binding::{BindingContext, InvokedMethod};
use crate::known::{KnownMethod, KnownType};
use crate::registration::{registered_name, typeof_reference, value_expression, RegisteredName, ResolutionGuard};
use crate::semantic::{SemanticModel, TypeReference};
use crate::symbols::BackingMember;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutedEventKind {
    Register,
    AddOwner,
}

/// A resolved routed-event registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedEventRegistration<'c> {
    pub backing: BackingMember<'c>,
    pub kind: RoutedEventKind,
    pub registered_name: Option<RegisteredName<'c>>,
    /// The `RoutingStrategy` argument as written.
    pub routing_strategy: &'c Expr,
    pub handler_type: TypeReference<'c>,
    pub owner_type: TypeReference<'c>,
    pub invocation: &'c Invocation,
}

impl<'c> RoutedEventRegistration<'c> {
    pub fn name(&self) -> Option<&str> {
        self.registered_name.as_ref().map(|n| n.value.as_str())
    }
}

struct EventResolver<'m, 'c> {
    model: &'m SemanticModel<'c>,
    token: &'m CancellationToken,
    guard: ResolutionGuard,
}

impl<'m, 'c> EventResolver<'m, 'c> {
    fn resolve_member(
        &mut self,
        member: BackingMember<'c>,
    ) -> Result<Option<RoutedEventRegistration<'c>>, Cancelled> {
        self.token.check()?;
        if !self.model.backing_type(member).is_known(KnownType::RoutedEvent) || !self.guard.enter(member) {
            return Ok(None);
        }
        let resolved = match value_expression(self.model, member) {
            Some((expr, ctx)) => self.resolve_value(member, expr, &ctx),
            None => Ok(None),
        };
        self.guard.leave();
        Ok(resolved?.map(|registration| RoutedEventRegistration {
            backing: member,
            ..registration
        }))
    }

    fn resolve_value(
        &mut self,
        member: BackingMember<'c>,
        expr: &'c Expr,
        ctx: &BindingContext<'c>,
    ) -> Result<Option<RoutedEventRegistration<'c>>, Cancelled> {
        self.token.check()?;
        match expr.without_casts_and_parentheses() {
            Expr::Invocation(invocation) => match self.model.bind_invocation(invocation, ctx) {
                Some(InvokedMethod::Framework(KnownMethod::RegisterRoutedEvent)) => {
                    Ok(self.read_register(member, invocation, ctx))
                }
                Some(InvokedMethod::Framework(KnownMethod::RoutedEventAddOwner)) => {
                    self.resolve_add_owner(member, invocation, ctx)
                }
                _ => Ok(None),
            },
            alias @ (Expr::Name(_) | Expr::MemberAccess(_)) => match self.model.bind_backing_member(alias, ctx) {
                Some(other) => self.resolve_member(other),
                None => Ok(None),
            },
            _ => Ok(None),
        }
    }

    fn read_register(
        &self,
        member: BackingMember<'c>,
        invocation: &'c Invocation,
        ctx: &BindingContext<'c>,
    ) -> Option<RoutedEventRegistration<'c>> {
        let name = invocation.argument(0, "name")?;
        let routing_strategy = invocation.argument(1, "routingStrategy")?;
        let handler_type = typeof_reference(self.model, invocation.argument(2, "handlerType")?, ctx)?;
        let owner_type = typeof_reference(self.model, invocation.argument(3, "ownerType")?, ctx)?;
        Some(RoutedEventRegistration {
            backing: member,
            kind: RoutedEventKind::Register,
            registered_name: registered_name(self.model, &name.expression, ctx),
            routing_strategy: &routing_strategy.expression,
            handler_type,
            owner_type,
            invocation,
        })
    }

    fn resolve_add_owner(
        &mut self,
        member: BackingMember<'c>,
        invocation: &'c Invocation,
        ctx: &BindingContext<'c>,
    ) -> Result<Option<RoutedEventRegistration<'c>>, Cancelled> {
        let Some(owner) = invocation
            .argument(0, "ownerType")
            .and_then(|a| typeof_reference(self.model, a, ctx))
        else {
            return Ok(None);
        };
        let Some(receiver) = invocation.receiver() else {
            return Ok(None);
        };
        let Some(mut registration) = self.resolve_value(member, receiver, ctx)? else {
            return Ok(None);
        };
        registration.kind = RoutedEventKind::AddOwner;
        registration.owner_type = owner;
        registration.invocation = invocation;
        Ok(Some(registration))
    }
}

/// Resolve the routed-event registration behind `member`.
pub fn resolve_routed_event<'c>(
    model: &SemanticModel<'c>,
    member: BackingMember<'c>,
    token: &CancellationToken,
) -> Result<Option<RoutedEventRegistration<'c>>, Cancelled> {
    let mut resolver = EventResolver {
        model,
        token,
        guard: ResolutionGuard::new(),
    };
    let registration = resolver.resolve_member(member)?;
    debug!(member = member.name(), found = registration.is_some(), "resolved routed event");
    Ok(registration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{Compilation, ResolvedType};

    const SOURCE: &str = r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    public static readonly RoutedEvent TapEvent = EventManager.RegisterRoutedEvent(
        nameof(Tap), RoutingStrategy.Bubble, typeof(RoutedEventHandler), typeof(FooControl));

    public static readonly RoutedEvent PressEvent;

    public static readonly RoutedEvent LoopEvent = LoopEvent.AddOwner(typeof(FooControl));

    static FooControl()
    {
        PressEvent = EventManager.RegisterRoutedEvent("Press", RoutingStrategy.Direct, typeof(RoutedEventHandler), typeof(FooControl));
    }

    public event RoutedEventHandler Tap
    {
        add { AddHandler(TapEvent, value); }
        remove { RemoveHandler(TapEvent, value); }
    }
}

public class BarControl : Control
{
    public static readonly RoutedEvent TapEvent = FooControl.TapEvent.AddOwner(typeof(BarControl));

    public static readonly RoutedEvent ClickEvent = System.Windows.Controls.Primitives.ButtonBase.ClickEvent.AddOwner(typeof(BarControl));
}
"#;

    fn resolve<'c>(model: &SemanticModel<'c>, type_name: &str, member: &str) -> Option<RoutedEventRegistration<'c>> {
        let member = model
            .find_type(type_name)
            .and_then(|t| t.backing_members().find(|m| m.name() == member))
            .expect("member");
        resolve_routed_event(model, member, &CancellationToken::new()).expect("resolve")
    }

    #[test]
    fn test_register_routed_event() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let tap = resolve(&model, "FooControl", "TapEvent").expect("registration");
        assert_eq!(tap.kind, RoutedEventKind::Register);
        assert_eq!(tap.name(), Some("Tap"));
        assert_eq!(tap.backing.name(), "TapEvent");
        assert_eq!(tap.handler_type.resolved, ResolvedType::Known(KnownType::RoutedEventHandler));
        assert_eq!(tap.owner_type.resolved.as_source(), model.find_type("FooControl").map(|t| t.id));
    }

    #[test]
    fn test_static_constructor_assignment() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let press = resolve(&model, "FooControl", "PressEvent").expect("registration");
        assert_eq!(press.name(), Some("Press"));
    }

    #[test]
    fn test_add_owner() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let tap = resolve(&model, "BarControl", "TapEvent").expect("registration");
        assert_eq!(tap.kind, RoutedEventKind::AddOwner);
        assert_eq!(tap.name(), Some("Tap"));
        assert_eq!(tap.backing.containing_type(), model.find_type("BarControl").map(|t| t.id).expect("BarControl"));
        assert_eq!(tap.owner_type.resolved.as_source(), model.find_type("BarControl").map(|t| t.id));
    }

    #[test]
    fn test_self_reference_and_framework_receiver() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        assert!(resolve(&model, "FooControl", "LoopEvent").is_none());
        assert!(resolve(&model, "BarControl", "ClickEvent").is_none());
    }
}
