//! CLR accessor resolution.
//!
//! A dependency property is usually exposed through a CLR wrapper: an
//! instance property whose getter calls `GetValue` and whose setter calls
//! `SetValue`, or for attached properties a pair of static `GetX`/`SetX`
//! methods. This module walks both sides, binds the property argument of
//! each call, and classifies the pair:
//!
//! - `Consistent`: both sides use the same backing member, the setter uses
//!   the registration's key, or only one side has a body.
//! - `Inconsistent`: the sides use different members.
//! - `Ambiguous`: a side references more than one property.
//! - `ReadOnlySetterBypassesKey`: a read-only property is set through its
//!   public `DependencyProperty` instead of the key.
//! - `NotFound`: no side calls the framework, or one side does and the
//!   other has a body that does not.

use tracing::debug;
use wpfcheck_core::{CancellationToken, Cancelled};
use wpfcheck_syntax::naming::{
    getter_method_name, registered_name_from_accessor_method, setter_method_name,
};
use wpfcheck_syntax::nodes::{AccessorDecl, Body};

use crate::binding::BindingContext;
use crate::registration::{resolve_registration, PropertyRegistration};
use crate::semantic::SemanticModel;
use crate::symbols::{BackingMember, MethodSymbol, PropertySymbol};
use crate::walker::{
    match_getter, match_setter, AccessorMatch, GetterWalker, MatchState, SetterWalker, WalkerPool,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorSide {
    Getter,
    Setter,
}

/// The property argument of an accessor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyReference<'c> {
    Member(BackingMember<'c>),
    /// An argument that does not bind to a source member, by its text.
    Unresolved(String),
}

impl<'c> PropertyReference<'c> {
    pub fn as_member(&self) -> Option<BackingMember<'c>> {
        match self {
            PropertyReference::Member(member) => Some(*member),
            PropertyReference::Unresolved(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyState<'c> {
    Consistent,
    Inconsistent {
        getter: PropertyReference<'c>,
        setter: PropertyReference<'c>,
    },
    Ambiguous {
        side: AccessorSide,
    },
    ReadOnlySetterBypassesKey {
        property: BackingMember<'c>,
        key: BackingMember<'c>,
    },
    NotFound,
}

/// Both sides of a CLR wrapper and what they agree on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClrAccessorResolution<'c> {
    /// Registration of the property the wrapper uses, getter side first.
    pub registration: Option<PropertyRegistration<'c>>,
    pub state: ConsistencyState<'c>,
    pub getter: AccessorMatch,
    pub setter: AccessorMatch,
    pub getter_property: Option<PropertyReference<'c>>,
    pub setter_property: Option<PropertyReference<'c>>,
}

impl<'c> ClrAccessorResolution<'c> {
    /// True if either side's property argument is `member`.
    pub fn references(&self, member: BackingMember<'c>) -> bool {
        [&self.getter_property, &self.setter_property]
            .into_iter()
            .flatten()
            .any(|r| r.as_member() == Some(member))
    }
}

/// The static `GetX`/`SetX` pair of an attached property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttachedAccessors<'c> {
    pub getter: Option<MethodSymbol<'c>>,
    pub setter: Option<MethodSymbol<'c>>,
}

// ============================================================================
// Walker sources
// ============================================================================

/// Where accessor bodies get their walkers from.
pub(crate) trait BodyMatcher {
    fn match_getter<'c>(
        &self,
        model: &SemanticModel<'c>,
        body: &Body,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<AccessorMatch, Cancelled>;

    fn match_setter<'c>(
        &self,
        model: &SemanticModel<'c>,
        body: &Body,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<AccessorMatch, Cancelled>;
}

/// A new walker per body.
pub(crate) struct FreshWalkers;

impl BodyMatcher for FreshWalkers {
    fn match_getter<'c>(
        &self,
        model: &SemanticModel<'c>,
        body: &Body,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<AccessorMatch, Cancelled> {
        match_getter(model, body, ctx, token)
    }

    fn match_setter<'c>(
        &self,
        model: &SemanticModel<'c>,
        body: &Body,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<AccessorMatch, Cancelled> {
        match_setter(model, body, ctx, token)
    }
}

/// Walkers checked out of a session's pools.
pub(crate) struct PooledWalkers<'p> {
    pub(crate) getters: &'p WalkerPool<GetterWalker>,
    pub(crate) setters: &'p WalkerPool<SetterWalker>,
}

impl BodyMatcher for PooledWalkers<'_> {
    fn match_getter<'c>(
        &self,
        model: &SemanticModel<'c>,
        body: &Body,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<AccessorMatch, Cancelled> {
        self.getters.get().walk(model, body, ctx, token)
    }

    fn match_setter<'c>(
        &self,
        model: &SemanticModel<'c>,
        body: &Body,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<AccessorMatch, Cancelled> {
        self.setters.get().walk(model, body, ctx, token)
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// One accessor body to walk, with the context to bind it in.
struct Side<'c> {
    body: Option<&'c Body>,
    ctx: BindingContext<'c>,
}

impl<'c> Side<'c> {
    fn walk(
        &self,
        matcher: &impl BodyMatcher,
        model: &SemanticModel<'c>,
        side: AccessorSide,
        token: &CancellationToken,
    ) -> Result<(AccessorMatch, Option<PropertyReference<'c>>), Cancelled> {
        let Some(body) = self.body else {
            return Ok((AccessorMatch::not_found(), None));
        };
        let found = match side {
            AccessorSide::Getter => matcher.match_getter(model, body, &self.ctx, token)?,
            AccessorSide::Setter => matcher.match_setter(model, body, &self.ctx, token)?,
        };
        let reference = found.call.as_ref().map(|call| {
            let expr = &call.property.expression;
            match model.bind_backing_member(expr, &self.ctx) {
                Some(member) => PropertyReference::Member(member),
                None => PropertyReference::Unresolved(
                    model.tree(self.ctx.tree).text(expr.span()).trim().to_string(),
                ),
            }
        });
        Ok((found, reference))
    }
}

fn resolve_sides<'c>(
    model: &SemanticModel<'c>,
    getter: Option<Side<'c>>,
    setter: Option<Side<'c>>,
    matcher: &impl BodyMatcher,
    token: &CancellationToken,
) -> Result<ClrAccessorResolution<'c>, Cancelled> {
    let getter_has_body = getter.as_ref().is_some_and(|s| s.body.is_some());
    let setter_has_body = setter.as_ref().is_some_and(|s| s.body.is_some());
    let (getter, getter_property) = match getter {
        Some(side) => side.walk(matcher, model, AccessorSide::Getter, token)?,
        None => (AccessorMatch::not_found(), None),
    };
    let (setter, setter_property) = match setter {
        Some(side) => side.walk(matcher, model, AccessorSide::Setter, token)?,
        None => (AccessorMatch::not_found(), None),
    };

    let member = getter_property
        .as_ref()
        .and_then(PropertyReference::as_member)
        .or_else(|| setter_property.as_ref().and_then(PropertyReference::as_member));
    let registration = match member {
        Some(member) => resolve_registration(model, member, token)?,
        None => None,
    };

    let state = consistency(
        [&getter, &setter],
        [getter_has_body, setter_has_body],
        getter_property.as_ref(),
        setter_property.as_ref(),
        registration.as_ref(),
    );
    Ok(ClrAccessorResolution {
        registration,
        state,
        getter,
        setter,
        getter_property,
        setter_property,
    })
}

/// `has_body` tells an accessor that is absent (or bodiless) from one whose
/// body was walked without a match; only the former may be left out.
fn consistency<'c>(
    [getter, setter]: [&AccessorMatch; 2],
    [getter_has_body, setter_has_body]: [bool; 2],
    getter_property: Option<&PropertyReference<'c>>,
    setter_property: Option<&PropertyReference<'c>>,
    registration: Option<&PropertyRegistration<'c>>,
) -> ConsistencyState<'c> {
    if getter.state == MatchState::Ambiguous {
        return ConsistencyState::Ambiguous {
            side: AccessorSide::Getter,
        };
    }
    if setter.state == MatchState::Ambiguous {
        return ConsistencyState::Ambiguous {
            side: AccessorSide::Setter,
        };
    }

    let key = registration.and_then(|r| r.key_field);
    let uses_key = |reference: &PropertyReference<'c>| key.is_some() && reference.as_member() == key;

    match (getter_property, setter_property) {
        (None, None) => ConsistencyState::NotFound,
        (Some(getter), Some(setter)) if getter != setter && !uses_key(setter) => {
            ConsistencyState::Inconsistent {
                getter: getter.clone(),
                setter: setter.clone(),
            }
        }
        (getter, Some(setter)) => match (registration, key, setter.as_member()) {
            (Some(registration), Some(key), Some(property))
                if registration.is_read_only() && property != key =>
            {
                ConsistencyState::ReadOnlySetterBypassesKey { property, key }
            }
            _ if getter.is_none() && getter_has_body => ConsistencyState::NotFound,
            _ => ConsistencyState::Consistent,
        },
        (Some(_), None) if setter_has_body => ConsistencyState::NotFound,
        (Some(_), None) => ConsistencyState::Consistent,
    }
}

pub(crate) fn resolve_clr_property_with<'c>(
    model: &SemanticModel<'c>,
    property: PropertySymbol<'c>,
    matcher: &impl BodyMatcher,
    token: &CancellationToken,
) -> Result<ClrAccessorResolution<'c>, Cancelled> {
    token.check()?;
    let ctx = model.property_context(property);
    let side = |accessor: Option<&'c AccessorDecl>| {
        accessor.map(|a| Side {
            body: a.body.as_ref(),
            ctx: ctx.clone(),
        })
    };
    let resolution = resolve_sides(
        model,
        side(property.decl.getter()),
        side(property.decl.setter()),
        matcher,
        token,
    )?;
    debug!(property = property.name(), state = ?resolution.state, "resolved CLR property");
    Ok(resolution)
}

pub(crate) fn resolve_attached_accessors_with<'c>(
    model: &SemanticModel<'c>,
    getter: Option<MethodSymbol<'c>>,
    setter: Option<MethodSymbol<'c>>,
    matcher: &impl BodyMatcher,
    token: &CancellationToken,
) -> Result<ClrAccessorResolution<'c>, Cancelled> {
    token.check()?;
    let side = |method: MethodSymbol<'c>| Side {
        body: method.decl.body.as_ref(),
        ctx: model.method_context(method),
    };
    let resolution = resolve_sides(model, getter.map(side), setter.map(side), matcher, token)?;
    debug!(
        getter = getter.map(|m| m.name()),
        setter = setter.map(|m| m.name()),
        state = ?resolution.state,
        "resolved attached accessors"
    );
    Ok(resolution)
}

/// A static method in `method`'s type with `name` and `arity` parameters.
fn static_method<'c>(
    model: &SemanticModel<'c>,
    method: MethodSymbol<'c>,
    name: &str,
    arity: usize,
) -> Option<MethodSymbol<'c>> {
    model
        .type_symbol(method.containing_type)
        .methods()
        .find(|m| m.is_static() && m.name() == name && m.decl.parameters.len() == arity)
}

pub(crate) fn resolve_accessor_method_with<'c>(
    model: &SemanticModel<'c>,
    method: MethodSymbol<'c>,
    matcher: &impl BodyMatcher,
    token: &CancellationToken,
) -> Result<Option<ClrAccessorResolution<'c>>, Cancelled> {
    let Some(name) = registered_name_from_accessor_method(method.name()) else {
        return Ok(None);
    };
    if !method.is_static() {
        return Ok(None);
    }
    let arity = method.decl.parameters.len();
    let (getter, setter) = if method.name().starts_with("Get") && arity == 1 {
        (Some(method), static_method(model, method, &setter_method_name(name), 2))
    } else if method.name().starts_with("Set") && arity == 2 {
        (static_method(model, method, &getter_method_name(name), 1), Some(method))
    } else {
        return Ok(None);
    };
    resolve_attached_accessors_with(model, getter, setter, matcher, token).map(Some)
}

fn registration_members<'c>(registration: &PropertyRegistration<'c>) -> Vec<BackingMember<'c>> {
    let mut members = vec![registration.backing];
    members.extend(registration.key_field.filter(|k| *k != registration.backing));
    members
}

pub(crate) fn find_clr_property_with<'c>(
    model: &SemanticModel<'c>,
    registration: &PropertyRegistration<'c>,
    matcher: &impl BodyMatcher,
    token: &CancellationToken,
) -> Result<Option<PropertySymbol<'c>>, Cancelled> {
    let ty = model.type_symbol(registration.backing.containing_type());
    let instance = || ty.properties().filter(|p| !p.decl.modifiers.is_static());

    if let Some(name) = registration.name() {
        if let Some(property) = instance().find(|p| p.name() == name) {
            return Ok(Some(property));
        }
    }
    let members = registration_members(registration);
    for property in instance() {
        let resolution = resolve_clr_property_with(model, property, matcher, token)?;
        if members.iter().any(|m| resolution.references(*m)) {
            return Ok(Some(property));
        }
    }
    Ok(None)
}

pub(crate) fn find_attached_accessors_with<'c>(
    model: &SemanticModel<'c>,
    registration: &PropertyRegistration<'c>,
    matcher: &impl BodyMatcher,
    token: &CancellationToken,
) -> Result<AttachedAccessors<'c>, Cancelled> {
    let ty = model.type_symbol(registration.backing.containing_type());
    let statics = |arity: usize| {
        ty.methods()
            .filter(move |m| m.is_static() && m.decl.parameters.len() == arity)
    };
    let members = registration_members(registration);

    let mut found = AttachedAccessors::default();
    if let Some(name) = registration.name() {
        let getter = getter_method_name(name);
        let setter = setter_method_name(name);
        found.getter = statics(1).find(|m| m.name() == getter);
        found.setter = statics(2).find(|m| m.name() == setter);
    }
    if found.getter.is_none() {
        for method in statics(1) {
            let resolution = resolve_attached_accessors_with(model, Some(method), None, matcher, token)?;
            if members.iter().any(|m| resolution.references(*m)) {
                found.getter = Some(method);
                break;
            }
        }
    }
    if found.setter.is_none() {
        for method in statics(2) {
            let resolution = resolve_attached_accessors_with(model, None, Some(method), matcher, token)?;
            if members.iter().any(|m| resolution.references(*m)) {
                found.setter = Some(method);
                break;
            }
        }
    }
    Ok(found)
}

/// Resolve the getter and setter of an instance CLR property.
pub fn resolve_clr_property<'c>(
    model: &SemanticModel<'c>,
    property: PropertySymbol<'c>,
    token: &CancellationToken,
) -> Result<ClrAccessorResolution<'c>, Cancelled> {
    resolve_clr_property_with(model, property, &FreshWalkers, token)
}

/// Resolve a static `GetX`/`SetX` pair; either side may be missing.
pub fn resolve_attached_accessors<'c>(
    model: &SemanticModel<'c>,
    getter: Option<MethodSymbol<'c>>,
    setter: Option<MethodSymbol<'c>>,
    token: &CancellationToken,
) -> Result<ClrAccessorResolution<'c>, Cancelled> {
    resolve_attached_accessors_with(model, getter, setter, &FreshWalkers, token)
}

/// Resolve `method` together with its `GetX`/`SetX` counterpart.
///
/// Returns `Ok(None)` unless `method` is a static `GetX(o)` or `SetX(o, v)`.
pub fn resolve_accessor_method<'c>(
    model: &SemanticModel<'c>,
    method: MethodSymbol<'c>,
    token: &CancellationToken,
) -> Result<Option<ClrAccessorResolution<'c>>, Cancelled> {
    resolve_accessor_method_with(model, method, &FreshWalkers, token)
}

/// The instance property wrapping `registration`: the property with the
/// registered name, else the first whose accessors use the backing member
/// or its key.
pub fn find_clr_property<'c>(
    model: &SemanticModel<'c>,
    registration: &PropertyRegistration<'c>,
    token: &CancellationToken,
) -> Result<Option<PropertySymbol<'c>>, Cancelled> {
    find_clr_property_with(model, registration, &FreshWalkers, token)
}

/// The static accessors of an attached `registration`, by name first and
/// then by what their bodies reference.
pub fn find_attached_accessors<'c>(
    model: &SemanticModel<'c>,
    registration: &PropertyRegistration<'c>,
    token: &CancellationToken,
) -> Result<AttachedAccessors<'c>, Cancelled> {
    find_attached_accessors_with(model, registration, &FreshWalkers, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::Compilation;

    const SOURCE: &str = r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.Register(
        nameof(Bar), typeof(int), typeof(FooControl));

    public static readonly DependencyProperty BazProperty = DependencyProperty.Register(
        nameof(Baz), typeof(int), typeof(FooControl));

    private static readonly DependencyPropertyKey CountPropertyKey = DependencyProperty.RegisterReadOnly(
        nameof(Count), typeof(int), typeof(FooControl), new PropertyMetadata(0));

    public static readonly DependencyProperty CountProperty = CountPropertyKey.DependencyProperty;

    public int Bar
    {
        get => (int)GetValue(BarProperty);
        set => SetValue(BarProperty, value);
    }

    public int Baz
    {
        get => (int)GetValue(BarProperty);
        set => SetValue(BazProperty, value);
    }

    public int Count
    {
        get => (int)GetValue(CountProperty);
        private set => SetValue(CountPropertyKey, value);
    }

    public int Getter => (int)GetValue(BazProperty);

    public int Renamed
    {
        get => (int)GetValue(BarProperty) + (int)GetValue(BazProperty);
    }
}

public class Bypass : Control
{
    private static readonly DependencyPropertyKey LengthPropertyKey = DependencyProperty.RegisterReadOnly(
        "Length", typeof(int), typeof(Bypass), new PropertyMetadata(0));

    public static readonly DependencyProperty LengthProperty = LengthPropertyKey.DependencyProperty;

    public int Length
    {
        get => (int)GetValue(LengthProperty);
        set => SetValue(LengthProperty, value);
    }
}

public class Shadow : Control
{
    public static readonly DependencyProperty QuxProperty = DependencyProperty.Register(
        nameof(Qux), typeof(int), typeof(Shadow));

    private int _cached;

    public int Qux
    {
        get => (int)GetValue(QuxProperty);
        set => SetValue(QuxProperty, value);
    }

    public int Cached
    {
        get => (int)GetValue(QuxProperty);
        set { _cached = value; }
    }

    public int Stored
    {
        get { return _cached; }
        set => SetValue(QuxProperty, value);
    }

    private int GetValue(int a, int b) => a + b;
}

public static class Attached
{
    public static readonly DependencyProperty IsOnProperty = DependencyProperty.RegisterAttached(
        "IsOn", typeof(bool), typeof(Attached), new PropertyMetadata(false));

    public static void SetIsOn(DependencyObject element, bool value) => element.SetValue(IsOnProperty, value);

    public static bool GetIsOn(DependencyObject element) => (bool)element.GetValue(IsOnProperty);

    public static bool ReadIsOn(UIElement element) => (bool)element.GetValue(IsOnProperty);
}
"#;

    fn state<'c>(model: &SemanticModel<'c>, type_name: &str, property: &str) -> ConsistencyState<'c> {
        let property = model
            .find_type(type_name)
            .and_then(|t| t.properties().find(|p| p.name() == property))
            .expect("property");
        resolve_clr_property(model, property, &CancellationToken::new())
            .expect("resolve")
            .state
    }

    #[test]
    fn test_consistent_pair() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        assert_eq!(state(&model, "FooControl", "Bar"), ConsistencyState::Consistent);
    }

    #[test]
    fn test_getter_only_is_consistent() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        assert_eq!(state(&model, "FooControl", "Getter"), ConsistencyState::Consistent);
    }

    #[test]
    fn test_setter_through_key_is_consistent() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        assert_eq!(state(&model, "FooControl", "Count"), ConsistencyState::Consistent);
    }

    #[test]
    fn test_inconsistent_pair() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let ConsistencyState::Inconsistent { getter, setter } = state(&model, "FooControl", "Baz") else {
            panic!("expected inconsistent");
        };
        assert_eq!(getter.as_member().map(|m| m.name()), Some("BarProperty"));
        assert_eq!(setter.as_member().map(|m| m.name()), Some("BazProperty"));
    }

    #[test]
    fn test_ambiguous_getter() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        assert_eq!(
            state(&model, "FooControl", "Renamed"),
            ConsistencyState::Ambiguous {
                side: AccessorSide::Getter
            }
        );
    }

    #[test]
    fn test_read_only_setter_bypasses_key() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let ConsistencyState::ReadOnlySetterBypassesKey { property, key } = state(&model, "Bypass", "Length") else {
            panic!("expected bypass");
        };
        assert_eq!(property.name(), "LengthProperty");
        assert_eq!(key.name(), "LengthPropertyKey");
    }

    #[test]
    fn test_inherited_get_value_beside_unrelated_overload() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let qux = model
            .find_type("Shadow")
            .and_then(|t| t.properties().find(|p| p.name() == "Qux"))
            .expect("Qux");
        let resolution = resolve_clr_property(&model, qux, &CancellationToken::new()).expect("resolve");
        assert!(resolution.getter.is_success());
        assert!(resolution.setter.is_success());
        assert_eq!(resolution.state, ConsistencyState::Consistent);
    }

    #[test]
    fn test_unmatched_accessor_body_is_not_found() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        assert_eq!(state(&model, "Shadow", "Cached"), ConsistencyState::NotFound);
        assert_eq!(state(&model, "Shadow", "Stored"), ConsistencyState::NotFound);
    }

    #[test]
    fn test_registration_of_wrapper() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let count = model
            .find_type("FooControl")
            .and_then(|t| t.properties().find(|p| p.name() == "Count"))
            .expect("Count");
        let resolution = resolve_clr_property(&model, count, &CancellationToken::new()).expect("resolve");
        let registration = resolution.registration.expect("registration");
        assert_eq!(registration.name(), Some("Count"));
        assert!(registration.is_read_only());
        assert_eq!(registration.key_field.map(|k| k.name()), Some("CountPropertyKey"));
    }

    mod attached {
        use super::*;

        #[test]
        fn test_counterpart_from_setter() {
            let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
            let model = SemanticModel::new(&compilation);
            let ty = model.find_type("Attached").expect("Attached");
            let set = ty.methods().find(|m| m.name() == "SetIsOn").expect("SetIsOn");
            let resolution = resolve_accessor_method(&model, set, &CancellationToken::new())
                .expect("resolve")
                .expect("accessor pair");
            assert_eq!(resolution.state, ConsistencyState::Consistent);
            assert!(resolution.getter.is_success());
            assert!(resolution.setter.is_success());
            assert_eq!(resolution.registration.map(|r| r.kind.as_str()), Some("RegisterAttached"));
        }

        #[test]
        fn test_non_accessor_method() {
            let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
            let model = SemanticModel::new(&compilation);
            let ty = model.find_type("Attached").expect("Attached");
            let read = ty.methods().find(|m| m.name() == "ReadIsOn").expect("ReadIsOn");
            assert!(resolve_accessor_method(&model, read, &CancellationToken::new())
                .expect("resolve")
                .is_none());
        }

        #[test]
        fn test_find_attached_accessors_by_name() {
            let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
            let model = SemanticModel::new(&compilation);
            let token = CancellationToken::new();
            let ty = model.find_type("Attached").expect("Attached");
            let member = ty.backing_members().next().expect("IsOnProperty");
            let registration = resolve_registration(&model, member, &token)
                .expect("resolve")
                .expect("registration");
            let found = find_attached_accessors(&model, &registration, &token).expect("find");
            assert_eq!(found.getter.map(|m| m.name()), Some("GetIsOn"));
            assert_eq!(found.setter.map(|m| m.name()), Some("SetIsOn"));
        }
    }

    mod find {
        use super::*;

        #[test]
        fn test_find_by_name_then_by_scan() {
            let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
            let model = SemanticModel::new(&compilation);
            let token = CancellationToken::new();
            let ty = model.find_type("FooControl").expect("FooControl");
            let bar = ty.backing_members().find(|m| m.name() == "BarProperty").expect("BarProperty");
            let registration = resolve_registration(&model, bar, &token)
                .expect("resolve")
                .expect("registration");
            let property = find_clr_property(&model, &registration, &token).expect("find");
            assert_eq!(property.map(|p| p.name()), Some("Bar"));
        }

        #[test]
        fn test_find_through_key() {
            let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
            let model = SemanticModel::new(&compilation);
            let token = CancellationToken::new();
            let ty = model.find_type("FooControl").expect("FooControl");
            let key = ty
                .backing_members()
                .find(|m| m.name() == "CountPropertyKey")
                .expect("CountPropertyKey");
            let registration = resolve_registration(&model, key, &token)
                .expect("resolve")
                .expect("registration");
            assert!(registration.is_key());
            let property = find_clr_property(&model, &registration, &token).expect("find");
            assert_eq!(property.map(|p| p.name()), Some("Count"));
        }
    }
}
