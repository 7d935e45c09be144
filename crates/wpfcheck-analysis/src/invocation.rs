//! Recognizers for `GetValue`, `SetValue`, and `SetCurrentValue` calls.
//!
//! The `is_*` predicates are syntactic: name and argument count only. The
//! `try_get_*` functions also bind the call, so a user method that happens
//! to be called `GetValue` does not match, and neither does a call on a
//! receiver that is not a `DependencyObject`.

use wpfcheck_syntax::helpers::invocation_name;
use wpfcheck_syntax::nodes::{Argument, Invocation};

use crate::binding::{BindingContext, InvokedMethod};
use crate::known::{KnownMethod, KnownType};
use crate::semantic::{ResolvedType, SemanticModel};

fn is_call(invocation: &Invocation, name: &str, arity: usize) -> bool {
    invocation_name(invocation) == Some(name) && invocation.arguments.len() == arity
}

/// `GetValue(x)` with exactly one argument.
pub fn is_get_value_call(invocation: &Invocation) -> bool {
    is_call(invocation, "GetValue", 1)
}

/// `SetValue(x, v)` with exactly two arguments.
pub fn is_set_value_call(invocation: &Invocation) -> bool {
    is_call(invocation, "SetValue", 2)
}

/// `SetCurrentValue(x, v)` with exactly two arguments.
pub fn is_set_current_value_call(invocation: &Invocation) -> bool {
    is_call(invocation, "SetCurrentValue", 2)
}

/// The property and value arguments of a setter call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetValueArguments<'i> {
    pub property: &'i Argument,
    pub value: &'i Argument,
}

fn binds_to<'c>(
    invocation: &Invocation,
    model: &SemanticModel<'c>,
    ctx: &BindingContext<'c>,
    method: KnownMethod,
) -> bool {
    model.bind_invocation(invocation, ctx) == Some(InvokedMethod::Framework(method))
}

/// True unless the argument is known to have a type other than one of
/// `accepted`.
fn argument_may_be<'c>(
    argument: &Argument,
    model: &SemanticModel<'c>,
    ctx: &BindingContext<'c>,
    accepted: &[KnownType],
) -> bool {
    match model.type_of(&argument.expression, ctx) {
        None | Some(ResolvedType::Unknown(_)) => true,
        Some(ResolvedType::Known(known)) => accepted.contains(&known),
        Some(ResolvedType::Source(_) | ResolvedType::Predefined(_)) => false,
    }
}

/// The property argument of `DependencyObject.GetValue(DependencyProperty)`.
pub fn try_get_get_value_argument<'i, 'c>(
    invocation: &'i Invocation,
    model: &SemanticModel<'c>,
    ctx: &BindingContext<'c>,
) -> Option<&'i Argument> {
    if !is_get_value_call(invocation) || !binds_to(invocation, model, ctx, KnownMethod::GetValue) {
        return None;
    }
    let property = invocation.argument(0, "dp")?;
    argument_may_be(property, model, ctx, &[KnownType::DependencyProperty]).then_some(property)
}

/// The arguments of `DependencyObject.SetValue`, whose first argument may
/// be a `DependencyProperty` or a `DependencyPropertyKey`.
pub fn try_get_set_value_arguments<'i, 'c>(
    invocation: &'i Invocation,
    model: &SemanticModel<'c>,
    ctx: &BindingContext<'c>,
) -> Option<SetValueArguments<'i>> {
    if !is_set_value_call(invocation) || !binds_to(invocation, model, ctx, KnownMethod::SetValue) {
        return None;
    }
    let property = invocation.argument(0, "dp").or_else(|| invocation.argument(0, "key"))?;
    let value = invocation.argument(1, "value")?;
    argument_may_be(
        property,
        model,
        ctx,
        &[KnownType::DependencyProperty, KnownType::DependencyPropertyKey],
    )
    .then_some(SetValueArguments { property, value })
}

/// The arguments of `DependencyObject.SetCurrentValue(DependencyProperty, object)`.
pub fn try_get_set_current_value_arguments<'i, 'c>(
    invocation: &'i Invocation,
    model: &SemanticModel<'c>,
    ctx: &BindingContext<'c>,
) -> Option<SetValueArguments<'i>> {
    if !is_set_current_value_call(invocation)
        || !binds_to(invocation, model, ctx, KnownMethod::SetCurrentValue)
    {
        return None;
    }
    let property = invocation.argument(0, "dp")?;
    let value = invocation.argument(1, "value")?;
    argument_may_be(property, model, ctx, &[KnownType::DependencyProperty])
        .then_some(SetValueArguments { property, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::Compilation;
    use wpfcheck_syntax::nodes::{Body, Expr, Stmt};

    const SOURCE: &str = r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.Register(
        nameof(Bar), typeof(int), typeof(FooControl));

    private static readonly DependencyPropertyKey BazPropertyKey = DependencyProperty.RegisterReadOnly(
        "Baz", typeof(int), typeof(FooControl), new PropertyMetadata(0));

    public int Bar { get; set; }

    public void Calls(object notAProperty, Brush brush)
    {
        GetValue(BarProperty);
        this.SetValue(BarProperty, 1);
        base.SetValue(BazPropertyKey, 1);
        SetCurrentValue(BarProperty, 2);
        SetCurrentValue(BazPropertyKey, 2);
        GetValue(notAProperty);
        GetValue(Bar);
        brush.GetValue(BarProperty);
        GetValue(BarProperty, 1);
        GetValue(dp: BarProperty);
    }
}

public class NotADependencyObject
{
    public void Calls(FooControl control)
    {
        GetValue(FooControl.BarProperty);
        control.GetValue(FooControl.BarProperty);
    }

    private object GetValue(DependencyProperty property) => null;
}
"#;

    fn calls<'c>(model: &SemanticModel<'c>, type_name: &str) -> (BindingContext<'c>, Vec<&'c Invocation>) {
        let ty = model.find_type(type_name).expect("type");
        let method = ty.methods().find(|m| m.name() == "Calls").expect("Calls");
        let ctx = model.method_context(method);
        let Some(Body::Block(block)) = &method.decl.body else {
            panic!("block body");
        };
        let invocations = block
            .statements
            .iter()
            .filter_map(|s| match s {
                Stmt::Expression(e) => e.expression.as_invocation(),
                _ => None,
            })
            .collect();
        (ctx, invocations)
    }

    fn property_name(argument: &Argument) -> Option<&str> {
        match &argument.expression {
            Expr::Name(name) => Some(&name.identifier.text),
            Expr::MemberAccess(access) => Some(&access.name.text),
            _ => None,
        }
    }

    #[test]
    fn test_syntactic_predicates() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let (_, calls) = calls(&model, "FooControl");
        assert!(is_get_value_call(calls[0]));
        assert!(is_set_value_call(calls[1]));
        assert!(is_set_current_value_call(calls[3]));
        assert!(!is_get_value_call(calls[8]));
        assert!(!is_set_value_call(calls[0]));
    }

    #[test]
    fn test_get_value_binding() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let (ctx, calls) = calls(&model, "FooControl");
        let get = |i: usize| try_get_get_value_argument(calls[i], &model, &ctx);
        assert_eq!(get(0).and_then(property_name), Some("BarProperty"));
        // object-typed parameter
        assert!(get(5).is_none());
        // int-typed CLR property
        assert!(get(6).is_none());
        // receiver of unknown type
        assert!(get(7).is_none());
        assert_eq!(get(9).and_then(property_name), Some("BarProperty"));
    }

    #[test]
    fn test_set_value_binding() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let (ctx, calls) = calls(&model, "FooControl");
        let set = try_get_set_value_arguments(calls[1], &model, &ctx).expect("this.SetValue");
        assert_eq!(property_name(set.property), Some("BarProperty"));
        let key = try_get_set_value_arguments(calls[2], &model, &ctx).expect("base.SetValue");
        assert_eq!(property_name(key.property), Some("BazPropertyKey"));

        assert!(try_get_set_current_value_arguments(calls[3], &model, &ctx).is_some());
        assert!(try_get_set_current_value_arguments(calls[4], &model, &ctx).is_none());
        assert!(try_get_set_value_arguments(calls[3], &model, &ctx).is_none());
    }

    #[test]
    fn test_non_dependency_object_receivers() {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let (ctx, calls) = calls(&model, "NotADependencyObject");
        // shadowed by the private GetValue
        assert!(try_get_get_value_argument(calls[0], &model, &ctx).is_none());
        assert!(try_get_get_value_argument(calls[1], &model, &ctx).is_some());
    }
}
