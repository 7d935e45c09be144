//! Property metadata parsing.
//!
//! Reads `new PropertyMetadata(...)`, `new UIPropertyMetadata(...)`,
//! `new FrameworkPropertyMetadata(...)`, and target-typed `new(...)` into
//! their parts. Positional arguments are disambiguated by shape: the
//! single-callback constructors take a callback first, and the
//! `FrameworkPropertyMetadata` constructors may take
//! `FrameworkPropertyMetadataOptions` flags after the default value.

use wpfcheck_syntax::helpers::is_null_literal;
use wpfcheck_syntax::nodes::{Argument, Expr, ObjectCreation, SyntaxChild};

use crate::binding::{Binding, BindingContext};
use crate::known::KnownType;
use crate::semantic::{ResolvedType, SemanticModel, TypeReference};
use crate::symbols::MemberSymbol;

/// Parsed metadata object creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMetadataInfo<'c> {
    /// The whole `new ...(...)` expression.
    pub expression: &'c Expr,
    /// `None` for target-typed `new(...)`.
    pub metadata_type: Option<TypeReference<'c>>,
    pub default_value: Option<&'c Expr>,
    pub property_changed_callback: Option<&'c Expr>,
    pub coerce_value_callback: Option<&'c Expr>,
    pub flags: Option<&'c Expr>,
}

const FLAGS_TYPE: &str = "FrameworkPropertyMetadataOptions";

/// Parse a metadata expression. Returns `None` for `null` and for
/// anything that is not a metadata object creation.
pub fn parse_metadata<'c>(
    model: &SemanticModel<'c>,
    expression: &'c Expr,
    ctx: &BindingContext<'c>,
) -> Option<PropertyMetadataInfo<'c>> {
    let Expr::ObjectCreation(creation) = expression.without_casts_and_parentheses() else {
        return None;
    };
    let metadata_type = creation
        .ty
        .as_ref()
        .map(|ty| model.type_reference(ty, ctx.tree, ctx.containing_type));
    if let Some(ty) = &metadata_type {
        if !is_metadata_type(model, &ty.resolved) {
            return None;
        }
    }

    let mut info = PropertyMetadataInfo {
        expression,
        metadata_type,
        default_value: None,
        property_changed_callback: None,
        coerce_value_callback: None,
        flags: None,
    };
    read_positional(model, ctx, creation, &mut info);
    read_named(creation, &mut info);
    read_initializer(creation, &mut info);
    Some(info)
}

fn is_metadata_type(model: &SemanticModel<'_>, ty: &ResolvedType) -> bool {
    match ty {
        ResolvedType::Unknown(text) => text.ends_with("Metadata"),
        other => model.derives_from(other, KnownType::PropertyMetadata),
    }
}

fn read_positional<'c>(
    model: &SemanticModel<'c>,
    ctx: &BindingContext<'c>,
    creation: &'c ObjectCreation,
    info: &mut PropertyMetadataInfo<'c>,
) {
    let positional: Vec<&'c Expr> = creation
        .arguments
        .iter()
        .take_while(|a| a.name.is_none())
        .map(|a| &a.expression)
        .collect();
    let Some(first) = positional.first().copied() else {
        return;
    };

    if is_callback(model, ctx, first) {
        // (PropertyChangedCallback[, CoerceValueCallback])
        info.property_changed_callback = Some(first);
        info.coerce_value_callback = positional.get(1).copied();
        return;
    }

    info.default_value = Some(first);
    let mut rest = positional[1..].iter().copied().peekable();
    if let Some(next) = rest.peek() {
        if is_flags(model, ctx, next) {
            info.flags = rest.next();
        }
    }
    info.property_changed_callback = rest.next();
    info.coerce_value_callback = rest.next();
}

fn read_named<'c>(creation: &'c ObjectCreation, info: &mut PropertyMetadataInfo<'c>) {
    for argument in &creation.arguments {
        let Some(name) = &argument.name else {
            continue;
        };
        assign(info, &name.text, &argument.expression);
    }
}

/// `new PropertyMetadata { DefaultValue = ..., PropertyChangedCallback = ... }`.
fn read_initializer<'c>(creation: &'c ObjectCreation, info: &mut PropertyMetadataInfo<'c>) {
    let Some(Expr::Other(initializer)) = creation.initializer.as_deref() else {
        return;
    };
    for child in &initializer.children {
        if let SyntaxChild::Expr(Expr::Assignment(assignment)) = child {
            if let Expr::Name(target) = assignment.left.as_ref() {
                assign(info, &target.identifier.text, &assignment.right);
            }
        }
    }
}

fn assign<'c>(info: &mut PropertyMetadataInfo<'c>, name: &str, value: &'c Expr) {
    match name {
        "defaultValue" | "DefaultValue" => info.default_value = Some(value),
        "propertyChangedCallback" | "PropertyChangedCallback" => {
            info.property_changed_callback = Some(value);
        }
        "coerceValueCallback" | "CoerceValueCallback" => info.coerce_value_callback = Some(value),
        "flags" => info.flags = Some(value),
        _ => {}
    }
}

/// A delegate creation, lambda, or method group.
fn is_callback<'c>(model: &SemanticModel<'c>, ctx: &BindingContext<'c>, expr: &Expr) -> bool {
    match expr.without_parentheses() {
        Expr::Lambda(_) => true,
        Expr::ObjectCreation(creation) => creation.ty.as_ref().is_some_and(|ty| {
            matches!(
                ty.simple_name(),
                "PropertyChangedCallback" | "CoerceValueCallback"
            )
        }),
        Expr::Name(_) | Expr::MemberAccess(_) => matches!(
            model.bind_expr(expr, ctx),
            Binding::Member(MemberSymbol::Method(_))
        ),
        _ => false,
    }
}

/// An expression of type `FrameworkPropertyMetadataOptions`.
fn is_flags<'c>(model: &SemanticModel<'c>, ctx: &BindingContext<'c>, expr: &Expr) -> bool {
    mentions_flags_type(expr)
        || model
            .type_of(expr, ctx)
            .is_some_and(|ty| ty.is_known(KnownType::FrameworkPropertyMetadataOptions))
}

fn mentions_flags_type(expr: &Expr) -> bool {
    match expr {
        Expr::Name(name) => name.identifier.text == FLAGS_TYPE,
        Expr::MemberAccess(access) => {
            access.name.text == FLAGS_TYPE || mentions_flags_type(&access.expression)
        }
        Expr::Cast(cast) => cast.ty.simple_name() == FLAGS_TYPE,
        Expr::Parenthesized(p) => mentions_flags_type(&p.expression),
        // `A | B` and other combinations
        Expr::Other(other) => other.children.iter().any(|child| match child {
            SyntaxChild::Expr(e) => mentions_flags_type(e),
            SyntaxChild::Stmt(_) => false,
        }),
        _ => false,
    }
}

/// `argument`, unless it is the `null` literal.
pub(crate) fn non_null_argument<'a>(argument: Option<&'a Argument>) -> Option<&'a Argument> {
    argument.filter(|a| !is_null_literal(&a.expression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::Compilation;

    const SOURCE: &str = r#"
using System.Windows;

public class Foo : FrameworkElement
{
    public static readonly DependencyProperty A = DependencyProperty.Register(
        "A", typeof(int), typeof(Foo), new PropertyMetadata(1));
    public static readonly DependencyProperty B = DependencyProperty.Register(
        "B", typeof(int), typeof(Foo), new PropertyMetadata(OnChanged));
    public static readonly DependencyProperty C = DependencyProperty.Register(
        "C", typeof(int), typeof(Foo), new PropertyMetadata(default(int), OnChanged, Coerce));
    public static readonly DependencyProperty D = DependencyProperty.Register(
        "D", typeof(int), typeof(Foo),
        new FrameworkPropertyMetadata(
            0,
            FrameworkPropertyMetadataOptions.AffectsMeasure | FrameworkPropertyMetadataOptions.AffectsRender,
            OnChanged));
    public static readonly DependencyProperty E = DependencyProperty.Register(
        "E", typeof(int), typeof(Foo), new FrameworkPropertyMetadata(propertyChangedCallback: OnChanged, defaultValue: 2));
    public static readonly DependencyProperty F = DependencyProperty.Register(
        "F", typeof(int), typeof(Foo), new(3, new PropertyChangedCallback(OnChanged)));
    public static readonly DependencyProperty G = DependencyProperty.Register(
        "G", typeof(int), typeof(Foo), new PropertyMetadata { DefaultValue = 4 });
    public static readonly DependencyProperty H = DependencyProperty.Register(
        "H", typeof(int), typeof(Foo), new PropertyMetadata((d, e) => { }));
    public static readonly DependencyProperty I = DependencyProperty.Register(
        "I", typeof(int), typeof(Foo), new Thickness(1));

    private static void OnChanged(DependencyObject d, DependencyPropertyChangedEventArgs e) { }
    private static object Coerce(DependencyObject d, object value) => value;
}
"#;

    fn text<'c>(compilation: &'c Compilation, expr: Option<&Expr>) -> Option<&'c str> {
        expr.map(|e| compilation.trees()[0].text(e.span()))
    }

    fn with_metadata(name: &str, check: impl FnOnce(&Compilation, Option<PropertyMetadataInfo<'_>>)) {
        let compilation = Compilation::from_sources([("Foo.cs", SOURCE)]).expect("parse");
        let model = SemanticModel::new(&compilation);
        let foo = model.find_type("Foo").expect("Foo");
        let member = foo.backing_members().find(|m| m.name() == name).expect("member");
        let ctx = model.member_context(member);
        let register = member.initializer().and_then(Expr::as_invocation).expect("Register");
        let info = parse_metadata(&model, &register.arguments[3].expression, &ctx);
        check(&compilation, info);
    }

    #[test]
    fn test_default_value_only() {
        with_metadata("A", |c, info| {
            let info = info.expect("metadata");
            assert_eq!(text(c, info.default_value), Some("1"));
            assert!(info.property_changed_callback.is_none());
            assert!(info.metadata_type.is_some_and(|t| t.resolved.is_known(KnownType::PropertyMetadata)));
        });
    }

    #[test]
    fn test_callback_first() {
        with_metadata("B", |c, info| {
            let info = info.expect("metadata");
            assert!(info.default_value.is_none());
            assert_eq!(text(c, info.property_changed_callback), Some("OnChanged"));
        });
    }

    #[test]
    fn test_default_changed_coerce() {
        with_metadata("C", |c, info| {
            let info = info.expect("metadata");
            assert_eq!(text(c, info.default_value), Some("default(int)"));
            assert_eq!(text(c, info.property_changed_callback), Some("OnChanged"));
            assert_eq!(text(c, info.coerce_value_callback), Some("Coerce"));
        });
    }

    #[test]
    fn test_framework_flags() {
        with_metadata("D", |c, info| {
            let info = info.expect("metadata");
            assert_eq!(text(c, info.default_value), Some("0"));
            assert!(text(c, info.flags).is_some_and(|f| f.contains("AffectsRender")));
            assert_eq!(text(c, info.property_changed_callback), Some("OnChanged"));
        });
    }

    #[test]
    fn test_named_arguments() {
        with_metadata("E", |c, info| {
            let info = info.expect("metadata");
            assert_eq!(text(c, info.default_value), Some("2"));
            assert_eq!(text(c, info.property_changed_callback), Some("OnChanged"));
        });
    }

    #[test]
    fn test_target_typed() {
        with_metadata("F", |c, info| {
            let info = info.expect("metadata");
            assert!(info.metadata_type.is_none());
            assert_eq!(text(c, info.default_value), Some("3"));
            assert_eq!(
                text(c, info.property_changed_callback),
                Some("new PropertyChangedCallback(OnChanged)")
            );
        });
    }

    #[test]
    fn test_object_initializer() {
        with_metadata("G", |c, info| {
            let info = info.expect("metadata");
            assert_eq!(text(c, info.default_value), Some("4"));
        });
    }

    #[test]
    fn test_lambda_callback() {
        with_metadata("H", |_, info| {
            let info = info.expect("metadata");
            assert!(info.default_value.is_none());
            assert!(info.property_changed_callback.is_some());
        });
    }

    #[test]
    fn test_not_metadata() {
        with_metadata("I", |_, info| assert!(info.is_none()));
    }
}
