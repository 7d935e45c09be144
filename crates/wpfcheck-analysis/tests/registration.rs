//! Integration tests: registration resolution over multi-file compilations.

use wpfcheck_analysis::{
    resolve_registration, AnalysisSession, BackingMember, Compilation, KnownType, PropertyRegistration,
    RegisteredNameSource, RegistrationKind, ResolvedType, SemanticModel,
};
use wpfcheck_core::CancellationToken;
use wpfcheck_syntax::nodes::Expr;

fn compile(sources: &[(&str, &str)]) -> Compilation {
    Compilation::from_sources(sources.iter().copied()).expect("parse")
}

fn member<'c>(model: &SemanticModel<'c>, type_name: &str, name: &str) -> BackingMember<'c> {
    model
        .find_type(type_name)
        .and_then(|t| t.backing_members().find(|m| m.name() == name))
        .unwrap_or_else(|| panic!("{type_name}.{name}"))
}

fn resolve<'c>(model: &SemanticModel<'c>, type_name: &str, name: &str) -> Option<PropertyRegistration<'c>> {
    resolve_registration(model, member(model, type_name, name), &CancellationToken::new()).expect("not cancelled")
}

fn source_type(model: &SemanticModel<'_>, name: &str) -> ResolvedType {
    ResolvedType::Source(model.find_type(name).expect("type").id)
}

fn int() -> ResolvedType {
    ResolvedType::Predefined("int".to_string())
}

const FOO: &str = r#"
using System.Windows;
using System.Windows.Controls;

namespace Demo
{
    public class Foo : Control
    {
        public static readonly DependencyProperty BarProperty = DependencyProperty.Register(
            nameof(Bar),
            typeof(int),
            typeof(Foo),
            new FrameworkPropertyMetadata(
                1,
                FrameworkPropertyMetadataOptions.AffectsMeasure,
                OnBarChanged,
                CoerceBar),
            ValidateBar);

        public int Bar
        {
            get => (int)GetValue(BarProperty);
            set => SetValue(BarProperty, value);
        }

        private static void OnBarChanged(DependencyObject d, DependencyPropertyChangedEventArgs e) { }

        private static object CoerceBar(DependencyObject d, object value) => value;

        private static bool ValidateBar(object value) => true;
    }
}
"#;

const BAZ: &str = r#"
using System.Windows;
using System.Windows.Controls;

namespace Demo
{
    public class Baz : Control
    {
        public static readonly DependencyProperty BarProperty = Foo.BarProperty.AddOwner(typeof(Baz));

        public static readonly DependencyProperty OtherBarProperty = Foo.BarProperty.AddOwner(
            typeof(Baz),
            new PropertyMetadata(2));

        public int Bar
        {
            get => (int)GetValue(BarProperty);
            set => SetValue(BarProperty, value);
        }
    }
}
"#;

mod add_owner {
    use super::*;

    #[test]
    fn test_round_trip_keeps_name_and_value_type() {
        let compilation = compile(&[("Foo.cs", FOO), ("Baz.cs", BAZ)]);
        let model = SemanticModel::new(&compilation);
        let original = resolve(&model, "Demo.Foo", "BarProperty").expect("Foo.BarProperty");
        let added = resolve(&model, "Demo.Baz", "BarProperty").expect("Baz.BarProperty");

        assert_eq!(original.kind, RegistrationKind::Register);
        assert_eq!(added.kind, RegistrationKind::AddOwner);
        assert_eq!(added.registered_as, RegistrationKind::Register);
        assert_eq!(added.name(), original.name());
        assert_eq!(added.value_type.resolved, original.value_type.resolved);
        assert_eq!(added.value_type.resolved, int());
        assert_eq!(original.owner_type.resolved, source_type(&model, "Demo.Foo"));
        assert_eq!(added.owner_type.resolved, source_type(&model, "Demo.Baz"));
        assert_eq!(added.backing, member(&model, "Demo.Baz", "BarProperty"));
    }

    #[test]
    fn test_attached_round_trip_keeps_name_and_value_type() {
        let compilation = compile(&[(
            "Layout.cs",
            r#"
using System.Windows;
using System.Windows.Controls;

namespace Layout
{
    public static class Foo
    {
        public static readonly DependencyProperty BarProperty = DependencyProperty.RegisterAttached(
            "Bar", typeof(int), typeof(Foo), new PropertyMetadata(0));

        public static int GetBar(DependencyObject element) => (int)element.GetValue(BarProperty);

        public static void SetBar(DependencyObject element, int value) => element.SetValue(BarProperty, value);
    }

    public class Baz : Control
    {
        public static readonly DependencyProperty BarProperty = Foo.BarProperty.AddOwner(typeof(Baz));
    }
}
"#,
        )]);
        let model = SemanticModel::new(&compilation);
        let original = resolve(&model, "Layout.Foo", "BarProperty").expect("Foo.BarProperty");
        let added = resolve(&model, "Layout.Baz", "BarProperty").expect("Baz.BarProperty");

        assert_eq!(original.kind, RegistrationKind::RegisterAttached);
        assert_eq!(added.kind, RegistrationKind::AddOwner);
        assert_eq!(added.registered_as, RegistrationKind::RegisterAttached);
        assert!(added.is_attached());
        assert_eq!(added.name(), Some("Bar"));
        assert_eq!(added.value_type.resolved, int());
        assert_eq!(added.owner_type.resolved, source_type(&model, "Layout.Baz"));
        assert_eq!(added.backing, member(&model, "Layout.Baz", "BarProperty"));
    }

    #[test]
    fn test_metadata_kept_or_replaced() {
        let compilation = compile(&[("Foo.cs", FOO), ("Baz.cs", BAZ)]);
        let model = SemanticModel::new(&compilation);
        let kept = resolve(&model, "Demo.Baz", "BarProperty").expect("BarProperty");
        let replaced = resolve(&model, "Demo.Baz", "OtherBarProperty").expect("OtherBarProperty");

        let kept = kept.metadata.expect("inner metadata");
        assert_eq!(
            kept.metadata_type.map(|t| t.resolved),
            Some(ResolvedType::Known(KnownType::FrameworkPropertyMetadata))
        );
        assert!(kept.flags.is_some());

        let replaced = replaced.metadata.expect("new metadata");
        assert_eq!(
            replaced.metadata_type.map(|t| t.resolved),
            Some(ResolvedType::Known(KnownType::PropertyMetadata))
        );
        assert!(replaced.flags.is_none());
    }

    #[test]
    fn test_framework_receiver_is_not_resolved() {
        let compilation = compile(&[(
            "Text.cs",
            r#"
using System.Windows;
using System.Windows.Documents;

public class Text : FrameworkElement
{
    public static readonly DependencyProperty FontSizeProperty = TextElement.FontSizeProperty.AddOwner(typeof(Text));
}
"#,
        )]);
        let model = SemanticModel::new(&compilation);
        assert!(resolve(&model, "Text", "FontSizeProperty").is_none());
    }
}

mod register_arguments {
    use super::*;

    #[test]
    fn test_metadata_and_validation_callback() {
        let compilation = compile(&[("Foo.cs", FOO)]);
        let model = SemanticModel::new(&compilation);
        let bar = resolve(&model, "Demo.Foo", "BarProperty").expect("BarProperty");

        let name = bar.registered_name.as_ref().expect("name");
        assert_eq!(name.value, "Bar");
        assert_eq!(name.source, RegisteredNameSource::NameOf);

        let metadata = bar.metadata.as_ref().expect("metadata");
        assert!(metadata.default_value.is_some());
        assert!(matches!(metadata.property_changed_callback, Some(Expr::Name(_))));
        assert!(matches!(metadata.coerce_value_callback, Some(Expr::Name(_))));
        assert!(matches!(bar.validate_value_callback, Some(Expr::Name(_))));
        assert_eq!(bar.invocation.arguments.len(), 5);
    }

    #[test]
    fn test_name_sources_and_call_styles() {
        let compilation = compile(&[(
            "Styles.cs",
            r#"
using System.Windows;
using static System.Windows.DependencyProperty;

public class Styles : FrameworkElement
{
    private const string QuxName = "Qux";

    public static readonly DependencyProperty LiteralProperty = DependencyProperty.Register(
        "Literal", typeof(string), typeof(Styles));

    public static readonly DependencyProperty VerbatimProperty = System.Windows.DependencyProperty.Register(
        @"Verbatim", typeof(double), typeof(Styles), new PropertyMetadata(1.0));

    public static readonly DependencyProperty QuxProperty = Register(
        QuxName, typeof(bool), typeof(Styles));

    public static readonly DependencyProperty NamedProperty = DependencyProperty.Register(
        ownerType: typeof(Styles), propertyType: typeof(int), name: "Named");

    public static DependencyProperty ExpressionProperty { get; } = DependencyProperty.Register(
        "Expression", typeof(int), typeof(Styles));
}
"#,
        )]);
        let model = SemanticModel::new(&compilation);
        let name_of = |member: &str| {
            resolve(&model, "Styles", member)
                .and_then(|r| r.registered_name)
                .map(|n| (n.value, n.source))
        };
        assert_eq!(
            name_of("LiteralProperty"),
            Some(("Literal".to_string(), RegisteredNameSource::Literal))
        );
        assert_eq!(
            name_of("VerbatimProperty"),
            Some(("Verbatim".to_string(), RegisteredNameSource::Literal))
        );
        assert_eq!(
            name_of("QuxProperty"),
            Some(("Qux".to_string(), RegisteredNameSource::Constant))
        );
        assert_eq!(
            name_of("NamedProperty"),
            Some(("Named".to_string(), RegisteredNameSource::Literal))
        );
        assert_eq!(
            name_of("ExpressionProperty"),
            Some(("Expression".to_string(), RegisteredNameSource::Literal))
        );

        let verbatim = resolve(&model, "Styles", "VerbatimProperty").expect("VerbatimProperty");
        assert_eq!(verbatim.value_type.resolved, ResolvedType::Predefined("double".to_string()));
        let named = resolve(&model, "Styles", "NamedProperty").expect("NamedProperty");
        assert_eq!(named.owner_type.resolved, source_type(&model, "Styles"));
    }

    #[test]
    fn test_missing_typeof_is_not_applicable() {
        let compilation = compile(&[(
            "Loose.cs",
            r#"
using System.Windows;

public class Loose : FrameworkElement
{
    private static readonly System.Type IntType = typeof(int);

    public static readonly DependencyProperty BarProperty = DependencyProperty.Register(
        "Bar", IntType, typeof(Loose));

    public static readonly object NotAProperty = DependencyProperty.Register(
        "Baz", typeof(int), typeof(Loose));
}
"#,
        )]);
        let model = SemanticModel::new(&compilation);
        assert!(resolve(&model, "Loose", "BarProperty").is_none());
        assert!(resolve(&model, "Loose", "NotAProperty").is_none());
    }
}

mod read_only {
    use super::*;

    const SOURCE: &str = r#"
using System.Windows;
using System.Windows.Controls;

public class Gauge : Control
{
    private static readonly DependencyPropertyKey LevelPropertyKey = DependencyProperty.RegisterReadOnly(
        nameof(Level), typeof(int), typeof(Gauge), new PropertyMetadata(0));

    public static readonly DependencyProperty LevelProperty = LevelPropertyKey.DependencyProperty;

    public int Level
    {
        get => (int)GetValue(LevelProperty);
        private set => SetValue(LevelPropertyKey, value);
    }
}

public class Meter : Control
{
    public static readonly DependencyProperty LevelProperty = Gauge.LevelProperty.AddOwner(typeof(Meter));
}
"#;

    #[test]
    fn test_key_member_links_to_itself() {
        let compilation = compile(&[("Gauge.cs", SOURCE)]);
        let model = SemanticModel::new(&compilation);
        let key = resolve(&model, "Gauge", "LevelPropertyKey").expect("key");
        assert_eq!(key.kind, RegistrationKind::RegisterReadOnly);
        assert!(key.is_read_only());
        assert!(key.is_key());
        assert_eq!(key.key_field, Some(member(&model, "Gauge", "LevelPropertyKey")));
    }

    #[test]
    fn test_public_property_links_to_key() {
        let compilation = compile(&[("Gauge.cs", SOURCE)]);
        let model = SemanticModel::new(&compilation);
        let public = resolve(&model, "Gauge", "LevelProperty").expect("LevelProperty");
        assert_eq!(public.backing, member(&model, "Gauge", "LevelProperty"));
        assert_eq!(public.key_field, Some(member(&model, "Gauge", "LevelPropertyKey")));
        assert!(!public.is_key());
        assert_eq!(public.name(), Some("Level"));
    }

    #[test]
    fn test_add_owner_propagates_key() {
        let compilation = compile(&[("Gauge.cs", SOURCE)]);
        let model = SemanticModel::new(&compilation);
        let meter = resolve(&model, "Meter", "LevelProperty").expect("Meter.LevelProperty");
        assert_eq!(meter.kind, RegistrationKind::AddOwner);
        assert!(meter.is_read_only());
        assert_eq!(meter.key_field, Some(member(&model, "Gauge", "LevelPropertyKey")));
    }

    #[test]
    fn test_read_only_kinds_always_carry_key() {
        let compilation = compile(&[("Gauge.cs", SOURCE)]);
        let session = AnalysisSession::new(&compilation);
        let registrations = session.registrations(&CancellationToken::new()).expect("registrations");
        assert_eq!(registrations.len(), 3);
        for registration in registrations.iter().filter(|r| r.is_read_only()) {
            assert!(registration.key_field.is_some(), "{:?}", registration.backing.name());
        }
    }
}

mod values {
    use super::*;

    #[test]
    fn test_static_constructor_assignment_across_partials() {
        let compilation = compile(&[
            (
                "Panel.Properties.cs",
                r#"
using System.Windows;
using System.Windows.Controls;

public partial class Stack : Panel
{
    public static readonly DependencyProperty GapProperty;
}
"#,
            ),
            (
                "Panel.cs",
                r#"
using System.Windows;

public partial class Stack
{
    static Stack()
    {
        GapProperty = DependencyProperty.Register("Gap", typeof(double), typeof(Stack));
    }
}
"#,
            ),
        ]);
        let model = SemanticModel::new(&compilation);
        let gap = resolve(&model, "Stack", "GapProperty").expect("GapProperty");
        assert_eq!(gap.name(), Some("Gap"));
        assert_eq!(gap.invocation.arguments.len(), 3);
    }

    #[test]
    fn test_factory_method_is_unwrapped_once() {
        let compilation = compile(&[(
            "Factory.cs",
            r#"
using System.Windows;

public class Factory : FrameworkElement
{
    public static readonly DependencyProperty DirectProperty = Create("Direct");

    public static readonly DependencyProperty NestedProperty = CreateNested();

    private static DependencyProperty Create(string name) =>
        DependencyProperty.Register(name, typeof(int), typeof(Factory));

    private static DependencyProperty CreateNested()
    {
        return Create("Nested");
    }
}
"#,
        )]);
        let model = SemanticModel::new(&compilation);
        let direct = resolve(&model, "Factory", "DirectProperty").expect("DirectProperty");
        assert_eq!(direct.kind, RegistrationKind::Register);
        // The name is a parameter of the factory, so it is not recognized.
        assert!(direct.registered_name.is_none());
        assert!(resolve(&model, "Factory", "NestedProperty").is_none());
    }
}

mod termination {
    use super::*;

    const SOURCE: &str = r#"
using System.Windows;

public class Cycle : FrameworkElement
{
    public static readonly DependencyProperty AProperty = BProperty.AddOwner(typeof(Cycle));
    public static readonly DependencyProperty BProperty = AProperty.AddOwner(typeof(Cycle));
    public static readonly DependencyProperty SelfProperty = SelfProperty;
    public static readonly DependencyProperty LoopProperty = CreateDefault();
    public static readonly DependencyProperty DefaultProperty = DependencyProperty.Register(
        "Default", typeof(int), typeof(Cycle), new PropertyMetadata(CreateValue()));

    private static DependencyProperty CreateDefault() => CreateDefault();

    private static int CreateValue() => CreateValue();
}
"#;

    #[test]
    fn test_cyclic_add_owner() {
        let compilation = compile(&[("Cycle.cs", SOURCE)]);
        let model = SemanticModel::new(&compilation);
        assert!(resolve(&model, "Cycle", "AProperty").is_none());
        assert!(resolve(&model, "Cycle", "BProperty").is_none());
        assert!(resolve(&model, "Cycle", "SelfProperty").is_none());
    }

    #[test]
    fn test_self_recursive_factory() {
        let compilation = compile(&[("Cycle.cs", SOURCE)]);
        let model = SemanticModel::new(&compilation);
        assert!(resolve(&model, "Cycle", "LoopProperty").is_none());
    }

    #[test]
    fn test_self_recursive_default_value() {
        let compilation = compile(&[("Cycle.cs", SOURCE)]);
        let model = SemanticModel::new(&compilation);
        let registration = resolve(&model, "Cycle", "DefaultProperty").expect("DefaultProperty");
        let metadata = registration.metadata.expect("metadata");
        assert!(matches!(metadata.default_value, Some(Expr::Invocation(_))));
    }

    #[test]
    fn test_long_alias_chain_is_bounded() {
        let mut source = String::from(
            "using System.Windows;\npublic class Chain : FrameworkElement\n{\n    \
             public static readonly DependencyProperty P0Property = DependencyProperty.Register(\"P0\", typeof(int), typeof(Chain));\n",
        );
        for i in 1..=40 {
            source.push_str(&format!(
                "    public static readonly DependencyProperty P{i}Property = P{}Property;\n",
                i - 1
            ));
        }
        source.push_str("}\n");
        let compilation = compile(&[("Chain.cs", source.as_str())]);
        let model = SemanticModel::new(&compilation);
        assert!(resolve(&model, "Chain", "P3Property").is_some());
        assert!(resolve(&model, "Chain", "P40Property").is_none());
    }
}

mod overrides {
    use super::*;

    #[test]
    fn test_override_metadata_statement() {
        let compilation = compile(&[
            ("Foo.cs", FOO),
            (
                "Derived.cs",
                r#"
using System.Windows;

namespace Demo
{
    public class Derived : Foo
    {
        static Derived()
        {
            BarProperty.OverrideMetadata(typeof(Derived), new FrameworkPropertyMetadata(5));
            DefaultStyleKeyProperty.OverrideMetadata(typeof(Derived), new FrameworkPropertyMetadata(typeof(Derived)));
        }
    }
}
"#,
            ),
        ]);
        let session = AnalysisSession::new(&compilation);
        let overrides = session.metadata_overrides(&CancellationToken::new()).expect("overrides");
        assert_eq!(overrides.len(), 1);
        let bar = &overrides[0];
        assert_eq!(bar.kind, RegistrationKind::Override);
        assert_eq!(bar.name(), Some("Bar"));
        assert_eq!(bar.owner_type.resolved, source_type(session.model(), "Demo.Derived"));
        assert_eq!(bar.backing, member(session.model(), "Demo.Foo", "BarProperty"));
        assert!(bar.metadata.as_ref().and_then(|m| m.default_value).is_some());
    }
}
