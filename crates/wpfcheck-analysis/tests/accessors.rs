//! Integration tests: CLR accessor consistency, determinism, concurrency,
//! and cancellation.

use rayon::prelude::*;
use wpfcheck_analysis::{
    resolve_clr_property, resolve_registration, AccessorCallKind, AccessorSide, AnalysisSession,
    Compilation, ConsistencyState, MatchState, PropertySymbol, SemanticModel,
};
use wpfcheck_core::{CancellationToken, Cancelled};

fn compile(sources: &[(&str, &str)]) -> Compilation {
    Compilation::from_sources(sources.iter().copied()).expect("parse")
}

fn property<'c>(model: &SemanticModel<'c>, type_name: &str, name: &str) -> PropertySymbol<'c> {
    model
        .find_type(type_name)
        .and_then(|t| t.properties().find(|p| p.name() == name))
        .unwrap_or_else(|| panic!("{type_name}.{name}"))
}

const CONTROL: &str = r#"
using System.Windows;
using System.Windows.Controls;

namespace Demo
{
    public class Dial : Control
    {
        public static readonly DependencyProperty ValueProperty = DependencyProperty.Register(
            nameof(Value), typeof(double), typeof(Dial), new PropertyMetadata(0.0));

        public static readonly DependencyProperty MinimumProperty = DependencyProperty.Register(
            nameof(Minimum), typeof(double), typeof(Dial), new PropertyMetadata(0.0));

        private static readonly DependencyPropertyKey TicksPropertyKey = DependencyProperty.RegisterReadOnly(
            nameof(Ticks), typeof(int), typeof(Dial), new PropertyMetadata(0));

        public static readonly DependencyProperty TicksProperty = TicksPropertyKey.DependencyProperty;

        public double Value
        {
            get { return (double)this.GetValue(ValueProperty); }
            set { this.SetValue(ValueProperty, value); }
        }

        public double Minimum
        {
            get => (double)GetValue(ValueProperty);
            set => SetValue(MinimumProperty, value);
        }

        public double Sum
        {
            get => (double)GetValue(ValueProperty) + (double)GetValue(MinimumProperty);
            set => SetCurrentValue(ValueProperty, value);
        }

        public double Twice
        {
            get => (double)GetValue(ValueProperty) + (double)GetValue(ValueProperty);
        }

        public int Ticks
        {
            get => (int)GetValue(TicksProperty);
            set => SetValue(TicksProperty, value);
        }

        public string Plain { get; set; }
    }
}
"#;

mod consistency {
    use super::*;

    fn state<'c>(model: &SemanticModel<'c>, name: &str) -> ConsistencyState<'c> {
        resolve_clr_property(model, property(model, "Demo.Dial", name), &CancellationToken::new())
            .expect("not cancelled")
            .state
    }

    #[test]
    fn test_consistent_wrapper() {
        let compilation = compile(&[("Dial.cs", CONTROL)]);
        let model = SemanticModel::new(&compilation);
        let resolution = resolve_clr_property(&model, property(&model, "Demo.Dial", "Value"), &CancellationToken::new())
            .expect("not cancelled");
        assert_eq!(resolution.state, ConsistencyState::Consistent);
        assert_eq!(resolution.registration.as_ref().and_then(|r| r.name()), Some("Value"));
        assert_eq!(resolution.setter.call.map(|c| c.kind), Some(AccessorCallKind::SetValue));
    }

    #[test]
    fn test_inconsistent_pair() {
        let compilation = compile(&[("Dial.cs", CONTROL)]);
        let model = SemanticModel::new(&compilation);
        let ConsistencyState::Inconsistent { getter, setter } = state(&model, "Minimum") else {
            panic!("expected inconsistent");
        };
        assert_eq!(getter.as_member().map(|m| m.name()), Some("ValueProperty"));
        assert_eq!(setter.as_member().map(|m| m.name()), Some("MinimumProperty"));
    }

    #[test]
    fn test_ambiguous_getter_reports_all_candidates() {
        let compilation = compile(&[("Dial.cs", CONTROL)]);
        let model = SemanticModel::new(&compilation);
        let token = CancellationToken::new();
        for name in ["Sum", "Twice"] {
            let resolution = resolve_clr_property(&model, property(&model, "Demo.Dial", name), &token)
                .expect("not cancelled");
            assert_eq!(
                resolution.state,
                ConsistencyState::Ambiguous {
                    side: AccessorSide::Getter
                }
            );
            assert_eq!(resolution.getter.state, MatchState::Ambiguous);
            assert!(resolution.getter.call.is_none());
            assert_eq!(resolution.getter.candidates.len(), 2);
        }
    }

    #[test]
    fn test_read_only_setter_bypasses_key() {
        let compilation = compile(&[("Dial.cs", CONTROL)]);
        let model = SemanticModel::new(&compilation);
        let ConsistencyState::ReadOnlySetterBypassesKey { property, key } = state(&model, "Ticks") else {
            panic!("expected bypass");
        };
        assert_eq!(property.name(), "TicksProperty");
        assert_eq!(key.name(), "TicksPropertyKey");
    }

    #[test]
    fn test_auto_property_is_not_found() {
        let compilation = compile(&[("Dial.cs", CONTROL)]);
        let model = SemanticModel::new(&compilation);
        let resolution = resolve_clr_property(&model, property(&model, "Demo.Dial", "Plain"), &CancellationToken::new())
            .expect("not cancelled");
        assert_eq!(resolution.state, ConsistencyState::NotFound);
        assert!(resolution.registration.is_none());
    }
}

mod call_styles {
    use super::*;

    #[test]
    fn test_partial_class_across_files() {
        let compilation = compile(&[
            (
                "Knob.Properties.cs",
                r#"
using System.Windows;
using System.Windows.Controls;

namespace Demo
{
    public partial class Knob : Control
    {
        public static readonly DependencyProperty AngleProperty = DependencyProperty.Register(
            nameof(Angle), typeof(double), typeof(Knob));
    }
}
"#,
            ),
            (
                "Knob.cs",
                r#"
namespace Demo
{
    public partial class Knob
    {
        public double Angle
        {
            get => (double)base.GetValue(AngleProperty);
            set => ((System.Windows.DependencyObject)this).SetValue(Knob.AngleProperty, value);
        }
    }
}
"#,
            ),
        ]);
        let model = SemanticModel::new(&compilation);
        let resolution = resolve_clr_property(&model, property(&model, "Demo.Knob", "Angle"), &CancellationToken::new())
            .expect("not cancelled");
        assert_eq!(resolution.state, ConsistencyState::Consistent);
        assert!(resolution.getter.is_success());
        assert!(resolution.setter.is_success());
        assert_eq!(resolution.registration.and_then(|r| r.registered_name).map(|n| n.value), Some("Angle".to_string()));
    }

    #[test]
    fn test_attached_accessors_with_parameter_and_local_receivers() {
        let compilation = compile(&[(
            "Layout.cs",
            r#"
using System.Windows;

public static class Layout
{
    public static readonly DependencyProperty RowProperty = System.Windows.DependencyProperty.RegisterAttached(
        "Row", typeof(int), typeof(Layout), new FrameworkPropertyMetadata(0));

    public static int GetRow(UIElement element)
    {
        var target = element;
        return (int)target.GetValue(RowProperty);
    }

    public static void SetRow(UIElement element, int value)
    {
        if (element != null)
        {
            element.SetValue(RowProperty, value);
        }
    }
}
"#,
        )]);
        let session = AnalysisSession::new(&compilation);
        let token = CancellationToken::new();
        let layout = session.model().find_type("Layout").expect("Layout");
        let get_row = layout.methods().find(|m| m.name() == "GetRow").expect("GetRow");
        let resolution = session
            .resolve_accessor_method(get_row, &token)
            .expect("not cancelled")
            .expect("accessor pair");
        assert_eq!(resolution.state, ConsistencyState::Consistent);
        let registration = resolution.registration.expect("registration");
        assert!(registration.is_attached());
        assert_eq!(registration.name(), Some("Row"));

        let found = session.find_attached_accessors(&registration, &token).expect("not cancelled");
        assert_eq!(found.getter, Some(get_row));
        assert_eq!(found.setter.map(|m| m.name()), Some("SetRow"));
    }

    #[test]
    fn test_find_clr_property_by_scan() {
        let compilation = compile(&[(
            "Odd.cs",
            r#"
using System.Windows;
using System.Windows.Controls;

public class Odd : Control
{
    public static readonly DependencyProperty SizeProperty = DependencyProperty.Register(
        "Size", typeof(int), typeof(Odd));

    public int Dimension
    {
        get => (int)GetValue(SizeProperty);
        set => SetValue(SizeProperty, value);
    }
}
"#,
        )]);
        let session = AnalysisSession::new(&compilation);
        let token = CancellationToken::new();
        let registration = session.registrations(&token).expect("not cancelled").remove(0);
        let found = session.find_clr_property(&registration, &token).expect("not cancelled");
        assert_eq!(found.map(|p| p.name()), Some("Dimension"));
    }
}

mod determinism {
    use super::*;

    #[test]
    fn test_resolution_is_idempotent() {
        let compilation = compile(&[("Dial.cs", CONTROL)]);
        let model = SemanticModel::new(&compilation);
        let token = CancellationToken::new();
        for member in model.dependency_property_members() {
            let first = resolve_registration(&model, member, &token).expect("not cancelled");
            let second = resolve_registration(&model, member, &token).expect("not cancelled");
            assert_eq!(first, second);
        }
        let dial = model.find_type("Demo.Dial").expect("Dial");
        for property in dial.properties() {
            let first = resolve_clr_property(&model, property, &token).expect("not cancelled");
            let second = resolve_clr_property(&model, property, &token).expect("not cancelled");
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_concurrent_equals_sequential() {
        let compilation = compile(&[("Dial.cs", CONTROL)]);
        let session = AnalysisSession::new(&compilation);
        let token = CancellationToken::new();
        let model = session.model();
        let members = model.dependency_property_members();
        let properties: Vec<_> = model.types().iter().flat_map(|t| t.properties()).collect();

        let sequential_registrations: Vec<_> = members
            .iter()
            .map(|m| session.resolve_registration(*m, &token))
            .collect::<Result<_, Cancelled>>()
            .expect("not cancelled");
        let sequential_accessors: Vec<_> = properties
            .iter()
            .map(|p| session.resolve_clr_property(*p, &token))
            .collect::<Result<_, Cancelled>>()
            .expect("not cancelled");

        for _ in 0..4 {
            let registrations: Vec<_> = members
                .par_iter()
                .rev()
                .map(|m| session.resolve_registration(*m, &token))
                .collect::<Result<Vec<_>, Cancelled>>()
                .expect("not cancelled")
                .into_iter()
                .rev()
                .collect();
            assert_eq!(registrations, sequential_registrations);

            let accessors: Vec<_> = properties
                .par_iter()
                .map(|p| session.resolve_clr_property(*p, &token))
                .collect::<Result<_, Cancelled>>()
                .expect("not cancelled");
            assert_eq!(accessors, sequential_accessors);
        }
    }
}

mod cancellation {
    use super::*;

    #[test]
    fn test_cancelled_token_propagates() {
        let compilation = compile(&[("Dial.cs", CONTROL)]);
        let session = AnalysisSession::new(&compilation);
        let token = CancellationToken::new();
        token.cancel();

        let member = session.model().dependency_property_members()[0];
        assert_eq!(session.resolve_registration(member, &token), Err(Cancelled));
        assert_eq!(session.registrations(&token), Err(Cancelled));
        assert_eq!(session.routed_events(&token).map(|e| e.len()), Ok(0));

        let value = property(session.model(), "Demo.Dial", "Value");
        assert_eq!(session.resolve_clr_property(value, &token), Err(Cancelled));
    }

    #[test]
    fn test_cancelled_walk_returns_walkers() {
        let compilation = compile(&[("Dial.cs", CONTROL)]);
        let session = AnalysisSession::new(&compilation);
        let token = CancellationToken::new();
        let value = property(session.model(), "Demo.Dial", "Value");
        let ctx = session.model().property_context(value);
        let getter = value.decl.getter().and_then(|a| a.body.as_ref()).expect("getter body");

        token.cancel();
        assert_eq!(session.match_getter(getter, &ctx, &token), Err(Cancelled));
        assert_eq!(session.idle_walkers().0, 1);
    }
}

mod malformed {
    use super::*;

    #[test]
    fn test_broken_source_is_not_found() {
        let compilation = compile(&[(
            "Broken.cs",
            r#"
using System.Windows;

public class Broken : FrameworkElement
{
    public static readonly DependencyProperty BarProperty = DependencyProperty.Register(nameof(Bar), typeof(int)

    public int Bar
    {
        get => (int)GetValue(BarProperty;
    }
}
"#,
        )]);
        assert!(compilation.trees()[0].has_errors);
        let session = AnalysisSession::new(&compilation);
        let token = CancellationToken::new();
        let registrations = session.registrations(&token).expect("not cancelled");
        assert!(registrations.iter().all(|r| r.name() == Some("Bar")));
    }
}
