//! Known WPF framework types and members.
//!
//! Framework assemblies are not part of the compilation, so the types the
//! analysis depends on are described here: their names, their base-type
//! chain, and which of their members are dependency-property operations.

/// A framework type recognized by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KnownType {
    Object,
    // DependencyObject family
    DependencyObject,
    Visual,
    Visual3D,
    UIElement,
    UIElement3D,
    FrameworkElement,
    Control,
    ContentControl,
    UserControl,
    Window,
    Page,
    ButtonBase,
    Button,
    ToggleButton,
    ItemsControl,
    Selector,
    ListBox,
    Panel,
    Canvas,
    Grid,
    StackPanel,
    Decorator,
    Border,
    TextBlock,
    Image,
    Shape,
    Adorner,
    ContentElement,
    FrameworkContentElement,
    TextElement,
    Freezable,
    Animatable,
    // Property system
    DependencyProperty,
    DependencyPropertyKey,
    PropertyMetadata,
    UIPropertyMetadata,
    FrameworkPropertyMetadata,
    FrameworkPropertyMetadataOptions,
    PropertyChangedCallback,
    CoerceValueCallback,
    ValidateValueCallback,
    // Routed events
    RoutedEvent,
    EventManager,
    RoutingStrategy,
    RoutedEventHandler,
}

impl KnownType {
    const ALL: &'static [KnownType] = &[
        KnownType::DependencyObject,
        KnownType::Visual,
        KnownType::Visual3D,
        KnownType::UIElement,
        KnownType::UIElement3D,
        KnownType::FrameworkElement,
        KnownType::Control,
        KnownType::ContentControl,
        KnownType::UserControl,
        KnownType::Window,
        KnownType::Page,
        KnownType::ButtonBase,
        KnownType::Button,
        KnownType::ToggleButton,
        KnownType::ItemsControl,
        KnownType::Selector,
        KnownType::ListBox,
        KnownType::Panel,
        KnownType::Canvas,
        KnownType::Grid,
        KnownType::StackPanel,
        KnownType::Decorator,
        KnownType::Border,
        KnownType::TextBlock,
        KnownType::Image,
        KnownType::Shape,
        KnownType::Adorner,
        KnownType::ContentElement,
        KnownType::FrameworkContentElement,
        KnownType::TextElement,
        KnownType::Freezable,
        KnownType::Animatable,
        KnownType::DependencyProperty,
        KnownType::DependencyPropertyKey,
        KnownType::PropertyMetadata,
        KnownType::UIPropertyMetadata,
        KnownType::FrameworkPropertyMetadata,
        KnownType::FrameworkPropertyMetadataOptions,
        KnownType::PropertyChangedCallback,
        KnownType::CoerceValueCallback,
        KnownType::ValidateValueCallback,
        KnownType::RoutedEvent,
        KnownType::EventManager,
        KnownType::RoutingStrategy,
        KnownType::RoutedEventHandler,
    ];

    /// The unqualified framework name.
    pub fn name(self) -> &'static str {
        match self {
            KnownType::Object => "object",
            KnownType::DependencyObject => "DependencyObject",
            KnownType::Visual => "Visual",
            KnownType::Visual3D => "Visual3D",
            KnownType::UIElement => "UIElement",
            KnownType::UIElement3D => "UIElement3D",
            KnownType::FrameworkElement => "FrameworkElement",
            KnownType::Control => "Control",
            KnownType::ContentControl => "ContentControl",
            KnownType::UserControl => "UserControl",
            KnownType::Window => "Window",
            KnownType::Page => "Page",
            KnownType::ButtonBase => "ButtonBase",
            KnownType::Button => "Button",
            KnownType::ToggleButton => "ToggleButton",
            KnownType::ItemsControl => "ItemsControl",
            KnownType::Selector => "Selector",
            KnownType::ListBox => "ListBox",
            KnownType::Panel => "Panel",
            KnownType::Canvas => "Canvas",
            KnownType::Grid => "Grid",
            KnownType::StackPanel => "StackPanel",
            KnownType::Decorator => "Decorator",
            KnownType::Border => "Border",
            KnownType::TextBlock => "TextBlock",
            KnownType::Image => "Image",
            KnownType::Shape => "Shape",
            KnownType::Adorner => "Adorner",
            KnownType::ContentElement => "ContentElement",
            KnownType::FrameworkContentElement => "FrameworkContentElement",
            KnownType::TextElement => "TextElement",
            KnownType::Freezable => "Freezable",
            KnownType::Animatable => "Animatable",
            KnownType::DependencyProperty => "DependencyProperty",
            KnownType::DependencyPropertyKey => "DependencyPropertyKey",
            KnownType::PropertyMetadata => "PropertyMetadata",
            KnownType::UIPropertyMetadata => "UIPropertyMetadata",
            KnownType::FrameworkPropertyMetadata => "FrameworkPropertyMetadata",
            KnownType::FrameworkPropertyMetadataOptions => "FrameworkPropertyMetadataOptions",
            KnownType::PropertyChangedCallback => "PropertyChangedCallback",
            KnownType::CoerceValueCallback => "CoerceValueCallback",
            KnownType::ValidateValueCallback => "ValidateValueCallback",
            KnownType::RoutedEvent => "RoutedEvent",
            KnownType::EventManager => "EventManager",
            KnownType::RoutingStrategy => "RoutingStrategy",
            KnownType::RoutedEventHandler => "RoutedEventHandler",
        }
    }

    /// Look up a framework type by unqualified name.
    pub fn from_simple_name(name: &str) -> Option<KnownType> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Accept a qualifier if it names a WPF namespace.
    pub fn is_framework_namespace(qualifier: &str) -> bool {
        qualifier == "System.Windows" || qualifier.starts_with("System.Windows.")
    }

    /// The direct framework base type.
    pub fn base(self) -> Option<KnownType> {
        use KnownType::*;
        match self {
            DependencyObject => Some(Object),
            Visual | Visual3D | ContentElement | Freezable => Some(DependencyObject),
            UIElement => Some(Visual),
            UIElement3D => Some(Visual3D),
            FrameworkElement => Some(UIElement),
            Control | Panel | Decorator | TextBlock | Image | Shape | Adorner | Page => {
                Some(FrameworkElement)
            }
            ContentControl | ItemsControl => Some(Control),
            UserControl | Window | ButtonBase => Some(ContentControl),
            Button | ToggleButton => Some(ButtonBase),
            Selector => Some(ItemsControl),
            ListBox => Some(Selector),
            Canvas | Grid | StackPanel => Some(Panel),
            Border => Some(Decorator),
            FrameworkContentElement => Some(ContentElement),
            TextElement => Some(FrameworkContentElement),
            Animatable => Some(Freezable),
            UIPropertyMetadata => Some(PropertyMetadata),
            FrameworkPropertyMetadata => Some(UIPropertyMetadata),
            Object => None,
            _ => Some(Object),
        }
    }

    /// True if `self` is `ancestor` or derives from it.
    pub fn derives_from(self, ancestor: KnownType) -> bool {
        let mut current = Some(self);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = k.base();
        }
        false
    }

    pub fn is_dependency_object(self) -> bool {
        self.derives_from(KnownType::DependencyObject)
    }

    /// The type of a static framework member, guessed from WPF naming:
    /// `XProperty` is a `DependencyProperty`, `XPropertyKey` a key, `XEvent`
    /// a `RoutedEvent`.
    pub fn static_member_type(member: &str) -> Option<KnownType> {
        if member.ends_with("PropertyKey") {
            Some(KnownType::DependencyPropertyKey)
        } else if member.ends_with("Property") {
            Some(KnownType::DependencyProperty)
        } else if member.ends_with("Event") {
            Some(KnownType::RoutedEvent)
        } else {
            None
        }
    }
}

impl std::fmt::Display for KnownType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A framework method the analysis recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownMethod {
    Register,
    RegisterReadOnly,
    RegisterAttached,
    RegisterAttachedReadOnly,
    /// `DependencyProperty.AddOwner`.
    AddOwner,
    OverrideMetadata,
    GetValue,
    SetValue,
    SetCurrentValue,
    ClearValue,
    RegisterRoutedEvent,
    /// `RoutedEvent.AddOwner`.
    RoutedEventAddOwner,
    NameOf,
}

impl KnownMethod {
    /// A static method invoked on a framework type.
    pub fn static_on(owner: KnownType, name: &str) -> Option<KnownMethod> {
        match (owner, name) {
            (KnownType::DependencyProperty, "Register") => Some(KnownMethod::Register),
            (KnownType::DependencyProperty, "RegisterReadOnly") => {
                Some(KnownMethod::RegisterReadOnly)
            }
            (KnownType::DependencyProperty, "RegisterAttached") => {
                Some(KnownMethod::RegisterAttached)
            }
            (KnownType::DependencyProperty, "RegisterAttachedReadOnly") => {
                Some(KnownMethod::RegisterAttachedReadOnly)
            }
            (KnownType::EventManager, "RegisterRoutedEvent") => {
                Some(KnownMethod::RegisterRoutedEvent)
            }
            _ => None,
        }
    }

    /// An instance method invoked on a value of a framework type.
    pub fn instance_on(owner: KnownType, name: &str) -> Option<KnownMethod> {
        match (owner, name) {
            (KnownType::DependencyProperty, "AddOwner") => Some(KnownMethod::AddOwner),
            (KnownType::DependencyProperty, "OverrideMetadata") => {
                Some(KnownMethod::OverrideMetadata)
            }
            (KnownType::RoutedEvent, "AddOwner") => Some(KnownMethod::RoutedEventAddOwner),
            (k, name) if k.is_dependency_object() => Self::dependency_object_method(name),
            _ => None,
        }
    }

    /// `DependencyObject` instance methods by name.
    pub fn dependency_object_method(name: &str) -> Option<KnownMethod> {
        match name {
            "GetValue" => Some(KnownMethod::GetValue),
            "SetValue" => Some(KnownMethod::SetValue),
            "SetCurrentValue" => Some(KnownMethod::SetCurrentValue),
            "ClearValue" => Some(KnownMethod::ClearValue),
            _ => None,
        }
    }

    /// Accepted argument counts.
    pub fn arity(self) -> std::ops::RangeInclusive<usize> {
        match self {
            KnownMethod::Register | KnownMethod::RegisterAttached => 3..=5,
            KnownMethod::RegisterReadOnly | KnownMethod::RegisterAttachedReadOnly => 4..=5,
            KnownMethod::AddOwner => 1..=2,
            KnownMethod::OverrideMetadata => 2..=3,
            KnownMethod::GetValue | KnownMethod::ClearValue => 1..=1,
            KnownMethod::SetValue | KnownMethod::SetCurrentValue => 2..=2,
            KnownMethod::RegisterRoutedEvent => 4..=4,
            KnownMethod::RoutedEventAddOwner => 1..=1,
            KnownMethod::NameOf => 1..=1,
        }
    }

    pub fn accepts_arity(self, count: usize) -> bool {
        self.arity().contains(&count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_round_trips_names() {
        for known in KnownType::ALL {
            assert_eq!(KnownType::from_simple_name(known.name()), Some(*known));
        }
        assert_eq!(KnownType::from_simple_name("Foo"), None);
    }

    #[test]
    fn test_hierarchy() {
        assert!(KnownType::UserControl.is_dependency_object());
        assert!(KnownType::TextElement.is_dependency_object());
        assert!(KnownType::Animatable.is_dependency_object());
        assert!(!KnownType::DependencyProperty.is_dependency_object());
        assert!(KnownType::FrameworkPropertyMetadata.derives_from(KnownType::PropertyMetadata));
        assert!(!KnownType::PropertyMetadata.derives_from(KnownType::FrameworkPropertyMetadata));
    }

    #[test]
    fn test_methods() {
        assert_eq!(
            KnownMethod::static_on(KnownType::DependencyProperty, "RegisterAttached"),
            Some(KnownMethod::RegisterAttached)
        );
        assert_eq!(KnownMethod::static_on(KnownType::Control, "Register"), None);
        assert_eq!(
            KnownMethod::instance_on(KnownType::Window, "SetCurrentValue"),
            Some(KnownMethod::SetCurrentValue)
        );
        assert_eq!(
            KnownMethod::instance_on(KnownType::RoutedEvent, "AddOwner"),
            Some(KnownMethod::RoutedEventAddOwner)
        );
        assert!(KnownMethod::RegisterReadOnly.accepts_arity(4));
        assert!(!KnownMethod::RegisterReadOnly.accepts_arity(3));
    }

    #[test]
    fn test_static_member_type() {
        assert_eq!(KnownType::static_member_type("BackgroundProperty"), Some(KnownType::DependencyProperty));
        assert_eq!(KnownType::static_member_type("IsSelectedPropertyKey"), Some(KnownType::DependencyPropertyKey));
        assert_eq!(KnownType::static_member_type("ClickEvent"), Some(KnownType::RoutedEvent));
        assert_eq!(KnownType::static_member_type("Foo"), None);
    }
}
