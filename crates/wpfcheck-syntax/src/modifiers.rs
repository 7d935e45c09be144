// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration modifier lists and modifier-list editing.
//!
//! [`with_static_modifier`] and [`with_readonly_modifier`] compute the
//! modifier list a backing field should carry. Both are idempotent and keep
//! the conventional C# ordering: accessibility first, then `new`, then
//! `static`, then `readonly`.

use wpfcheck_core::Span;

/// A single C# declaration modifier keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Public,
    Protected,
    Internal,
    Private,
    File,
    New,
    Static,
    Readonly,
    Const,
    Volatile,
    Abstract,
    Virtual,
    Override,
    Sealed,
    Extern,
    Unsafe,
    Partial,
    Async,
    Required,
    /// A keyword this model does not classify (kept verbatim).
    Other(String),
}

impl ModifierKind {
    /// Classify modifier text as written in source.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "public" => Self::Public,
            "protected" => Self::Protected,
            "internal" => Self::Internal,
            "private" => Self::Private,
            "file" => Self::File,
            "new" => Self::New,
            "static" => Self::Static,
            "readonly" => Self::Readonly,
            "const" => Self::Const,
            "volatile" => Self::Volatile,
            "abstract" => Self::Abstract,
            "virtual" => Self::Virtual,
            "override" => Self::Override,
            "sealed" => Self::Sealed,
            "extern" => Self::Extern,
            "unsafe" => Self::Unsafe,
            "partial" => Self::Partial,
            "async" => Self::Async,
            "required" => Self::Required,
            other => Self::Other(other.to_string()),
        }
    }

    /// The keyword text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::Private => "private",
            Self::File => "file",
            Self::New => "new",
            Self::Static => "static",
            Self::Readonly => "readonly",
            Self::Const => "const",
            Self::Volatile => "volatile",
            Self::Abstract => "abstract",
            Self::Virtual => "virtual",
            Self::Override => "override",
            Self::Sealed => "sealed",
            Self::Extern => "extern",
            Self::Unsafe => "unsafe",
            Self::Partial => "partial",
            Self::Async => "async",
            Self::Required => "required",
            Self::Other(text) => text,
        }
    }

    /// Returns true for `public`, `protected`, `internal`, `private`, `file`.
    pub fn is_accessibility(&self) -> bool {
        matches!(
            self,
            Self::Public | Self::Protected | Self::Internal | Self::Private | Self::File
        )
    }
}

impl std::fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A modifier occurrence. Synthesized modifiers have no span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub span: Option<Span>,
}

impl Modifier {
    pub fn new(kind: ModifierKind, span: Option<Span>) -> Self {
        Self { kind, span }
    }

    /// A modifier with no source position.
    pub fn synthesized(kind: ModifierKind) -> Self {
        Self { kind, span: None }
    }
}

/// An ordered modifier list as written on a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Modifiers {
    items: Vec<Modifier>,
}

impl Modifiers {
    pub fn new(items: Vec<Modifier>) -> Self {
        Self { items }
    }

    /// Build a list of synthesized modifiers from keyword text.
    pub fn from_keywords<'k>(keywords: impl IntoIterator<Item = &'k str>) -> Self {
        Self {
            items: keywords
                .into_iter()
                .map(|k| Modifier::synthesized(ModifierKind::parse(k)))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, kind: &ModifierKind) -> bool {
        self.items.iter().any(|m| &m.kind == kind)
    }

    pub fn is_static(&self) -> bool {
        self.contains(&ModifierKind::Static)
    }

    pub fn is_readonly(&self) -> bool {
        self.contains(&ModifierKind::Readonly)
    }

    pub fn is_const(&self) -> bool {
        self.contains(&ModifierKind::Const)
    }

    pub fn is_partial(&self) -> bool {
        self.contains(&ModifierKind::Partial)
    }

    /// Static members plus `const` fields, which are implicitly static.
    pub fn is_static_or_const(&self) -> bool {
        self.is_static() || self.is_const()
    }

    /// The modifier keywords in order.
    pub fn keywords(&self) -> Vec<&str> {
        self.items.iter().map(|m| m.kind.as_str()).collect()
    }

    /// Render as source text, space separated.
    pub fn to_source(&self) -> String {
        self.keywords().join(" ")
    }

    /// Index just past the leading accessibility and `new` modifiers.
    fn insertion_point_after_accessibility(&self) -> usize {
        self.items
            .iter()
            .rposition(|m| m.kind.is_accessibility() || m.kind == ModifierKind::New)
            .map_or(0, |i| i + 1)
    }

    fn inserted(&self, index: usize, kind: ModifierKind) -> Self {
        let mut items = self.items.clone();
        items.insert(index, Modifier::synthesized(kind));
        Self { items }
    }
}

/// Return `modifiers` with `static` inserted after the accessibility and
/// `new` modifiers. Returns an unchanged copy if `static` is present.
pub fn with_static_modifier(modifiers: &Modifiers) -> Modifiers {
    if modifiers.is_static() {
        return modifiers.clone();
    }
    modifiers.inserted(
        modifiers.insertion_point_after_accessibility(),
        ModifierKind::Static,
    )
}

/// Return `modifiers` with `readonly` inserted after `static` when present,
/// otherwise after the accessibility modifiers. Returns an unchanged copy if
/// `readonly` is present.
pub fn with_readonly_modifier(modifiers: &Modifiers) -> Modifiers {
    if modifiers.is_readonly() {
        return modifiers.clone();
    }
    let index = match modifiers
        .items
        .iter()
        .position(|m| m.kind == ModifierKind::Static)
    {
        Some(i) => i + 1,
        None => modifiers.insertion_point_after_accessibility(),
    };
    modifiers.inserted(index, ModifierKind::Readonly)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(text: &str) -> Modifiers {
        Modifiers::from_keywords(text.split_whitespace())
    }

    mod static_modifier {
        use super::*;

        #[test]
        fn test_inserts_after_accessibility() {
            assert_eq!(with_static_modifier(&mods("public readonly")).to_source(), "public static readonly");
        }

        #[test]
        fn test_inserts_after_new() {
            assert_eq!(with_static_modifier(&mods("private new")).to_source(), "private new static");
        }

        #[test]
        fn test_inserts_at_front_without_accessibility() {
            assert_eq!(with_static_modifier(&mods("readonly")).to_source(), "static readonly");
            assert_eq!(with_static_modifier(&mods("")).to_source(), "static");
        }

        #[test]
        fn test_idempotent() {
            let once = with_static_modifier(&mods("public"));
            assert_eq!(with_static_modifier(&once), once);
            assert_eq!(with_static_modifier(&mods("static public")).to_source(), "static public");
        }
    }

    mod readonly_modifier {
        use super::*;

        #[test]
        fn test_inserts_after_static() {
            assert_eq!(with_readonly_modifier(&mods("public static")).to_source(), "public static readonly");
            assert_eq!(with_readonly_modifier(&mods("static public")).to_source(), "static readonly public");
        }

        #[test]
        fn test_inserts_after_accessibility_without_static() {
            assert_eq!(with_readonly_modifier(&mods("protected internal")).to_source(), "protected internal readonly");
            assert_eq!(with_readonly_modifier(&mods("")).to_source(), "readonly");
        }

        #[test]
        fn test_idempotent() {
            let once = with_readonly_modifier(&mods("private static"));
            assert_eq!(with_readonly_modifier(&once), once);
        }

        #[test]
        fn test_composes_with_static() {
            let both = with_readonly_modifier(&with_static_modifier(&mods("public")));
            assert_eq!(both.to_source(), "public static readonly");
            let other_order = with_static_modifier(&with_readonly_modifier(&mods("public")));
            assert_eq!(other_order.to_source(), "public static readonly");
        }
    }

    #[test]
    fn test_parse_classifies_keywords() {
        assert!(ModifierKind::parse("internal").is_accessibility());
        assert!(!ModifierKind::parse("static").is_accessibility());
        assert_eq!(ModifierKind::parse("fixed"), ModifierKind::Other("fixed".to_string()));
        assert!(mods("const").is_static_or_const());
    }
}
