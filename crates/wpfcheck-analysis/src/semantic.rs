//! The semantic model: source types, member lookup, and type resolution.
//!
//! A [`Compilation`] owns the parsed trees. A [`SemanticModel`] borrows it
//! and indexes every type declaration, merging partial declarations that
//! share a full name and arity. Type names resolve against source types
//! first and the known framework types second, except when the name is
//! qualified with a `System.Windows` namespace.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use wpfcheck_syntax::nodes::{simple_type_name, TypeDecl, TypeKind, TypeSyntax};
use wpfcheck_syntax::{CSharpParser, SyntaxError, SyntaxTree};

use crate::known::KnownType;
use crate::symbols::{
    BackingMember, MemberSymbol, MethodSymbol, TreeId, TypeId, TypeSymbol,
};

// ============================================================================
// Compilation
// ============================================================================

/// A set of parsed source files analyzed together.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    trees: Vec<SyntaxTree>,
}

impl Compilation {
    pub fn new(trees: Vec<SyntaxTree>) -> Self {
        Self { trees }
    }

    /// Parse `(path, source)` pairs with one parser.
    pub fn from_sources<P, S>(sources: impl IntoIterator<Item = (P, S)>) -> Result<Self, SyntaxError>
    where
        P: Into<String>,
        S: Into<String>,
    {
        let mut parser = CSharpParser::new()?;
        let trees = sources
            .into_iter()
            .map(|(path, source)| SyntaxTree::parse_with(&mut parser, path, source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { trees })
    }

    pub fn trees(&self) -> &[SyntaxTree] {
        &self.trees
    }

    pub fn tree(&self, id: TreeId) -> Option<&SyntaxTree> {
        self.trees.get(id.0 as usize)
    }

    pub fn tree_ids(&self) -> impl Iterator<Item = TreeId> {
        (0..self.trees.len() as u32).map(TreeId)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

// ============================================================================
// Resolved types
// ============================================================================

/// What a type name refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    /// A type declared in the compilation.
    Source(TypeId),
    /// A framework type known by name.
    Known(KnownType),
    /// A C# keyword type, normalized (`System.Int32` is `int`; nullable
    /// forms end in `?`).
    Predefined(String),
    /// Anything else, as written.
    Unknown(String),
}

impl ResolvedType {
    pub fn is_known(&self, known: KnownType) -> bool {
        matches!(self, ResolvedType::Known(k) if *k == known)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ResolvedType::Unknown(_))
    }

    pub fn as_source(&self) -> Option<TypeId> {
        match self {
            ResolvedType::Source(id) => Some(*id),
            _ => None,
        }
    }
}

/// A type as written together with what it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference<'c> {
    pub syntax: &'c TypeSyntax,
    pub resolved: ResolvedType,
}

/// Map a C# keyword type or its `System` alias to the keyword spelling.
pub fn predefined_type_name(text: &str) -> Option<String> {
    let (base, nullable) = match text.strip_suffix('?') {
        Some(base) => (base, true),
        None => match nullable_argument(text) {
            Some(inner) => (inner, true),
            None => (text, false),
        },
    };
    let base = base.strip_prefix("System.").unwrap_or(base);
    let keyword = match base {
        "bool" | "Boolean" => "bool",
        "byte" | "Byte" => "byte",
        "sbyte" | "SByte" => "sbyte",
        "char" | "Char" => "char",
        "short" | "Int16" => "short",
        "ushort" | "UInt16" => "ushort",
        "int" | "Int32" => "int",
        "uint" | "UInt32" => "uint",
        "long" | "Int64" => "long",
        "ulong" | "UInt64" => "ulong",
        "float" | "Single" => "float",
        "double" | "Double" => "double",
        "decimal" | "Decimal" => "decimal",
        "string" | "String" => "string",
        "object" | "Object" => "object",
        _ => return None,
    };
    Some(if nullable {
        format!("{keyword}?")
    } else {
        keyword.to_string()
    })
}

/// `Nullable<T>` or `System.Nullable<T>` gives `T`.
fn nullable_argument(text: &str) -> Option<&str> {
    let rest = text
        .strip_prefix("System.Nullable<")
        .or_else(|| text.strip_prefix("Nullable<"))?;
    rest.strip_suffix('>')
}

/// Number of top-level generic arguments in a type name.
fn generic_arity(text: &str) -> usize {
    let Some(start) = text.find('<') else {
        return 0;
    };
    let mut depth = 0usize;
    let mut count = 1;
    for c in text[start..].chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            ',' if depth == 1 => count += 1,
            _ => {}
        }
    }
    count
}

/// The dotted qualifier of a type name, ignoring alias qualifiers.
fn type_qualifier(text: &str) -> Option<&str> {
    let base = match text.find('<') {
        Some(i) => &text[..i],
        None => text,
    };
    if base.contains("::") {
        return None;
    }
    base.rfind('.').map(|i| &base[..i])
}

// ============================================================================
// Semantic model
// ============================================================================

/// Name and type oracle over a [`Compilation`].
#[derive(Debug)]
pub struct SemanticModel<'c> {
    compilation: &'c Compilation,
    types: Vec<TypeSymbol<'c>>,
    by_key: HashMap<String, TypeId>,
    by_simple_name: HashMap<&'c str, Vec<TypeId>>,
}

impl<'c> SemanticModel<'c> {
    pub fn new(compilation: &'c Compilation) -> Self {
        let mut model = Self {
            compilation,
            types: Vec::new(),
            by_key: HashMap::new(),
            by_simple_name: HashMap::new(),
        };
        for (index, tree) in compilation.trees().iter().enumerate() {
            let tree_id = TreeId(index as u32);
            for decl in &tree.root.types {
                model.declare_type(tree_id, decl, None);
            }
        }
        debug!(
            trees = compilation.len(),
            types = model.types.len(),
            "built semantic model"
        );
        model
    }

    fn declare_type(&mut self, tree: TreeId, decl: &'c TypeDecl, containing: Option<TypeId>) {
        let key = format!("{}`{}", decl.full_name(), decl.type_parameters.len());
        let id = match self.by_key.get(&key) {
            Some(&id) => id,
            None => {
                let id = TypeId(self.types.len() as u32);
                self.types.push(TypeSymbol::new(id, decl, containing));
                self.by_key.insert(key, id);
                self.by_simple_name
                    .entry(decl.name.text.as_str())
                    .or_default()
                    .push(id);
                id
            }
        };
        let nested = self.types[id.0 as usize].add_declaration(tree, decl);
        for nested in nested {
            self.declare_type(tree, nested, Some(id));
        }
    }

    pub fn compilation(&self) -> &'c Compilation {
        self.compilation
    }

    /// The syntax tree for `id`.
    ///
    /// Tree ids are only handed out by this model, so they are always in
    /// range.
    pub fn tree(&self, id: TreeId) -> &'c SyntaxTree {
        &self.compilation.trees()[id.0 as usize]
    }

    pub fn types(&self) -> &[TypeSymbol<'c>] {
        &self.types
    }

    pub fn type_symbol(&self, id: TypeId) -> &TypeSymbol<'c> {
        &self.types[id.0 as usize]
    }

    /// Find a source type by full name (`Ns.Outer.Inner`).
    pub fn find_type(&self, full_name: &str) -> Option<&TypeSymbol<'c>> {
        self.types.iter().find(|t| t.full_name == full_name)
    }

    /// Display name of a resolved type.
    pub fn type_display(&self, ty: &ResolvedType) -> String {
        match ty {
            ResolvedType::Source(id) => self.type_symbol(*id).full_name.clone(),
            ResolvedType::Known(k) => k.name().to_string(),
            ResolvedType::Predefined(text) | ResolvedType::Unknown(text) => text.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Type resolution
    // ------------------------------------------------------------------------

    /// Resolve a type name as written in `tree`, inside `containing`.
    pub fn resolve_type_text(
        &self,
        text: &str,
        tree: TreeId,
        containing: Option<TypeId>,
    ) -> ResolvedType {
        let text = text.trim();
        if text.is_empty() || text == "var" {
            return ResolvedType::Unknown(text.to_string());
        }
        if let Some(keyword) = predefined_type_name(text) {
            return ResolvedType::Predefined(keyword);
        }
        if text.ends_with("[]") || text.ends_with('?') {
            return ResolvedType::Unknown(text.to_string());
        }
        let resolved = self.resolve_type_parts(
            simple_type_name(text),
            type_qualifier(text),
            generic_arity(text),
            tree,
            containing,
        );
        resolved.unwrap_or_else(|| ResolvedType::Unknown(text.to_string()))
    }

    pub fn resolve_type_syntax(
        &self,
        syntax: &TypeSyntax,
        tree: TreeId,
        containing: Option<TypeId>,
    ) -> ResolvedType {
        self.resolve_type_text(&syntax.text, tree, containing)
    }

    pub fn type_reference(
        &self,
        syntax: &'c TypeSyntax,
        tree: TreeId,
        containing: Option<TypeId>,
    ) -> TypeReference<'c> {
        TypeReference {
            syntax,
            resolved: self.resolve_type_syntax(syntax, tree, containing),
        }
    }

    /// Resolve a simple name with an optional qualifier and arity.
    pub(crate) fn resolve_type_parts(
        &self,
        simple: &str,
        qualifier: Option<&str>,
        arity: usize,
        tree: TreeId,
        containing: Option<TypeId>,
    ) -> Option<ResolvedType> {
        let framework_qualified = qualifier.is_some_and(KnownType::is_framework_namespace);
        if !framework_qualified {
            if let Some(id) = self.resolve_source_type(simple, qualifier, arity, tree, containing) {
                return Some(ResolvedType::Source(id));
            }
        }
        if arity == 0 && (qualifier.is_none() || framework_qualified) {
            if let Some(known) = KnownType::from_simple_name(simple) {
                return Some(ResolvedType::Known(known));
            }
        }
        None
    }

    fn resolve_source_type(
        &self,
        simple: &str,
        qualifier: Option<&str>,
        arity: usize,
        tree: TreeId,
        containing: Option<TypeId>,
    ) -> Option<TypeId> {
        let candidates: Vec<TypeId> = self
            .by_simple_name
            .get(simple)?
            .iter()
            .copied()
            .filter(|id| self.type_symbol(*id).arity == arity)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        if let Some(qualifier) = qualifier {
            let exact = format!("{qualifier}.{simple}");
            let suffix = format!(".{exact}");
            return candidates.into_iter().find(|id| {
                let full = &self.type_symbol(*id).full_name;
                *full == exact || full.ends_with(&suffix)
            });
        }

        // Nested in the current type or one of its enclosing types.
        let mut scope = containing;
        while let Some(outer) = scope {
            if let Some(id) = candidates
                .iter()
                .find(|id| self.type_symbol(**id).containing_type == Some(outer))
            {
                return Some(*id);
            }
            scope = self.type_symbol(outer).containing_type;
        }

        let top_level: Vec<TypeId> = candidates
            .iter()
            .copied()
            .filter(|id| self.type_symbol(*id).containing_type.is_none())
            .collect();

        let namespace = self.current_namespace(tree, containing);
        if let Some(id) = top_level.iter().find(|id| {
            namespace_visible(self.type_symbol(**id).namespace, namespace)
        }) {
            return Some(*id);
        }

        let usings = &self.tree(tree).root.usings;
        if let Some(id) = top_level.iter().find(|id| {
            let ns = self.type_symbol(**id).namespace;
            usings
                .iter()
                .any(|u| !u.is_static && u.alias.is_none() && ns == Some(u.name.as_str()))
        }) {
            return Some(*id);
        }

        top_level.first().or(candidates.first()).copied()
    }

    fn current_namespace(&self, tree: TreeId, containing: Option<TypeId>) -> Option<&'c str> {
        match containing {
            Some(id) => self.type_symbol(id).namespace,
            None => self
                .tree(tree)
                .root
                .types
                .first()
                .and_then(|t| t.namespace.as_deref()),
        }
    }

    // ------------------------------------------------------------------------
    // Inheritance
    // ------------------------------------------------------------------------

    /// Resolved base-type list across all partial declarations.
    pub fn base_types(&self, id: TypeId) -> Vec<ResolvedType> {
        let symbol = self.type_symbol(id);
        let mut bases = Vec::new();
        for declaration in &symbol.declarations {
            for base in &declaration.decl.base_types {
                let resolved = self.resolve_type_syntax(base, declaration.tree, symbol.containing_type);
                if !bases.contains(&resolved) {
                    bases.push(resolved);
                }
            }
        }
        bases
    }

    /// The base class: the first base type that is not a source interface.
    pub fn base_class(&self, id: TypeId) -> Option<ResolvedType> {
        self.base_types(id).into_iter().find(|base| match base {
            ResolvedType::Source(b) => self
                .type_symbol(*b)
                .declarations
                .iter()
                .all(|d| d.decl.kind != TypeKind::Interface),
            _ => true,
        })
    }

    /// True if `ty` is `ancestor` or derives from it.
    ///
    /// Cyclic base lists terminate.
    pub fn derives_from(&self, ty: &ResolvedType, ancestor: KnownType) -> bool {
        match ty {
            ResolvedType::Known(known) => known.derives_from(ancestor),
            ResolvedType::Source(start) => {
                let mut visited = HashSet::new();
                let mut stack = vec![*start];
                while let Some(current) = stack.pop() {
                    if !visited.insert(current) {
                        continue;
                    }
                    for base in self.base_types(current) {
                        match base {
                            ResolvedType::Known(known) if known.derives_from(ancestor) => {
                                return true;
                            }
                            ResolvedType::Source(b) => stack.push(b),
                            _ => {}
                        }
                    }
                }
                false
            }
            _ => false,
        }
    }

    pub fn is_dependency_object(&self, ty: &ResolvedType) -> bool {
        self.derives_from(ty, KnownType::DependencyObject)
    }

    /// Visit `start` and its source base types until `f` returns a value.
    fn search_type_chain<T>(
        &self,
        start: TypeId,
        mut f: impl FnMut(&TypeSymbol<'c>) -> Option<T>,
    ) -> Option<T> {
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(found) = f(self.type_symbol(current)) {
                return Some(found);
            }
            let bases = self.base_types(current);
            stack.extend(bases.iter().rev().filter_map(ResolvedType::as_source));
        }
        None
    }

    // ------------------------------------------------------------------------
    // Member lookup
    // ------------------------------------------------------------------------

    /// A member of `ty` or its source base types.
    pub fn lookup_member(&self, ty: TypeId, name: &str) -> Option<MemberSymbol<'c>> {
        self.search_type_chain(ty, |symbol| symbol.members_named(name).next())
    }

    /// Methods named `name` on the nearest type in the chain declaring any.
    pub fn lookup_methods(&self, ty: TypeId, name: &str) -> Vec<MethodSymbol<'c>> {
        self.search_type_chain(ty, |symbol| {
            let methods: Vec<_> = symbol
                .members_named(name)
                .filter_map(|m| match m {
                    MemberSymbol::Method(method) => Some(method),
                    _ => None,
                })
                .collect();
            (!methods.is_empty()).then_some(methods)
        })
        .unwrap_or_default()
    }

    /// A member visible by simple name from inside `scope`: the type
    /// chain first, then enclosing types.
    pub fn lookup_in_scope(&self, scope: Option<TypeId>, name: &str) -> Option<MemberSymbol<'c>> {
        let mut current = scope;
        while let Some(ty) = current {
            if let Some(member) = self.lookup_member(ty, name) {
                return Some(member);
            }
            current = self.type_symbol(ty).containing_type;
        }
        None
    }

    /// Methods visible by simple name from inside `scope`.
    pub fn lookup_methods_in_scope(&self, scope: Option<TypeId>, name: &str) -> Vec<MethodSymbol<'c>> {
        let mut current = scope;
        while let Some(ty) = current {
            let methods = self.lookup_methods(ty, name);
            if !methods.is_empty() {
                return methods;
            }
            current = self.type_symbol(ty).containing_type;
        }
        Vec::new()
    }

    /// The declared type of a field or property.
    pub fn member_type(&self, member: MemberSymbol<'c>) -> Option<ResolvedType> {
        let containing = Some(member.containing_type());
        let tree = member.id().tree;
        match member {
            MemberSymbol::Field(f) => Some(self.resolve_type_syntax(&f.field.ty, tree, containing)),
            MemberSymbol::Property(p) => Some(self.resolve_type_syntax(&p.decl.ty, tree, containing)),
            MemberSymbol::Method(_) => None,
        }
    }

    pub fn backing_type(&self, member: BackingMember<'c>) -> ResolvedType {
        self.resolve_type_syntax(
            member.declared_type(),
            member.tree(),
            Some(member.containing_type()),
        )
    }

    pub fn method_return_type(&self, method: MethodSymbol<'c>) -> ResolvedType {
        self.resolve_type_syntax(
            &method.decl.return_type,
            method.id.tree,
            Some(method.containing_type),
        )
    }

    /// Static fields and properties typed `DependencyProperty` or
    /// `DependencyPropertyKey`, in type then declaration order.
    pub fn dependency_property_members(&self) -> Vec<BackingMember<'c>> {
        self.static_members_of(|ty| {
            ty.is_known(KnownType::DependencyProperty) || ty.is_known(KnownType::DependencyPropertyKey)
        })
    }

    /// Static fields and properties typed `RoutedEvent`.
    pub fn routed_event_members(&self) -> Vec<BackingMember<'c>> {
        self.static_members_of(|ty| ty.is_known(KnownType::RoutedEvent))
    }

    fn static_members_of(&self, accept: impl Fn(&ResolvedType) -> bool) -> Vec<BackingMember<'c>> {
        self.types
            .iter()
            .flat_map(|t| t.backing_members())
            .filter(|m| m.is_static() && accept(&self.backing_type(*m)))
            .collect()
    }
}

/// A type in `declared` is visible from `current` if it is in the same
/// namespace, an enclosing one, or the global namespace.
fn namespace_visible(declared: Option<&str>, current: Option<&str>) -> bool {
    match (declared, current) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(declared), Some(current)) => {
            current == declared
                || current
                    .strip_prefix(declared)
                    .is_some_and(|rest| rest.starts_with('.'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(sources: &[(&str, &str)]) -> Compilation {
        Compilation::from_sources(sources.iter().copied()).expect("parse")
    }

    mod predefined {
        use super::*;

        #[test]
        fn test_aliases_normalize() {
            assert_eq!(predefined_type_name("System.Int32").as_deref(), Some("int"));
            assert_eq!(predefined_type_name("Double").as_deref(), Some("double"));
            assert_eq!(predefined_type_name("bool?").as_deref(), Some("bool?"));
            assert_eq!(predefined_type_name("Nullable<Int32>").as_deref(), Some("int?"));
            assert_eq!(predefined_type_name("Brush"), None);
        }

        #[test]
        fn test_generic_arity() {
            assert_eq!(generic_arity("List<int>"), 1);
            assert_eq!(generic_arity("Dictionary<string, List<int>>"), 2);
            assert_eq!(generic_arity("Foo"), 0);
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn test_partial_types_merge() {
            let compilation = compile(&[
                ("A.cs", "namespace N { public partial class Foo { int a; } }"),
                ("B.cs", "namespace N { public partial class Foo { int b; } }"),
            ]);
            let model = SemanticModel::new(&compilation);
            assert_eq!(model.types().len(), 1);
            let foo = model.find_type("N.Foo").expect("Foo");
            assert_eq!(foo.declarations.len(), 2);
            assert!(foo.members_named("a").next().is_some());
            assert!(foo.members_named("b").next().is_some());
        }

        #[test]
        fn test_generic_arity_distinguishes_types() {
            let compilation = compile(&[("A.cs", "class Foo { } class Foo<T> { }")]);
            let model = SemanticModel::new(&compilation);
            assert_eq!(model.types().len(), 2);
            let tree = TreeId(0);
            let plain = model.resolve_type_text("Foo", tree, None);
            let generic = model.resolve_type_text("Foo<int>", tree, None);
            assert_ne!(plain, generic);
            assert!(matches!(plain, ResolvedType::Source(_)));
            assert!(matches!(generic, ResolvedType::Source(_)));
        }

        #[test]
        fn test_known_types() {
            let compilation = compile(&[("A.cs", "class Foo { }")]);
            let model = SemanticModel::new(&compilation);
            let tree = TreeId(0);
            assert_eq!(
                model.resolve_type_text("DependencyProperty", tree, None),
                ResolvedType::Known(KnownType::DependencyProperty)
            );
            assert_eq!(
                model.resolve_type_text("System.Windows.Controls.Control", tree, None),
                ResolvedType::Known(KnownType::Control)
            );
            assert_eq!(
                model.resolve_type_text("Brush", tree, None),
                ResolvedType::Unknown("Brush".to_string())
            );
        }

        #[test]
        fn test_source_type_shadows_framework_name() {
            let compilation = compile(&[("A.cs", "namespace N { class Control { } class Foo { } }")]);
            let model = SemanticModel::new(&compilation);
            let foo = model.find_type("N.Foo").expect("Foo").id;
            let resolved = model.resolve_type_text("Control", TreeId(0), Some(foo));
            assert!(matches!(resolved, ResolvedType::Source(_)));
            assert_eq!(
                model.resolve_type_text("System.Windows.Controls.Control", TreeId(0), Some(foo)),
                ResolvedType::Known(KnownType::Control)
            );
        }

        #[test]
        fn test_nested_type_resolution() {
            let compilation = compile(&[(
                "A.cs",
                "namespace N { class Outer { class Inner { } Inner field; } class Inner { } }",
            )]);
            let model = SemanticModel::new(&compilation);
            let outer = model.find_type("N.Outer").expect("Outer").id;
            let resolved = model.resolve_type_text("Inner", TreeId(0), Some(outer));
            let ResolvedType::Source(id) = resolved else {
                panic!("expected source type, got {resolved:?}");
            };
            assert_eq!(model.type_symbol(id).full_name, "N.Outer.Inner");
        }
    }

    mod inheritance {
        use super::*;

        #[test]
        fn test_derives_through_source_chain() {
            let compilation = compile(&[(
                "A.cs",
                "using System.Windows.Controls; class Base : Control { } class Derived : Base { }",
            )]);
            let model = SemanticModel::new(&compilation);
            let derived = model.find_type("Derived").expect("Derived").id;
            assert!(model.is_dependency_object(&ResolvedType::Source(derived)));
        }

        #[test]
        fn test_cyclic_bases_terminate() {
            let compilation = compile(&[("A.cs", "class A : B { } class B : A { }")]);
            let model = SemanticModel::new(&compilation);
            let a = model.find_type("A").expect("A").id;
            assert!(!model.is_dependency_object(&ResolvedType::Source(a)));
            assert!(model.lookup_member(a, "Missing").is_none());
        }

        #[test]
        fn test_lookup_member_in_base() {
            let compilation = compile(&[(
                "A.cs",
                "class Base { protected int count; } class Derived : Base { }",
            )]);
            let model = SemanticModel::new(&compilation);
            let derived = model.find_type("Derived").expect("Derived").id;
            let member = model.lookup_member(derived, "count").expect("count");
            assert_eq!(member.name(), "count");
            assert_eq!(model.type_symbol(member.containing_type()).name, "Base");
        }
    }

    #[test]
    fn test_dependency_property_members() {
        let compilation = compile(&[(
            "A.cs",
            r#"
using System.Windows;
class Foo : DependencyObject
{
    public static readonly DependencyProperty BarProperty = null;
    private static readonly DependencyPropertyKey BazPropertyKey = null;
    public readonly DependencyProperty InstanceProperty = null;
    public static readonly RoutedEvent TapEvent = null;
    public static int Other;
}
"#,
        )]);
        let model = SemanticModel::new(&compilation);
        let names: Vec<_> = model
            .dependency_property_members()
            .iter()
            .map(|m| m.name())
            .collect();
        assert_eq!(names, vec!["BarProperty", "BazPropertyKey"]);
        let events: Vec<_> = model.routed_event_members().iter().map(|m| m.name()).collect();
        assert_eq!(events, vec!["TapEvent"]);
    }
}
