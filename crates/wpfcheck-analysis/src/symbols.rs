//! Symbols for declared types and members.
//!
//! Symbols are small `Copy` handles that borrow the syntax they were
//! declared by. Identity is the [`SymbolId`]: the tree a declaration lives
//! in plus the NodeId of its declarator, so equality and hashing never
//! compare syntax.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use wpfcheck_syntax::nodes::{
    ConstructorDecl, Expr, FieldDecl, Identifier, MemberDecl, MethodDecl, NodeId, PropertyDecl,
    Span, TypeDecl, TypeSyntax, VariableDeclarator,
};
use wpfcheck_syntax::Modifiers;

/// Index of a syntax tree within a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub u32);

/// Index of a (possibly partial) type within a semantic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Compilation-wide identity of a member declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId {
    pub tree: TreeId,
    pub node: NodeId,
}

/// Equality and hashing by `id` only.
macro_rules! symbol_identity {
    ($($symbol:ident),* $(,)?) => {
        $(
            impl PartialEq for $symbol<'_> {
                fn eq(&self, other: &Self) -> bool {
                    self.id == other.id
                }
            }

            impl Eq for $symbol<'_> {}

            impl Hash for $symbol<'_> {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    self.id.hash(state);
                }
            }
        )*
    };
}

/// One variable of a field declaration.
#[derive(Debug, Clone, Copy)]
pub struct FieldSymbol<'c> {
    pub id: SymbolId,
    pub containing_type: TypeId,
    pub field: &'c FieldDecl,
    pub declarator: &'c VariableDeclarator,
}

#[derive(Debug, Clone, Copy)]
pub struct PropertySymbol<'c> {
    pub id: SymbolId,
    pub containing_type: TypeId,
    pub decl: &'c PropertyDecl,
}

#[derive(Debug, Clone, Copy)]
pub struct MethodSymbol<'c> {
    pub id: SymbolId,
    pub containing_type: TypeId,
    pub decl: &'c MethodDecl,
}

symbol_identity!(FieldSymbol, PropertySymbol, MethodSymbol);

impl<'c> PropertySymbol<'c> {
    pub fn name(&self) -> &'c str {
        &self.decl.name.text
    }
}

impl<'c> MethodSymbol<'c> {
    pub fn name(&self) -> &'c str {
        &self.decl.name.text
    }

    pub fn is_static(&self) -> bool {
        self.decl.is_static()
    }
}

/// A field, property, or method of a source type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberSymbol<'c> {
    Field(FieldSymbol<'c>),
    Property(PropertySymbol<'c>),
    Method(MethodSymbol<'c>),
}

impl<'c> MemberSymbol<'c> {
    pub fn id(&self) -> SymbolId {
        match self {
            MemberSymbol::Field(f) => f.id,
            MemberSymbol::Property(p) => p.id,
            MemberSymbol::Method(m) => m.id,
        }
    }

    pub fn name(&self) -> &'c str {
        match self {
            MemberSymbol::Field(f) => &f.declarator.name.text,
            MemberSymbol::Property(p) => &p.decl.name.text,
            MemberSymbol::Method(m) => &m.decl.name.text,
        }
    }

    pub fn containing_type(&self) -> TypeId {
        match self {
            MemberSymbol::Field(f) => f.containing_type,
            MemberSymbol::Property(p) => p.containing_type,
            MemberSymbol::Method(m) => m.containing_type,
        }
    }

    /// The field or property this symbol denotes, if it is one.
    pub fn as_backing(&self) -> Option<BackingMember<'c>> {
        match *self {
            MemberSymbol::Field(f) => Some(BackingMember::Field(f)),
            MemberSymbol::Property(p) => Some(BackingMember::Property(p)),
            MemberSymbol::Method(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackingKind {
    Field,
    Property,
}

/// A field or property that can hold a `DependencyProperty`,
/// `DependencyPropertyKey`, or `RoutedEvent` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackingMember<'c> {
    Field(FieldSymbol<'c>),
    Property(PropertySymbol<'c>),
}

impl<'c> BackingMember<'c> {
    pub fn id(&self) -> SymbolId {
        match self {
            BackingMember::Field(f) => f.id,
            BackingMember::Property(p) => p.id,
        }
    }

    pub fn kind(&self) -> BackingKind {
        match self {
            BackingMember::Field(_) => BackingKind::Field,
            BackingMember::Property(_) => BackingKind::Property,
        }
    }

    pub fn tree(&self) -> TreeId {
        self.id().tree
    }

    pub fn identifier(&self) -> &'c Identifier {
        match self {
            BackingMember::Field(f) => &f.declarator.name,
            BackingMember::Property(p) => &p.decl.name,
        }
    }

    pub fn name(&self) -> &'c str {
        &self.identifier().text
    }

    pub fn containing_type(&self) -> TypeId {
        match self {
            BackingMember::Field(f) => f.containing_type,
            BackingMember::Property(p) => p.containing_type,
        }
    }

    pub fn declared_type(&self) -> &'c TypeSyntax {
        match self {
            BackingMember::Field(f) => &f.field.ty,
            BackingMember::Property(p) => &p.decl.ty,
        }
    }

    pub fn modifiers(&self) -> &'c Modifiers {
        match self {
            BackingMember::Field(f) => &f.field.modifiers,
            BackingMember::Property(p) => &p.decl.modifiers,
        }
    }

    pub fn is_static(&self) -> bool {
        self.modifiers().is_static_or_const()
    }

    /// The declaration-site value: a field initializer, a property
    /// initializer, or the expression a getter-only property returns.
    pub fn initializer(&self) -> Option<&'c Expr> {
        match self {
            BackingMember::Field(f) => f.declarator.initializer.as_ref(),
            BackingMember::Property(p) => p
                .decl
                .initializer
                .as_ref()
                .or_else(|| p.decl.getter_only_expression()),
        }
    }

    /// Span of the member name.
    pub fn span(&self) -> Span {
        self.identifier().span
    }

    pub fn as_member(&self) -> MemberSymbol<'c> {
        match *self {
            BackingMember::Field(f) => MemberSymbol::Field(f),
            BackingMember::Property(p) => MemberSymbol::Property(p),
        }
    }
}

/// One declaration of a type; partial types have several.
#[derive(Debug, Clone, Copy)]
pub struct TypeDeclaration<'c> {
    pub tree: TreeId,
    pub decl: &'c TypeDecl,
}

/// A source type with all of its partial declarations merged.
#[derive(Debug, Clone)]
pub struct TypeSymbol<'c> {
    pub id: TypeId,
    pub name: &'c str,
    /// Namespace-qualified name, nested types joined with `.`.
    pub full_name: String,
    pub namespace: Option<&'c str>,
    /// Number of generic type parameters.
    pub arity: usize,
    pub containing_type: Option<TypeId>,
    pub declarations: Vec<TypeDeclaration<'c>>,
    members: Vec<MemberSymbol<'c>>,
    member_index: HashMap<&'c str, Vec<usize>>,
}

impl<'c> TypeSymbol<'c> {
    pub(crate) fn new(
        id: TypeId,
        decl: &'c TypeDecl,
        containing_type: Option<TypeId>,
    ) -> Self {
        Self {
            id,
            name: &decl.name.text,
            full_name: decl.full_name(),
            namespace: decl.namespace.as_deref(),
            arity: decl.type_parameters.len(),
            containing_type,
            declarations: Vec::new(),
            members: Vec::new(),
            member_index: HashMap::new(),
        }
    }

    /// Merge one declaration's members. Returns nested type declarations.
    pub(crate) fn add_declaration(&mut self, tree: TreeId, decl: &'c TypeDecl) -> Vec<&'c TypeDecl> {
        self.declarations.push(TypeDeclaration { tree, decl });
        let mut nested = Vec::new();
        for member in &decl.members {
            match member {
                MemberDecl::Field(field) => {
                    for declarator in &field.declarators {
                        self.add_member(MemberSymbol::Field(FieldSymbol {
                            id: SymbolId {
                                tree,
                                node: declarator.node_id,
                            },
                            containing_type: self.id,
                            field,
                            declarator,
                        }));
                    }
                }
                MemberDecl::Property(decl) => self.add_member(MemberSymbol::Property(PropertySymbol {
                    id: SymbolId {
                        tree,
                        node: decl.node_id,
                    },
                    containing_type: self.id,
                    decl,
                })),
                MemberDecl::Method(decl) => self.add_member(MemberSymbol::Method(MethodSymbol {
                    id: SymbolId {
                        tree,
                        node: decl.node_id,
                    },
                    containing_type: self.id,
                    decl,
                })),
                MemberDecl::Type(decl) => nested.push(decl),
                MemberDecl::Constructor(_) | MemberDecl::Other(_) => {}
            }
        }
        nested
    }

    fn add_member(&mut self, member: MemberSymbol<'c>) {
        self.member_index
            .entry(member.name())
            .or_default()
            .push(self.members.len());
        self.members.push(member);
    }

    pub fn is_partial(&self) -> bool {
        self.declarations.iter().any(|d| d.decl.is_partial())
    }

    /// All members in declaration order, across partial declarations.
    pub fn members(&self) -> &[MemberSymbol<'c>] {
        &self.members
    }

    /// Members declared directly on this type with the given name.
    pub fn members_named<'s>(&'s self, name: &str) -> impl Iterator<Item = MemberSymbol<'c>> + 's {
        self.member_index
            .get(name)
            .into_iter()
            .flatten()
            .map(move |&i| self.members[i])
    }

    pub fn backing_members(&self) -> impl Iterator<Item = BackingMember<'c>> + '_ {
        self.members.iter().filter_map(MemberSymbol::as_backing)
    }

    pub fn properties(&self) -> impl Iterator<Item = PropertySymbol<'c>> + '_ {
        self.members.iter().filter_map(|m| match m {
            MemberSymbol::Property(p) => Some(*p),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodSymbol<'c>> + '_ {
        self.members.iter().filter_map(|m| match m {
            MemberSymbol::Method(m) => Some(*m),
            _ => None,
        })
    }

    /// Static constructors from every partial declaration.
    pub fn static_constructors(&self) -> impl Iterator<Item = (TreeId, &'c ConstructorDecl)> + '_ {
        self.declarations.iter().flat_map(|d| {
            d.decl
                .constructors()
                .filter(|c| c.is_static())
                .map(move |c| (d.tree, c))
        })
    }
}
