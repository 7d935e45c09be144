//! Dependency-property convention checks.
//!
//! Each check consumes the resolvers of an [`AnalysisSession`] and reports
//! [`FindingOutput`]s. Types are checked in parallel over the one shared
//! session; findings are sorted by the response that carries them.

use std::collections::HashSet;
use std::fmt;

use rayon::prelude::*;
use tracing::{debug, info};

use wpfcheck_analysis::symbols::{SymbolId, TreeId};
use wpfcheck_analysis::{
    AccessorMatch, AccessorSide, AnalysisSession, BackingMember, ClrAccessorResolution,
    ConsistencyState, MethodSymbol, PropertyReference, PropertyRegistration, PropertySymbol,
    ResolvedType, TypeId,
};
use wpfcheck_core::config::Config;
use wpfcheck_core::output::{FindingOutput, Severity};
use wpfcheck_core::{CancellationToken, Cancelled, Location, Span};
use wpfcheck_syntax::naming::{backing_member_name, getter_method_name, key_member_name, setter_method_name};

// ============================================================================
// Check Catalogue
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckId {
    BackingMemberName,
    KeyMemberName,
    ClrPropertyName,
    AttachedAccessorName,
    ClrPropertyType,
    InconsistentAccessors,
    AmbiguousAccessor,
    ReadOnlySetterBypassesKey,
}

impl CheckId {
    pub const ALL: [CheckId; 8] = [
        CheckId::BackingMemberName,
        CheckId::KeyMemberName,
        CheckId::ClrPropertyName,
        CheckId::AttachedAccessorName,
        CheckId::ClrPropertyType,
        CheckId::InconsistentAccessors,
        CheckId::AmbiguousAccessor,
        CheckId::ReadOnlySetterBypassesKey,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CheckId::BackingMemberName => "WPF0001",
            CheckId::KeyMemberName => "WPF0002",
            CheckId::ClrPropertyName => "WPF0003",
            CheckId::AttachedAccessorName => "WPF0004",
            CheckId::ClrPropertyType => "WPF0012",
            CheckId::InconsistentAccessors => "WPF0032",
            CheckId::AmbiguousAccessor => "WPF0033",
            CheckId::ReadOnlySetterBypassesKey => "WPF0040",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CheckId::BackingMemberName => "DependencyProperty member should be named <Name>Property",
            CheckId::KeyMemberName => "DependencyPropertyKey member should be named <Name>PropertyKey",
            CheckId::ClrPropertyName => "CLR property should match the registered name",
            CheckId::AttachedAccessorName => "Attached property accessors should be named Get<Name> and Set<Name>",
            CheckId::ClrPropertyType => "CLR property type should match the registered value type",
            CheckId::InconsistentAccessors => "Getter and setter should use the same dependency property",
            CheckId::AmbiguousAccessor => "Accessor should call GetValue or SetValue exactly once",
            CheckId::ReadOnlySetterBypassesKey => "Read-only dependency property should be set through its key",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            CheckId::InconsistentAccessors | CheckId::ReadOnlySetterBypassesKey => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Look up a check by its `WPFNNNN` id, ignoring case.
    pub fn from_id(id: &str) -> Option<CheckId> {
        CheckId::ALL.into_iter().find(|c| c.id().eq_ignore_ascii_case(id))
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

fn reference_text(reference: &PropertyReference<'_>) -> String {
    match reference {
        PropertyReference::Member(member) => member.name().to_string(),
        PropertyReference::Unresolved(text) => text.clone(),
    }
}

// ============================================================================
// Checker
// ============================================================================

/// Runs the enabled checks over every type in a session.
pub struct Checker<'s, 'c> {
    session: &'s AnalysisSession<'c>,
    config: &'s Config,
}

/// Findings for one type.
struct TypeFindings<'k, 's, 'c> {
    checker: &'k Checker<'s, 'c>,
    findings: Vec<FindingOutput>,
    seen: HashSet<SymbolId>,
}

impl<'s, 'c> Checker<'s, 'c> {
    pub fn new(session: &'s AnalysisSession<'c>, config: &'s Config) -> Self {
        Self { session, config }
    }

    pub fn is_enabled(&self, check: CheckId) -> bool {
        !self.config.is_disabled(check.id())
    }

    /// Run every enabled check. Findings are in type order.
    pub fn run(&self, token: &CancellationToken) -> Result<Vec<FindingOutput>, Cancelled> {
        let per_type = self
            .session
            .model()
            .types()
            .par_iter()
            .map(|ty| self.check_type(ty.id, token))
            .collect::<Result<Vec<_>, Cancelled>>()?;
        let findings: Vec<FindingOutput> = per_type.into_iter().flatten().collect();
        info!(findings = findings.len(), "checks complete");
        Ok(findings)
    }

    /// Run every enabled check over the members of one type.
    pub fn check_type(&self, ty: TypeId, token: &CancellationToken) -> Result<Vec<FindingOutput>, Cancelled> {
        let model = self.session.model();
        let mut registrations = Vec::new();
        for member in model.type_symbol(ty).backing_members() {
            registrations.extend(self.session.resolve_registration(member, token)?);
        }
        debug!(
            ty = model.type_symbol(ty).full_name.as_str(),
            registrations = registrations.len(),
            "checking type"
        );

        let mut out = TypeFindings {
            checker: self,
            findings: Vec::new(),
            seen: HashSet::new(),
        };
        for registration in &registrations {
            out.check_member_name(registration);
        }
        for registration in registrations.iter().filter(|r| owns_accessors(r, &registrations)) {
            if registration.is_attached() {
                out.check_attached(registration, token)?;
            } else {
                out.check_clr_property(registration, token)?;
            }
        }
        Ok(out.findings)
    }

    fn location(&self, tree: TreeId, span: Span) -> Location {
        self.session.model().tree(tree).location(span)
    }
}

/// The registration whose accessors are checked: the public property of a
/// read-only pair, or the key when nothing public uses it.
fn owns_accessors<'c>(registration: &PropertyRegistration<'c>, all: &[PropertyRegistration<'c>]) -> bool {
    if !registration.is_key() {
        return true;
    }
    !all
        .iter()
        .any(|other| !other.is_key() && other.key_field == Some(registration.backing))
}

impl<'k, 's, 'c> TypeFindings<'k, 's, 'c> {
    fn report(&mut self, check: CheckId, location: Location, message: String, related: Vec<Location>) {
        if !self.checker.is_enabled(check) {
            return;
        }
        self.findings.push(FindingOutput {
            id: check.id().to_string(),
            severity: check.severity(),
            message,
            location,
            related,
        });
    }

    fn member_location(&self, member: BackingMember<'c>) -> Location {
        self.checker.location(member.tree(), member.span())
    }

    // ------------------------------------------------------------------------
    // WPF0001, WPF0002
    // ------------------------------------------------------------------------

    fn check_member_name(&mut self, registration: &PropertyRegistration<'c>) {
        let Some(name) = registration.name() else {
            return;
        };
        let actual = registration.backing.name();
        if registration.is_key() {
            let expected = key_member_name(name);
            if actual != expected {
                let message = format!(
                    "DependencyPropertyKey '{}' is registered as '{}' and should be named '{}'",
                    actual, name, expected
                );
                self.report(CheckId::KeyMemberName, self.member_location(registration.backing), message, Vec::new());
            }
        } else {
            let expected = backing_member_name(name);
            if actual != expected {
                let message = format!(
                    "DependencyProperty '{}' is registered as '{}' and should be named '{}'",
                    actual, name, expected
                );
                self.report(CheckId::BackingMemberName, self.member_location(registration.backing), message, Vec::new());
            }
        }
    }

    // ------------------------------------------------------------------------
    // CLR wrappers: WPF0003, WPF0012, consistency
    // ------------------------------------------------------------------------

    fn check_clr_property(
        &mut self,
        registration: &PropertyRegistration<'c>,
        token: &CancellationToken,
    ) -> Result<(), Cancelled> {
        let session = self.checker.session;
        let Some(property) = session.find_clr_property(registration, token)? else {
            return Ok(());
        };
        if !self.seen.insert(property.id) {
            return Ok(());
        }
        let location = self.checker.location(property.id.tree, property.decl.name.span);

        if let Some(name) = registration.name() {
            if property.name() != name {
                let message = format!(
                    "CLR property '{}' wraps '{}', which is registered as '{}'",
                    property.name(),
                    registration.backing.name(),
                    name
                );
                self.report(CheckId::ClrPropertyName, location.clone(), message, Vec::new());
            }
        }

        self.check_property_type(registration, property, &location);

        let resolution = session.resolve_clr_property(property, token)?;
        let tree = property.id.tree;
        self.check_consistency(&resolution, property.name(), location, [tree, tree]);
        Ok(())
    }

    fn check_property_type(
        &mut self,
        registration: &PropertyRegistration<'c>,
        property: PropertySymbol<'c>,
        location: &Location,
    ) {
        let model = self.checker.session.model();
        let declared = model.resolve_type_syntax(&property.decl.ty, property.id.tree, Some(property.containing_type));
        let registered = &registration.value_type.resolved;
        if declared.is_unknown() || registered.is_unknown() {
            return;
        }
        if &declared != registered {
            let message = format!(
                "CLR property '{}' is of type '{}' but '{}' is registered with value type '{}'",
                property.name(),
                model.type_display(&declared),
                registration.backing.name(),
                model.type_display(registered)
            );
            self.report(CheckId::ClrPropertyType, location.clone(), message, Vec::new());
        }
    }

    // ------------------------------------------------------------------------
    // Attached accessors: WPF0004, consistency
    // ------------------------------------------------------------------------

    fn check_attached(
        &mut self,
        registration: &PropertyRegistration<'c>,
        token: &CancellationToken,
    ) -> Result<(), Cancelled> {
        let session = self.checker.session;
        let accessors = session.find_attached_accessors(registration, token)?;
        let methods: Vec<MethodSymbol<'c>> = [accessors.getter, accessors.setter].into_iter().flatten().collect();
        let fresh = methods.iter().filter(|m| self.seen.insert(m.id)).count();
        if fresh == 0 {
            return Ok(());
        }

        if let Some(name) = registration.name() {
            let expected = [
                (accessors.getter, getter_method_name(name)),
                (accessors.setter, setter_method_name(name)),
            ];
            for (method, expected) in expected {
                let Some(method) = method else { continue };
                if method.name() != expected {
                    let message = format!(
                        "Accessor '{}' for attached property '{}' should be named '{}'",
                        method.name(),
                        name,
                        expected
                    );
                    let location = self.checker.location(method.id.tree, method.decl.name.span);
                    self.report(CheckId::AttachedAccessorName, location, message, Vec::new());
                }
            }
        }

        let resolution = session.resolve_attached_accessors(accessors.getter, accessors.setter, token)?;
        let anchor = accessors.getter.or(accessors.setter);
        if let Some(anchor) = anchor {
            let location = self.checker.location(anchor.id.tree, anchor.decl.name.span);
            let getter_tree = accessors.getter.map_or(anchor.id.tree, |m| m.id.tree);
            let setter_tree = accessors.setter.map_or(anchor.id.tree, |m| m.id.tree);
            let display = registration.name().unwrap_or_else(|| anchor.name());
            self.check_consistency(&resolution, display, location, [getter_tree, setter_tree]);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // WPF0032, WPF0033, WPF0040
    // ------------------------------------------------------------------------

    /// `trees` holds the getter's and the setter's tree, in that order.
    fn check_consistency(
        &mut self,
        resolution: &ClrAccessorResolution<'c>,
        name: &str,
        location: Location,
        trees: [TreeId; 2],
    ) {
        match &resolution.state {
            ConsistencyState::Consistent | ConsistencyState::NotFound => {}
            ConsistencyState::Inconsistent { getter, setter } => {
                let message = format!(
                    "'{}' gets '{}' but sets '{}'",
                    name,
                    reference_text(getter),
                    reference_text(setter)
                );
                self.report(CheckId::InconsistentAccessors, location, message, Vec::new());
            }
            ConsistencyState::Ambiguous { side } => {
                let (matched, tree, call) = match side {
                    AccessorSide::Getter => (&resolution.getter, trees[0], "GetValue"),
                    AccessorSide::Setter => (&resolution.setter, trees[1], "SetValue or SetCurrentValue"),
                };
                let related = self.candidate_locations(matched, tree);
                let message = format!(
                    "'{}' {} calls {} {} times; expected exactly one",
                    name,
                    side_label(*side),
                    call,
                    related.len()
                );
                self.report(CheckId::AmbiguousAccessor, location, message, related);
            }
            ConsistencyState::ReadOnlySetterBypassesKey { property, key } => {
                let call_location = resolution
                    .setter
                    .call
                    .as_ref()
                    .map(|call| self.checker.location(trees[1], call.span))
                    .unwrap_or(location);
                let message = format!(
                    "read-only '{}' is set through '{}'; use '{}'",
                    name,
                    property.name(),
                    key.name()
                );
                self.report(CheckId::ReadOnlySetterBypassesKey, call_location, message, Vec::new());
            }
        }
    }

    fn candidate_locations(&self, matched: &AccessorMatch, tree: TreeId) -> Vec<Location> {
        matched
            .candidates
            .iter()
            .map(|span| self.checker.location(tree, *span))
            .collect()
    }
}

fn side_label(side: AccessorSide) -> &'static str {
    match side {
        AccessorSide::Getter => "getter",
        AccessorSide::Setter => "setter",
    }
}
