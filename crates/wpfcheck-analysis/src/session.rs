//! Analysis session: one semantic model plus the walker pools.
//!
//! An [`AnalysisSession`] is the entry point consumers hold on to. It owns
//! the [`SemanticModel`] for a compilation and the pools that accessor walks
//! draw from, and exposes every resolver operation as a method.
//!
//! # Concurrency Model
//!
//! The session is `Send + Sync`. Resolution borrows the model immutably and
//! keeps its mutable state per call; walkers are checked out of a
//! `Mutex`-guarded pool and reset before they go back. Callers can share one
//! session across threads and resolve different symbols in parallel.

use tracing::info;
use wpfcheck_core::{CancellationToken, Cancelled};
use wpfcheck_syntax::nodes::{Body, Invocation};

use crate::binding::BindingContext;
use crate::clr::{
    find_attached_accessors_with, find_clr_property_with, resolve_accessor_method_with,
    resolve_attached_accessors_with, resolve_clr_property_with, AttachedAccessors, BodyMatcher,
    ClrAccessorResolution, PooledWalkers,
};
use crate::invocation;
use crate::registration::{self, override_metadata_calls, PropertyRegistration};
use crate::routed_event::{self, RoutedEventRegistration};
use crate::semantic::{Compilation, SemanticModel};
use crate::symbols::{BackingMember, MethodSymbol, PropertySymbol};
use crate::walker::{AccessorMatch, GetterWalker, SetterWalker, WalkerPool};

#[derive(Debug)]
pub struct AnalysisSession<'c> {
    model: SemanticModel<'c>,
    getters: WalkerPool<GetterWalker>,
    setters: WalkerPool<SetterWalker>,
}

impl<'c> AnalysisSession<'c> {
    pub fn new(compilation: &'c Compilation) -> Self {
        Self::from_model(SemanticModel::new(compilation))
    }

    pub fn from_model(model: SemanticModel<'c>) -> Self {
        Self {
            model,
            getters: WalkerPool::new(),
            setters: WalkerPool::new(),
        }
    }

    pub fn model(&self) -> &SemanticModel<'c> {
        &self.model
    }

    fn walkers(&self) -> PooledWalkers<'_> {
        PooledWalkers {
            getters: &self.getters,
            setters: &self.setters,
        }
    }

    // ------------------------------------------------------------------------
    // Registrations
    // ------------------------------------------------------------------------

    pub fn resolve_registration(
        &self,
        member: BackingMember<'c>,
        token: &CancellationToken,
    ) -> Result<Option<PropertyRegistration<'c>>, Cancelled> {
        registration::resolve_registration(&self.model, member, token)
    }

    pub fn resolve_override_metadata(
        &self,
        invocation: &'c Invocation,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<Option<PropertyRegistration<'c>>, Cancelled> {
        registration::resolve_override_metadata(&self.model, invocation, ctx, token)
    }

    pub fn resolve_routed_event(
        &self,
        member: BackingMember<'c>,
        token: &CancellationToken,
    ) -> Result<Option<RoutedEventRegistration<'c>>, Cancelled> {
        routed_event::resolve_routed_event(&self.model, member, token)
    }

    /// Every dependency-property registration in the compilation, in type
    /// then declaration order.
    pub fn registrations(&self, token: &CancellationToken) -> Result<Vec<PropertyRegistration<'c>>, Cancelled> {
        let mut found = Vec::new();
        for member in self.model.dependency_property_members() {
            found.extend(self.resolve_registration(member, token)?);
        }
        info!(registrations = found.len(), "resolved registrations");
        Ok(found)
    }

    pub fn routed_events(&self, token: &CancellationToken) -> Result<Vec<RoutedEventRegistration<'c>>, Cancelled> {
        let mut found = Vec::new();
        for member in self.model.routed_event_members() {
            found.extend(self.resolve_routed_event(member, token)?);
        }
        info!(routed_events = found.len(), "resolved routed events");
        Ok(found)
    }

    /// Every `OverrideMetadata` call in a static constructor that resolves.
    pub fn metadata_overrides(
        &self,
        token: &CancellationToken,
    ) -> Result<Vec<PropertyRegistration<'c>>, Cancelled> {
        let mut found = Vec::new();
        for ty in self.model.types() {
            for (invocation, ctx) in override_metadata_calls(&self.model, ty.id) {
                found.extend(self.resolve_override_metadata(invocation, &ctx, token)?);
            }
        }
        Ok(found)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn resolve_clr_property(
        &self,
        property: PropertySymbol<'c>,
        token: &CancellationToken,
    ) -> Result<ClrAccessorResolution<'c>, Cancelled> {
        resolve_clr_property_with(&self.model, property, &self.walkers(), token)
    }

    pub fn resolve_attached_accessors(
        &self,
        getter: Option<MethodSymbol<'c>>,
        setter: Option<MethodSymbol<'c>>,
        token: &CancellationToken,
    ) -> Result<ClrAccessorResolution<'c>, Cancelled> {
        resolve_attached_accessors_with(&self.model, getter, setter, &self.walkers(), token)
    }

    pub fn resolve_accessor_method(
        &self,
        method: MethodSymbol<'c>,
        token: &CancellationToken,
    ) -> Result<Option<ClrAccessorResolution<'c>>, Cancelled> {
        resolve_accessor_method_with(&self.model, method, &self.walkers(), token)
    }

    pub fn find_clr_property(
        &self,
        registration: &PropertyRegistration<'c>,
        token: &CancellationToken,
    ) -> Result<Option<PropertySymbol<'c>>, Cancelled> {
        find_clr_property_with(&self.model, registration, &self.walkers(), token)
    }

    pub fn find_attached_accessors(
        &self,
        registration: &PropertyRegistration<'c>,
        token: &CancellationToken,
    ) -> Result<AttachedAccessors<'c>, Cancelled> {
        find_attached_accessors_with(&self.model, registration, &self.walkers(), token)
    }

    /// Match the `GetValue` call in `body` with a pooled walker.
    pub fn match_getter(
        &self,
        body: &Body,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<AccessorMatch, Cancelled> {
        self.walkers().match_getter(&self.model, body, ctx, token)
    }

    /// Match the `SetValue`/`SetCurrentValue` call in `body` with a pooled
    /// walker.
    pub fn match_setter(
        &self,
        body: &Body,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<AccessorMatch, Cancelled> {
        self.walkers().match_setter(&self.model, body, ctx, token)
    }

    // ------------------------------------------------------------------------
    // Call shapes
    // ------------------------------------------------------------------------

    pub fn is_get_value_call(&self, invocation: &Invocation) -> bool {
        invocation::is_get_value_call(invocation)
    }

    pub fn is_set_value_call(&self, invocation: &Invocation) -> bool {
        invocation::is_set_value_call(invocation)
    }

    pub fn is_set_current_value_call(&self, invocation: &Invocation) -> bool {
        invocation::is_set_current_value_call(invocation)
    }

    /// Idle walkers, getters then setters.
    pub fn idle_walkers(&self) -> (usize, usize) {
        (self.getters.idle_count(), self.setters.idle_count())
    }
}
