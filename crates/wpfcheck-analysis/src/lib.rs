//! Dependency-property analysis for wpfcheck.
//!
//! This crate recognizes WPF dependency-property and routed-event patterns
//! over syntax trees from `wpfcheck-syntax`:
//! - Semantic model: type resolution, partial-class merging, expression binding
//! - Invocation matchers for `GetValue`, `SetValue`, and `SetCurrentValue`
//! - Accessor body walkers and their pools
//! - Registration resolution through `AddOwner`, keys, and aliases
//! - CLR accessor consistency for wrappers and attached `GetX`/`SetX` pairs
//! - Routed-event registration resolution
//!
//! [`AnalysisSession`] bundles the model and the pools behind one interface.

pub mod binding;
pub mod clr;
pub mod invocation;
pub mod known;
pub mod metadata;
pub mod registration;
pub mod routed_event;
pub mod semantic;
pub mod session;
pub mod symbols;
pub mod walker;

pub use binding::{Binding, BindingContext, InvokedMethod};
pub use clr::{
    find_attached_accessors, find_clr_property, resolve_accessor_method, resolve_attached_accessors,
    resolve_clr_property, AccessorSide, AttachedAccessors, ClrAccessorResolution, ConsistencyState,
    PropertyReference,
};
pub use invocation::{
    is_get_value_call, is_set_current_value_call, is_set_value_call, try_get_get_value_argument,
    try_get_set_current_value_arguments, try_get_set_value_arguments,
};
pub use known::{KnownMethod, KnownType};
pub use metadata::PropertyMetadataInfo;
pub use registration::{
    resolve_override_metadata, resolve_registration, PropertyRegistration, RegisteredName,
    RegisteredNameSource, RegistrationKind, MAX_RESOLUTION_DEPTH,
};
pub use routed_event::{resolve_routed_event, RoutedEventKind, RoutedEventRegistration};
pub use semantic::{Compilation, ResolvedType, SemanticModel, TypeReference};
pub use session::AnalysisSession;
pub use symbols::{BackingKind, BackingMember, MethodSymbol, PropertySymbol, TypeId, TypeSymbol};
pub use walker::{
    match_getter, match_setter, AccessorCall, AccessorCallKind, AccessorMatch, MatchState, WalkerPool,
};
