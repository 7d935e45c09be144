//! Accessor body walkers.
//!
//! A walker descends an accessor body (blocks, expression bodies,
//! conditionals, switch arms, lambdas) and records every qualifying
//! dependency-property accessor call:
//!
//! - [`GetterWalker`] looks for single-argument `GetValue` calls.
//! - [`SetterWalker`] looks for `SetValue` and `SetCurrentValue` calls.
//!
//! The first call moves the walker to `Found`. Any further call, including
//! a repeat of the same call, moves it to `Ambiguous`, which is terminal
//! and discards the first match. The walk still visits the rest of the
//! body so every candidate location is reported.
//!
//! Walkers are reusable. [`WalkerPool`] keeps idle walkers for reuse and
//! hands them out as [`Pooled`] guards that reset the walker when dropped.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;
use wpfcheck_core::{CancellationToken, Cancelled, Span};
use wpfcheck_syntax::nodes::{Argument, Body, Invocation, Stmt};
use wpfcheck_syntax::visitor::walk_body;
use wpfcheck_syntax::{VisitResult, Visitor};

use crate::binding::BindingContext;
use crate::invocation::{
    try_get_get_value_argument, try_get_set_current_value_arguments, try_get_set_value_arguments,
};
use crate::semantic::SemanticModel;

// ============================================================================
// Match results
// ============================================================================

/// State of an accessor match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchState {
    #[default]
    NotFound,
    Found,
    Ambiguous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorCallKind {
    GetValue,
    SetValue,
    SetCurrentValue,
}

/// A matched accessor call. Arguments are owned copies, so a match
/// outlives the walker that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorCall {
    pub kind: AccessorCallKind,
    pub property: Argument,
    /// The value argument of a setter call.
    pub value: Option<Argument>,
    /// Span of the whole invocation.
    pub span: Span,
}

/// Result of walking one accessor body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessorMatch {
    pub state: MatchState,
    /// The single matching call; `None` unless `state` is `Found`.
    pub call: Option<AccessorCall>,
    /// Spans of every qualifying call, in source order.
    pub candidates: Vec<Span>,
}

impl AccessorMatch {
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.state == MatchState::Found
    }

    fn record(&mut self, call: AccessorCall) {
        self.candidates.push(call.span);
        match self.state {
            MatchState::NotFound => {
                self.state = MatchState::Found;
                self.call = Some(call);
            }
            MatchState::Found | MatchState::Ambiguous => {
                self.state = MatchState::Ambiguous;
                self.call = None;
            }
        }
    }
}

// ============================================================================
// Walkers
// ============================================================================

/// Restore a reusable value to its initial state.
pub trait Reset {
    fn reset(&mut self);
}

/// Visitor that classifies every invocation, polling the token at each
/// statement and invocation.
struct InvocationScan<'s, F> {
    token: &'s CancellationToken,
    classify: F,
    result: &'s mut AccessorMatch,
    cancelled: bool,
}

impl<'s, F> InvocationScan<'s, F> {
    fn poll(&mut self) -> VisitResult {
        if self.token.is_cancelled() {
            self.cancelled = true;
            VisitResult::Stop
        } else {
            VisitResult::Continue
        }
    }
}

impl<'a, 's, F> Visitor<'a> for InvocationScan<'s, F>
where
    F: FnMut(&Invocation) -> Option<AccessorCall>,
{
    fn visit_stmt(&mut self, _node: &'a Stmt) -> VisitResult {
        self.poll()
    }

    fn visit_invocation(&mut self, node: &'a Invocation) -> VisitResult {
        if self.poll() == VisitResult::Stop {
            return VisitResult::Stop;
        }
        if let Some(call) = (self.classify)(node) {
            trace!(kind = ?call.kind, span = ?call.span, "accessor call");
            self.result.record(call);
        }
        VisitResult::Continue
    }
}

/// Walk `body`, leaving the outcome in `result`.
fn scan<F>(
    body: &Body,
    token: &CancellationToken,
    result: &mut AccessorMatch,
    classify: F,
) -> Result<(), Cancelled>
where
    F: FnMut(&Invocation) -> Option<AccessorCall>,
{
    token.check()?;
    let mut visitor = InvocationScan {
        token,
        classify,
        result,
        cancelled: false,
    };
    walk_body(&mut visitor, body);
    if visitor.cancelled {
        return Err(Cancelled);
    }
    Ok(())
}

/// Finds the `GetValue` call in a getter body.
#[derive(Debug, Default)]
pub struct GetterWalker {
    result: AccessorMatch,
}

impl GetterWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `body` in `ctx`. The walker is left reset.
    pub fn walk<'c>(
        &mut self,
        model: &SemanticModel<'c>,
        body: &Body,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<AccessorMatch, Cancelled> {
        self.reset();
        let outcome = scan(body, token, &mut self.result, |invocation| {
            try_get_get_value_argument(invocation, model, ctx).map(|property| AccessorCall {
                kind: AccessorCallKind::GetValue,
                property: property.clone(),
                value: None,
                span: invocation.span,
            })
        });
        let result = std::mem::take(&mut self.result);
        outcome.map(|()| result)
    }
}

impl Reset for GetterWalker {
    fn reset(&mut self) {
        self.result = AccessorMatch::default();
    }
}

/// Finds the `SetValue` or `SetCurrentValue` call in a setter body.
#[derive(Debug, Default)]
pub struct SetterWalker {
    result: AccessorMatch,
}

impl SetterWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `body` in `ctx`. The walker is left reset.
    pub fn walk<'c>(
        &mut self,
        model: &SemanticModel<'c>,
        body: &Body,
        ctx: &BindingContext<'c>,
        token: &CancellationToken,
    ) -> Result<AccessorMatch, Cancelled> {
        self.reset();
        let outcome = scan(body, token, &mut self.result, |invocation| {
            let (kind, arguments) = match try_get_set_value_arguments(invocation, model, ctx) {
                Some(arguments) => (AccessorCallKind::SetValue, arguments),
                None => (
                    AccessorCallKind::SetCurrentValue,
                    try_get_set_current_value_arguments(invocation, model, ctx)?,
                ),
            };
            Some(AccessorCall {
                kind,
                property: arguments.property.clone(),
                value: Some(arguments.value.clone()),
                span: invocation.span,
            })
        });
        let result = std::mem::take(&mut self.result);
        outcome.map(|()| result)
    }
}

impl Reset for SetterWalker {
    fn reset(&mut self) {
        self.result = AccessorMatch::default();
    }
}

/// Match the `GetValue` call in `body` with a fresh walker.
pub fn match_getter<'c>(
    model: &SemanticModel<'c>,
    body: &Body,
    ctx: &BindingContext<'c>,
    token: &CancellationToken,
) -> Result<AccessorMatch, Cancelled> {
    GetterWalker::new().walk(model, body, ctx, token)
}

/// Match the `SetValue`/`SetCurrentValue` call in `body` with a fresh walker.
pub fn match_setter<'c>(
    model: &SemanticModel<'c>,
    body: &Body,
    ctx: &BindingContext<'c>,
    token: &CancellationToken,
) -> Result<AccessorMatch, Cancelled> {
    SetterWalker::new().walk(model, body, ctx, token)
}

// ============================================================================
// Pooling
// ============================================================================

/// A bounded pool of idle walkers.
///
/// The lock is held only to push or pop, never during a walk. A poisoned
/// lock is recovered: idle walkers are always reset, so the data cannot be
/// inconsistent.
#[derive(Debug)]
pub struct WalkerPool<T> {
    idle: Mutex<Vec<T>>,
    max_idle: usize,
}

impl<T: Default + Reset> Default for WalkerPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Reset> WalkerPool<T> {
    pub const DEFAULT_MAX_IDLE: usize = 16;

    pub fn new() -> Self {
        Self::with_max_idle(Self::DEFAULT_MAX_IDLE)
    }

    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check out an idle walker, or a new one if none is idle.
    pub fn get(&self) -> Pooled<'_, T> {
        let walker = self.lock().pop().unwrap_or_default();
        Pooled { pool: self, walker }
    }

    /// Number of walkers waiting for reuse.
    pub fn idle_count(&self) -> usize {
        self.lock().len()
    }
}

/// A checked-out walker; returned to its pool, reset, on drop.
#[derive(Debug)]
pub struct Pooled<'p, T: Default + Reset> {
    pool: &'p WalkerPool<T>,
    walker: T,
}

impl<T: Default + Reset> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.walker
    }
}

impl<T: Default + Reset> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.walker
    }
}

impl<T: Default + Reset> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        let mut walker = std::mem::take(&mut self.walker);
        walker.reset();
        let mut idle = self.pool.lock();
        if idle.len() < self.pool.max_idle {
            idle.push(walker);
        }
    }
}
