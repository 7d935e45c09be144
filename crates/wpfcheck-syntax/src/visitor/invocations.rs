// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! InvocationCollector visitor for gathering invocations by member name.
//!
//! Used to find statement-position calls such as
//! `XProperty.OverrideMetadata(...)` in static constructors, which no member
//! initializer points at.
//!
//! ```ignore
//! let calls = InvocationCollector::collect_named(&unit, "OverrideMetadata");
//! for call in calls {
//!     println!("{:?}", call.span);
//! }
//! ```

use super::dispatch::{walk_body, walk_compilation_unit};
use super::traits::{VisitResult, Visitor};
use crate::helpers::invocation_name;
use crate::nodes::{Body, CompilationUnit, Invocation};

/// Collects invocations in source order, optionally filtered by the simple
/// name of the invoked member.
pub struct InvocationCollector<'a> {
    name: Option<&'a str>,
    invocations: Vec<&'a Invocation>,
}

impl<'a> InvocationCollector<'a> {
    pub fn new(name: Option<&'a str>) -> Self {
        Self {
            name,
            invocations: Vec::new(),
        }
    }

    /// Every invocation in `unit` whose member name is `name`.
    pub fn collect_named(unit: &'a CompilationUnit, name: &'a str) -> Vec<&'a Invocation> {
        let mut collector = Self::new(Some(name));
        walk_compilation_unit(&mut collector, unit);
        collector.invocations
    }

    /// Every invocation in `body`, nested ones included.
    pub fn collect_in_body(body: &'a Body) -> Vec<&'a Invocation> {
        let mut collector = Self::new(None);
        walk_body(&mut collector, body);
        collector.invocations
    }

    pub fn into_invocations(self) -> Vec<&'a Invocation> {
        self.invocations
    }
}

impl<'a> Visitor<'a> for InvocationCollector<'a> {
    fn visit_invocation(&mut self, node: &'a Invocation) -> VisitResult {
        let matches = match self.name {
            Some(name) => invocation_name(node) == Some(name),
            None => true,
        };
        if matches {
            self.invocations.push(node);
        }
        VisitResult::Continue
    }
}
