use std::fmt;

use crate::component::ComponentType;
use crate::query::{Column, Fetch, Mode, Query};

/// Where a binding reads its components from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// The live component sets of the registry.
    Query,
    /// The components reported as changed since the last pass of the channel.
    Change,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Change => "change handler",
        })
    }
}

/// A binding declaration, resolved into a [`Query`] at the start of every pass.
pub(crate) struct Binding<S> {
    pub(crate) kind:  BindingKind,
    pub(crate) mode:  Mode,
    pub(crate) types: Vec<ComponentType>,
    assign:           Box<dyn Fn(&mut S, Vec<Column>) + Send>,
}

impl<S> Binding<S> {
    fn new<Q: Fetch>(
        kind: BindingKind,
        mode: Mode,
        assign: impl Fn(&mut S, Query<Q>) + Send + 'static,
    ) -> Self {
        Self {
            kind,
            mode,
            types: Q::types(),
            assign: Box::new(move |system, columns| assign(system, Query::from_columns(columns))),
        }
    }

    /// Stores the resolved columns into `system`.
    pub(crate) fn assign(&self, system: &mut S, columns: Vec<Column>) {
        (self.assign)(system, columns)
    }
}

/// Collects the binding declarations of a system of type `S`.
///
/// Bindings are resolved in declaration order,
/// queries before change handlers.
pub struct Binder<S> {
    pub(crate) queries:  Vec<Binding<S>>,
    pub(crate) handlers: Vec<Binding<S>>,
}

impl<S> Binder<S> {
    pub(crate) fn new() -> Self { Self { queries: Vec::new(), handlers: Vec::new() } }

    /// Declares a query over the live components of the types in `Q`.
    ///
    /// `assign` receives the freshly resolved query at the start of every pass.
    pub fn query<Q: Fetch>(
        &mut self,
        mode: Mode,
        assign: impl Fn(&mut S, Query<Q>) + Send + 'static,
    ) -> &mut Self {
        self.queries.push(Binding::new(BindingKind::Query, mode, assign));
        self
    }

    /// Declares a change handler over the components of the types in `Q`
    /// that were reported as changed since the last pass of the channel.
    ///
    /// `assign` receives the resolved view at the start of every pass,
    /// including passes with no changes, where the view is empty.
    pub fn on_change<Q: Fetch>(
        &mut self,
        mode: Mode,
        assign: impl Fn(&mut S, Query<Q>) + Send + 'static,
    ) -> &mut Self {
        self.handlers.push(Binding::new(BindingKind::Change, mode, assign));
        self
    }

    /// The number of declared queries and change handlers.
    pub fn len(&self) -> usize { self.queries.len() + self.handlers.len() }

    /// Whether no binding has been declared.
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}
