//! Per-type component sets.
//!
//! A [`Buckets`] maps each component type to the set of components of exactly that type.
//! The same structure backs the live component sets of a registry
//! and the change sets of its scheduling channels.

use std::any::TypeId;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::component::{Ancestor, AnyComp, ComponentType};
use crate::query::{Column, Mode, Slot};

/// Static information about a component type seen by a registry.
pub(crate) struct TypeInfo {
    ancestors: Vec<Ancestor>,
}

impl TypeInfo {
    pub(crate) fn new(ty: ComponentType) -> Self { Self { ancestors: ty.ancestors() } }

    /// Returns the ancestor entry if this type is a strict subtype of `ty`.
    pub(crate) fn ancestor(&self, ty: TypeId) -> Option<&Ancestor> {
        self.ancestors.iter().find(|ancestor| ancestor.component_type().id() == ty)
    }
}

#[derive(Clone)]
pub(crate) struct Bucket {
    info:  Arc<TypeInfo>,
    comps: IndexSet<AnyComp>,
}

/// Maps component types to sets of components, in the order the types were first seen.
#[derive(Clone, Default)]
pub(crate) struct Buckets {
    map: IndexMap<TypeId, Bucket>,
}

impl Buckets {
    /// Inserts a component into the set of its type,
    /// creating the set with `info` if the type has not been seen.
    ///
    /// Returns `false` if the component is already in the set.
    pub(crate) fn insert_with(
        &mut self,
        comp: AnyComp,
        info: impl FnOnce() -> Arc<TypeInfo>,
    ) -> bool {
        let bucket = self
            .map
            .entry(comp.component_type().id())
            .or_insert_with(|| Bucket { info: info(), comps: IndexSet::new() });
        bucket.comps.insert(comp)
    }

    /// Removes a component from the set of its type.
    ///
    /// Returns `None` if the type has never been seen,
    /// otherwise whether the component was in the set.
    pub(crate) fn remove(&mut self, comp: &AnyComp) -> Option<bool> {
        let bucket = self.map.get_mut(&comp.component_type().id())?;
        Some(bucket.comps.shift_remove(comp))
    }

    pub(crate) fn info(&self, ty: TypeId) -> Option<&Arc<TypeInfo>> {
        self.map.get(&ty).map(|bucket| &bucket.info)
    }

    pub(crate) fn contains(&self, comp: &AnyComp) -> bool {
        match self.map.get(&comp.component_type().id()) {
            Some(bucket) => bucket.comps.contains(comp),
            None => false,
        }
    }

    /// The number of components of exactly type `ty`.
    pub(crate) fn len_of(&self, ty: TypeId) -> usize {
        self.map.get(&ty).map_or(0, |bucket| bucket.comps.len())
    }

    /// The number of components over all types.
    pub(crate) fn total(&self) -> usize { self.map.values().map(|bucket| bucket.comps.len()).sum() }

    /// Copies out the collection of components that a query slot of type `ty` reads.
    ///
    /// In [`Mode::Exact`], this is the set of `ty` itself.
    /// In [`Mode::Inherit`], the set of `ty` is followed by the sets of
    /// every strict subtype of `ty`, in the order the types were first seen.
    pub(crate) fn column(&self, ty: ComponentType, mode: Mode) -> Column {
        let mut column = Vec::new();

        if let Some(bucket) = self.map.get(&ty.id()) {
            column.extend(bucket.comps.iter().map(|comp| Slot::exact(comp.clone())));
        }

        if mode == Mode::Inherit {
            for bucket in self.map.values() {
                if let Some(ancestor) = bucket.info.ancestor(ty.id()) {
                    column.extend(
                        bucket
                            .comps
                            .iter()
                            .map(|comp| Slot::projected(comp.clone(), Arc::clone(&ancestor.project))),
                    );
                }
            }
        }

        column
    }

    /// Copies out one column per requested type.
    pub(crate) fn columns(&self, types: &[ComponentType], mode: Mode) -> Vec<Column> {
        types.iter().map(|&ty| self.column(ty, mode)).collect()
    }
}
