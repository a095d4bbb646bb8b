//! Typed joins over component collections.
//!
//! A [`Query`] is built once per pass for each binding a system declares.
//! It holds one column per requested component type,
//! copied out of the registry (or out of a change set) when the pass starts,
//! and joins them into rows of typed references.
//!
//! # Join semantics
//! The join is a strict zip:
//! row `i` consists of the `i`-th component of every column,
//! and the join stops as soon as any column is exhausted.
//! Thus a query yields as many rows as its shortest column,
//! and the `K`-th slot of a row always comes from the `K`-th requested type.

use std::marker::PhantomData;
use std::{fmt, iter, ops};

use crate::component::{AnyComp, Comp, CompId, Component, ComponentType, Handle, Projection};
use crate::Result;

mod tuple_impls;


/// Selects how the collection for a requested component type is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Only components of exactly the requested type.
    #[default]
    Exact,
    /// Components of the requested type and of every type that declares it as an ancestor.
    Inherit,
}

/// One entry of a resolved column.
#[doc(hidden)]
#[derive(Clone)]
pub struct Slot {
    comp:    AnyComp,
    /// Views the component as the requested type if it is a strict subtype.
    project: Option<Projection>,
}

impl Slot {
    pub(crate) fn exact(comp: AnyComp) -> Self { Self { comp, project: None } }

    pub(crate) fn projected(comp: AnyComp, project: Projection) -> Self {
        Self { comp, project: Some(project) }
    }
}

/// The resolved collection for one requested component type.
#[doc(hidden)]
pub type Column = Vec<Slot>;

/// A tuple of 1 to 5 component types that can be queried together.
pub trait Fetch: 'static {
    /// The number of requested component types.
    const ARITY: usize;

    /// The tuple of typed references yielded for each row.
    type Item;

    /// The requested component types, in slot order.
    fn types() -> Vec<ComponentType>;

    /// Builds the `index`-th row out of `columns`.
    ///
    /// `index` must be less than the length of every column.
    #[doc(hidden)]
    fn fetch(columns: &[Column], index: usize) -> Self::Item;
}

/// A join over the collections of the component types in `Q`.
///
/// Queries are bound into systems by the scheduler at the start of every pass.
/// A query is a snapshot:
/// components added or removed after it was built are not reflected.
pub struct Query<Q: Fetch> {
    columns: Vec<Column>,
    _ph:     PhantomData<fn() -> Q>,
}

impl<Q: Fetch> Query<Q> {
    pub(crate) fn from_columns(columns: Vec<Column>) -> Self {
        debug_assert_eq!(columns.len(), Q::ARITY, "one column per requested type");
        Self { columns, _ph: PhantomData }
    }

    /// The number of rows, i.e. the length of the shortest column.
    pub fn len(&self) -> usize { self.columns.iter().map(Vec::len).min().unwrap_or(0) }

    /// Whether the query yields no rows.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// The number of components resolved for the slot at `position` (zero-based).
    ///
    /// Unlike [`len`](Self::len), this is not truncated by the other columns.
    pub fn column_len(&self, position: usize) -> Option<usize> {
        self.columns.get(position).map(Vec::len)
    }

    /// Iterates over the rows of the join.
    pub fn iter(&self) -> Iter<'_, Q> { Iter { query: self, next: 0, len: self.len() } }
}

impl<Q: Fetch> Default for Query<Q> {
    fn default() -> Self { Self::from_columns(iter::repeat_with(Vec::new).take(Q::ARITY).collect()) }
}

impl<Q: Fetch> Clone for Query<Q> {
    fn clone(&self) -> Self { Self { columns: self.columns.clone(), _ph: PhantomData } }
}

impl<Q: Fetch> fmt::Debug for Query<Q> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Query")
            .field("types", &Q::types())
            .field("columns", &self.columns.iter().map(Vec::len).collect::<Vec<_>>())
            .finish()
    }
}

impl<'t, Q: Fetch> IntoIterator for &'t Query<Q> {
    type Item = Row<Q>;
    type IntoIter = Iter<'t, Q>;

    fn into_iter(self) -> Iter<'t, Q> { self.iter() }
}

/// Iterator over the rows of a [`Query`].
pub struct Iter<'t, Q: Fetch> {
    query: &'t Query<Q>,
    next:  usize,
    len:   usize,
}

impl<'t, Q: Fetch> Iterator for Iter<'t, Q> {
    type Item = Row<Q>;

    fn next(&mut self) -> Option<Row<Q>> {
        if self.next >= self.len {
            return None;
        }

        let items = Q::fetch(&self.query.columns, self.next);
        self.next += 1;
        Some(Row { items })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<'t, Q: Fetch> ExactSizeIterator for Iter<'t, Q> {}

/// One row of a [`Query`].
///
/// The accessors `get1()` to `get5()` return the slot of the corresponding requested type.
pub struct Row<Q: Fetch> {
    items: Q::Item,
}

impl<Q: Fetch> Row<Q> {
    /// Borrows the row as a tuple of references.
    pub fn as_tuple(&self) -> &Q::Item { &self.items }

    /// Unwraps the row into a tuple of references.
    pub fn into_inner(self) -> Q::Item { self.items }
}

impl<Q: Fetch> Clone for Row<Q>
where
    Q::Item: Clone,
{
    fn clone(&self) -> Self { Self { items: self.items.clone() } }
}

impl<Q: Fetch> fmt::Debug for Row<Q>
where
    Q::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Row").field(&self.items).finish()
    }
}

/// A reference to a component, viewed as type `T`.
///
/// In [`Mode::Inherit`], the underlying component may be of a subtype of `T`;
/// [`component_type`](Self::component_type) returns its concrete type.
pub struct Ref<T: Component> {
    comp:    AnyComp,
    project: Option<Projection>,
    _ph:     PhantomData<fn() -> T>,
}

impl<T: Component> Ref<T> {
    fn from_slot(slot: &Slot) -> Self {
        Self { comp: slot.comp.clone(), project: slot.project.clone(), _ph: PhantomData }
    }

    /// The concrete type of the underlying component.
    pub fn component_type(&self) -> ComponentType { self.comp.component_type() }

    /// Whether the underlying component is exactly of type `T`.
    pub fn is_exact(&self) -> bool { self.project.is_none() }

    /// Borrows the type-erased handle of the underlying component.
    pub fn as_any(&self) -> &AnyComp { &self.comp }

    /// Recovers a typed handle if the underlying component is exactly of type `U`.
    pub fn downcast<U: Component>(&self) -> Option<Comp<U>> { self.comp.downcast::<U>() }

    /// Reports that the underlying component has been mutated to the registry that owns it.
    ///
    /// # Errors
    /// Returns [`Error::OwnerNotFound`](crate::Error::OwnerNotFound)
    /// if no live registry has ever added this component.
    pub fn mark_changed(&self) -> Result<()> { self.comp.mark_changed() }
}

impl<T: Component> Handle for Ref<T> {
    fn erase(&self) -> AnyComp { self.comp.clone() }

    fn id(&self) -> CompId { self.comp.id() }
}

impl<T: Component> ops::Deref for Ref<T> {
    type Target = T;

    fn deref(&self) -> &T {
        let value = match &self.project {
            None => self.comp.value(),
            Some(project) => (**project)(self.comp.value())
                .expect("projection is only attached to components of its source type"),
        };
        value.downcast_ref::<T>().expect("TypeId mismatch")
    }
}

impl<T: Component> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self { comp: self.comp.clone(), project: self.project.clone(), _ph: PhantomData }
    }
}

impl<T: Component> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ref<{}>({:?})", std::any::type_name::<T>(), self.comp)
    }
}
