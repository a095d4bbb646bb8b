//! Components are the typed data records stored in a [`Registry`].
//!
//! A component is identified by reference, not by value:
//! two components holding equal data are still two different components.
//! Components are shared behind an [`Arc`],
//! so a component type that needs to mutate picks its own interior mutability
//! (e.g. a [`parking_lot::Mutex`] field or atomics)
//! and calls [`Comp::mark_changed`] afterwards
//! so that systems handling changes observe the mutation on their next pass.
//!
//! Rust has no subclassing, so component types declare their supertypes explicitly
//! through [`Component::lineage`].
//! A supertype is viewed through a projection from the subtype,
//! typically a field that embeds the parent record.

use std::any::{self, Any, TypeId};
use std::sync::{Arc, Weak};
use std::{fmt, hash, ops};

use crate::{Error, Registry, Result};

mod lineage;
pub(crate) use lineage::Projection;
pub use lineage::{Ancestor, Lineage};


/// The type-erased form of a component value.
pub(crate) type Erased = dyn Any + Send + Sync;

/// A data record that can be registered in a [`Registry`].
///
/// Component types must be thread-safe because
/// both scheduling channels may read the same component concurrently.
pub trait Component: Any + Send + Sync + Sized {
    /// Declares the supertypes of this component type.
    ///
    /// The default implementation declares no supertype.
    ///
    /// ```
    /// use duet::component::{Component, Lineage};
    ///
    /// struct Shape { sides: u32 }
    /// impl Component for Shape {}
    ///
    /// struct Square { shape: Shape, side: f32 }
    /// impl Component for Square {
    ///     fn lineage(lineage: &mut Lineage<Self>) { lineage.extends::<Shape>(|square| &square.shape); }
    /// }
    /// ```
    fn lineage(_lineage: &mut Lineage<Self>) {}
}

/// Identifies a component type at runtime.
#[derive(Clone, Copy)]
pub struct ComponentType {
    id:      TypeId,
    name:    &'static str,
    lineage: fn() -> Vec<Ancestor>,
}

impl ComponentType {
    /// Returns the type token of `T`.
    pub fn of<T: Component>() -> Self {
        Self { id: TypeId::of::<T>(), name: any::type_name::<T>(), lineage: Lineage::<T>::resolve }
    }

    /// The [`TypeId`] of the component type.
    pub fn id(&self) -> TypeId { self.id }

    /// The name of the component type, for diagnostics only.
    pub fn name(&self) -> &'static str { self.name }

    /// Computes the transitive supertypes of this component type.
    pub(crate) fn ancestors(&self) -> Vec<Ancestor> { (self.lineage)() }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for ComponentType {}

impl hash::Hash for ComponentType {
    fn hash<H: hash::Hasher>(&self, state: &mut H) { self.id.hash(state) }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.name) }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.name) }
}

/// The identity of a component.
///
/// Two handles have the same `CompId` if and only if they refer to the same component.
/// An ID may be reused by a new component after every handle of the old one is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompId(usize);

impl CompId {
    pub(crate) fn of<T: ?Sized>(ptr: *const T) -> Self { Self(ptr as *const () as usize) }
}

/// Anything that refers to a component.
pub trait Handle {
    /// Returns a type-erased handle to the same component.
    fn erase(&self) -> AnyComp;

    /// Returns the identity of the component.
    fn id(&self) -> CompId;
}

/// A type-erased component handle.
///
/// Equality and hashing follow component identity.
#[derive(Clone)]
pub struct AnyComp {
    value: Arc<Erased>,
    ty:    ComponentType,
}

impl AnyComp {
    /// The concrete type of the component.
    pub fn component_type(&self) -> ComponentType { self.ty }

    /// Recovers a typed handle if the component is exactly of type `T`.
    pub fn downcast<T: Component>(&self) -> Option<Comp<T>> {
        Arc::clone(&self.value).downcast::<T>().ok().map(|value| Comp { value })
    }

    /// Borrows the component value if it is exactly of type `T`.
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> { self.value.downcast_ref::<T>() }

    /// Reports that the component has been mutated to the registry that owns it.
    ///
    /// # Errors
    /// Returns [`Error::OwnerNotFound`] if no live registry has ever added this component.
    pub fn mark_changed(&self) -> Result<()> {
        let owner = Registry::find_owner(self)
            .ok_or(Error::OwnerNotFound { component: self.ty.name() })?;
        owner.report_change(self)
    }

    pub(crate) fn value(&self) -> &Erased { &*self.value }

    pub(crate) fn downgrade(&self) -> Weak<Erased> { Arc::downgrade(&self.value) }
}

impl Handle for AnyComp {
    fn erase(&self) -> AnyComp { self.clone() }

    fn id(&self) -> CompId { CompId::of(Arc::as_ptr(&self.value)) }
}

impl PartialEq for AnyComp {
    fn eq(&self, other: &Self) -> bool { self.id() == other.id() }
}

impl Eq for AnyComp {}

impl hash::Hash for AnyComp {
    fn hash<H: hash::Hasher>(&self, state: &mut H) { self.id().hash(state) }
}

impl fmt::Debug for AnyComp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@{:#x}", self.ty, self.id().0)
    }
}

/// A typed handle to a component of type `T`.
pub struct Comp<T: Component> {
    value: Arc<T>,
}

impl<T: Component> Comp<T> {
    /// Creates a component and adds it to the process-wide default registry.
    ///
    /// # Errors
    /// Returns [`Error::NoDefaultRegistry`] if no registry has been elected as the default yet.
    pub fn new(value: T) -> Result<Self> {
        let registry = Registry::main()
            .ok_or(Error::NoDefaultRegistry { component: any::type_name::<T>() })?;
        Self::new_in(&registry, value)
    }

    /// Creates a component and adds it to `registry`.
    ///
    /// # Errors
    /// Never fails for a fresh value;
    /// the error type is shared with [`Registry::add`].
    pub fn new_in(registry: &Registry, value: T) -> Result<Self> {
        let comp = Self::detached(value);
        registry.add(&comp)?;
        Ok(comp)
    }

    /// Creates a component that is not registered anywhere.
    pub fn detached(value: T) -> Self { Self { value: Arc::new(value) } }

    /// Returns the registry that owns this component, if any.
    pub fn owner(&self) -> Option<Registry> { Registry::find_owner(self) }

    /// Reports that the component has been mutated to the registry that owns it.
    ///
    /// # Errors
    /// Returns [`Error::OwnerNotFound`] if no live registry has ever added this component.
    pub fn mark_changed(&self) -> Result<()> { self.erase().mark_changed() }

    /// Checks whether two handles refer to the same component.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool { Arc::ptr_eq(&this.value, &other.value) }
}

impl<T: Component> Handle for Comp<T> {
    fn erase(&self) -> AnyComp {
        AnyComp { value: Arc::clone(&self.value) as Arc<Erased>, ty: ComponentType::of::<T>() }
    }

    fn id(&self) -> CompId { CompId::of(Arc::as_ptr(&self.value)) }
}

impl<T: Component> Clone for Comp<T> {
    fn clone(&self) -> Self { Self { value: Arc::clone(&self.value) } }
}

impl<T: Component> ops::Deref for Comp<T> {
    type Target = T;

    fn deref(&self) -> &T { &self.value }
}

impl<T: Component + fmt::Debug> fmt::Debug for Comp<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Comp").field(&*self.value).finish()
    }
}
