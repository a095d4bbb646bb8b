//! The registry owns components and the systems that process them.
//!
//! Each registry keeps, per component type, the set of live components of exactly that type.
//! It also remembers every component it has ever been given,
//! which is how [`Registry::find_owner`] locates the registry of a component.
//! A component is owned by at most one live registry.
//!
//! All registries of the process are tracked in a global list.
//! The first registry constructed with [`Builder::eligible_as_main`] (the default)
//! becomes the process-wide default registry returned by [`Registry::main`]
//! and used by [`Comp::new`](crate::Comp::new).
//! The election happens exactly once and is never revised.

use std::sync::{Arc, Weak};
use std::{any, fmt};

use parking_lot::Mutex;

use crate::change::Tracker;
use crate::component::{CompId, Component, ComponentType, Erased, Handle};
use crate::scheduler::{Entry, Pass, Schedule, Scheduled};
use crate::store::{Buckets, TypeInfo};
use crate::system::{Channel, System};
use crate::tracer::{self, Tracer};
use crate::{Error, Result};

mod builder;
pub use builder::Builder;

#[cfg(test)]
mod tests;

/// Every registry ever constructed, in construction order.
static REGISTRIES: Mutex<Vec<Weak<Shared>>> = parking_lot::const_mutex(Vec::new());

/// Serializes ownership checks with the claims that follow them.
static CLAIMS: Mutex<()> = parking_lot::const_mutex(());

/// The process-wide default registry.
static MAIN: Mutex<Option<Registry>> = parking_lot::const_mutex(None);

struct Shared {
    name:     String,
    /// The live components, by exact type.
    ///
    /// A single lock guards the sets of all types.
    store:    Mutex<Buckets>,
    /// Every component ever added, used for ownership lookup.
    owned:    Mutex<Vec<Weak<Erased>>>,
    changes:  Tracker,
    schedule: Schedule,
}

/// A handle to a registry of components and systems.
///
/// Cloning a `Registry` returns another handle to the same registry.
#[derive(Clone)]
pub struct Registry {
    shared: Arc<Shared>,
}

static_assertions::assert_impl_all!(Registry: Send, Sync);

impl Default for Registry {
    fn default() -> Self { Self::new() }
}

impl Registry {
    /// Constructs a registry with the default configuration.
    pub fn new() -> Self { Builder::default().build() }

    /// Starts configuring a registry.
    pub fn builder() -> Builder { Builder::default() }

    pub(crate) fn create(name: String, eligible_as_main: bool) -> Self {
        let registry = Self {
            shared: Arc::new(Shared {
                name,
                store: Mutex::default(),
                owned: Mutex::default(),
                changes: Tracker::default(),
                schedule: Schedule::default(),
            }),
        };

        {
            let mut registries = REGISTRIES.lock();
            registries.retain(|weak| weak.strong_count() > 0);
            registries.push(Arc::downgrade(&registry.shared));
        }
        log::debug!("Constructed registry {}", registry.name());

        if eligible_as_main {
            let mut main = MAIN.lock();
            if main.is_none() {
                log::debug!("Elected {} as the default registry", registry.name());
                *main = Some(registry.clone());
            }
        }

        registry
    }

    /// The process-wide default registry,
    /// or `None` if no eligible registry has been constructed yet.
    pub fn main() -> Option<Registry> { MAIN.lock().clone() }

    /// Every live registry, in construction order.
    pub fn all() -> Vec<Registry> {
        REGISTRIES.lock().iter().filter_map(Weak::upgrade).map(|shared| Registry { shared }).collect()
    }

    /// The name of this registry.
    pub fn name(&self) -> &str { &self.shared.name }

    /// Finds the live registry that owns `comp`.
    ///
    /// This scans every component ever added to every registry.
    pub fn find_owner(comp: &impl Handle) -> Option<Registry> {
        Self::owner_among(&Self::all(), comp.id()).cloned()
    }

    fn owner_among(registries: &[Registry], id: CompId) -> Option<&Registry> {
        registries.iter().find(|registry| {
            registry.shared.owned.lock().iter().any(|weak| CompId::of(weak.as_ptr()) == id)
        })
    }

    /// Adds a component to the set of its type and claims it for this registry.
    ///
    /// A component removed from its owner may be added to it again.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateRegistration`] if the component is already in the set.
    /// Returns [`Error::OwnedElsewhere`] if another live registry owns the component.
    pub fn add(&self, comp: &impl Handle) -> Result<()> {
        let comp = comp.erase();
        let ty = comp.component_type();

        // released after the guard, so that a last registry handle is never dropped under it
        let registries;
        let _claims = CLAIMS.lock();
        registries = Self::all();

        let owned_here = match Self::owner_among(&registries, comp.id()) {
            Some(owner) if owner != self => {
                return Err(Error::OwnedElsewhere {
                    component: ty.name(),
                    owner:     owner.name().to_string(),
                    registry:  self.name().to_string(),
                });
            }
            owner => owner.is_some(),
        };

        let mut store = self.shared.store.lock();
        if !store.insert_with(comp.clone(), || Arc::new(TypeInfo::new(ty))) {
            return Err(Error::DuplicateRegistration {
                component: ty.name(),
                registry:  self.name().to_string(),
            });
        }
        if !owned_here {
            self.shared.owned.lock().push(comp.downgrade());
        }
        drop(store);

        log::trace!("Added {comp:?} to {}", self.name());
        Ok(())
    }

    /// Removes a component from the set of its type.
    ///
    /// Removing a component that is not in the set has no effect
    /// as long as its type has been added before.
    /// The registry remains the owner of a removed component.
    ///
    /// # Errors
    /// Returns [`Error::NotRegistered`] if no component of the same type
    /// has ever been added to this registry.
    pub fn remove(&self, comp: &impl Handle) -> Result<()> {
        let comp = comp.erase();

        let removed = self.shared.store.lock().remove(&comp);
        match removed {
            None => Err(self.not_registered(comp.component_type())),
            Some(true) => {
                log::trace!("Removed {comp:?} from {}", self.name());
                Ok(())
            }
            Some(false) => {
                log::trace!("{comp:?} is not in {}, nothing to remove", self.name());
                Ok(())
            }
        }
    }

    /// Reports that a component has been mutated.
    ///
    /// The component becomes visible to the change handlers
    /// of the next pass of each channel, once per pass
    /// no matter how many times it is reported.
    ///
    /// # Errors
    /// Returns [`Error::NotRegistered`] if no component of the same type
    /// has ever been added to this registry.
    pub fn report_change(&self, comp: &impl Handle) -> Result<()> {
        let comp = comp.erase();
        let ty = comp.component_type();

        let info = self.shared.store.lock().info(ty.id()).cloned();
        let info = info.ok_or_else(|| self.not_registered(ty))?;

        self.shared.changes.report(&comp, &info);
        log::trace!("Reported change of {comp:?} to {}", self.name());
        Ok(())
    }

    /// Registers a system at the end of the list of its channel.
    ///
    /// The bindings of the system are collected and [`System::init`] is called immediately.
    /// A system registered during a pass of its channel first runs on the next pass.
    pub fn register<S: System>(&self, system: S) {
        let entry = Entry::new(system);
        log::debug!(
            "Registering system {} with {} bindings on the {} channel of {}",
            entry.debug_name(),
            entry.binding_count(),
            S::CHANNEL,
            self.name(),
        );
        self.shared.schedule.push(S::CHANNEL, Box::new(entry));
    }

    /// Runs one pass of `channel`.
    ///
    /// The pending changes of the channel are swapped out first.
    /// Then each system of the channel, in registration order,
    /// receives fresh queries and change views and is run.
    ///
    /// Panics raised by a system propagate to the caller
    /// and abort the rest of the pass.
    pub fn run_channel(&self, channel: Channel) { self.run_channel_traced(channel, &tracer::Noop) }

    /// Runs one pass of `channel`, reporting scheduling events to `tracer`.
    pub fn run_channel_traced(&self, channel: Channel, tracer: &impl Tracer) {
        let changes = self.shared.changes.get(channel).swap();
        tracer.start_pass(self.name(), channel, changes.total());

        let pass = Pass { channel, store: &self.shared.store, changes: &changes, tracer };
        let systems = self.shared.schedule.run(&pass);

        tracer.end_pass(self.name(), channel, systems);
    }

    /// The number of components of exactly type `T` in this registry.
    pub fn len_of<T: Component>(&self) -> usize {
        self.shared.store.lock().len_of(any::TypeId::of::<T>())
    }

    /// Whether `comp` is currently in the set of its type.
    pub fn contains(&self, comp: &impl Handle) -> bool { self.shared.store.lock().contains(&comp.erase()) }

    /// The number of systems registered on `channel`.
    pub fn system_count(&self, channel: Channel) -> usize { self.shared.schedule.len(channel) }

    /// The number of changes reported since the last pass of `channel`.
    pub fn pending_changes(&self, channel: Channel) -> usize {
        self.shared.changes.get(channel).pending()
    }

    fn not_registered(&self, ty: ComponentType) -> Error {
        Error::NotRegistered { component: ty.name(), registry: self.name().to_string() }
    }
}

impl PartialEq for Registry {
    fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.shared, &other.shared) }
}

impl Eq for Registry {}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry").field("name", &self.shared.name).finish_non_exhaustive()
    }
}
