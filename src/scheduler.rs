//! The scheduler keeps the ordered system lists of both channels
//! and runs the systems of one channel in a pass.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::query::Column;
use crate::store::Buckets;
use crate::system::{Binder, Binding, Channel, System};
use crate::tracer::Tracer;


/// A registered system with its binding declarations, erased over the system type.
pub(crate) trait Scheduled: Send {
    fn debug_name(&self) -> &str;

    /// Resolves every binding for the current pass and stores it into the system.
    fn bind(&mut self, pass: &Pass<'_>);

    fn run(&mut self);
}

/// A system together with the bindings it declared on registration.
pub(crate) struct Entry<S: System> {
    system:     S,
    binder:     Binder<S>,
    debug_name: String,
}

impl<S: System> Entry<S> {
    /// Collects the bindings of `system` and runs its initialization hook.
    pub(crate) fn new(mut system: S) -> Self {
        let mut binder = Binder::new();
        S::bind(&mut binder);
        system.init();

        let debug_name = system.debug_name();
        Self { system, binder, debug_name }
    }

    pub(crate) fn binding_count(&self) -> usize { self.binder.len() }
}

impl<S: System> Scheduled for Entry<S> {
    fn debug_name(&self) -> &str { &self.debug_name }

    fn bind(&mut self, pass: &Pass<'_>) {
        for binding in &self.binder.queries {
            // Copy the columns out so that the store lock is not held by the system.
            let columns = pass.store.lock().columns(&binding.types, binding.mode);
            pass.assign(&self.debug_name, &mut self.system, binding, columns);
        }

        for binding in &self.binder.handlers {
            let columns = pass.changes.columns(&binding.types, binding.mode);
            pass.assign(&self.debug_name, &mut self.system, binding, columns);
        }
    }

    fn run(&mut self) { self.system.run() }
}

/// The state shared by all systems in one pass of a channel.
pub(crate) struct Pass<'t> {
    pub(crate) channel: Channel,
    /// The live component sets of the registry.
    pub(crate) store:   &'t Mutex<Buckets>,
    /// The change set swapped out at the start of the pass.
    pub(crate) changes: &'t Buckets,
    pub(crate) tracer:  &'t dyn Tracer,
}

impl<'t> Pass<'t> {
    fn assign<S>(
        &self,
        debug_name: &str,
        system: &mut S,
        binding: &Binding<S>,
        columns: Vec<Column>,
    ) {
        let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
        log::trace!(
            "Binding {} of {debug_name} resolved to {rows} rows on the {} channel",
            binding.kind,
            self.channel,
        );
        self.tracer.bind(self.channel, debug_name, binding.kind, &binding.types, rows);
        binding.assign(system, columns);
    }
}

type Shared = Arc<Mutex<Box<dyn Scheduled>>>;

/// The ordered system lists of both channels.
#[derive(Default)]
pub(crate) struct Schedule {
    lists: [Mutex<Vec<Shared>>; 2],
}

impl Schedule {
    /// Appends a system to the end of the list of `channel`.
    pub(crate) fn push(&self, channel: Channel, entry: Box<dyn Scheduled>) {
        self.lists[channel.index()].lock().push(Arc::new(Mutex::new(entry)));
    }

    /// The number of systems registered on `channel`.
    pub(crate) fn len(&self, channel: Channel) -> usize { self.lists[channel.index()].lock().len() }

    /// Runs every system of `pass.channel` in registration order.
    ///
    /// The list is snapshotted first,
    /// so systems registered during the pass only run from the next pass.
    /// Returns the number of systems run.
    pub(crate) fn run(&self, pass: &Pass<'_>) -> usize {
        let systems: Vec<Shared> = self.lists[pass.channel.index()].lock().clone();

        for system in &systems {
            let mut system = system.lock();

            system.bind(pass);

            pass.tracer.start_run_system(pass.channel, system.debug_name());
            system.run();
            pass.tracer.end_run_system(pass.channel, system.debug_name());
        }

        systems.len()
    }
}
