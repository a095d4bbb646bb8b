//! Systems are update routines run once per pass of their channel.
//!
//! A system declares its data dependencies when it is registered,
//! through the [`Binder`] passed to [`System::bind`]:
//! each binding names a tuple of component types, a resolution [`Mode`](crate::query::Mode)
//! and a function that stores the resolved [`Query`](crate::Query) into the system.
//! At the start of every pass, the scheduler resolves each binding again
//! and hands the fresh query to the system before calling [`System::run`].

use std::{any, fmt};

mod binder;
pub(crate) use binder::Binding;
pub use binder::{Binder, BindingKind};

/// One of the two independent scheduling cadences of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// The synchronous channel, typically driven by a fixed-tick loop.
    Sync,
    /// The asynchronous channel, typically driven by a background loop.
    Async,
}

impl Channel {
    /// Both channels.
    pub const ALL: [Channel; 2] = [Channel::Sync, Channel::Async];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Sync => 0,
            Self::Async => 1,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Sync => "sync",
            Self::Async => "async",
        })
    }
}

/// An update routine scheduled on one channel of a registry.
///
/// ```
/// use duet::query::Mode;
/// use duet::{Binder, Channel, Component, Query, System};
///
/// struct Mass(f32);
/// impl Component for Mass {}
///
/// #[derive(Default)]
/// struct TotalMass {
///     masses: Query<(Mass,)>,
///     total:  f32,
/// }
///
/// impl System for TotalMass {
///     const CHANNEL: Channel = Channel::Sync;
///
///     fn bind(binder: &mut Binder<Self>) {
///         binder.query(Mode::Exact, |system, masses| system.masses = masses);
///     }
///
///     fn run(&mut self) { self.total = self.masses.iter().map(|row| row.get1().0).sum(); }
/// }
/// ```
pub trait System: Send + Sized + 'static {
    /// The channel this system runs on.
    const CHANNEL: Channel;

    /// Declares the queries and change handlers of this system.
    ///
    /// Called once, when the system is registered.
    fn bind(binder: &mut Binder<Self>);

    /// Called once after registration, before the first pass.
    fn init(&mut self) {}

    /// Runs the system.
    ///
    /// All bindings have been refreshed for the current pass when this is called.
    fn run(&mut self);

    /// The name of this system in logs and tracer events.
    fn debug_name(&self) -> String { any::type_name::<Self>().to_string() }
}
