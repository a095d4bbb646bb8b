//! A two-channel ECS-like runtime built around reference-identified components.
//!
//! # Components, not entities
//! duet has no entity IDs.
//! A [`Component`] is a typed record shared behind a [`Comp`] handle,
//! and its identity is the identity of the allocation.
//! Components are added to a [`Registry`],
//! which keeps one set of live components for each component type.
//!
//! Component types may declare supertypes through [`Component::lineage`].
//! A query in [`Mode::Inherit`](query::Mode::Inherit) for a supertype
//! also yields the components of every subtype, viewed as the supertype.
//!
//! # Systems and channels
//! A [`System`] declares on registration which component types it queries
//! and which component changes it wants to handle, through a [`Binder`].
//! Every system belongs to one of two [`Channel`]s.
//! The host drives each channel with [`Registry::run_channel`],
//! typically the sync channel from a fixed-tick loop
//! and the async channel from a background thread.
//! duet does not spawn any threads itself.
//!
//! A pass of a channel runs the systems of that channel in registration order.
//! Before running a system, the scheduler resolves its bindings afresh
//! and hands the resulting [`Query`] objects to the system.
//!
//! # Change tracking
//! Mutating a component does not go through duet,
//! so the mutator reports it with [`Comp::mark_changed`] or [`Registry::report_change`].
//! Each channel has its own change set.
//! A reported change is seen exactly once by the next pass of each channel,
//! no matter how many times it was reported before that pass.
//! Changes reported during a pass are left for the next pass.
//!
//! ```
//! use duet::query::Mode;
//! use duet::{Binder, Channel, Comp, Component, Query, Registry, System};
//!
//! struct Position(parking_lot::Mutex<f32>);
//! impl Component for Position {}
//!
//! struct Velocity(f32);
//! impl Component for Velocity {}
//!
//! #[derive(Default)]
//! struct Movement {
//!     bodies: Query<(Position, Velocity)>,
//! }
//!
//! impl System for Movement {
//!     const CHANNEL: Channel = Channel::Sync;
//!
//!     fn bind(binder: &mut Binder<Self>) {
//!         binder.query(Mode::Exact, |system, bodies| system.bodies = bodies);
//!     }
//!
//!     fn run(&mut self) {
//!         for row in &self.bodies {
//!             *row.get1().0.lock() += row.get2().0;
//!             row.get1().mark_changed().unwrap();
//!         }
//!     }
//! }
//!
//! let registry = Registry::new();
//! let position = Comp::new_in(&registry, Position(parking_lot::Mutex::new(0.0))).unwrap();
//! Comp::new_in(&registry, Velocity(2.0)).unwrap();
//!
//! registry.register(Movement::default());
//! registry.run_channel(Channel::Sync);
//! registry.run_channel(Channel::Sync);
//!
//! assert_eq!(*position.0.lock(), 4.0);
//! ```

#![warn(missing_docs)]

mod change;

pub mod component;
pub use component::{AnyComp, Comp, CompId, Component, ComponentType, Handle};

mod error;
pub use error::{Error, Result};

pub mod query;
pub use query::{Query, Ref, Row};

pub mod registry;
pub use registry::Registry;

mod scheduler;

mod store;

pub mod system;
pub use system::{Binder, Channel, System};

pub mod tracer;
pub use tracer::Tracer;

#[cfg(any(test, feature = "internal-bench"))]
pub mod test_util;
