//! Change tracking for the scheduling channels.
//!
//! Each channel owns a [`ChangeSet`] that collects the components reported as mutated
//! since the last pass of that channel.
//! A pass swaps the live set for an empty one and reads the swapped-out snapshot,
//! so changes reported during a pass are only visible to the next pass.

use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::component::AnyComp;
use crate::store::{Buckets, TypeInfo};
use crate::system::Channel;


/// The components mutated since the last pass of one channel.
#[derive(Default)]
pub(crate) struct ChangeSet {
    live: Mutex<Buckets>,
}

impl ChangeSet {
    /// Records a mutation of `comp`.
    ///
    /// Returns `false` if the component was already recorded since the last swap.
    pub(crate) fn report(&self, comp: &AnyComp, info: &Arc<TypeInfo>) -> bool {
        let mut live = self.live.lock();
        live.insert_with(comp.clone(), || Arc::clone(info))
    }

    /// Replaces the live set with an empty one and returns the old set.
    pub(crate) fn swap(&self) -> Buckets {
        let mut live = self.live.lock();
        mem::take(&mut *live)
    }

    /// The number of recorded mutations not yet consumed by a pass.
    pub(crate) fn pending(&self) -> usize { self.live.lock().total() }
}

/// The change sets of both channels of a registry.
#[derive(Default)]
pub(crate) struct Tracker {
    sets: [ChangeSet; 2],
}

impl Tracker {
    /// Records a mutation of `comp` in the change sets of both channels.
    pub(crate) fn report(&self, comp: &AnyComp, info: &Arc<TypeInfo>) {
        for (set, channel) in self.sets.iter().zip(Channel::ALL) {
            if !set.report(comp, info) {
                log::trace!("{comp:?} already pending for the {channel} channel");
            }
        }
    }

    pub(crate) fn get(&self, channel: Channel) -> &ChangeSet { &self.sets[channel.index()] }
}
