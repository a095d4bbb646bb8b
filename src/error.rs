//! Errors raised by registry operations.
//!
//! All errors stem from misuse by the caller and are reported synchronously;
//! nothing is retried internally.

/// An error raised by a [`Registry`](crate::Registry) operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The component is already in the per-type set of the registry.
    #[error("component of type {component} is already registered in {registry}")]
    DuplicateRegistration {
        /// The component type name.
        component: &'static str,
        /// The debug name of the registry.
        registry:  String,
    },

    /// The component is owned by another live registry.
    #[error("component of type {component} is owned by {owner} and cannot be added to {registry}")]
    OwnedElsewhere {
        /// The component type name.
        component: &'static str,
        /// The debug name of the owning registry.
        owner:     String,
        /// The debug name of the registry the component was added to.
        registry:  String,
    },

    /// The component type has never been added to the registry.
    #[error("component type {component} has never been registered in {registry}")]
    NotRegistered {
        /// The component type name.
        component: &'static str,
        /// The debug name of the registry.
        registry:  String,
    },

    /// A component was created without a registry before any default registry existed.
    #[error("cannot create a component of type {component}: no default registry has been constructed")]
    NoDefaultRegistry {
        /// The component type name.
        component: &'static str,
    },

    /// A change was reported for a component that no live registry owns.
    #[error("component of type {component} is not owned by any registry")]
    OwnerNotFound {
        /// The component type name.
        component: &'static str,
    },
}

/// The result type of registry operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
