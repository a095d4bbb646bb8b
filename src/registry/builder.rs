use std::sync::atomic::{AtomicUsize, Ordering};

use super::Registry;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Configures a [`Registry`] before it is constructed.
///
/// ```
/// let registry = duet::registry::Builder::default().name("physics").eligible_as_main(false).build();
/// assert_eq!(registry.name(), "physics");
/// ```
pub struct Builder {
    name:             Option<String>,
    eligible_as_main: bool,
}

impl Default for Builder {
    fn default() -> Self { Self { name: None, eligible_as_main: true } }
}

impl Builder {
    /// Sets the name of the registry in logs, errors and `Debug` output.
    ///
    /// Defaults to `registry#<n>`, numbered in construction order.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets whether the registry may become the process-wide default registry.
    ///
    /// The first eligible registry ever built becomes the default.
    /// Defaults to `true`.
    pub fn eligible_as_main(mut self, eligible: bool) -> Self {
        self.eligible_as_main = eligible;
        self
    }

    /// Constructs the registry.
    pub fn build(self) -> Registry {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let name = self.name.unwrap_or_else(|| format!("registry#{id}"));
        Registry::create(name, self.eligible_as_main)
    }
}
