//! Shared fixtures for unit tests and benchmarks.

#![allow(missing_docs)]

use parking_lot::Once;

mod comps;
pub use comps::*;

mod event_tracer;
pub use event_tracer::EventTracer;

mod recording;
pub use recording::{Event, RecordingTracer};

/// Installs `env_logger` once per process.
pub fn init() {
    static SET_LOGGER_ONCE: Once = Once::new();
    SET_LOGGER_ONCE.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
