use parking_lot::Mutex;

use crate::component::ComponentType;
use crate::system::{BindingKind, Channel};
use crate::tracer::Tracer;

/// A tracer event with the arguments relevant to assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartPass { channel: Channel, changes: usize },
    Bind { system: String, kind: BindingKind, types: Vec<&'static str>, rows: usize },
    StartRun { system: String },
    EndRun { system: String },
    EndPass { channel: Channel, systems: usize },
}

/// Collects every event in call order.
#[derive(Default)]
pub struct RecordingTracer {
    events: Mutex<Vec<Event>>,
}

impl RecordingTracer {
    fn push(&self, event: Event) { self.events.lock().push(event) }

    /// Takes the recorded events, leaving the tracer empty.
    pub fn take(&self) -> Vec<Event> { std::mem::take(&mut *self.events.lock()) }

    /// The names of the systems run so far, in order.
    pub fn runs(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::StartRun { system } => Some(system.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Tracer for RecordingTracer {
    fn start_pass(&self, _registry: &str, channel: Channel, changes: usize) {
        self.push(Event::StartPass { channel, changes });
    }

    fn bind(
        &self,
        _channel: Channel,
        debug_name: &str,
        kind: BindingKind,
        types: &[ComponentType],
        rows: usize,
    ) {
        self.push(Event::Bind {
            system: debug_name.to_string(),
            kind,
            types: types.iter().map(ComponentType::name).collect(),
            rows,
        });
    }

    fn start_run_system(&self, _channel: Channel, debug_name: &str) {
        self.push(Event::StartRun { system: debug_name.to_string() });
    }

    fn end_run_system(&self, _channel: Channel, debug_name: &str) {
        self.push(Event::EndRun { system: debug_name.to_string() });
    }

    fn end_pass(&self, _registry: &str, channel: Channel, systems: usize) {
        self.push(Event::EndPass { channel, systems });
    }
}
