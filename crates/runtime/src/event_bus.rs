/// Controller trace event.
///
/// Structured text stamped with the session clock, so a replayed session
/// produces an identical trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub at_ms: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, at_ms: u64, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            at_ms,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn records_events_with_timestamp() {
        let mut bus = EventBus::new();
        bus.emit(200, "section", "map");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].at_ms, 200);
        assert_eq!(bus.count("section"), 1);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(0, "k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
