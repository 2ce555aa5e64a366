//! Event registration and synchronous dispatch.
//!
//! An [`EventSource`] keeps, per event name, the listeners attached to
//! it. Raising an event walks the listeners in attachment order on the
//! calling thread; the first listener error aborts the dispatch and
//! propagates to the raiser. Events must be declared with
//! [`EventSource::can_raise`] before anything can attach to or raise
//! them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::cache::Cache;
use crate::engine::EngineError;
use crate::geo::Region;
use crate::pipe::Pipe;

/// Data carried by a raised event.
///
/// Lifecycle events carry the region or nothing; per-cell events carry
/// the cell's pipe, mutably, so listeners can accumulate results in it.
#[derive(Debug)]
pub enum Payload<'a> {
    Region(&'a Region),
    Pipe(&'a mut Pipe),
    Empty,
}

impl Payload<'_> {
    /// Variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Region(_) => "region",
            Payload::Pipe(_) => "pipe",
            Payload::Empty => "empty",
        }
    }
}

/// A recipient of raised events.
///
/// Listeners are shared across dispatches and, when the computation is
/// split over a worker pool, across threads. Any per-dispatch state
/// belongs in the pipe, not in the listener.
pub trait Listener: Send + Sync {
    /// Name used to detach the listener and in dispatch logs.
    fn name(&self) -> &str;

    /// Handles one event. Returning an error aborts the dispatch.
    fn process(
        &self,
        event: &str,
        buffer: &dyn Cache,
        payload: &mut Payload<'_>,
    ) -> Result<(), EngineError>;
}

type ListenerTable = HashMap<String, Vec<Arc<dyn Listener>>>;

/// Registry of declared events and their listeners.
#[derive(Default)]
pub struct EventSource {
    listeners: Mutex<ListenerTable>,
}

impl EventSource {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic inside a listener can poison the table mid-dispatch; the
    // map itself stays structurally sound, so keep serving.
    fn table(&self) -> MutexGuard<'_, ListenerTable> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Declares events this source may raise. Declaring an event twice
    /// keeps its existing listeners; empty names are ignored.
    pub fn can_raise(&self, events: &[&str]) {
        let mut table = self.table();
        for event in events {
            if event.is_empty() {
                continue;
            }
            table.entry((*event).to_string()).or_default();
        }
    }

    /// Whether the event has been declared.
    pub fn is_declared(&self, event: &str) -> bool {
        self.table().contains_key(event)
    }

    /// Number of listeners attached to the event, zero if undeclared.
    pub fn listener_count(&self, event: &str) -> usize {
        self.table().get(event).map_or(0, Vec::len)
    }

    /// Attaches a listener to a declared event. Listeners fire in
    /// attachment order.
    pub fn on(&self, event: &str, listener: Arc<dyn Listener>) -> Result<(), EngineError> {
        if event.is_empty() {
            return Err(EngineError::InvalidArgument(
                "event names must not be empty".to_string(),
            ));
        }
        let mut table = self.table();
        let attached = table
            .get_mut(event)
            .ok_or_else(|| EngineError::UnknownEvent(event.to_string()))?;
        debug!(event, listener = listener.name(), "attaching listener");
        attached.push(listener);
        Ok(())
    }

    /// Detaches the first listener with the given name from the event.
    pub fn off(&self, event: &str, name: &str) -> Result<(), EngineError> {
        if event.is_empty() {
            return Err(EngineError::InvalidArgument(
                "event names must not be empty".to_string(),
            ));
        }
        let mut table = self.table();
        let attached = table
            .get_mut(event)
            .ok_or_else(|| EngineError::UnknownEvent(event.to_string()))?;
        let position = attached
            .iter()
            .position(|listener| listener.name() == name)
            .ok_or_else(|| EngineError::UnknownListener {
                event: event.to_string(),
                name: name.to_string(),
            })?;
        attached.remove(position);
        Ok(())
    }

    /// Raises an event, invoking its listeners in attachment order on
    /// the calling thread. The first listener error aborts the dispatch
    /// and propagates; later listeners do not run.
    pub fn raise(
        &self,
        event: &str,
        buffer: &dyn Cache,
        payload: &mut Payload<'_>,
    ) -> Result<(), EngineError> {
        if event.is_empty() {
            return Err(EngineError::InvalidArgument(
                "event names must not be empty".to_string(),
            ));
        }
        // Snapshot under the lock, dispatch outside it. Listeners may
        // attach others or raise further events without deadlocking;
        // they see the table as it was when their dispatch started.
        let snapshot: Vec<Arc<dyn Listener>> = {
            let table = self.table();
            table
                .get(event)
                .ok_or_else(|| EngineError::UnknownEvent(event.to_string()))?
                .clone()
        };
        debug!(event, listeners = snapshot.len(), "raising event");
        for listener in &snapshot {
            listener.process(event, buffer, payload)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoOpCache;

    struct Recorder {
        name: String,
        seen: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Listener for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn process(
            &self,
            event: &str,
            _buffer: &dyn Cache,
            _payload: &mut Payload<'_>,
        ) -> Result<(), EngineError> {
            self.seen.lock().unwrap().push(event.to_string());
            Ok(())
        }
    }

    struct Failing;

    impl Listener for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn process(
            &self,
            _event: &str,
            _buffer: &dyn Cache,
            _payload: &mut Payload<'_>,
        ) -> Result<(), EngineError> {
            Err(EngineError::InvalidArgument("boom".to_string()))
        }
    }

    #[test]
    fn test_raise_invokes_listeners_in_attachment_order() {
        let source = EventSource::new();
        let buffer = NoOpCache::new();
        source.can_raise(&["ping"]);

        let order = Arc::new(Mutex::new(Vec::new()));

        struct Ordered {
            name: String,
            order: Arc<Mutex<Vec<String>>>,
        }
        impl Listener for Ordered {
            fn name(&self) -> &str {
                &self.name
            }
            fn process(
                &self,
                _event: &str,
                _buffer: &dyn Cache,
                _payload: &mut Payload<'_>,
            ) -> Result<(), EngineError> {
                self.order.lock().unwrap().push(self.name.clone());
                Ok(())
            }
        }

        for name in ["first", "second", "third"] {
            source
                .on(
                    "ping",
                    Arc::new(Ordered {
                        name: name.to_string(),
                        order: Arc::clone(&order),
                    }),
                )
                .unwrap();
        }

        source.raise("ping", &buffer, &mut Payload::Empty).unwrap();
        assert_eq!(*order.lock().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn test_on_requires_declared_event() {
        let source = EventSource::new();
        let result = source.on("nope", Recorder::new("r"));
        assert!(matches!(result, Err(EngineError::UnknownEvent(_))));
    }

    #[test]
    fn test_raise_requires_declared_event() {
        let source = EventSource::new();
        let buffer = NoOpCache::new();
        let result = source.raise("nope", &buffer, &mut Payload::Empty);
        assert!(matches!(result, Err(EngineError::UnknownEvent(_))));
    }

    #[test]
    fn test_empty_event_names_are_rejected() {
        let source = EventSource::new();
        let buffer = NoOpCache::new();
        source.can_raise(&[""]);

        assert!(!source.is_declared(""));
        assert!(matches!(
            source.on("", Recorder::new("r")),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            source.raise("", &buffer, &mut Payload::Empty),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_first_error_aborts_dispatch() {
        let source = EventSource::new();
        let buffer = NoOpCache::new();
        source.can_raise(&["ping"]);

        let after = Recorder::new("after");
        source.on("ping", Arc::new(Failing)).unwrap();
        source.on("ping", Arc::clone(&after) as Arc<dyn Listener>).unwrap();

        let result = source.raise("ping", &buffer, &mut Payload::Empty);
        assert!(result.is_err());
        assert!(after.seen().is_empty(), "listener after the failure ran");
    }

    #[test]
    fn test_off_detaches_by_name() {
        let source = EventSource::new();
        let buffer = NoOpCache::new();
        source.can_raise(&["ping"]);

        let recorder = Recorder::new("recorder");
        source
            .on("ping", Arc::clone(&recorder) as Arc<dyn Listener>)
            .unwrap();
        assert_eq!(source.listener_count("ping"), 1);

        source.off("ping", "recorder").unwrap();
        assert_eq!(source.listener_count("ping"), 0);
        source.raise("ping", &buffer, &mut Payload::Empty).unwrap();
        assert!(recorder.seen().is_empty());

        assert!(matches!(
            source.off("ping", "recorder"),
            Err(EngineError::UnknownListener { .. })
        ));
    }

    #[test]
    fn test_declaring_twice_keeps_listeners() {
        let source = EventSource::new();
        source.can_raise(&["ping"]);
        source.on("ping", Recorder::new("r")).unwrap();
        source.can_raise(&["ping", "pong"]);
        assert_eq!(source.listener_count("ping"), 1);
        assert!(source.is_declared("pong"));
    }

    #[test]
    fn test_listener_may_raise_during_dispatch() {
        struct Chained {
            source: Arc<EventSource>,
        }
        impl Listener for Chained {
            fn name(&self) -> &str {
                "chained"
            }
            fn process(
                &self,
                _event: &str,
                buffer: &dyn Cache,
                payload: &mut Payload<'_>,
            ) -> Result<(), EngineError> {
                self.source.raise("inner", buffer, payload)
            }
        }

        let source = Arc::new(EventSource::new());
        let buffer = NoOpCache::new();
        source.can_raise(&["outer", "inner"]);

        let recorder = Recorder::new("recorder");
        source
            .on(
                "outer",
                Arc::new(Chained {
                    source: Arc::clone(&source),
                }),
            )
            .unwrap();
        source
            .on("inner", Arc::clone(&recorder) as Arc<dyn Listener>)
            .unwrap();

        source.raise("outer", &buffer, &mut Payload::Empty).unwrap();
        assert_eq!(recorder.seen(), ["inner"]);
    }
}
