//! Sink dispatch interface shared by all notification handlers.
//!
//! The watch pipeline calls [`Handler::handle`] once per event for every
//! configured sink. Handlers absorb their own failures: a broken sink must
//! never stop the watch loop or affect other sinks.

use std::sync::Arc;

use crate::event::Event;

/// A notification sink.
#[async_trait::async_trait]
pub trait Handler: Send + Sync + std::fmt::Debug {
    /// Forwards `event` to the sink.
    ///
    /// Implementations log failures instead of returning them.
    async fn handle(&self, event: &Event);
}

/// Handler that discards every event.
#[derive(Debug, Default)]
pub struct NoOpHandler;

impl NoOpHandler {
    /// Creates a new no-op handler.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Handler for NoOpHandler {
    async fn handle(&self, _event: &Event) {}
}

/// Handler that forwards each event to several sinks concurrently.
#[derive(Debug, Clone, Default)]
pub struct MulticastHandler {
    handlers: Vec<Arc<dyn Handler>>,
}

impl MulticastHandler {
    /// Creates a multicast handler with no sinks.
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Adds a sink.
    pub fn add_handler(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered sinks.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

#[async_trait::async_trait]
impl Handler for MulticastHandler {
    async fn handle(&self, event: &Event) {
        let deliveries = self.handlers.iter().map(|handler| handler.handle(event));
        futures::future::join_all(deliveries).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug)]
    struct CountingHandler {
        seen: Arc<AtomicUsize>,
    }

    impl CountingHandler {
        fn new() -> (Self, Arc<AtomicUsize>) {
            let seen = Arc::new(AtomicUsize::new(0));
            (Self { seen: seen.clone() }, seen)
        }
    }

    #[async_trait::async_trait]
    impl Handler for CountingHandler {
        async fn handle(&self, _event: &Event) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pod_event() -> Event {
        Event::new("Pod", "nginx-1", "default", "Created")
    }

    #[tokio::test]
    async fn multicast_reaches_every_handler() {
        let (first, first_seen) = CountingHandler::new();
        let (second, second_seen) = CountingHandler::new();

        let mut multicast = MulticastHandler::new();
        multicast.add_handler(Arc::new(first));
        multicast.add_handler(Arc::new(second));
        multicast.add_handler(Arc::new(NoOpHandler::new()));
        assert_eq!(multicast.handler_count(), 3);

        multicast.handle(&pod_event()).await;
        multicast.handle(&pod_event()).await;

        assert_eq!(first_seen.load(Ordering::SeqCst), 2);
        assert_eq!(second_seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_multicast_is_a_no_op() {
        let multicast = MulticastHandler::default();
        multicast.handle(&pod_event()).await;
        assert_eq!(multicast.handler_count(), 0);
    }
}
