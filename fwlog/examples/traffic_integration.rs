use std::sync::{Arc, Mutex};

use fwlog::{
    Level,
    integrations::{
        ConnectionLogIntegration, Integration, TrafficMiddlewareRegistry, TrafficWriters,
        install_integrations,
    },
    logger_config,
};

/// Stand-in for a connection library that accepts middleware.
#[derive(Default)]
struct Connections {
    writers: Mutex<Option<TrafficWriters>>,
}

impl Connections {
    fn transfer(&self, sent: &[u8], received: &[u8]) {
        if let Some(writers) = self.writers.lock().unwrap().as_ref() {
            (writers.outbound)(sent);
            (writers.inbound)(received);
        }
    }
}

impl TrafficMiddlewareRegistry for Connections {
    fn register_middleware(&self, _name: &str, writers: TrafficWriters) {
        *self.writers.lock().unwrap() = Some(writers);
    }

    fn unregister_middleware(&self, _name: &str) {
        *self.writers.lock().unwrap() = None;
    }
}

fn main() {
    let _guard = logger_config().with_level(Level::Debug).init_global();
    let connections = Arc::new(Connections::default());
    let mut integrations: Vec<Box<dyn Integration>> = vec![Box::new(
        ConnectionLogIntegration::new(Some(connections.clone())),
    )];
    install_integrations(Level::Info, &mut integrations);
    connections.transfer(b"PING 1\r\n", b"PONG 1\r\n");
}
