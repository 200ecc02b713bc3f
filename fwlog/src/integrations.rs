//! Hooks that plug traffic logging into third-party connection libraries.
//!
//! The connection library decides when to call the writers; this crate only
//! supplies them and registers them when the library is present.

use std::sync::Arc;

use fwlog_core::{Direction, Level};

use crate::logger::{Logger, log_hexdump};

/// Name of the logger that receives connection traffic.
pub const CONNECTION_LOG_NAME: &str = "flockwave.connections.conn_log";
/// Name under which the traffic writers are registered.
pub const MIDDLEWARE_NAME: &str = "log";

pub type TrafficWriter = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Writer pair handed to a connection library: one for received bytes, one
/// for sent bytes. Each call logs a hex dump.
#[derive(Clone)]
pub struct TrafficWriters {
    pub inbound: TrafficWriter,
    pub outbound: TrafficWriter,
}

impl TrafficWriters {
    pub fn new(logger: &Logger, level: Level) -> Self {
        let writer = |direction: Direction| -> TrafficWriter {
            let logger = logger.clone();
            Arc::new(move |data: &[u8]| log_hexdump(&logger, data, None, Some(direction), level))
        };
        Self {
            inbound: writer(Direction::In),
            outbound: writer(Direction::Out),
        }
    }
}

/// Implemented by connection libraries that accept logging middleware.
pub trait TrafficMiddlewareRegistry: Send + Sync {
    fn register_middleware(&self, name: &str, writers: TrafficWriters);
    fn unregister_middleware(&self, name: &str);
}

/// Something that knows how to hook this crate into another library.
pub trait Integration {
    /// Whether the other library is available.
    fn requirements_met(&self) -> bool;

    fn install(&mut self, level: Level);

    fn uninstall(&mut self) {}

    /// Runs `f` with the integration installed and uninstalls it afterwards,
    /// even if `f` panics.
    fn with_installed<R>(&mut self, level: Level, f: impl FnOnce() -> R) -> R
    where
        Self: Sized,
    {
        struct Uninstall<'a, I: Integration>(&'a mut I);
        impl<I: Integration> Drop for Uninstall<'_, I> {
            fn drop(&mut self) {
                self.0.uninstall();
            }
        }

        self.install(level);
        let _guard = Uninstall(self);
        f()
    }
}

/// Registers hex-dump traffic writers with a connection library.
pub struct ConnectionLogIntegration {
    registry: Option<Arc<dyn TrafficMiddlewareRegistry>>,
    installed: bool,
}

impl ConnectionLogIntegration {
    /// `registry` is `None` when no connection library is linked in.
    pub fn new(registry: Option<Arc<dyn TrafficMiddlewareRegistry>>) -> Self {
        Self {
            registry,
            installed: false,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

impl Integration for ConnectionLogIntegration {
    fn requirements_met(&self) -> bool {
        self.registry.is_some()
    }

    fn install(&mut self, level: Level) {
        if let Some(registry) = &self.registry {
            let logger = Logger::new(CONNECTION_LOG_NAME);
            registry.register_middleware(MIDDLEWARE_NAME, TrafficWriters::new(&logger, level));
            self.installed = true;
        }
    }

    fn uninstall(&mut self) {
        if let Some(registry) = &self.registry
            && self.installed
        {
            registry.unregister_middleware(MIDDLEWARE_NAME);
            self.installed = false;
        }
    }
}

/// Installs every integration whose requirements are met and returns how
/// many were installed.
pub fn install_integrations(level: Level, integrations: &mut [Box<dyn Integration>]) -> usize {
    let mut installed = 0;
    for integration in integrations.iter_mut() {
        if integration.requirements_met() {
            integration.install(level);
            installed += 1;
        }
    }
    installed
}
