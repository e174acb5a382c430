//! Prometheus counters for lifecycle events.

use std::sync::Arc;

use prometheus::{IntCounterVec, Opts, Registry};

/// Shared registry type.
pub type SharedRegistry = Arc<Registry>;

/// Produce a new shared registry.
pub fn new_registry() -> SharedRegistry {
    Arc::new(Registry::new())
}

/// Event counters labelled by `action`, one family per resource.
#[derive(Clone, Debug)]
pub struct GateMetrics {
    registry: SharedRegistry,
    users: IntCounterVec,
    passes: IntCounterVec,
    guest_requests: IntCounterVec,
    entry_logs: IntCounterVec,
}

fn event_counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounterVec, prometheus::Error> {
    let counter = IntCounterVec::new(Opts::new(name, help), &["action"])?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

impl GateMetrics {
    pub fn new(registry: SharedRegistry) -> Result<Self, prometheus::Error> {
        let users = event_counter(&registry, "users_events_total", "User events total")?;
        let passes = event_counter(&registry, "passes_events_total", "Pass events total")?;
        let guest_requests = event_counter(
            &registry,
            "guest_requests_events_total",
            "Guest request events total",
        )?;
        let entry_logs = event_counter(&registry, "entry_logs_events_total", "Entry log events total")?;

        Ok(Self {
            registry,
            users,
            passes,
            guest_requests,
            entry_logs,
        })
    }

    pub fn registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    pub fn record_user(&self, action: &str) {
        self.users.with_label_values(&[action]).inc();
    }

    pub fn record_pass(&self, action: &str) {
        self.passes.with_label_values(&[action]).inc();
    }

    pub fn record_guest_request(&self, action: &str) {
        self.guest_requests.with_label_values(&[action]).inc();
    }

    pub fn record_entry_log(&self, action: &str) {
        self.entry_logs.with_label_values(&[action]).inc();
    }

    pub fn user_events(&self, action: &str) -> u64 {
        self.users.with_label_values(&[action]).get()
    }

    pub fn pass_events(&self, action: &str) -> u64 {
        self.passes.with_label_values(&[action]).get()
    }

    pub fn guest_request_events(&self, action: &str) -> u64 {
        self.guest_requests.with_label_values(&[action]).get()
    }

    pub fn entry_log_events(&self, action: &str) -> u64 {
        self.entry_logs.with_label_values(&[action]).get()
    }
}
