use serde_json::Value;

/// Structured audit sink for payment requests and callback decisions.
///
/// Implementations must never receive key material; callers pass only
/// public transaction fields and hashes.
pub trait AuditLog: Send + Sync {
    fn log(&self, event: &str, fields: Value);
}

/// Audit sink that forwards to `tracing` when the gateway debug flag is on
#[derive(Debug, Clone, Copy)]
pub struct TracingAuditLog {
    enabled: bool,
}

impl TracingAuditLog {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl AuditLog for TracingAuditLog {
    fn log(&self, event: &str, fields: Value) {
        if !self.enabled {
            return;
        }
        tracing::info!(target: "amwalpay::audit", event, fields = %fields, "AmwalPay audit");
    }
}
