/// Fire-and-forget audit trail for room lifecycle transitions. Sinks must
/// never fail the calling operation; a lost audit line is acceptable, a
/// failed callback is not.
pub trait AuditSink: Send + Sync {
    fn record(&self, action: &str, room_id: &str, detail: &str);
}

/// Default sink: structured log lines via `tracing`.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, action: &str, room_id: &str, detail: &str) {
        tracing::info!(action, room_id, detail, "room audit");
    }
}
