use chrono::{DateTime, Utc};

/// A fact recorded by an aggregate. Projections fold these; the service logs some of them.
pub trait DomainEvent: Send + Sync + Clone {
    fn event_type(&self) -> &'static str;
    fn aggregate_id(&self) -> &str;
    fn occurred_at(&self) -> DateTime<Utc>;

    fn summary(&self) -> String {
        format!(
            "{} on {} at {}",
            self.event_type(),
            self.aggregate_id(),
            self.occurred_at().format("%Y-%m-%d_%H-%M-%S")
        )
    }
}
