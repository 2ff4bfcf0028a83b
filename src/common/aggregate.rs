use crate::common::{DomainEvent, DomainResult};

/// Commands validate against current state and then `record` an event.
/// `apply` is the only place state changes, so replaying events rebuilds the aggregate.
pub trait AggregateRoot: Send + Sync {
    type Event: DomainEvent;

    fn aggregate_id(&self) -> &str;

    /// Count of events applied so far.
    fn version(&self) -> u64;

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()>;

    fn add_event(&mut self, event: Self::Event);

    /// Drains what was recorded since the last call.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;

    fn record(&mut self, event: Self::Event) -> DomainResult<()> {
        self.apply(&event)?;
        self.add_event(event);
        Ok(())
    }
}
