use chrono::{DateTime, Utc};

/// Represents an entity responsible for providing the current instant across the application.
/// The analytics never ask the system for the time themselves, so tests can pin it.
pub trait Clock: Sync + Send {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant. Used by tests and by `--now`.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self(time)
    }
}

impl Clock for FixedClock {
    fn time(&self) -> DateTime<Utc> {
        self.0
    }
}
