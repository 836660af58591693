use chrono::NaiveDate;

/// Source of "today" for the loan workflow.
///
/// Injected into the service so tests can pin or advance the date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
