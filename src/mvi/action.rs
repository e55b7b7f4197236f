//! Base trait for actions in MVI architecture.

/// Marker trait for action objects.
///
/// Actions represent:
/// - Triggers (load, create, update, delete, select, reset)
/// - Gateway outcomes (success and failure variants)
///
/// Actions are processed by reducers to produce new states.
pub trait Action: Send + 'static {
    /// Stable name used in log records.
    fn name(&self) -> &'static str;

    /// Whether this action starts asynchronous work in an effect handler.
    fn is_trigger(&self) -> bool {
        false
    }
}
