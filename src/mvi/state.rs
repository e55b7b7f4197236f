//! Base trait for slice state in MVI architecture.

/// Marker trait for slice state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (all data needed by selectors)
/// - Comparable (PartialEq for detecting changes)
/// - Defaultable (Default is the baseline restored on reset)
pub trait SliceState: Clone + PartialEq + Default + Send + 'static {}
