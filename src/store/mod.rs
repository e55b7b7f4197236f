//! Process-wide store holding every entity slice.

mod app;
mod runtime;

pub use app::{AppAction, AppEffects, AppReducer, AppState};
pub use runtime::{Store, StoreSubscription};
