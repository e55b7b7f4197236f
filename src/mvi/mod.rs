//! Model-View-Intent (MVI) primitives shared by every entity slice.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ Selectors
//!    ↑                                │
//!    └──── Effect (gateway call) ─────┘
//! ```
//!
//! - **State**: Immutable snapshot of one slice
//! - **Action**: Trigger, success or failure event
//! - **Reducer**: Pure function that transforms state based on actions

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::Reducer;
pub use state::SliceState;
