//! Application state management
//!
//! Holds the injected configuration values, the record source and the
//! optional startup snapshot of the fixed source.

pub mod app_state;

pub use app_state::{AppState, FixedSource};
