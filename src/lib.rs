//! Sheet Pager Library
//!
//! Serves worksheet rows from spreadsheet files as paginated JSON behind a
//! shared bearer token. The binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
/// Application state management
///
/// Injected configuration, record source and the optional startup snapshot.
pub mod state;
