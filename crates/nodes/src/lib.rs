//! `sora-nodes` library crate.
//!
//! The three host-callable video-job nodes (create, status, download),
//! the result-resolution strategies they share, and a name-based registry
//! for hosts that dispatch nodes by string. The binary entrypoint lives
//! in `main.rs`.

pub mod config;
pub mod create;
pub mod download;
pub mod error;
pub mod output;
pub mod registry;
pub mod resolve;
pub mod status;

/// `Some(s)` unless `s` is empty; host widgets use `""` for "not set".
pub(crate) fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
