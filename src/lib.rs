//! runbox: remote code execution bridge for Piston-compatible sandboxes.
//!
//! The pipeline is registry -> request builder -> transport -> normalizer,
//! composed by [`bridge::ExecutionBridge`] into one async operation that
//! always yields a displayable [`outcome::ExecutionOutcome`].

pub mod bridge;
pub mod config;
pub mod languages;
pub mod outcome;
pub mod request;
pub mod transport;
