//! keepours core library.
//!
//! This crate provides the components for mechanical conflict-marker
//! resolution: the conflict scanner and resolver, the batch file engine, and
//! the TOML configuration that supplies the ordered list of target files.

pub mod config;
pub mod conflict;
pub mod engine;
pub mod errors;

// Re-exports for convenience.
pub use config::AppConfig;
pub use conflict::{ConflictBlock, Resolved, Resolver};
pub use engine::Engine;
