//! CLI-specific modules for range-dl
//!
//! Contains command-line interface utilities that are not part of the
//! core library.

pub mod progress;

pub use progress::ProgressManager;
