//! Core library modules for range-dl
//!
//! This module contains the internal implementation details of the range-dl
//! library.

pub mod cursor;
pub mod error;
pub mod stepper;
pub mod transport;

// Re-export main types for internal use
pub use stepper::{Stepper, StepperConfig};
pub use transport::{ChunkResponse, HeadResponse, HttpTransport, ReqwestTransport};
