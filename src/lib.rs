//! # range-dl
//!
//! Resumable HTTP downloads built on sequential byte-range requests.
//!
//! The library revolves around one component, the [`Stepper`]: it probes a
//! server for range support, then walks a resource in fixed-size chunks with
//! one `Range: bytes=<start>-<end>` GET per step. The caller drives the walk
//! (`start`/`next`/`prev`/`resume`) and drains each response through a
//! consuming read ([`Stepper::current`]), so at most one unread chunk exists
//! at any time.
//!
//! ```no_run
//! use range_dl::Stepper;
//!
//! # async fn example() -> range_dl::Result<()> {
//! let mut stepper = Stepper::new("http://example.com/large.bin");
//!
//! if stepper.server_supports_partial_requests().await? {
//!     stepper.start().await?;
//!     while let Some(chunk) = stepper.current() {
//!         // ... write chunk.body somewhere ...
//!         if stepper.is_last_partial_request() {
//!             break;
//!         }
//!         stepper.next().await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The HTTP stack is abstracted behind the [`HttpTransport`] capability; the
//! default [`ReqwestTransport`] rides on a shared tuned `reqwest` client.
//! Logging goes through the `log` facade and is a no-op unless the consumer
//! installs a logger.

mod core;

pub use self::core::cursor::{ByteRange, ContentLength, DEFAULT_CHUNK_SIZE};
pub use self::core::error::{Error, Result};
pub use self::core::stepper::{Stepper, StepperConfig};
pub use self::core::transport::{ChunkResponse, HeadResponse, HttpTransport, ReqwestTransport};
