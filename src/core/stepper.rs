//! Range-request stepper for range-dl
//!
//! The [`Stepper`] drives sequential partial requests against one resource:
//! it probes the server for range support, walks the byte stream forward and
//! backward one chunk at a time, and hands the most recent response to the
//! caller through a consuming single-slot read.
//!
//! Every step is atomic: the cursor advances and the response slot is filled
//! only after the request succeeded. A failed validation or transport call
//! leaves both exactly as they were.

use std::sync::Arc;

use log::{debug, error, info, warn};
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH};

use crate::core::cursor::{
    fill_range_header, ByteRange, ContentLength, Cursor, DEFAULT_CHUNK_SIZE,
};
use crate::core::error::Result;
use crate::core::transport::{ChunkResponse, HttpTransport, ReqwestTransport};

/// Configuration for a stepper, immutable after construction
#[derive(Debug, Clone)]
pub struct StepperConfig {
    /// Number of bytes requested per step
    pub chunk_size: u64,

    /// Range units the server may advertise in `Accept-Ranges`; also the
    /// units emitted in the `Range` header. Normally just `bytes`.
    pub accept_ranges: Vec<String>,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            accept_ranges: vec!["bytes".to_string()],
        }
    }
}

/// Resumable download stepper for a single HTTP resource
pub struct Stepper {
    transport: Arc<dyn HttpTransport>,
    url: String,
    cursor: Cursor,
    content_length: ContentLength,
    accept_ranges: Vec<String>,
    response: Option<ChunkResponse>,
}

impl Stepper {
    /// Creates a stepper with the default configuration and the shared
    /// `reqwest` transport.
    pub fn new(url: impl Into<String>) -> Self {
        // Default config always validates.
        Self::with_transport(Arc::new(ReqwestTransport::new()), url, StepperConfig::default())
            .expect("default stepper config is valid")
    }

    /// Creates a stepper with a custom configuration.
    pub fn with_config(url: impl Into<String>, config: StepperConfig) -> Result<Self> {
        Self::with_transport(Arc::new(ReqwestTransport::new()), url, config)
    }

    /// Creates a stepper on top of an explicit transport capability.
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        url: impl Into<String>,
        config: StepperConfig,
    ) -> Result<Self> {
        Ok(Self {
            transport,
            url: url.into(),
            cursor: Cursor::new(config.chunk_size)?,
            content_length: ContentLength::default(),
            accept_ranges: config.accept_ranges,
            response: None,
        })
    }

    /// Checks whether the server supports partial requests.
    ///
    /// True when the HEAD response advertises `Accept-Ranges` with exactly one
    /// of the configured units (and not `none` in any casing). On success a
    /// parseable `Content-Length` is remembered for last-chunk detection. The
    /// cursor is never touched.
    pub async fn server_supports_partial_requests(&mut self) -> Result<bool> {
        info!("Preparing to check server support for partial requests");

        let response = self.transport.head(&self.url).await?;

        let Some(value) = response.headers.get(ACCEPT_RANGES) else {
            warn!("Server doesn't support partial requests");
            debug!("Header 'Accept-Ranges' is not present in the response");
            return Ok(false);
        };

        let unit = value.to_str().unwrap_or("");
        if !self.accept_ranges.iter().any(|accepted| accepted == unit)
            || unit.eq_ignore_ascii_case("none")
        {
            warn!("Server doesn't support partial requests");
            debug!("Header 'Accept-Ranges' returned '{unit}'");
            return Ok(false);
        }

        // Optional header; parse failures keep the previous value.
        if let Some(raw) = response.headers.get(CONTENT_LENGTH) {
            debug!("Header 'Content-Length' is present in the response");

            if let Ok(length) = raw.to_str().unwrap_or("").trim().parse::<u64>() {
                self.content_length = ContentLength::Known(length);
                debug!("Header 'Content-Length' returned '{length}'");
            }
        }

        Ok(true)
    }

    /// Issues the first partial request, `[0, chunk_size - 1]`.
    pub async fn start(&mut self) -> Result<()> {
        info!("Preparing the first partial request");

        self.issue(self.cursor.range()).await
    }

    /// Advances one chunk and issues the request.
    ///
    /// The new window is never clamped against the known content length; the
    /// server decides how many bytes an overshooting range actually yields.
    /// Stepping past the last chunk is permitted and up to the caller to
    /// avoid, see [`Stepper::is_last_partial_request`].
    pub async fn next(&mut self) -> Result<()> {
        info!("Preparing the next partial request");

        self.issue(self.cursor.advanced()).await
    }

    /// Steps one chunk backward and issues the request.
    ///
    /// A candidate that violates ordering or non-negativity is rejected with
    /// `Error::InvalidRange` carrying the offending bounds, and the cursor
    /// keeps its last valid position.
    pub async fn prev(&mut self) -> Result<()> {
        info!("Preparing the previous partial request again");

        match self.cursor.retreated() {
            Ok(range) => self.issue(range).await,
            Err(err) => {
                error!("{err}");
                info!(
                    "Cursor kept at valid range '{}'",
                    fill_range_header(&self.accept_ranges, self.cursor.range())
                );
                Err(err)
            }
        }
    }

    /// Resumes at caller-supplied absolute bounds and issues the request.
    ///
    /// Bounds are validated before anything is assigned; on rejection the
    /// cursor is untouched and the error propagates.
    pub async fn resume(&mut self, range_start: i64, range_end: i64) -> Result<()> {
        info!("Preparing the request to resume the download");

        let range = ByteRange::from_bounds(range_start, range_end).map_err(|err| {
            error!("{err}");
            err
        })?;

        self.issue(range).await
    }

    /// Takes the most recent response out of the single-slot holder.
    ///
    /// A second call without an intervening step returns `None`. A step made
    /// before the slot is read overwrites it; there is no buffering.
    pub fn current(&mut self) -> Option<ChunkResponse> {
        self.response.take()
    }

    /// True when the cursor's end offset reaches the final byte of a resource
    /// whose length was learned from the probe. Always false while the length
    /// is unknown.
    pub fn is_last_partial_request(&self) -> bool {
        self.content_length.is_last(self.cursor.range())
    }

    /// Current window start offset
    pub fn range_start(&self) -> u64 {
        self.cursor.range().start
    }

    /// Current window end offset
    pub fn range_end(&self) -> u64 {
        self.cursor.range().end
    }

    /// Resource length learned from the probe, if any
    pub fn content_length(&self) -> Option<u64> {
        match self.content_length {
            ContentLength::Unknown => None,
            ContentLength::Known(length) => Some(length),
        }
    }

    pub fn chunk_size(&self) -> u64 {
        self.cursor.chunk_size()
    }

    /// Issues a GET for the candidate window and commits it.
    ///
    /// Cursor and response slot are only written after the transport call
    /// returned Ok, so a failed request changes nothing.
    async fn issue(&mut self, range: ByteRange) -> Result<()> {
        let header = fill_range_header(&self.accept_ranges, range);
        debug!("Header 'Range' was filled with '{header}'");

        let response = self.transport.get(&self.url, &header).await?;

        self.cursor.set(range);
        self.response = Some(response);

        Ok(())
    }
}
