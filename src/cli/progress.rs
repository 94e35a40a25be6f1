//! CLI-specific progress handling for range-dl
//!
//! Provides progress bar implementation for the command-line interface.

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a byte-oriented progress bar for CLI display.
///
/// A total of zero means the resource length is unknown; the bar degrades to
/// a spinner with a running byte count.
pub fn create_progress_bar(total_size: u64) -> ProgressBar {
    if total_size == 0 {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {bytes} downloaded ({bytes_per_sec})")
                .expect("Failed to create spinner style"),
        );
        return pb;
    }

    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {bytes_per_sec} ETA: {eta}")
            .expect("Failed to create progress style")
            .progress_chars("#>-")
    );
    pb
}

/// Progress manager for chunked download operations
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_size: u64, message: &str) -> Self {
        let pb = create_progress_bar(total_size);

        // Print initial message to stderr
        eprintln!("{}", message);

        Self { pb }
    }

    /// Record one received chunk
    pub fn chunk_received(&self, bytes: u64) {
        self.pb.inc(bytes);
    }

    /// Mark the download as complete
    pub fn finish(&self) {
        self.pb.finish_with_message("✅ Download completed!");
    }
}
