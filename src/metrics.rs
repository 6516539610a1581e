// Session metrics
//
// Lock-free counters for renders, exports, copies and registrations,
// summarised in the log on shutdown.

use crate::models::ExportFormat;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Uses atomic operations for thread-safe metric tracking without locks.
#[derive(Debug)]
pub struct Metrics {
    /// Drawings built or updated from configuration
    pub renders: AtomicU64,
    pub render_failures: AtomicU64,

    /// Drawings moved between display targets without a rebuild
    pub rehomes: AtomicU64,

    pub svg_exports: AtomicU64,
    pub png_exports: AtomicU64,
    pub export_failures: AtomicU64,

    /// Total rasterization time in milliseconds
    pub total_raster_time_ms: AtomicU64,
    pub rasterizations: AtomicU64,

    pub clipboard_copies: AtomicU64,
    pub clipboard_failures: AtomicU64,

    pub registrations_accepted: AtomicU64,
    pub registrations_rejected: AtomicU64,
    pub registration_transport_errors: AtomicU64,

    pub state_broadcasts: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            renders: AtomicU64::new(0),
            render_failures: AtomicU64::new(0),
            rehomes: AtomicU64::new(0),
            svg_exports: AtomicU64::new(0),
            png_exports: AtomicU64::new(0),
            export_failures: AtomicU64::new(0),
            total_raster_time_ms: AtomicU64::new(0),
            rasterizations: AtomicU64::new(0),
            clipboard_copies: AtomicU64::new(0),
            clipboard_failures: AtomicU64::new(0),
            registrations_accepted: AtomicU64::new(0),
            registrations_rejected: AtomicU64::new(0),
            registration_transport_errors: AtomicU64::new(0),
            state_broadcasts: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_render(&self) {
        self.renders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_render_failure(&self) {
        self.render_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rehome(&self) {
        self.rehomes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_export(&self, format: ExportFormat) {
        let counter = match format {
            ExportFormat::Svg => &self.svg_exports,
            ExportFormat::Png => &self.png_exports,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_export_failure(&self) {
        self.export_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_raster_time(&self, duration: Duration) {
        self.rasterizations.fetch_add(1, Ordering::Relaxed);
        self.total_raster_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_clipboard_copy(&self) {
        self.clipboard_copies.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_clipboard_failure(&self) {
        self.clipboard_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registration_accepted(&self) {
        self.registrations_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registration_rejected(&self) {
        self.registrations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registration_transport_error(&self) {
        self.registration_transport_errors
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_state_broadcasts(&self, count: usize) {
        self.state_broadcasts
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average rasterization time in milliseconds
    pub fn avg_raster_time_ms(&self) -> f64 {
        let total = self.total_raster_time_ms.load(Ordering::Relaxed);
        let count = self.rasterizations.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Renders: {} ({} failed, {} re-homed)",
            self.renders.load(Ordering::Relaxed),
            self.render_failures.load(Ordering::Relaxed),
            self.rehomes.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Exports: {} svg, {} png, {} failed (avg raster {:.2}ms)",
            self.svg_exports.load(Ordering::Relaxed),
            self.png_exports.load(Ordering::Relaxed),
            self.export_failures.load(Ordering::Relaxed),
            self.avg_raster_time_ms()
        );
        tracing::info!(
            "Clipboard: {} copied, {} failed",
            self.clipboard_copies.load(Ordering::Relaxed),
            self.clipboard_failures.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Registrations: {} accepted, {} rejected, {} unreachable",
            self.registrations_accepted.load(Ordering::Relaxed),
            self.registrations_rejected.load(Ordering::Relaxed),
            self.registration_transport_errors.load(Ordering::Relaxed)
        );
        tracing::info!(
            "State broadcasts: {}",
            self.state_broadcasts.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
