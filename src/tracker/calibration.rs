// SPDX-License-Identifier: GPL-3.0-only

//! Timed calibration
//!
//! Calibration normally runs for a fixed time after the installation starts
//! (or after an operator asks for it). The window only tracks time; starting
//! it should be paired with a background clear on the pipeline.

use std::time::{Duration, Instant};

use tracing::info;

/// Fixed-length calibration period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationWindow {
    length: Duration,
    started_at: Option<Instant>,
    reported_end: bool,
}

impl CalibrationWindow {
    pub fn new(length: Duration) -> Self {
        Self {
            length,
            started_at: None,
            reported_end: false,
        }
    }

    /// Start (or restart) the window at `now`
    pub fn begin(&mut self, now: Instant) {
        info!(seconds = self.length.as_secs_f32(), "Calibration started");
        self.started_at = Some(now);
        self.reported_end = false;
    }

    /// Whether calibration should run for a frame processed at `now`
    ///
    /// Logs once when the window closes.
    pub fn is_active(&mut self, now: Instant) -> bool {
        let Some(started_at) = self.started_at else {
            return false;
        };
        let active = now.saturating_duration_since(started_at) < self.length;
        if !active && !self.reported_end {
            info!("Calibration finished");
            self.reported_end = true;
        }
        active
    }

    /// Time left in the window, zero when closed or never started
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started_at) => self
                .length
                .saturating_sub(now.saturating_duration_since(started_at)),
            None => Duration::ZERO,
        }
    }

    /// Whether the window was started and has since closed
    pub fn finished(&self, now: Instant) -> bool {
        self.started_at.is_some() && self.remaining(now).is_zero()
    }

    pub fn length(&self) -> Duration {
        self.length
    }
}
