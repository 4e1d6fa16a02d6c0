//! Date windows generated timestamps are drawn from.

use crate::{GeneratorError, GeneratorResult};
use chrono::{DateTime, Duration, Timelike, Utc};
use rand::Rng;

/// A half-open time range `[start, end)` with whole-second bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    /// Create a window, truncating both bounds to whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidWindow`] unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> GeneratorResult<Self> {
        let start = truncate_seconds(start);
        let end = truncate_seconds(end);
        if start >= end {
            return Err(GeneratorError::InvalidWindow(format!(
                "start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Window of `length` starting at `start`.
    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> GeneratorResult<Self> {
        Self::new(start, start + length)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Uniform instant with whole-second resolution in `[start, end)`.
    pub fn random_instant<R: Rng + ?Sized>(&self, rng: &mut R) -> DateTime<Utc> {
        let seconds = (self.end - self.start).num_seconds();
        self.start + Duration::seconds(rng.gen_range(0..seconds))
    }
}

/// The run's overall window plus the intermediary date that splits prescription periods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationWindow {
    start: DateTime<Utc>,
    intermediary: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl GenerationWindow {
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidWindow`] unless `start < intermediary < end`.
    pub fn new(
        start: DateTime<Utc>,
        intermediary: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GeneratorResult<Self> {
        let early = DateWindow::new(start, intermediary)?;
        let late = DateWindow::new(intermediary, end)?;
        Ok(Self {
            start: early.start,
            intermediary: late.start,
            end: late.end,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn intermediary(&self) -> DateTime<Utc> {
        self.intermediary
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// `[start, end)`
    pub fn full(&self) -> DateWindow {
        DateWindow {
            start: self.start,
            end: self.end,
        }
    }

    /// `[start, intermediary)`
    pub fn early(&self) -> DateWindow {
        DateWindow {
            start: self.start,
            end: self.intermediary,
        }
    }

    /// `[intermediary, end)`
    pub fn late(&self) -> DateWindow {
        DateWindow {
            start: self.intermediary,
            end: self.end,
        }
    }
}

fn truncate_seconds(value: DateTime<Utc>) -> DateTime<Utc> {
    value.with_nanosecond(0).unwrap_or(value)
}
