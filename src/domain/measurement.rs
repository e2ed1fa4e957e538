// Water level measurement domain models
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// A single reading as delivered by the measurement endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Measurement {
    pub timestamp: String,
    pub value: f64,
}

impl Measurement {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }

    /// Parsed RFC 3339 instant, if the timestamp is well formed
    pub fn instant(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }
}

/// Non-empty, chronologically ordered sequence of measurements.
///
/// The last element is the current reading.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSeries {
    measurements: Vec<Measurement>,
}

impl MeasurementSeries {
    /// Builds a series, sorting the readings by timestamp. Returns `None` for an empty input.
    pub fn new(mut measurements: Vec<Measurement>) -> Option<Self> {
        if measurements.is_empty() {
            return None;
        }

        // Unparseable timestamps sort first; the raw string breaks ties
        measurements.sort_by(|a, b| {
            a.instant()
                .cmp(&b.instant())
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        });

        Some(Self { measurements })
    }

    pub fn current(&self) -> &Measurement {
        // Non-empty by construction
        &self.measurements[self.measurements.len() - 1]
    }

    /// Finite values in chronological order, ready for charting
    pub fn values(&self) -> Vec<f64> {
        self.measurements
            .iter()
            .map(|m| m.value)
            .filter(|v| v.is_finite())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }
}
