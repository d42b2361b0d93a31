use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SpError};

/// Dense identifier of a channel, equal to its position in a [`ChannelSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId(usize);

impl ChannelId {
    /// Creates a new identifier from its raw index.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw index of the identifier.
    pub fn as_raw(&self) -> usize {
        self.0
    }
}

/// Ordered, duplicate-free set of channel labels.
///
/// Labels are resolved to [`ChannelId`]s once at load time; every per-row
/// vector in the workspace uses the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ChannelSet {
    labels: Vec<String>,
}

impl ChannelSet {
    /// Builds a channel set, rejecting empty or repeated labels.
    pub fn new<I, S>(labels: I) -> Result<Self, SpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if label.trim().is_empty() {
                return Err(SpError::Input(
                    ErrorInfo::new("spgen.channels.empty_label", "channel label is empty")
                        .with_context("index", out.len().to_string()),
                ));
            }
            if out.contains(&label) {
                return Err(SpError::Input(
                    ErrorInfo::new("spgen.channels.duplicate", "channel label repeated")
                        .with_context("label", label),
                ));
            }
            out.push(label);
        }
        Ok(Self { labels: out })
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` when no channel is present.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in column order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// One sample of the simulated trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    /// Simulation time in seconds.
    pub time: f64,
    /// Unwrapped phase in radians, indexed by [`ChannelId`].
    pub phases: Vec<f64>,
}

impl TimeSeriesRow {
    /// Creates a row from its time and phase values.
    pub fn new(time: f64, phases: Vec<f64>) -> Self {
        Self { time, phases }
    }
}

/// Accepted snapshot of per-channel jump counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    /// Time of the accepted sample in seconds.
    pub time: f64,
    /// Quantized 2π jump count per channel, indexed by [`ChannelId`].
    pub jumps: Vec<i64>,
}

impl EventRow {
    /// Creates an event row.
    pub fn new(time: f64, jumps: Vec<i64>) -> Self {
        Self { time, jumps }
    }
}

/// Exact-equality key for a timestamp (`-0.0` and `0.0` collapse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeKey(u64);

impl TimeKey {
    /// Builds the key for a time value.
    pub fn of(time: f64) -> Self {
        if time == 0.0 {
            Self(0)
        } else {
            Self(time.to_bits())
        }
    }
}

/// Finalized, deduplicated table of accepted rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventTable {
    /// Channel labels in column order.
    pub channels: ChannelSet,
    /// Rows ordered by arrival, unique by time.
    pub rows: Vec<EventRow>,
}

impl EventTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
