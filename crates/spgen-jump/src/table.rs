//! Accumulation of accepted rows and deduplication by timestamp.

use std::collections::HashMap;

use spgen_core::{ChannelSet, EventRow, EventTable, TimeKey};

/// Accumulates accepted rows in arrival order.
#[derive(Debug, Clone)]
pub struct EventTableBuilder {
    channels: ChannelSet,
    rows: Vec<EventRow>,
}

impl EventTableBuilder {
    /// Creates an empty builder for the given channels.
    pub fn new(channels: ChannelSet) -> Self {
        Self {
            channels,
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push(&mut self, row: EventRow) {
        self.rows.push(row);
    }

    /// Drops every row whose time reappears later, keeping the last
    /// occurrence and the relative order of the survivors.
    pub fn finish(self) -> EventTable {
        let mut last_seen: HashMap<TimeKey, usize> = HashMap::with_capacity(self.rows.len());
        for (idx, row) in self.rows.iter().enumerate() {
            last_seen.insert(TimeKey::of(row.time), idx);
        }
        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .filter(|(idx, row)| last_seen.get(&TimeKey::of(row.time)) == Some(idx))
            .map(|(_, row)| row)
            .collect();
        EventTable {
            channels: self.channels,
            rows,
        }
    }
}
