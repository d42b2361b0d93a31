//! Per-channel debounce with cross-channel agreement.
//!
//! A channel arms its flag when its jump magnitude grows relative to the
//! previous row and then counts rows. When a channel's counter reaches the
//! stability count, the current row is emitted provided no other channel is
//! part-way through its own count. The flag is only ever cleared when the
//! counter reaches the stability count; a jump that shrinks back before then
//! keeps counting.

use spgen_core::{ChannelId, EventRow};
use tracing::trace;

/// Row-by-row acceptance state machine.
#[derive(Debug, Clone)]
pub struct StabilityGate {
    stability_count: usize,
    last_jump: Vec<i64>,
    counters: Vec<usize>,
    flags: Vec<bool>,
    triggered: Vec<ChannelId>,
}

impl StabilityGate {
    /// Creates a gate for `channels` channels, all at rest.
    pub fn new(channels: usize, stability_count: usize) -> Self {
        Self {
            stability_count,
            last_jump: vec![0; channels],
            counters: vec![0; channels],
            flags: vec![false; channels],
            triggered: Vec::with_capacity(channels),
        }
    }

    /// Rows a channel must count before it can trigger an acceptance.
    pub fn stability_count(&self) -> usize {
        self.stability_count
    }

    /// Current per-channel stability counters.
    pub fn counters(&self) -> &[usize] {
        &self.counters
    }

    /// Current per-channel jump flags.
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Advances the gate by one row and returns the row if it is accepted.
    ///
    /// # Panics
    ///
    /// Panics if `jumps` does not hold one value per channel.
    pub fn observe(&mut self, time: f64, jumps: &[i64]) -> Option<EventRow> {
        assert_eq!(
            jumps.len(),
            self.last_jump.len(),
            "jump vector does not match channel count"
        );

        for (flag, (current, last)) in self
            .flags
            .iter_mut()
            .zip(jumps.iter().zip(&self.last_jump))
        {
            if current.abs() > last.abs() {
                *flag = true;
            }
        }

        self.triggered.clear();
        self.triggered.extend(
            self.counters
                .iter()
                .enumerate()
                .filter(|(_, counter)| **counter == self.stability_count)
                .map(|(idx, _)| ChannelId::from_raw(idx)),
        );

        let mut accepted = None;
        if !self.triggered.is_empty() {
            // Resetting a triggered counter to zero never changes the outcome
            // for another triggered channel, so the check runs once per row.
            let settled = self
                .counters
                .iter()
                .all(|counter| *counter == 0 || *counter == self.stability_count);
            if settled {
                trace!(time, channels = ?self.triggered, "row accepted");
                accepted = Some(EventRow::new(time, jumps.to_vec()));
            }
            for id in &self.triggered {
                self.counters[id.as_raw()] = 0;
                self.flags[id.as_raw()] = false;
            }
        }

        for (counter, flag) in self.counters.iter_mut().zip(&self.flags) {
            if *flag {
                *counter += 1;
            }
        }

        self.last_jump.copy_from_slice(jumps);
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_gate_emits_nothing() {
        let mut gate = StabilityGate::new(2, 3);
        for step in 0..10 {
            assert!(gate.observe(step as f64, &[0, 0]).is_none());
        }
        assert_eq!(gate.counters(), &[0, 0]);
    }

    #[test]
    fn counter_never_exceeds_stability_count() {
        let mut gate = StabilityGate::new(2, 2);
        let mut seen_max = 0;
        for step in 0..20 {
            let jumps = [step / 3, -(step / 5)];
            gate.observe(step as f64, &jumps);
            seen_max = seen_max.max(*gate.counters().iter().max().unwrap());
        }
        assert!(seen_max <= 2);
    }

    #[test]
    fn triggered_channel_resets_even_when_row_rejected() {
        let mut gate = StabilityGate::new(2, 3);
        // Channel 0 jumps at t=1, channel 1 at t=2.
        gate.observe(0.0, &[0, 0]);
        gate.observe(1.0, &[1, 0]);
        gate.observe(2.0, &[1, 1]);
        gate.observe(3.0, &[1, 1]);
        assert_eq!(gate.counters(), &[3, 2]);
        // Channel 0 is at the count while channel 1 sits at 2: rejected.
        assert!(gate.observe(4.0, &[1, 1]).is_none());
        assert_eq!(gate.counters(), &[0, 3]);
        assert_eq!(gate.flags(), &[false, true]);
    }

    #[test]
    #[should_panic(expected = "jump vector does not match channel count")]
    fn width_mismatch_panics() {
        let mut gate = StabilityGate::new(2, 3);
        gate.observe(0.0, &[0]);
    }
}
