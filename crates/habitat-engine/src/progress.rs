//! Tick callback that reports population progress through tracing.

use habitat_core::{Simulation, TickCallback};
use habitat_types::TickRecord;
use tracing::{debug, info};

/// Logs a population summary every `every` ticks and remembers peaks.
pub struct ProgressCallback {
    every: u64,
    peak_humans: u32,
    peak_animals: u32,
}

impl ProgressCallback {
    /// Report every `every` ticks; `0` only tracks peaks.
    pub const fn new(every: u64) -> Self {
        Self {
            every,
            peak_humans: 0,
            peak_animals: 0,
        }
    }

    /// Most humans alive after any tick so far.
    pub const fn peak_humans(&self) -> u32 {
        self.peak_humans
    }

    /// Most animals alive after any tick so far.
    pub const fn peak_animals(&self) -> u32 {
        self.peak_animals
    }
}

impl TickCallback for ProgressCallback {
    fn on_tick(&mut self, record: &TickRecord, simulation: &Simulation) {
        self.peak_humans = self.peak_humans.max(record.humans_alive);
        self.peak_animals = self.peak_animals.max(record.animals_alive);

        if record.tick.checked_rem(self.every) == Some(0) {
            info!(
                tick = record.tick,
                humans_alive = record.humans_alive,
                animals_alive = record.animals_alive,
                vegetables_alive = record.vegetables_alive,
                last_id = %simulation.last_issued_id(),
                "Population"
            );
        } else {
            debug!(tick = record.tick, humans_alive = record.humans_alive, "Tick recorded");
        }
    }
}
