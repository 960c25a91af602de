//! Simulation observer trait for progress reporting and data collection.

use fl_agent::AgentStore;
use fl_core::Tick;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, live: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: {live} agents");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once the tick has fully settled.  `live` is the number of live
    /// agents after this tick's spawns and despawns.
    fn on_tick_end(&mut self, _tick: Tick, _live: usize) {}

    /// Called every `config.output_interval_ticks` ticks with read-only
    /// access to the settled agent columns.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentStore) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
