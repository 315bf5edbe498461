/// Pulses per quarter note. Fixed system-wide (spec §3 GLOSSARY).
pub const PPQN: u32 = 24;

/// The "tick receiver" capability (spec §9): a component that reacts to the tempo clock's
/// pulses and lifecycle transitions.
///
/// `start`/`stop`/`restart` are called only by the clock on state transitions; a watcher may
/// assume `tick` is never called concurrently with `start`/`stop` on the same clock (spec §4.4
/// "Watcher contract"). All four methods default to no-ops so implementors only override what
/// they care about, mirroring the Python `ClockWatcher` base class this trait is modeled on.
pub trait ClockWatcher: Send {
    /// Called once per pulse while the clock is running, with a strictly increasing `tick`.
    fn tick(&mut self, tick: u64) {
        let _ = tick;
    }

    /// Called once, after `restart`, when the clock transitions to running (spec §4.4 step 1).
    fn start(&mut self) {}

    /// Called once when the clock transitions to stopped (spec §4.4 step 3).
    fn stop(&mut self) {}

    /// Called once, before `start`, whenever the clock commences: resets any per-run state (spec
    /// §4.4 step 1).
    fn restart(&mut self) {}
}
