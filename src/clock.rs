use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::error;
use mseq_core::{ClockWatcher, PPQN};

enum Command {
    Commence,
    Cease,
    Toggle,
    SetBpm(u32),
    Shutdown,
}

/// The tempo clock (spec §4.4, C4): owns a thread that busy-polls monotonic time and delivers
/// `tick`/`start`/`stop`/`restart` to every attached watcher.
///
/// Watchers are moved onto the clock thread at construction (spec §5: "built at project assembly;
/// after start, treat as read-only" — no dynamic re-registration while running).
pub struct Clock {
    commands: Sender<Command>,
    worker: Option<JoinHandle<()>>,
}

fn bpm_to_interval(bpm: u32) -> Duration {
    Duration::from_nanos(60_000_000_000 / bpm.max(1) as u64 / PPQN as u64)
}

impl Clock {
    /// Spawn the clock thread at `bpm`, owning `watchers` for the life of the process.
    pub fn start(bpm: u32, mut watchers: Vec<Box<dyn ClockWatcher>>) -> Self {
        let (commands, receiver): (Sender<Command>, Receiver<Command>) = mpsc::channel();

        let worker = thread::spawn(move || {
            let mut interval = bpm_to_interval(bpm);
            let mut running = false;
            let mut tick: u64 = 0;
            let mut next_deadline = Instant::now();

            loop {
                match receiver.try_recv() {
                    Ok(Command::Shutdown) => break,
                    Ok(Command::Commence) => {
                        for watcher in watchers.iter_mut() {
                            call_watcher(watcher.as_mut(), |w| w.restart());
                        }
                        tick = 0;
                        next_deadline = Instant::now();
                        running = true;
                        for watcher in watchers.iter_mut() {
                            call_watcher(watcher.as_mut(), |w| w.start());
                        }
                    }
                    Ok(Command::Cease) => {
                        running = false;
                        tick = 0;
                        for watcher in watchers.iter_mut() {
                            call_watcher(watcher.as_mut(), |w| w.stop());
                        }
                    }
                    Ok(Command::Toggle) => {
                        commands_toggle(&mut running, &mut tick, &mut next_deadline, &mut watchers);
                    }
                    Ok(Command::SetBpm(new_bpm)) => interval = bpm_to_interval(new_bpm),
                    Err(mpsc::TryRecvError::Empty) => {}
                    Err(mpsc::TryRecvError::Disconnected) => break,
                }

                if running && Instant::now() >= next_deadline {
                    for watcher in watchers.iter_mut() {
                        let t = tick;
                        call_watcher(watcher.as_mut(), |w| w.tick(t));
                    }
                    tick += 1;
                    next_deadline += interval;
                } else {
                    spin_sleep::sleep(Duration::from_micros(1));
                }
            }
        });

        Self {
            commands,
            worker: Some(worker),
        }
    }

    /// Start (or restart) the clock running from tick 0 (spec §4.4 step 1).
    pub fn commence(&self) {
        let _ = self.commands.send(Command::Commence);
    }

    /// Stop the clock; `tick` resets to 0 and no watcher runs until the next `commence` (spec
    /// §4.4 step 3).
    pub fn cease(&self) {
        let _ = self.commands.send(Command::Cease);
    }

    /// Flip between running and stopped.
    pub fn toggle(&self) {
        let _ = self.commands.send(Command::Toggle);
    }

    /// Change tempo without stopping; takes effect on the clock thread's next iteration.
    pub fn set_bpm(&self, bpm: u32) {
        let _ = self.commands.send(Command::SetBpm(bpm));
    }

    /// Stop the clock thread and join it.
    pub fn shutdown(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.shutdown();
        }
    }
}

fn commands_toggle(
    running: &mut bool,
    tick: &mut u64,
    next_deadline: &mut Instant,
    watchers: &mut [Box<dyn ClockWatcher>],
) {
    if *running {
        *running = false;
        *tick = 0;
        for watcher in watchers.iter_mut() {
            call_watcher(watcher.as_mut(), |w| w.stop());
        }
    } else {
        for watcher in watchers.iter_mut() {
            call_watcher(watcher.as_mut(), |w| w.restart());
        }
        *tick = 0;
        *next_deadline = Instant::now();
        *running = true;
        for watcher in watchers.iter_mut() {
            call_watcher(watcher.as_mut(), |w| w.start());
        }
    }
}

/// Isolate a single watcher's panic so it cannot bring down the clock thread (spec §7: "one
/// failing watcher must not crash the clock thread; wrap each watcher call").
fn call_watcher(watcher: &mut dyn ClockWatcher, f: impl FnOnce(&mut dyn ClockWatcher)) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(|| f(watcher))) {
        error!("a clock watcher panicked and was isolated: {panic:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpm_to_interval_matches_the_ppqn_formula() {
        // 120 bpm: 60e9 / 120 / 24 ns per tick.
        assert_eq!(bpm_to_interval(120), Duration::from_nanos(60_000_000_000 / 120 / 24));
    }

    #[test]
    fn zero_bpm_does_not_panic_on_division() {
        let _ = bpm_to_interval(0);
    }
}
