use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::result::LoopStats;

pub trait Pause {
    fn pause(&mut self, delay: Duration);
}

pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Dispatch, then pause for the configured delay, forever.
/// A failed dispatch is followed by the same pause as a successful one.
pub struct PacedLoop<P: Pause = ThreadSleep> {
    dispatcher: Dispatcher,
    pause: P,
    delay: Duration,
}

impl PacedLoop<ThreadSleep> {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::with_pause(dispatcher, ThreadSleep)
    }
}

impl<P: Pause> PacedLoop<P> {
    pub fn with_pause(dispatcher: Dispatcher, pause: P) -> Self {
        let delay = dispatcher.config.delay;
        Self {
            dispatcher,
            pause,
            delay,
        }
    }

    pub fn run(&mut self) -> ! {
        let mut stats = LoopStats::default();
        loop {
            self.cycle(&mut stats);
        }
    }

    pub fn run_for(&mut self, iterations: u64) -> LoopStats {
        let mut stats = LoopStats::default();
        for _ in 0..iterations {
            self.cycle(&mut stats);
        }
        stats
    }

    fn cycle(&mut self, stats: &mut LoopStats) {
        let success = self.dispatcher.dispatch_one();
        stats.record(success);
        debug!(
            iteration = stats.iterations,
            succeeded = stats.succeeded,
            failed = stats.failed,
            delay_secs = self.delay.as_secs_f64(),
            "pausing"
        );
        self.pause.pause(self.delay);
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
