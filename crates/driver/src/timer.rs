//! Gravity timer: an owned tokio task that emits ticks at a fixed period.
//!
//! The timer is never shared or global. `start` always stops the previous
//! task first, and every start bumps a generation number; ticks still queued
//! from an older generation are dropped when read.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tick {
    generation: u64,
}

pub struct TickTimer {
    handle: Handle,
    tx: mpsc::UnboundedSender<Tick>,
    rx: mpsc::UnboundedReceiver<Tick>,
    task: Option<JoinHandle<()>>,
    generation: u64,
    period: Option<Duration>,
}

impl TickTimer {
    /// Create a stopped timer whose task will run on `handle`.
    pub fn new(handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            handle,
            tx,
            rx,
            task: None,
            generation: 0,
            period: None,
        }
    }

    /// (Re)start the timer. The first tick arrives one full period from now.
    pub fn start(&mut self, period: Duration) {
        self.stop();
        self.generation = self.generation.wrapping_add(1);

        let generation = self.generation;
        let tx = self.tx.clone();
        let first = Instant::now() + period;
        self.task = Some(self.handle.spawn(async move {
            let mut interval = interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        self.period = Some(period);
    }

    /// Stop the timer. Ticks already queued are discarded on the next read.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.period = None;
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Current period, `None` while stopped.
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Take one pending tick of the running generation, if any.
    pub fn try_next(&mut self) -> bool {
        while let Ok(tick) = self.rx.try_recv() {
            if self.task.is_some() && tick.generation == self.generation {
                return true;
            }
        }
        false
    }

    /// Take all pending ticks of the running generation.
    #[cfg(test)]
    fn drain(&mut self) -> u32 {
        let mut n = 0;
        while self.try_next() {
            n += 1;
        }
        n
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_arrive_once_per_period() {
        let mut timer = TickTimer::new(Handle::current());
        timer.start(ms(100));
        assert!(timer.is_running());
        assert_eq!(timer.period(), Some(ms(100)));

        sleep(ms(50)).await;
        assert_eq!(timer.drain(), 0);

        sleep(ms(300)).await;
        assert_eq!(timer.drain(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_discards_queued_ticks() {
        let mut timer = TickTimer::new(Handle::current());
        timer.start(ms(100));
        sleep(ms(250)).await;

        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.period(), None);
        assert_eq!(timer.drain(), 0);

        sleep(ms(500)).await;
        assert_eq!(timer.drain(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_drops_previous_generation() {
        let mut timer = TickTimer::new(Handle::current());
        timer.start(ms(100));
        sleep(ms(250)).await;

        timer.start(ms(1000));
        assert_eq!(timer.period(), Some(ms(1000)));
        assert_eq!(timer.drain(), 0);

        sleep(ms(900)).await;
        assert_eq!(timer.drain(), 0);
        sleep(ms(200)).await;
        assert_eq!(timer.drain(), 1);
    }
}
