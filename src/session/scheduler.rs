//! Single repeating timer with a mutable cadence

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Runs one callback on a fixed interval. Starting again replaces the
/// previous timer, so at most one is ever active.
#[derive(Debug, Default)]
pub struct Scheduler {
    task: Option<JoinHandle<()>>,
    interval: Option<Duration>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any running timer, then call `callback` every `interval`.
    ///
    /// The first call happens one full interval from now. Each call runs as
    /// its own task: a slow callback can overlap the next tick, and `stop()`
    /// never cancels a call that is already in flight. A callback error is
    /// logged and the schedule keeps going.
    pub fn start<F, Fut, E>(&mut self, interval: Duration, callback: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        self.stop();

        // tokio rejects a zero period
        let period = interval.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let tick = callback();
                tokio::spawn(async move {
                    if let Err(e) = tick.await {
                        tracing::warn!("Scheduled tick failed: {}", e);
                    }
                });
            }
        });

        self.task = Some(task);
        self.interval = Some(period);
    }

    /// Stop ticking. Safe to call when nothing is running.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.interval = None;
    }

    /// Active cadence, `None` when stopped
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(counter: &Arc<AtomicUsize>) -> impl Fn() -> std::future::Ready<Result<(), String>> {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_fixed_interval() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();
        scheduler.start(Duration::from_secs(2), counting(&counter));

        // Nothing fires immediately
        time::sleep(Duration::from_millis(1900)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_millis(4200)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.interval(), Some(Duration::from_secs(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_ticks_do_not_stop_schedule() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();
        let mut scheduler = Scheduler::new();
        scheduler.start(Duration::from_secs(1), move || {
            seen.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Err::<(), _>("network down"))
        });

        time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 5);
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_previous_timer() {
        let fast = Arc::new(AtomicUsize::new(0));
        let slow = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();

        scheduler.start(Duration::from_secs(2), counting(&fast));
        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(fast.load(Ordering::SeqCst), 1);

        scheduler.start(Duration::from_secs(10), counting(&slow));
        time::sleep(Duration::from_secs(9)).await;
        assert_eq!(fast.load(Ordering::SeqCst), 1);
        assert_eq!(slow.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(slow.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.interval(), Some(Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();
        scheduler.stop();

        scheduler.start(Duration::from_secs(1), counting(&counter));
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.interval(), None);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_lets_in_flight_call_finish() {
        let finished = Arc::new(AtomicUsize::new(0));
        let seen = finished.clone();
        let mut scheduler = Scheduler::new();
        scheduler.start(Duration::from_secs(2), move || {
            let seen = seen.clone();
            async move {
                time::sleep(Duration::from_secs(1)).await;
                seen.fetch_add(1, Ordering::SeqCst);
                Ok::<(), String>(())
            }
        });

        // Tick at 2s is in flight until 3s
        time::sleep(Duration::from_millis(2500)).await;
        scheduler.stop();

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
