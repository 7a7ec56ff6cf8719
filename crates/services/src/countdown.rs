//! Cancellable one-tick-per-period source that drives a session's countdown.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::trace;

/// A periodic tick task.
///
/// The first tick arrives one full period after `spawn`. Cancelling or
/// dropping the handle stops the task, so a countdown never outlives the
/// session that owns it.
#[derive(Debug)]
pub struct Countdown {
    ticks: mpsc::Receiver<()>,
    task: Option<JoinHandle<()>>,
}

impl Countdown {
    /// Must be called from within a tokio runtime.
    ///
    /// A zero `period` is treated as one millisecond.
    #[must_use]
    pub fn spawn(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let (tx, ticks) = mpsc::channel(4);

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
            trace!("countdown task exited");
        });

        Self {
            ticks,
            task: Some(task),
        }
    }

    /// Waits for the next tick. `None` once the countdown is cancelled.
    pub async fn tick(&mut self) -> Option<()> {
        if self.task.is_none() {
            return None;
        }
        self.ticks.recv().await
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.ticks.close();
            trace!("countdown cancelled");
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.task.is_none()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let mut countdown = Countdown::spawn(Duration::from_secs(1));
        let started = Instant::now();

        countdown.tick().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(1));
        countdown.tick().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_countdown_stops_ticking() {
        let mut countdown = Countdown::spawn(Duration::from_secs(1));
        countdown.tick().await.unwrap();

        countdown.cancel();
        assert!(countdown.is_cancelled());
        assert!(countdown.tick().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_clamped() {
        let mut countdown = Countdown::spawn(Duration::ZERO);
        countdown.tick().await.unwrap();
        countdown.cancel();
    }
}
