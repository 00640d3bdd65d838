use std::time::Duration;

use quiz_core::session::TimerEpoch;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// One countdown second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Repeating tick task for one active session.
///
/// Each tick carries the epoch the timer was started under, so a session that
/// has moved on can recognise it as stale. The task is aborted by [`stop`]
/// or when the timer is dropped.
///
/// [`stop`]: CountdownTimer::stop
#[derive(Debug)]
pub struct CountdownTimer {
    epoch: TimerEpoch,
    handle: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    /// Spawn the tick task. The first tick arrives one `period` after start.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(epoch: TimerEpoch, period: Duration) -> (Self, mpsc::UnboundedReceiver<TimerEpoch>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(epoch).is_err() {
                    break;
                }
            }
        });
        (
            Self {
                epoch,
                handle: Some(handle),
            },
            rx,
        )
    }

    #[must_use]
    pub fn epoch(&self) -> TimerEpoch {
        self.epoch
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            log::debug!("countdown {:?} stopped", self.epoch);
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
