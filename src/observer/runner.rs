// Background polling loop
use super::watcher::{TrackerCell, lock_tracker};
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Duration, sleep};

/// The running polling task and the means to stop it
pub(crate) struct RunHandle {
    cancel_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl RunHandle {
    /// Spawn the polling loop on the current tokio runtime
    pub(crate) fn spawn(tracker: TrackerCell, period: Duration) -> Self {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let task = tokio::spawn(run_loop(tracker, period, cancel_rx));
        Self { cancel_tx, task }
    }

    /// Request cancellation and wait until the loop has exited
    pub(crate) async fn cancel(self) -> Result<(), JoinError> {
        // The loop may already be gone; the join below reports why
        let _ = self.cancel_tx.send(());
        self.task.await
    }
}

/// Wait one period (or until cancelled), then tick; repeat.
///
/// Capture and matching block, so each tick runs on the blocking pool and the
/// caller's tasks keep running meanwhile. Tick errors skip the tick and a panicking
/// tick is logged; neither ends the loop. Dropping the cancel sender stops it too.
async fn run_loop(tracker: TrackerCell, period: Duration, mut cancel_rx: oneshot::Receiver<()>) {
    log::debug!("🔄 Polling loop started (period: {:?})", period);
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut cancel_rx => break,
            _ = sleep(period) => {}
        }

        ticks += 1;
        let cell = tracker.clone();
        match tokio::task::spawn_blocking(move || lock_tracker(&cell).tick()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => log::warn!("⚠️ Tick #{} skipped: {}", ticks, e),
            Err(e) if e.is_panic() => {
                log::error!("❌ Tick #{} panicked; polling continues", ticks)
            }
            Err(e) => {
                log::warn!("⚠️ Tick #{} was cancelled: {}", ticks, e);
                break;
            }
        }
    }

    log::debug!("🔄 Polling loop ended after {} ticks", ticks);
}
