// ── Debounced search input ──
//
// Raw keystrokes go in, committed search terms come out once the input
// has been quiet for the debounce window. A background task owns the
// timer; dropping the debouncer or cancelling its token stops it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::trace;

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(400);
pub const MIN_WINDOW: Duration = Duration::from_millis(300);
pub const MAX_WINDOW: Duration = Duration::from_millis(500);

/// Keep a configured window inside the supported 300–500 ms range.
pub fn clamp_window(window: Duration) -> Duration {
    window.clamp(MIN_WINDOW, MAX_WINDOW)
}

pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<String>,
    output: mpsc::UnboundedReceiver<String>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Spawn the debounce task on the current runtime.
    pub fn spawn(window: Duration, cancel: CancellationToken) -> Self {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output) = mpsc::unbounded_channel();
        let task = tokio::spawn(debounce_task(window, input_rx, output_tx, cancel.clone()));
        Self {
            input,
            output,
            cancel,
            task,
        }
    }

    /// Feed the current raw input value (one call per keystroke).
    pub fn push(&self, raw: impl Into<String>) {
        // Send only fails once the task has stopped; nothing left to notify.
        let _ = self.input.send(raw.into());
    }

    /// The next committed term. `None` once the debouncer has shut down.
    pub async fn next(&mut self) -> Option<String> {
        self.output.recv().await
    }

    /// A committed term if one is already waiting.
    pub fn try_next(&mut self) -> Option<String> {
        self.output.try_recv().ok()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn debounce_task(
    window: Duration,
    mut input: mpsc::UnboundedReceiver<String>,
    output: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
) {
    let mut pending: Option<String> = None;
    let mut committed = String::new();
    let mut deadline = Instant::now();

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            raw = input.recv() => {
                let Some(raw) = raw else { break };
                if raw.trim().is_empty() {
                    // Clearing the box commits immediately.
                    pending = None;
                    if !committed.is_empty() {
                        committed.clear();
                        if output.send(String::new()).is_err() {
                            break;
                        }
                    }
                } else {
                    trace!(term = %raw, "debounce timer restarted");
                    pending = Some(raw);
                    deadline = Instant::now() + window;
                }
            }

            () = sleep_until(deadline), if pending.is_some() => {
                if let Some(term) = pending.take() {
                    if term != committed {
                        committed.clone_from(&term);
                        if output.send(term).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::time::{sleep, timeout};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_of_keystrokes_emits_once() {
        let mut debouncer = SearchDebouncer::spawn(DEFAULT_WINDOW, CancellationToken::new());
        let started = Instant::now();

        // A keystroke every 50 ms for 500 ms, then silence.
        let word = "sunda kela";
        for end in 1..=word.len() {
            debouncer.push(&word[..end]);
            sleep(Duration::from_millis(50)).await;
        }

        let term = timeout(Duration::from_secs(5), debouncer.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(term, "sunda kela");
        // Last keystroke at 450 ms plus the 400 ms window.
        assert!(started.elapsed() >= Duration::from_millis(850));

        assert!(
            timeout(Duration::from_secs(5), debouncer.next())
                .await
                .is_err(),
            "expected exactly one emission"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_emits_immediately() {
        let mut debouncer = SearchDebouncer::spawn(DEFAULT_WINDOW, CancellationToken::new());
        debouncer.push("bks");
        assert_eq!(debouncer.next().await.as_deref(), Some("bks"));

        let cleared_at = Instant::now();
        debouncer.push("bk");
        debouncer.push("");
        assert_eq!(debouncer.next().await.as_deref(), Some(""));
        assert!(cleared_at.elapsed() < DEFAULT_WINDOW);

        // The discarded "bk" never surfaces.
        assert!(
            timeout(Duration::from_secs(2), debouncer.next())
                .await
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_term_is_not_reemitted() {
        let mut debouncer = SearchDebouncer::spawn(DEFAULT_WINDOW, CancellationToken::new());
        debouncer.push("snd");
        assert_eq!(debouncer.next().await.as_deref(), Some("snd"));

        debouncer.push("sn");
        debouncer.push("snd");
        assert!(
            timeout(Duration::from_secs(2), debouncer.next())
                .await
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_task() {
        let cancel = CancellationToken::new();
        let mut debouncer = SearchDebouncer::spawn(DEFAULT_WINDOW, cancel.clone());
        debouncer.push("pending");
        cancel.cancel();
        assert_eq!(debouncer.next().await, None);
    }

    #[test]
    fn window_is_clamped() {
        assert_eq!(clamp_window(Duration::from_millis(50)), MIN_WINDOW);
        assert_eq!(clamp_window(Duration::from_millis(450)), Duration::from_millis(450));
        assert_eq!(clamp_window(Duration::from_secs(3)), MAX_WINDOW);
    }
}
