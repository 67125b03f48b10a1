use crate::core::ScenarioMessage;
use crate::playback::cancel::CancelToken;
use crate::playback::{MessageResult, PlaybackConfig, PlaybackState, PlaybackStatus};
use crate::sender::MessageSender;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Mutable state of the active run, owned behind the controller's lock
#[derive(Default)]
struct RunState {
    status: PlaybackStatus,
    current_column: u32,
    completed_columns: u32,
    errors: Vec<String>,
    message_results: HashMap<String, MessageResult>,
    /// Cancellation signal of the run currently playing, if any
    cancel: Option<Arc<CancelToken>>,
}

impl RunState {
    fn snapshot(&self) -> PlaybackState {
        PlaybackState {
            status: self.status,
            current_column: self.current_column,
            completed_columns: self.completed_columns,
            errors: self.errors.clone(),
            message_results: self.message_results.clone(),
        }
    }
}

/// Drives one scenario run: columns in ascending order, all sends within a
/// column in parallel, a fixed delay between columns, fail-fast on the first
/// column containing a failed message.
///
/// Only one run is logically active at a time; `play` while already playing
/// is a no-op and `play` while paused resumes the suspended run.
#[derive(Clone)]
pub struct PlaybackController {
    sender: Arc<dyn MessageSender>,
    config: PlaybackConfig,
    inner: Arc<Mutex<RunState>>,
    state_tx: Arc<watch::Sender<PlaybackState>>,
}

impl PlaybackController {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self::with_config(sender, PlaybackConfig::default())
    }

    pub fn with_config(sender: Arc<dyn MessageSender>, config: PlaybackConfig) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::default());
        Self {
            sender,
            config,
            inner: Arc::new(Mutex::new(RunState::default())),
            state_tx: Arc::new(state_tx),
        }
    }

    /// Current snapshot of the run
    pub fn state(&self) -> PlaybackState {
        self.inner.lock().unwrap().snapshot()
    }

    /// Subscribe to state changes; each mutation publishes a fresh snapshot
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// Start a fresh run, or resume a paused one from the next uncompleted
    /// column. No-op while a run is already playing.
    ///
    /// Must be called within a tokio runtime; the column loop runs on a
    /// spawned task and `play` returns immediately.
    pub fn play(&self, messages: Vec<ScenarioMessage>) {
        let (start_column, cancel) = {
            let mut run = self.inner.lock().unwrap();
            let start_column = match run.status {
                PlaybackStatus::Playing => {
                    debug!("play ignored, a run is already active");
                    return;
                }
                PlaybackStatus::Paused => {
                    // Resume: keep accumulated results, continue after the
                    // last fully completed column
                    run.status = PlaybackStatus::Playing;
                    run.completed_columns + 1
                }
                PlaybackStatus::Idle | PlaybackStatus::Error => {
                    *run = RunState::default();
                    run.status = PlaybackStatus::Playing;
                    1
                }
            };
            let cancel = CancelToken::new();
            run.cancel = Some(cancel.clone());
            self.publish(&run);
            (start_column, cancel)
        };

        info!(start_column, messages = messages.len(), "playback started");
        let controller = self.clone();
        tokio::spawn(async move {
            controller
                .execute_columns(messages, start_column, cancel)
                .await;
        });
    }

    /// Suspend the active run. In-flight sends of the current column finish
    /// naturally but the column is abandoned; the pending inter-column delay
    /// aborts promptly. No-op unless playing.
    pub fn pause(&self) {
        let mut run = self.inner.lock().unwrap();
        if run.status != PlaybackStatus::Playing {
            return;
        }
        run.status = PlaybackStatus::Paused;
        if let Some(cancel) = &run.cancel {
            cancel.raise();
        }
        self.publish(&run);
        info!(completed_columns = run.completed_columns, "playback paused");
    }

    /// Hard reset: cancel everything and clear all counters and results
    pub fn stop(&self) {
        let mut run = self.inner.lock().unwrap();
        if let Some(cancel) = run.cancel.take() {
            cancel.raise();
        }
        *run = RunState::default();
        self.publish(&run);
        info!("playback stopped");
    }

    fn publish(&self, run: &RunState) {
        self.state_tx.send_replace(run.snapshot());
    }

    async fn execute_columns(
        &self,
        messages: Vec<ScenarioMessage>,
        start_column: u32,
        cancel: Arc<CancelToken>,
    ) {
        for col in start_column..=self.config.max_column {
            if cancel.is_raised() {
                return;
            }

            let column_messages: Vec<ScenarioMessage> = messages
                .iter()
                .filter(|m| m.column == col)
                .cloned()
                .collect();
            // Empty columns contribute no delay and no state change
            if column_messages.is_empty() {
                continue;
            }

            {
                let mut run = self.inner.lock().unwrap();
                // Re-check under the lock: a stop/pause that landed since the
                // loop-top check must not see this task republish onto its
                // reset snapshot
                if cancel.is_raised() {
                    return;
                }
                run.current_column = col;
                self.publish(&run);
            }
            debug!(column = col, count = column_messages.len(), "dispatching column");

            // Fan-out: every send in the column runs concurrently, and the
            // column resolves only when the slowest send resolves
            let mut handles = Vec::with_capacity(column_messages.len());
            for msg in column_messages {
                let sender = self.sender.clone();
                handles.push(tokio::spawn(async move {
                    let outcome = sender.send(&msg.payload).await;
                    (msg, outcome)
                }));
            }
            let mut results = Vec::with_capacity(handles.len());
            for handle in handles {
                match handle.await {
                    Ok(pair) => results.push(pair),
                    Err(e) => error!("send task failed to join: {e}"),
                }
            }

            let mut failed: Vec<String> = Vec::new();
            {
                let mut run = self.inner.lock().unwrap();
                // Abandon the column wholesale when cancelled mid-dispatch;
                // the caller that raised the signal already set the target
                // status. Checked under the lock so a concurrent stop cannot
                // land between the check and the mutation.
                if cancel.is_raised() {
                    debug!(column = col, "column abandoned");
                    return;
                }
                for (msg, outcome) in &results {
                    if outcome.ok {
                        run.message_results.insert(
                            msg.id.clone(),
                            MessageResult::Success {
                                response_body: outcome.response_body.clone(),
                            },
                        );
                    } else {
                        run.message_results.insert(
                            msg.id.clone(),
                            MessageResult::Error {
                                status_code: (outcome.status != 0).then_some(outcome.status),
                                status_text: (!outcome.status_text.is_empty())
                                    .then(|| outcome.status_text.clone()),
                                error_body: outcome.error_body.clone(),
                            },
                        );
                        failed.push(msg.payload.class_name.clone());
                    }
                }

                if failed.is_empty() {
                    run.completed_columns = col;
                } else {
                    run.status = PlaybackStatus::Error;
                    run.errors = failed
                        .iter()
                        .map(|class_name| format!("Failed to send {class_name}"))
                        .collect();
                }
                self.publish(&run);
            }

            // One failed message fails the whole column and halts the run
            if !failed.is_empty() {
                warn!(column = col, failed = failed.len(), "column failed, run halted");
                return;
            }
            debug!(column = col, "column completed");

            cancel.sleep(self.config.inter_column_delay).await;
            if cancel.is_raised() {
                return;
            }
        }

        let mut run = self.inner.lock().unwrap();
        // Only the run that still owns the active token may finish the run;
        // a stop+play interleaving before this lock would otherwise let a
        // stale task flip the fresh run to Idle
        let owns_run = run
            .cancel
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, &cancel));
        if owns_run && !cancel.is_raised() && run.status == PlaybackStatus::Playing {
            run.status = PlaybackStatus::Idle;
            self.publish(&run);
            info!(completed_columns = run.completed_columns, "playback finished");
        }
    }
}
