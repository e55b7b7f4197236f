//! The store loop.
//!
//! A single task owns [`AppState`]. Dispatched actions and effect results
//! arrive on one channel and are reduced strictly one at a time; triggers
//! spawn their effect on the runtime so gateway calls overlap freely. There
//! is no request sequencing, so the response that arrives last wins.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;

use crate::mvi::{Action, Reducer};
use crate::teardown::TeardownToken;

use super::app::{AppAction, AppEffects, AppReducer, AppState};

enum Message {
    Dispatch(AppAction),
    EffectDone(Option<AppAction>),
}

/// Count of messages queued or effects in flight.
#[derive(Default)]
struct Outstanding {
    count: AtomicUsize,
    notify: Notify,
}

impl Outstanding {
    fn add(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn done(&self) {
        let previous = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if previous == Ok(1) {
            self.notify.notify_waiters();
        }
    }

    fn clear(&self) {
        self.count.store(0, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    async fn idle(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Process-wide state container.
pub struct Store {
    sender: mpsc::UnboundedSender<Message>,
    state: watch::Receiver<AppState>,
    outstanding: Arc<Outstanding>,
    stop: TeardownToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Store {
    /// Spawn the store loop on the current tokio runtime, starting from the
    /// baseline state.
    pub fn start(effects: AppEffects) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (publisher, state) = watch::channel(AppState::default());
        let outstanding = Arc::new(Outstanding::default());
        let stop = TeardownToken::new();

        let worker = Worker {
            sender: sender.clone(),
            publisher,
            effects,
            outstanding: Arc::clone(&outstanding),
        };
        let task = tokio::spawn(worker.run(receiver, stop.clone()));
        tracing::debug!("Store started");

        Self {
            sender,
            state,
            outstanding,
            stop,
            task: Mutex::new(Some(task)),
        }
    }

    /// Queue an action. Never blocks and never fails; actions dispatched
    /// after shutdown are dropped.
    pub fn dispatch(&self, action: impl Into<AppAction>) {
        let action = action.into();
        self.outstanding.add();
        if let Err(mpsc::error::SendError(Message::Dispatch(action))) =
            self.sender.send(Message::Dispatch(action))
        {
            self.outstanding.done();
            tracing::warn!(action = action.name(), "Dispatch after store shutdown");
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Read a projection of the current state without cloning all of it.
    pub fn select<T>(&self, selector: impl FnOnce(&AppState) -> T) -> T {
        selector(&self.state.borrow())
    }

    /// Stream of published states, ending when `token` is closed or the store
    /// shuts down.
    pub fn subscribe(&self, token: TeardownToken) -> StoreSubscription {
        let mut receiver = self.state.clone();
        receiver.mark_unchanged();
        StoreSubscription { receiver, token }
    }

    /// Wait until every dispatched action and every effect it triggered has
    /// been reduced.
    pub async fn settled(&self) {
        self.outstanding.idle().await;
    }

    /// Stop the loop. In-flight effects finish but their results are dropped.
    pub async fn shutdown(&self) {
        self.stop.close();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "Store loop ended abnormally");
            }
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.stop.close();
    }
}

struct Worker {
    sender: mpsc::UnboundedSender<Message>,
    publisher: watch::Sender<AppState>,
    effects: AppEffects,
    outstanding: Arc<Outstanding>,
}

impl Worker {
    async fn run(self, mut receiver: mpsc::UnboundedReceiver<Message>, stop: TeardownToken) {
        loop {
            let message = tokio::select! {
                biased;
                _ = stop.closed() => break,
                message = receiver.recv() => match message {
                    Some(message) => message,
                    None => break,
                },
            };

            match message {
                Message::Dispatch(action) | Message::EffectDone(Some(action)) => {
                    self.apply(action)
                }
                Message::EffectDone(None) => {}
            }
            self.outstanding.done();
        }

        receiver.close();
        self.outstanding.clear();
        tracing::debug!("Store stopped");
    }

    fn apply(&self, action: AppAction) {
        tracing::debug!(
            action = action.name(),
            resource = action.resource().unwrap_or("*"),
            "Reducing action"
        );

        if action.is_trigger() {
            self.spawn_effect(action.clone());
        }

        self.publisher.send_modify(|state| {
            let current = std::mem::take(state);
            *state = AppReducer::reduce(current, action);
        });
    }

    fn spawn_effect(&self, action: AppAction) {
        self.outstanding.add();
        let effects = self.effects.clone();
        let sender = self.sender.clone();
        let outstanding = Arc::clone(&self.outstanding);
        tokio::spawn(async move {
            let follow_up = effects.run(action).await;
            if sender.send(Message::EffectDone(follow_up)).is_err() {
                outstanding.done();
                tracing::debug!("Effect result dropped after store shutdown");
            }
        });
    }
}

/// Receiver side of [`Store::subscribe`].
pub struct StoreSubscription {
    receiver: watch::Receiver<AppState>,
    token: TeardownToken,
}

impl StoreSubscription {
    /// State as of the last call to [`next`](Self::next).
    pub fn current(&self) -> AppState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published state. Returns `None` once the view is
    /// torn down; states published after that are never observed.
    pub async fn next(&mut self) -> Option<AppState> {
        if self.token.is_closed() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.token.closed() => None,
            changed = self.receiver.changed() => match changed {
                Ok(()) if !self.token.is_closed() => {
                    Some(self.receiver.borrow_and_update().clone())
                }
                _ => None,
            },
        }
    }
}
