use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use pantry_common::toast::{ToastId, ToastKind, ToastMessage};

/// How long a toast stays up unless told otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3500);

/// Queue of transient notifications, oldest first.
///
/// Each toast removes itself after its duration via a spawned task keyed by
/// its id, so [`ToastStore::dismiss`] can cancel that task instead of letting
/// it fire into a no-op. Handles are cheap to clone and share one queue.
///
/// `show*` must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct ToastStore {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<QueueState>,
    queue: watch::Sender<Vec<ToastMessage>>,
}

#[derive(Default)]
struct QueueState {
    next_id: ToastId,
    toasts: Vec<ToastMessage>,
    timers: HashMap<ToastId, JoinHandle<()>>,
}

impl Shared {
    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &QueueState) {
        self.queue.send_replace(state.toasts.clone());
    }

    /// Remove `id` from the queue. Returns false if it was already gone.
    fn remove(&self, state: &mut QueueState, id: ToastId) -> bool {
        let before = state.toasts.len();
        state.toasts.retain(|t| t.id != id);
        let removed = state.toasts.len() != before;
        if removed {
            self.publish(state);
        }
        removed
    }

    fn expire(&self, id: ToastId) {
        let mut state = self.lock();
        state.timers.remove(&id);
        if self.remove(&mut state, id) {
            tracing::debug!(id, "toast expired");
        }
    }
}

impl ToastStore {
    pub fn new() -> Self {
        let (queue, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState::default()),
                queue,
            }),
        }
    }

    /// Show a success toast for the default duration.
    pub fn show(&self, message: impl Into<String>) -> ToastId {
        self.show_with(message, ToastKind::Success, DEFAULT_DURATION)
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.show_with(message, ToastKind::Success, DEFAULT_DURATION)
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.show_with(message, ToastKind::Warning, DEFAULT_DURATION)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.show_with(message, ToastKind::Error, DEFAULT_DURATION)
    }

    /// Append a toast and schedule its removal after `duration`.
    pub fn show_with(
        &self,
        message: impl Into<String>,
        kind: ToastKind,
        duration: Duration,
    ) -> ToastId {
        let mut state = self.shared.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.toasts.push(ToastMessage {
            id,
            kind,
            message: message.into(),
        });
        self.shared.publish(&state);

        // The deadline is fixed here, not when the task is first polled.
        let sleep = tokio::time::sleep(duration);
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let timer = tokio::spawn(async move {
            sleep.await;
            if let Some(shared) = weak.upgrade() {
                shared.expire(id);
            }
        });
        // Still holding the lock, so an already-fired timer waits for this.
        state.timers.insert(id, timer);

        tracing::debug!(id, %kind, ?duration, "toast shown");
        id
    }

    /// Remove `id` now and cancel its pending expiry. Removing an id that is
    /// not in the queue is a no-op; returns whether anything was removed.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut state = self.shared.lock();
        if let Some(timer) = state.timers.remove(&id) {
            timer.abort();
        }
        let removed = self.shared.remove(&mut state, id);
        if removed {
            tracing::debug!(id, "toast dismissed");
        }
        removed
    }

    /// Cancel every pending expiry and empty the queue.
    pub fn clear(&self) {
        let mut state = self.shared.lock();
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        if !state.toasts.is_empty() {
            state.toasts.clear();
            self.shared.publish(&state);
        }
    }

    /// Snapshot of the queue.
    pub fn toasts(&self) -> Vec<ToastMessage> {
        self.shared.lock().toasts.clone()
    }

    /// Receives the whole queue after every append or removal.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ToastMessage>> {
        self.shared.queue.subscribe()
    }

    #[cfg(test)]
    fn pending_timers(&self) -> usize {
        self.shared.lock().timers.len()
    }
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}
