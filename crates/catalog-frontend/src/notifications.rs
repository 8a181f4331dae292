//! Ordered queue of transient notifications with time-based expiry.
//!
//! The queue is an explicitly constructed handle; clones share the same
//! sequence, so whoever needs to push or render notifications is handed a
//! clone instead of reaching for a global.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use catalog_bridge::config::DEFAULT_NOTIFICATION_DURATION_MS;
use catalog_bridge::notification::NotificationType;
use tokio::sync::watch;
use tokio::task::AbortHandle;

/// Identifier of a notification, unique for the lifetime of its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationId(u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// A single message shown to the user. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub notification_type: NotificationType,
    pub message: String,
    /// Lifetime in milliseconds; zero or negative never expires.
    pub duration_ms: i64,
}

impl Notification {
    pub fn expires(&self) -> bool {
        self.duration_ms > 0
    }
}

struct Entry {
    notification: Notification,
    expiry: Option<AbortHandle>,
}

struct QueueState {
    entries: Vec<Entry>,
    next_id: u64,
    changes: watch::Sender<Vec<Notification>>,
}

impl QueueState {
    fn snapshot(&self) -> Vec<Notification> {
        self.entries
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    fn publish(&self) {
        self.changes.send_replace(self.snapshot());
    }

    /// Removes the entry with `id`, keeping the order of the others.
    fn take(&mut self, id: NotificationId) -> Option<Entry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.notification.id == id)?;
        let entry = self.entries.remove(index);
        self.publish();
        Some(entry)
    }
}

impl Drop for QueueState {
    fn drop(&mut self) {
        for entry in &self.entries {
            if let Some(expiry) = &entry.expiry {
                expiry.abort();
            }
        }
    }
}

fn lock(state: &Mutex<QueueState>) -> MutexGuard<'_, QueueState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Decrements the pending-expiry count when a timer task ends, whether it
/// fired or was aborted.
struct PendingExpiry(Arc<AtomicUsize>);

impl PendingExpiry {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingExpiry {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Shared, ordered collection of notifications. Insertion order is display
/// order; removal is the only state change an entry ever goes through.
#[derive(Clone)]
pub struct NotificationQueue {
    state: Arc<Mutex<QueueState>>,
    pending_expiries: Arc<AtomicUsize>,
    default_duration_ms: i64,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("notifications", &self.snapshot())
            .field("default_duration_ms", &self.default_duration_ms)
            .finish()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::with_default_duration(DEFAULT_NOTIFICATION_DURATION_MS)
    }

    /// Creates a queue whose notifications last `default_duration_ms` unless
    /// the caller picks a duration.
    pub fn with_default_duration(default_duration_ms: i64) -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            state: Arc::new(Mutex::new(QueueState {
                entries: Vec::new(),
                next_id: 0,
                changes,
            })),
            pending_expiries: Arc::new(AtomicUsize::new(0)),
            default_duration_ms,
        }
    }

    pub fn default_duration_ms(&self) -> i64 {
        self.default_duration_ms
    }

    /// Appends a notification and, when its duration is positive, schedules
    /// its removal. `None` uses the queue's default duration.
    ///
    /// Expiry timers run on the ambient Tokio runtime; without one the
    /// notification stays until removed explicitly.
    pub fn add(
        &self,
        message: impl Into<String>,
        notification_type: NotificationType,
        duration_ms: Option<i64>,
    ) -> NotificationId {
        let duration_ms = duration_ms.unwrap_or(self.default_duration_ms);
        let mut state = lock(&self.state);

        let id = NotificationId(state.next_id);
        state.next_id += 1;

        let notification = Notification {
            id,
            notification_type,
            message: message.into(),
            duration_ms,
        };
        let expiry = if notification.expires() {
            self.schedule_expiry(id, duration_ms)
        } else {
            None
        };

        log::debug!("Showing {notification_type} notification {id} for {duration_ms}ms");
        state.entries.push(Entry {
            notification,
            expiry,
        });
        state.publish();
        id
    }

    fn schedule_expiry(&self, id: NotificationId, duration_ms: i64) -> Option<AbortHandle> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                log::warn!("No async runtime available, notification {id} will not expire");
                return None;
            }
        };

        let state = Arc::downgrade(&self.state);
        let pending = PendingExpiry::new(self.pending_expiries.clone());
        let delay = Duration::from_millis(duration_ms.unsigned_abs());

        let task = runtime.spawn(async move {
            let _pending = pending;
            tokio::time::sleep(delay).await;
            if let Some(state) = state.upgrade() {
                // this task is the one finishing, nothing left to abort
                let _ = lock(&state).take(id);
            }
        });
        Some(task.abort_handle())
    }

    /// Removes the notification with `id` and cancels its pending expiry.
    /// Unknown or already removed ids are ignored.
    pub fn remove(&self, id: NotificationId) {
        let entry = lock(&self.state).take(id);
        if let Some(expiry) = entry.and_then(|entry| entry.expiry) {
            expiry.abort();
        }
    }

    /// Removes every notification and cancels every pending expiry.
    pub fn clear(&self) {
        let entries = {
            let mut state = lock(&self.state);
            let entries = std::mem::take(&mut state.entries);
            state.publish();
            entries
        };
        for expiry in entries.into_iter().filter_map(|entry| entry.expiry) {
            expiry.abort();
        }
    }

    pub fn success(&self, message: impl Into<String>, duration_ms: Option<i64>) -> NotificationId {
        self.add(message, NotificationType::Success, duration_ms)
    }

    pub fn error(&self, message: impl Into<String>, duration_ms: Option<i64>) -> NotificationId {
        self.add(message, NotificationType::Error, duration_ms)
    }

    pub fn info(&self, message: impl Into<String>, duration_ms: Option<i64>) -> NotificationId {
        self.add(message, NotificationType::Info, duration_ms)
    }

    pub fn warning(&self, message: impl Into<String>, duration_ms: Option<i64>) -> NotificationId {
        self.add(message, NotificationType::Warning, duration_ms)
    }

    /// Visible notifications in display order.
    pub fn snapshot(&self) -> Vec<Notification> {
        lock(&self.state).snapshot()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Observes the visible sequence after every change. The channel closes
    /// once the last queue handle is dropped.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        lock(&self.state).changes.subscribe()
    }

    /// Number of expiry timers that have neither fired nor been cancelled.
    pub fn pending_expiries(&self) -> usize {
        self.pending_expiries.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    fn messages(queue: &NotificationQueue) -> Vec<String> {
        queue
            .snapshot()
            .into_iter()
            .map(|notification| notification.message)
            .collect()
    }

    async fn advance_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_insertion_order() {
        let queue = NotificationQueue::new();
        queue.info("first", Some(500));
        queue.error("second", Some(100));
        queue.success("third", None);
        queue.warning("fourth", Some(0));

        assert_eq!(messages(&queue), vec!["first", "second", "third", "fourth"]);

        let types: Vec<_> = queue
            .snapshot()
            .into_iter()
            .map(|notification| notification.notification_type)
            .collect();
        assert_eq!(
            types,
            vec![
                NotificationType::Info,
                NotificationType::Error,
                NotificationType::Success,
                NotificationType::Warning,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn ids_are_unique() {
        let queue = NotificationQueue::new();
        let ids: HashSet<_> = (0..100)
            .map(|n| queue.add(format!("message {n}"), NotificationType::Info, Some(0)))
            .collect();
        assert_eq!(ids.len(), 100);

        let first = queue.snapshot()[0].id;
        queue.remove(first);
        let next = queue.info("after removal", Some(0));
        assert_ne!(next, first);
        assert_eq!(queue.snapshot().iter().filter(|n| n.id == next).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn default_duration_applies_when_unset() {
        let queue = NotificationQueue::new();
        queue.info("default", None);
        assert_eq!(queue.snapshot()[0].duration_ms, 3000);

        advance_ms(2999).await;
        assert_eq!(queue.len(), 1);
        advance_ms(2).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn configured_default_duration_is_used() {
        let queue = NotificationQueue::with_default_duration(0);
        queue.warning("sticky by default", None);

        advance_ms(60_000).await;
        assert_eq!(messages(&queue), vec!["sticky by default"]);
        assert_eq!(queue.pending_expiries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn non_positive_durations_never_expire() {
        let queue = NotificationQueue::new();
        let zero = queue.info("zero", Some(0));
        queue.info("negative", Some(-5));

        advance_ms(3_600_000).await;
        assert_eq!(messages(&queue), vec!["zero", "negative"]);

        queue.remove(zero);
        assert_eq!(messages(&queue), vec!["negative"]);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_unknown_id_is_noop() {
        let queue = NotificationQueue::new();
        queue.info("kept", Some(0));
        let before = queue.snapshot();

        queue.remove(NotificationId(42));
        assert_eq!(queue.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_twice_is_same_as_once() {
        let queue = NotificationQueue::new();
        let a = queue.info("a", Some(0));
        queue.info("b", Some(0));

        queue.remove(a);
        let after_first = queue.snapshot();
        queue.remove(a);
        assert_eq!(queue.snapshot(), after_first);
        assert_eq!(messages(&queue), vec!["b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn add_then_remove_leaves_queue_empty() {
        let queue = NotificationQueue::new();
        let id = queue.add("Saved", NotificationType::Success, None);
        queue.remove(id);
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expires_without_explicit_remove() {
        let queue = NotificationQueue::new();
        queue.add("Saved", NotificationType::Success, Some(50));
        assert_eq!(queue.len(), 1);

        advance_ms(51).await;
        assert!(queue.is_empty());
        assert_eq!(queue.pending_expiries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_keeps_order_of_remaining_entries() {
        let queue = NotificationQueue::new();
        queue.info("long", Some(1000));
        queue.info("short", Some(10));
        queue.info("sticky", Some(0));
        queue.info("medium", Some(500));

        advance_ms(11).await;
        assert_eq!(messages(&queue), vec!["long", "sticky", "medium"]);

        advance_ms(500).await;
        assert_eq!(messages(&queue), vec!["long", "sticky"]);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_removal_cancels_timer() {
        let queue = NotificationQueue::new();
        let id = queue.success("Saved", Some(50));
        assert_eq!(queue.pending_expiries(), 1);

        queue.remove(id);
        advance_ms(1).await;
        assert_eq!(queue.pending_expiries(), 0);

        // a later entry is unaffected by the cancelled timer
        queue.info("next", Some(0));
        advance_ms(100).await;
        assert_eq!(messages(&queue), vec!["next"]);
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_one_sequence() {
        let queue = NotificationQueue::new();
        let other = queue.clone();

        let id = other.error("from clone", Some(0));
        assert_eq!(messages(&queue), vec!["from clone"]);
        queue.remove(id);
        assert!(other.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_everything() {
        let queue = NotificationQueue::new();
        queue.info("a", Some(100));
        queue.info("b", Some(200));
        queue.info("c", Some(0));

        queue.clear();
        assert!(queue.is_empty());
        advance_ms(1).await;
        assert_eq!(queue.pending_expiries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_every_change() {
        let queue = NotificationQueue::new();
        let mut changes = queue.subscribe();

        let id = queue.info("hello", Some(0));
        changes.changed().await.unwrap();
        assert_eq!(changes.borrow_and_update().len(), 1);

        queue.remove(id);
        changes.changed().await.unwrap();
        assert!(changes.borrow_and_update().is_empty());

        drop(queue);
        assert!(changes.changed().await.is_err());
    }

    #[test]
    fn without_runtime_notifications_stay() {
        let queue = NotificationQueue::new();
        queue.info("no runtime", Some(10));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pending_expiries(), 0);
    }

    #[test]
    fn ids_render_as_strings() {
        assert_eq!(NotificationId(7).to_string(), "toast-7");
    }
}
