use crate::data::models::ReviewStatus;

/// Emitted after a review transaction commits.
#[derive(Debug, Clone)]
pub struct ReviewApplied {
    pub kind: &'static str,
    pub user_id: i32,
    pub item_id: i32,
    pub quality: i32,
    pub status: ReviewStatus,
}

/// Emitted the first time an item crosses into MASTERED.
#[derive(Debug, Clone)]
pub struct ItemMastered {
    pub kind: &'static str,
    pub user_id: i32,
    pub item_id: i32,
}

/// Side effects of a review live behind this trait so the update path stays
/// pure. Listeners are fire-and-forget; nothing they do can fail a review.
pub trait ReviewListener: Send + Sync {
    fn on_review_applied(&self, _event: &ReviewApplied) {}

    fn on_item_mastered(&self, _event: &ItemMastered) {}
}

/// Listener set built once at startup and shared through the router state.
#[derive(Default)]
pub struct ReviewListeners {
    listeners: Vec<Box<dyn ReviewListener>>,
}

impl ReviewListeners {
    pub fn new() -> Self {
        ReviewListeners {
            listeners: Vec::new(),
        }
    }

    pub fn with(mut self, listener: Box<dyn ReviewListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn review_applied(&self, event: &ReviewApplied) {
        for listener in &self.listeners {
            listener.on_review_applied(event);
        }
    }

    pub fn item_mastered(&self, event: &ItemMastered) {
        for listener in &self.listeners {
            listener.on_item_mastered(event);
        }
    }
}

/// Forwards study milestones to the external notification pipeline.
pub struct NotificationSink;

impl ReviewListener for NotificationSink {
    fn on_review_applied(&self, event: &ReviewApplied) {
        log::debug!(
            "review applied: user {} {} {} quality {} -> {:?}",
            event.user_id,
            event.kind,
            event.item_id,
            event.quality,
            event.status
        );
    }

    fn on_item_mastered(&self, event: &ItemMastered) {
        log::info!(
            "user {} mastered {} {}",
            event.user_id,
            event.kind,
            event.item_id
        );
    }
}

/// Tells the external cache layer to drop stale study keys for the user.
pub struct CacheInvalidationHook;

impl ReviewListener for CacheInvalidationHook {
    fn on_review_applied(&self, event: &ReviewApplied) {
        log::debug!(
            "invalidating study cache for user {} ({})",
            event.user_id,
            event.kind
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        applied: Mutex<Vec<i32>>,
        mastered: Mutex<Vec<i32>>,
    }

    struct RecordingListener(std::sync::Arc<Recording>);

    impl ReviewListener for RecordingListener {
        fn on_review_applied(&self, event: &ReviewApplied) {
            self.0.applied.lock().unwrap().push(event.item_id);
        }

        fn on_item_mastered(&self, event: &ItemMastered) {
            self.0.mastered.lock().unwrap().push(event.item_id);
        }
    }

    #[test]
    fn every_listener_sees_every_event() {
        let first = std::sync::Arc::new(Recording::default());
        let second = std::sync::Arc::new(Recording::default());
        let listeners = ReviewListeners::new()
            .with(Box::new(RecordingListener(first.clone())))
            .with(Box::new(RecordingListener(second.clone())));

        listeners.review_applied(&ReviewApplied {
            kind: "card",
            user_id: 1,
            item_id: 42,
            quality: 5,
            status: ReviewStatus::Learning,
        });
        listeners.item_mastered(&ItemMastered {
            kind: "card",
            user_id: 1,
            item_id: 42,
        });

        assert_eq!(*first.applied.lock().unwrap(), vec![42]);
        assert_eq!(*second.applied.lock().unwrap(), vec![42]);
        assert_eq!(*first.mastered.lock().unwrap(), vec![42]);
        assert_eq!(*second.mastered.lock().unwrap(), vec![42]);
    }
}
