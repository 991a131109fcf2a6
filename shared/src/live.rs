//! Single-writer observable slots.
//!
//! A [`LiveSlot`] holds exactly one value. Its owner publishes with
//! `&mut self`, so there is only ever one writer; any number of readers
//! subscribe and always see the most recent value. Intermediate values that
//! a reader did not get to are dropped, never queued. A new subscriber
//! starts from the current value, and dropping the receiver unsubscribes.

use std::fmt;

use tokio::sync::watch;

pub struct LiveSlot<T> {
    tx: watch::Sender<T>,
}

impl<T> LiveSlot<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Replaces the current value and wakes every subscriber.
    /// Succeeds with or without subscribers.
    pub fn publish(&mut self, value: T) {
        self.tx.send_replace(value);
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn get(&self) -> watch::Ref<'_, T> {
        self.tx.borrow()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone> LiveSlot<T> {
    #[must_use]
    pub fn latest(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T: Default> Default for LiveSlot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for LiveSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSlot")
            .field("value", &*self.tx.borrow())
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}
