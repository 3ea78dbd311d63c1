//! Enter/leave listener registries.

use crate::core::State;
use std::sync::Arc;

/// Callback invoked after an instance entered a state.
pub type EnterListener = Arc<dyn Fn(&State) + Send + Sync>;

/// Callback invoked before an instance leaves its state.
///
/// Receives `None` when the instance was still uninitialized.
pub type LeaveListener = Arc<dyn Fn(Option<&State>) + Send + Sync>;

/// Ordered list of listener handles.
///
/// The same handle may be registered more than once; removal drops only the
/// first entry pointing at the same allocation.
pub(crate) struct ListenerList<F: ?Sized> {
    entries: Vec<Arc<F>>,
}

impl<F: ?Sized> ListenerList<F> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, listener: Arc<F>) {
        self.entries.push(listener);
    }

    pub(crate) fn remove(&mut self, listener: &Arc<F>) -> bool {
        match self.entries.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copy of the current handles, so callbacks can run without holding the
    /// registry lock.
    pub(crate) fn snapshot(&self) -> Vec<Arc<F>> {
        self.entries.clone()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn duplicates_are_kept_and_removed_one_at_a_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let listener: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut list = ListenerList::new();
        list.add(Arc::clone(&listener));
        list.add(Arc::clone(&listener));
        assert_eq!(list.len(), 2);

        assert!(list.remove(&listener));
        assert_eq!(list.len(), 1);

        for l in list.snapshot() {
            l();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removing_unknown_listener_is_noop() {
        let registered: Arc<dyn Fn() + Send + Sync> = Arc::new(|| {});
        let stranger: Arc<dyn Fn() + Send + Sync> = Arc::new(|| {});

        let mut list = ListenerList::new();
        list.add(Arc::clone(&registered));

        assert!(!list.remove(&stranger));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut list: ListenerList<dyn Fn() + Send + Sync> = ListenerList::new();
        for i in 0..3 {
            let order = Arc::clone(&order);
            list.add(Arc::new(move || order.lock().push(i)));
        }

        for l in list.snapshot() {
            l();
        }
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }
}
