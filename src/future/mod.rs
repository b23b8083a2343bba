use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

// one-shot value published by a background stage and taken once by whoever waits on it.
enum Slot<T> {
    Pending,
    Ready(T),
    Taken,
}

pub struct Future<T> {
    slot: Mutex<Slot<T>>,
    published: Condvar,
}

impl<T> Future<T> {
    pub fn new() -> Future<T> {
        Future {
            slot: Mutex::new(Slot::Pending),
            published: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(slot: &mut Slot<T>) -> Option<T> {
        match std::mem::replace(slot, Slot::Taken) {
            Slot::Ready(t) => Some(t),
            _ => None,
        }
    }
}

impl<T> Default for Future<T> {
    fn default() -> Self {
        Future::new()
    }
}

pub trait PollableFuture<T> {
    /// Blocks until a value is published. Returns `None` if it was already taken.
    fn wait(&self) -> Option<T>;
    /// Non-blocking; `None` while pending or once taken.
    fn get(&self) -> Option<T>;
    fn is_done(&self) -> bool;
}

impl<T> PollableFuture<T> for Future<T> {
    fn wait(&self) -> Option<T> {
        let mut slot = self.lock();
        while let Slot::Pending = *slot {
            slot = self
                .published
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
        Future::take(&mut slot)
    }

    fn get(&self) -> Option<T> {
        let mut slot = self.lock();
        match *slot {
            Slot::Ready(_) => Future::take(&mut slot),
            _ => None,
        }
    }

    fn is_done(&self) -> bool {
        !matches!(*self.lock(), Slot::Pending)
    }
}

pub trait WritableFuture<T> {
    /// Publishes `t`. Only the first put wins; later ones return false.
    fn put(&self, t: T) -> bool;
}

impl<T> WritableFuture<T> for Future<T> {
    fn put(&self, t: T) -> bool {
        let mut slot = self.lock();
        if !matches!(*slot, Slot::Pending) {
            return false;
        }
        *slot = Slot::Ready(t);
        self.published.notify_all();
        true
    }
}
