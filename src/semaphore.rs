use std::sync::{Condvar, Mutex};

/// A counting semaphore used to park and wake idle worker threads.
///
/// The scheduler is the only caller of this type, so it stays private and
/// minimal rather than pulling in a dedicated semaphore crate: `acquire`
/// blocks until the count is positive then decrements it, `release(n)`
/// adds `n` and wakes up to `n` waiters. This is the Rust rendering of the
/// platform `semaphore_t` the original spec names as a platform primitive
/// "specified only by the interface the core consumes."
pub(crate) struct Semaphore {
    count: Mutex<usize>,
    condvar: Condvar,
}

impl Semaphore {
    pub(crate) fn new(initial: usize) -> Self {
        Self {
            count: Mutex::new(initial),
            condvar: Condvar::new(),
        }
    }

    pub(crate) fn acquire(&self) {
        let mut count = self.count.lock().unwrap();
        while *count == 0 {
            count = self.condvar.wait(count).unwrap();
        }
        *count -= 1;
    }

    pub(crate) fn release(&self, n: usize) {
        if n == 0 {
            return;
        }
        let mut count = self.count.lock().unwrap();
        *count += n;
        if n == 1 {
            self.condvar.notify_one();
        } else {
            self.condvar.notify_all();
        }
    }
}
