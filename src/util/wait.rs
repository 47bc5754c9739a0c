use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tokio::sync::Notify;

/// Counter of outstanding tasks that can be awaited from both blocking and
/// async contexts.
#[derive(Debug, Default)]
pub struct WaitGroup {
    n: Mutex<usize>,
    cv: Condvar,
    notify: Notify,
}

impl WaitGroup {
    /// Creates a new empty wait group.
    #[inline]
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::default()
    }

    /// Registers a new task. The task is complete when the returned guard is
    /// dropped.
    #[inline]
    pub fn add(self: &Arc<Self>) -> WaitGuard {
        *self.n.lock() += 1;
        WaitGuard(Arc::clone(self))
    }

    /// Returns the number of outstanding tasks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        *self.n.lock()
    }

    /// Returns whether all tasks have completed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blocks the current thread until all tasks complete.
    pub fn wait(&self) {
        let mut n = self.n.lock();
        while *n > 0 {
            self.cv.wait(&mut n);
        }
    }

    /// Blocks the current thread until all tasks complete or the timeout
    /// expires. Returns whether all tasks completed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut n = self.n.lock();
        while *n > 0 {
            if self.cv.wait_for(&mut n, timeout).timed_out() {
                return *n == 0;
            }
        }
        true
    }

    /// Waits asynchronously until all tasks complete.
    pub async fn wait_async(&self) {
        loop {
            // Notified must exist before the check to observe notify_waiters()
            let notified = self.notify.notified();
            if *self.n.lock() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn done(&self) {
        let mut n = self.n.lock();
        *n -= 1;
        if *n == 0 {
            drop(n);
            self.cv.notify_all();
            self.notify.notify_waiters();
        }
    }
}

/// Registration of a task in a [`WaitGroup`].
#[derive(Debug)]
#[must_use]
pub struct WaitGuard(Arc<WaitGroup>);

impl Drop for WaitGuard {
    #[inline]
    fn drop(&mut self) {
        self.0.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_threads() {
        let wg = WaitGroup::new();
        let guards: Vec<_> = (0..4).map(|_| wg.add()).collect();
        assert_eq!(wg.len(), 4);
        assert!(!wg.wait_timeout(Duration::from_millis(10)));
        for g in guards {
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                drop(g);
            });
        }
        wg.wait();
        assert!(wg.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn wait_async() {
        let wg = WaitGroup::new();
        let g = wg.add();
        let t = tokio::task::spawn_blocking(move || {
            std::thread::sleep(Duration::from_millis(20));
            drop(g);
        });
        wg.wait_async().await;
        assert!(wg.is_empty());
        t.await.unwrap();
    }
}
