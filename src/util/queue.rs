use heapless::Deque;

/// Fixed-capacity FIFO queue. Memory use is determined entirely by `T` and
/// `N`; the queue never allocates.
#[derive(Debug)]
pub struct BoundedQueue<T, const N: usize>(Deque<T, N>);

impl<T, const N: usize> BoundedQueue<T, N> {
    /// Creates an empty queue.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(Deque::new())
    }

    /// Returns the number of queued items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the queue is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of items that can be pushed before the queue is
    /// full.
    #[inline]
    #[must_use]
    pub fn free(&self) -> usize {
        N - self.0.len()
    }

    /// Appends `v` to the back of the queue, returning it back if the queue
    /// is full.
    #[inline]
    pub fn push(&mut self, v: T) -> Result<(), T> {
        self.0.push_back(v)
    }

    /// Appends `v` to the back of the queue, evicting and returning the oldest
    /// item if the queue is full.
    pub fn push_evict(&mut self, v: T) -> Option<T> {
        let old = if self.0.is_full() {
            self.0.pop_front()
        } else {
            None
        };
        // Cannot fail after the eviction above unless N == 0
        self.0.push_back(v).err().or(old)
    }

    /// Removes the item at the front of the queue.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.0.pop_front()
    }

    /// Returns an iterator over the queued items from front to back.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }
}

impl<T, const N: usize> Default for BoundedQueue<T, N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_full() {
        let mut q = BoundedQueue::<u8, 2>::new();
        assert_eq!(q.push(1), Ok(()));
        assert_eq!(q.push(2), Ok(()));
        assert_eq!(q.free(), 0);
        assert_eq!(q.push(3), Err(3));
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.push(3), Ok(()));
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), [2, 3]);
    }

    #[test]
    fn push_evict() {
        let mut q = BoundedQueue::<u8, 2>::new();
        assert_eq!(q.push_evict(1), None);
        assert_eq!(q.push_evict(2), None);
        assert_eq!(q.push_evict(3), Some(1));
        assert_eq!(q.len(), 2);
        assert_eq!((q.pop(), q.pop(), q.pop()), (Some(2), Some(3), None));
    }
}
