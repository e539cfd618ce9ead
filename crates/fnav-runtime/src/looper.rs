#![forbid(unsafe_code)]

//! Posted-task queue.
//!
//! The navigator defers second-phase work (result delivery, post-pop adds,
//! wrapper teardown) to the next host loop iteration. Tasks run in FIFO
//! order; a drain only runs the tasks queued before it started, so a task
//! posted while draining waits for the next drain.

use std::collections::VecDeque;
use std::fmt;

/// A deferred unit of work over some state `S`.
pub type Task<S> = Box<dyn FnOnce(&mut S)>;

/// FIFO of posted tasks.
pub struct MessageLoop<S> {
    queue: VecDeque<Task<S>>,
}

impl<S> MessageLoop<S> {
    /// Empty loop.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Queue a task.
    pub fn post(&mut self, task: impl FnOnce(&mut S) + 'static) {
        self.queue.push_back(Box::new(task));
    }

    /// Take the tasks one drain should run.
    pub fn take_batch(&mut self) -> VecDeque<Task<S>> {
        std::mem::take(&mut self.queue)
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<S> Default for MessageLoop<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for MessageLoop<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageLoop")
            .field("pending", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn batch_is_fifo_and_excludes_later_posts() {
        let mut looper: MessageLoop<Vec<u32>> = MessageLoop::new();
        looper.post(|log| log.push(1));
        looper.post(|log| log.push(2));

        let batch = looper.take_batch();
        assert!(looper.is_empty());
        looper.post(|log| log.push(3));

        let mut log = Vec::new();
        for task in batch {
            task(&mut log);
        }
        assert_eq!(log, vec![1, 2]);
        assert_eq!(looper.len(), 1);
    }

    proptest! {
        #[test]
        fn drains_split_posts_in_order(total in 0usize..32, split in 0usize..32) {
            let split = split.min(total);
            let mut looper: MessageLoop<Vec<usize>> = MessageLoop::new();
            for i in 0..split {
                looper.post(move |log| log.push(i));
            }
            let first = looper.take_batch();
            for i in split..total {
                looper.post(move |log| log.push(i));
            }
            prop_assert_eq!(first.len(), split);
            prop_assert_eq!(looper.len(), total - split);

            let mut log = Vec::new();
            for task in first.into_iter().chain(looper.take_batch()) {
                task(&mut log);
            }
            prop_assert_eq!(log, (0..total).collect::<Vec<_>>());
            prop_assert!(looper.is_empty());
        }
    }
}
