use super::bus::MessageHandler;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Queue behind a participant's handler, drained once per tick by its owner.
#[derive(Debug, Default)]
pub struct Mailbox {
    queue: Mutex<VecDeque<String>>,
    max_per_tick: usize,
}

impl Mailbox {
    pub fn new(max_per_tick: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            max_per_tick,
        }
    }

    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn max_per_tick(&self) -> usize {
        self.max_per_tick
    }

    pub fn push(&self, message: String) {
        self.lock_queue().push_back(message)
    }

    pub fn len(&self) -> usize {
        self.lock_queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_queue().is_empty()
    }

    /// Takes up to `max_per_tick` messages in arrival order under a single lock.
    /// Anything beyond the cap stays queued for the next drain.
    pub fn drain(&self) -> Vec<String> {
        let mut queue = self.lock_queue();
        let take = queue.len().min(self.max_per_tick);
        queue.drain(..take).collect()
    }
}

impl MessageHandler for Mailbox {
    fn deliver(&self, message: String) {
        self.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_respects_cap_and_order() {
        let mailbox = Mailbox::new(2);
        for i in 0..5 {
            mailbox.push(format!("m{}", i));
        }
        assert_eq!(mailbox.drain(), vec!["m0", "m1"]);
        assert_eq!(mailbox.len(), 3);
        assert_eq!(mailbox.drain(), vec!["m2", "m3"]);
        assert_eq!(mailbox.drain(), vec!["m4"]);
        assert!(mailbox.drain().is_empty());
    }
}
