//! Bottle visualization state queue
//!
//! Spinning the bottle plays a roll state until a result arrives; the result
//! then plays two slowdown states before settling. Queued states are taken
//! one at a time, each when layer 0 finishes its cycle.

use std::collections::VecDeque;

pub const ROLL_STATE: i32 = -1;
pub const SLOW_DOWN_STATE: i32 = 20;
pub const SETTLE_STATE_OFFSET: i32 = 9;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BottleQueue {
    queue: VecDeque<i32>,
    running: bool,
}

impl BottleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Feed a requested state. Returns a state to apply right away, if any.
    pub fn request(&mut self, state: i32) -> Option<i32> {
        if state == ROLL_STATE && !self.running {
            self.running = true;
            self.queue.clear();
            self.queue.push_back(ROLL_STATE);
            return None;
        }
        if (0..=7).contains(&state) {
            if self.running {
                self.running = false;
                self.queue.clear();
                self.queue
                    .extend([SLOW_DOWN_STATE, SETTLE_STATE_OFFSET + state, state]);
                return None;
            }
            return Some(state);
        }
        None
    }

    /// Next queued state once layer 0 has played its last frame.
    pub fn next(&mut self, last_frame_played: bool) -> Option<i32> {
        if last_frame_played {
            self.queue.pop_front()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_then_result() {
        let mut q = BottleQueue::new();
        assert_eq!(q.request(ROLL_STATE), None);
        assert!(q.is_running());
        assert_eq!(q.next(true), Some(-1));
        // Rolling again while running is ignored.
        assert_eq!(q.request(ROLL_STATE), None);
        assert_eq!(q.pending(), 0);

        assert_eq!(q.request(5), None);
        assert!(!q.is_running());
        assert_eq!(q.next(false), None);
        assert_eq!(q.next(true), Some(20));
        assert_eq!(q.next(true), Some(14));
        assert_eq!(q.next(true), Some(5));
        assert_eq!(q.next(true), None);
    }

    #[test]
    fn idle_results_apply_directly() {
        let mut q = BottleQueue::new();
        assert_eq!(q.request(3), Some(3));
        assert_eq!(q.request(42), None);
    }
}
