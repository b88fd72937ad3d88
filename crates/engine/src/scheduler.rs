//! Fixed-rate tick scheduler with explicit subscription handles
//!
//! Callbacks are registered once and removed by the handle returned from
//! [`Scheduler::register`]. The host feeds wall-clock time through
//! [`Scheduler::advance`]; every full interval fires one tick on each
//! subscriber, in registration order.

use isoroom_core::types::ROOM_ANIMATION_FPS;

/// Token identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(u64);

/// Tick metadata passed to callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Ticks fired since the scheduler was created (1-based).
    pub count: u64,
    pub interval_ms: u32,
}

pub type TickCallback<C> = Box<dyn FnMut(&mut C, Tick)>;

pub struct Scheduler<C> {
    interval_ms: u32,
    accumulated_ms: f64,
    ticks: u64,
    next_handle: u64,
    subscribers: Vec<(SubscriptionHandle, TickCallback<C>)>,
}

impl<C> Scheduler<C> {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            accumulated_ms: 0.0,
            ticks: 0,
            next_handle: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn with_fps(fps: u32) -> Self {
        Self::new(1000 / fps.max(1))
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn register(&mut self, callback: impl FnMut(&mut C, Tick) + 'static) -> SubscriptionHandle {
        self.next_handle += 1;
        let handle = SubscriptionHandle(self.next_handle);
        self.subscribers.push((handle, Box::new(callback)));
        handle
    }

    /// Remove a subscription. Returns false for unknown or already cancelled handles.
    pub fn cancel(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(h, _)| *h != handle);
        self.subscribers.len() != before
    }

    pub fn is_registered(&self, handle: SubscriptionHandle) -> bool {
        self.subscribers.iter().any(|(h, _)| *h == handle)
    }

    /// Feed elapsed time; returns how many ticks fired.
    pub fn advance(&mut self, elapsed_ms: f64, ctx: &mut C) -> u32 {
        self.accumulated_ms += elapsed_ms.max(0.0);
        let interval = self.interval_ms as f64;
        let mut fired = 0;
        while self.accumulated_ms >= interval {
            self.accumulated_ms -= interval;
            self.ticks += 1;
            let tick = Tick {
                count: self.ticks,
                interval_ms: self.interval_ms,
            };
            for (_, callback) in self.subscribers.iter_mut() {
                callback(ctx, tick);
            }
            fired += 1;
        }
        fired
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::with_fps(ROOM_ANIMATION_FPS)
    }
}

impl<C> std::fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("interval_ms", &self.interval_ms)
            .field("ticks", &self.ticks)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let mut s: Scheduler<Vec<u64>> = Scheduler::default();
        assert_eq!(s.interval_ms(), 250);
        s.register(|log, tick| log.push(tick.count));
        let mut log = Vec::new();
        assert_eq!(s.advance(100.0, &mut log), 0);
        assert_eq!(s.advance(160.0, &mut log), 1);
        assert_eq!(s.advance(500.0, &mut log), 2);
        assert_eq!(log, vec![1, 2, 3]);
    }

    #[test]
    fn cancelled_handles_stop_firing() {
        let mut s: Scheduler<u32> = Scheduler::new(10);
        let a = s.register(|n, _| *n += 1);
        let b = s.register(|n, _| *n += 10);
        let mut n = 0;
        s.advance(10.0, &mut n);
        assert_eq!(n, 11);
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert!(s.is_registered(b));
        s.advance(10.0, &mut n);
        assert_eq!(n, 21);
    }
}
